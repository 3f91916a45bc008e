#![forbid(unsafe_code)]
//! Writes shell completions, the man page and the `cd` wrapper function
//! into an output directory (default `dist`).

use anyhow::Context;
use clap::CommandFactory;
use clap_complete::{generate_to, Shell};
use clap_mangen::Man;
use std::fs;
use std::path::{Path, PathBuf};
use tox::cli::Args;

/// POSIX shell wrapper: `tox` prints a directory on success, the wrapper
/// changes into it. Listing and mutating flags pass straight through.
const SHELL_WRAPPER: &str = r#"# source this file from your shell rc
tox() {
    case "$1" in
        -*) command tox "$@"; return ;;
    esac
    local dest
    dest="$(command tox "$@")" || return
    [ -d "$dest" ] && cd "$dest" || printf '%s\n' "$dest"
}
"#;

fn main() -> anyhow::Result<()> {
    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("dist"));

    write_completions(&out_dir.join("completions"))?;
    write_man_page(&out_dir.join("man"))?;

    let shell_dir = out_dir.join("shell");
    fs::create_dir_all(&shell_dir)?;
    fs::write(shell_dir.join("tox.sh"), SHELL_WRAPPER).context("failed to write shell wrapper")?;

    eprintln!("generated completions, man page and shell wrapper under {}", out_dir.display());
    Ok(())
}

fn write_completions(dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dir)?;
    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
        let mut cmd = Args::command();
        generate_to(shell, &mut cmd, "tox", dir)
            .with_context(|| format!("failed to generate {shell} completions"))?;
    }
    Ok(())
}

fn write_man_page(dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dir)?;
    let mut buffer = Vec::new();
    Man::new(Args::command()).render(&mut buffer)?;
    fs::write(dir.join("tox.1"), buffer).context("failed to write man page")?;
    Ok(())
}
