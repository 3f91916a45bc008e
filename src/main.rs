#![forbid(unsafe_code)]

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::tty::IsTty;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use tox::auto;
use tox::chooser::TerminalChooser;
use tox::cli::Args;
use tox::index::{AddOutcome, RemoveOutcome};
use tox::pathutil::absolutize;
use tox::render::{format_match_list, format_report};
use tox::{Config, IndexChainLoader, IndexStore, Outcome, ResolutionEngine, ToxError};

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "TOX_LOG";

fn main() {
    match run_app() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("tox: {e:#}");
            std::process::exit(1);
        }
    }
}

fn run_app() -> Result<i32> {
    let args = Args::parse().validated();
    init_logging(&args);

    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let mut config = Config::from_env().with_owner_check(!args.any_owner);
    if let Some(root) = &args.root {
        config = config.with_root(absolutize(&cwd, root));
    }
    let use_color = !args.no_color && std::io::stderr().is_tty();

    if args.init || args.init_protected {
        let store = IndexStore::create(&cwd, args.init_protected)?;
        println!("created {}", store.path().display());
        return Ok(0);
    }
    if let Some(dir) = &args.add {
        let mut store = local_store(&config, &cwd)?;
        match store.add_dir(&target_dir(&cwd, dir.as_deref()))? {
            AddOutcome::Added(e) => println!("added {e}"),
            AddOutcome::AlreadyPresent(e) => println!("{e} is already present"),
        }
        return Ok(0);
    }
    if let Some(dir) = &args.add_tree {
        let mut store = local_store(&config, &cwd)?;
        let added = store.add_tree(&target_dir(&cwd, dir.as_deref()))?;
        for e in &added {
            println!("added {e}");
        }
        println!("{} new entries", added.len());
        return Ok(0);
    }
    if let Some(dir) = &args.del {
        let mut store = local_store(&config, &cwd)?;
        match store.del_dir(&target_dir(&cwd, dir.as_deref()))? {
            RemoveOutcome::Removed(e) => println!("removed {e}"),
            RemoveOutcome::NotFound(e) => println!("{e} not found"),
        }
        return Ok(0);
    }
    if args.clean {
        let mut store = local_store(&config, &cwd)?;
        for e in store.clean()? {
            println!("removed {e}");
        }
        return Ok(0);
    }
    if args.remove_index {
        let store = local_store(&config, &cwd)?;
        let path = store.path().to_path_buf();
        store.delete_file()?;
        println!("removed {}", path.display());
        return Ok(0);
    }

    let query = args.query();
    let engine = ResolutionEngine::new(&config);

    if let Some(expr) = &args.grep {
        let Some(store) = engine.working_store(&cwd, query.scope)? else {
            bail!(ToxError::NoIndex(cwd));
        };
        let re = regex::Regex::new(expr).map_err(ToxError::from)?;
        let hits = auto::grep(&store, &re);
        print_lines(&format_report(&hits, use_color && std::io::stdout().is_tty()));
        return Ok(0);
    }
    if args.list || args.info {
        let Some(matches) = engine.list(&cwd, &query)? else {
            bail!(ToxError::NoIndex(cwd));
        };
        if args.list {
            print_lines(&format_match_list(&matches));
        } else {
            let infos = auto::report(matches.iter().map(|m| absolutize(&cwd, Path::new(m))));
            print_lines(&format_report(&infos, use_color && std::io::stdout().is_tty()));
        }
        return Ok(0);
    }

    if query.patterns.is_empty() {
        bail!("no pattern given (see --help)");
    }

    let mut chooser = TerminalChooser::new(use_color);
    let resolution = engine.resolve(&cwd, &query, &mut chooser)?;
    match resolution.outcome {
        Outcome::Resolved(path) => {
            println!("{}", path.display());
            Ok(0)
        }
        Outcome::MatchList(matches) => {
            print_lines(&format_match_list(&matches));
            Ok(0)
        }
        Outcome::NoMatch(message) => {
            eprintln!("tox: {message}");
            Ok(1)
        }
        Outcome::Cancelled => Ok(1),
    }
}

/// The nearest index, required for mutating operations.
fn local_store(config: &Config, cwd: &Path) -> Result<IndexStore> {
    IndexChainLoader::new(config)
        .load(cwd, false)?
        .ok_or_else(|| ToxError::NoIndex(cwd.to_path_buf()).into())
}

fn target_dir(cwd: &Path, dir: Option<&Path>) -> PathBuf {
    dir.map(|d| absolutize(cwd, d))
        .unwrap_or_else(|| cwd.to_path_buf())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

/// Route library logs to stderr. `TOX_LOG` overrides the `-v`/`-q` level.
fn init_logging(args: &Args) {
    let level = match (args.quiet, args.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
