use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use crate::resolve::{Mode, Query, Scope};

/// Trailing token selecting outer-only scope.
pub const OUTER_TOKEN: &str = "^";
/// Trailing token selecting global scope.
pub const GLOBAL_TOKEN: &str = "^^";

const AFTER_HELP: &str = "\
Examples:
  tox proj            jump to the tagged directory matching *proj*
  tox src 2           second match for *src*
  tox src -1          last match
  tox lib ^           search the outer index only
  tox lib ^^          search the whole index chain
  tox -a              tag the current directory
  tox -g 'rust|cli'   search .tox-auto tags and descriptions";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tox",
    version,
    about = "Directory bookmarks with quick fragment lookup",
    after_help = AFTER_HELP,
    group(ArgGroup::new("action").args([
        "add", "add_tree", "del", "clean", "list", "grep", "info",
        "init", "init_protected", "remove_index",
    ])),
    group(ArgGroup::new("mode").args(["print", "calc"])),
    group(ArgGroup::new("scope").args(["outer", "global"])),
)]
pub struct Args {
    /// Fragment patterns (globs; bare words match as *word*), optionally
    /// followed by an offset and/or a scope token (^ outer, ^^ global)
    #[arg(allow_negative_numbers = true)]
    pub patterns: Vec<String>,

    /// Tag a directory (default: current directory)
    #[arg(short = 'a', long = "add", value_name = "DIR", num_args = 0..=1)]
    pub add: Option<Option<PathBuf>>,

    /// Tag a directory and all non-hidden directories below it
    #[arg(short = 'r', long = "add-tree", value_name = "DIR", num_args = 0..=1)]
    pub add_tree: Option<Option<PathBuf>>,

    /// Untag a directory (default: current directory)
    #[arg(short = 'd', long = "del", value_name = "DIR", num_args = 0..=1)]
    pub del: Option<Option<PathBuf>>,

    /// Drop entries whose directories no longer exist
    #[arg(long = "clean")]
    pub clean: bool,

    /// List indexed directories (filtered by patterns, if any)
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Search .tox-auto tags and descriptions with a regex
    #[arg(short = 'g', long = "grep", value_name = "REGEX")]
    pub grep: Option<String>,

    /// Show .tox-auto metadata for matching directories
    #[arg(short = 'i', long = "info")]
    pub info: bool,

    /// Create an empty index in the current directory
    #[arg(long = "init")]
    pub init: bool,

    /// Create an empty protected index in the current directory
    #[arg(long = "init-protected")]
    pub init_protected: bool,

    /// Delete the nearest index file (refused when protected)
    #[arg(long = "remove-index")]
    pub remove_index: bool,

    /// Print matches instead of selecting one
    #[arg(short = 'p', long = "print")]
    pub print: bool,

    /// Print matches without prompting; a single match is resolved
    #[arg(short = 'c', long = "calc")]
    pub calc: bool,

    /// Search only the outer index chain
    #[arg(short = 'o', long = "outer")]
    pub outer: bool,

    /// Search the whole index chain
    #[arg(short = 'G', long = "global")]
    pub global: bool,

    /// Filesystem root boundary for index searches
    #[arg(long = "root", value_name = "DIR", hide = true)]
    pub root: Option<PathBuf>,

    /// Accept index files owned by other users
    #[arg(long = "any-owner")]
    pub any_owner: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl Args {
    /// Enforce invariants after parsing.
    pub fn validated(mut self) -> Self {
        // Respect NO_COLOR env var
        if std::env::var_os("NO_COLOR").is_some() {
            self.no_color = true;
        }
        if self.quiet {
            self.verbose = 0;
        }
        self
    }

    /// Split positional arguments into patterns, offset and scope.
    ///
    /// Trailing tokens are consumed from the end: scope tokens and at most
    /// one integer offset, in either order.
    pub fn query(&self) -> Query {
        let mut patterns = self.patterns.clone();
        let mut offset = None;
        let mut scope = if self.global {
            Scope::Global
        } else if self.outer {
            Scope::Outer
        } else {
            Scope::Local
        };

        while let Some(last) = patterns.last() {
            if last == OUTER_TOKEN {
                scope = Scope::Outer;
            } else if last == GLOBAL_TOKEN {
                scope = Scope::Global;
            } else if offset.is_none() && patterns.len() > 1 {
                match last.parse::<i64>() {
                    Ok(n) => offset = Some(n),
                    Err(_) => break,
                }
            } else {
                break;
            }
            patterns.pop();
        }

        let mode = if self.print {
            Mode::PrintOnly
        } else if self.calc {
            Mode::Calculate
        } else {
            Mode::Interactive
        };

        Query {
            patterns,
            offset,
            scope,
            mode,
        }
    }
}
