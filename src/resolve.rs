//! Resolution engine: index chain -> matches -> a single directory, a list,
//! or a diagnostic.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::Result;
use crate::index::{IndexChainLoader, IndexStore};
use crate::matcher::{has_glob, PatternMatcher};
use crate::pathutil::absolutize;

/// Which part of the chain a query searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Only the nearest index.
    #[default]
    Local,
    /// Skip the nearest index and search from its outer one.
    Outer,
    /// The whole chain.
    Global,
}

impl Scope {
    fn is_deep(self) -> bool {
        !matches!(self, Scope::Local)
    }

    /// Outer-only searches never render relative to the working directory.
    fn renders_absolute(self) -> bool {
        matches!(self, Scope::Outer)
    }
}

/// How an ambiguous match set is turned into a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Ask the chooser.
    #[default]
    Interactive,
    /// Return the matches for display.
    PrintOnly,
    /// Return the matches without prompting.
    Calculate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub patterns: Vec<String>,
    /// 1-based position; negative counts from the end.
    pub offset: Option<i64>,
    pub scope: Scope,
    pub mode: Mode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Resolved(PathBuf),
    MatchList(Vec<String>),
    NoMatch(String),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: Outcome,
    /// Recoverable problems (such as a clamped offset) to show the user.
    pub warnings: Vec<String>,
}

impl Resolution {
    fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            warnings: Vec::new(),
        }
    }
}

/// A reply from the chooser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// 1-based menu position.
    Index(usize),
    Cancel,
    Invalid(String),
}

impl Selection {
    /// Interpret a line typed at the menu prompt.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.eq_ignore_ascii_case("q") {
            return Selection::Cancel;
        }
        match input.parse::<usize>() {
            Ok(n) => Selection::Index(n),
            Err(_) => Selection::Invalid(input.to_string()),
        }
    }
}

/// Interactive collaborator asked to pick one of several matches.
pub trait Chooser {
    /// Show the enumerated matches.
    fn present(&mut self, matches: &[String]) -> Result<()>;
    /// Ask for one selection.
    fn request(&mut self, count: usize) -> Result<Selection>;
    /// Report a selection that could not be used before asking again.
    fn reject(&mut self, input: &str, count: usize);
}

/// A chooser that always cancels; for callers that must never prompt.
pub struct NoChooser;

impl Chooser for NoChooser {
    fn present(&mut self, _matches: &[String]) -> Result<()> {
        Ok(())
    }

    fn request(&mut self, _count: usize) -> Result<Selection> {
        Ok(Selection::Cancel)
    }

    fn reject(&mut self, _input: &str, _count: usize) {}
}

pub struct ResolutionEngine<'a> {
    config: &'a Config,
}

impl<'a> ResolutionEngine<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Load the chain applying to `cwd` for `scope`, with the outer-only
    /// adjustment applied.
    pub fn working_store(&self, cwd: &Path, scope: Scope) -> Result<Option<IndexStore>> {
        Ok(self.load(cwd, scope)?.map(|store| adjust_scope(store, scope)))
    }

    fn load(&self, cwd: &Path, scope: Scope) -> Result<Option<IndexStore>> {
        IndexChainLoader::new(self.config).load(cwd, scope.is_deep())
    }

    /// Every match for `query` without any selection; `None` when no index
    /// applies to `cwd`.
    pub fn list(&self, cwd: &Path, query: &Query) -> Result<Option<Vec<String>>> {
        let Some(store) = self.working_store(cwd, query.scope)? else {
            return Ok(None);
        };
        let matcher = PatternMatcher::new(&query.patterns, cwd)?;
        Ok(Some(
            matcher.match_chain(&store, query.scope.renders_absolute()),
        ))
    }

    pub fn resolve(
        &self,
        cwd: &Path,
        query: &Query,
        chooser: &mut dyn Chooser,
    ) -> Result<Resolution> {
        let Some(loaded) = self.load(cwd, query.scope)? else {
            return Ok(Resolution::new(Outcome::NoMatch(format!(
                "no index found for {}",
                cwd.display()
            ))));
        };
        if loaded.chain_is_empty() {
            return Ok(Resolution::new(Outcome::NoMatch(format!(
                "no match for '{}': index is empty",
                query.patterns.join(" ")
            ))));
        }
        let store = adjust_scope(loaded, query.scope);

        if let [only] = query.patterns.as_slice() {
            if only.contains('/') && !has_glob(only) && store.contains(only) {
                debug!("literal entry {only}");
                return Ok(Resolution::new(Outcome::Resolved(store.absolute(only))));
            }
        }

        let matcher = PatternMatcher::new(&query.patterns, cwd)?;
        let matches = matcher.match_chain(&store, query.scope.renders_absolute());
        debug!("{} match(es) for '{}'", matches.len(), matcher.describe());
        if matches.is_empty() {
            return Ok(Resolution::new(Outcome::NoMatch(format!(
                "no match for '{}'",
                matcher.describe()
            ))));
        }

        if let Some(offset) = query.offset {
            let mut warnings = Vec::new();
            let picked = select_offset(&matches, offset, &mut warnings);
            let outcome = match query.mode {
                Mode::PrintOnly => Outcome::MatchList(vec![picked.clone()]),
                _ => Outcome::Resolved(absolutize(cwd, Path::new(picked))),
            };
            return Ok(Resolution { outcome, warnings });
        }

        let outcome = match query.mode {
            Mode::PrintOnly => Outcome::MatchList(matches),
            _ if matches.len() == 1 => Outcome::Resolved(absolutize(cwd, Path::new(&matches[0]))),
            Mode::Calculate => Outcome::MatchList(matches),
            Mode::Interactive => match prompt(&matches, chooser)? {
                Some(i) => Outcome::Resolved(absolutize(cwd, Path::new(&matches[i]))),
                None => Outcome::Cancelled,
            },
        };
        Ok(Resolution::new(outcome))
    }
}

/// Outer-only scope drops the local store when an outer one exists.
fn adjust_scope(store: IndexStore, scope: Scope) -> IndexStore {
    match scope {
        Scope::Outer => store.skip_local(),
        _ => store,
    }
}

/// Pick the match at a 1-based `offset` (negative counts from the end),
/// clamping out-of-range magnitudes with a warning.
fn select_offset<'m>(matches: &'m [String], offset: i64, warnings: &mut Vec<String>) -> &'m String {
    let count = matches.len();
    let mut magnitude = usize::try_from(offset.unsigned_abs()).unwrap_or(usize::MAX);
    if magnitude == 0 {
        let msg = "offset 0 is not a position, using 1".to_string();
        warn!("{msg}");
        warnings.push(msg);
        magnitude = 1;
    } else if magnitude > count {
        let msg = format!("offset {offset} exceeds {count} match(es), clamped");
        warn!("{msg}");
        warnings.push(msg);
        magnitude = count;
    }
    if offset < 0 {
        &matches[count - magnitude]
    } else {
        &matches[magnitude - 1]
    }
}

/// Present the menu and ask until a usable position or a cancellation.
fn prompt(matches: &[String], chooser: &mut dyn Chooser) -> Result<Option<usize>> {
    let count = matches.len();
    chooser.present(matches)?;
    loop {
        match chooser.request(count)? {
            Selection::Index(n) if (1..=count).contains(&n) => return Ok(Some(n - 1)),
            Selection::Index(n) => chooser.reject(&n.to_string(), count),
            Selection::Invalid(text) => chooser.reject(&text, count),
            Selection::Cancel => return Ok(None),
        }
    }
}
