//! Include/exclude filter for watched paths
//!
//! Patterns are shell globs matched against a path's base name. The active
//! pattern set is copy-on-write: reconfiguring builds a new set and swaps the
//! pointer, so the watch loop always reads a consistent pair of lists even
//! while the CLI is changing them.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use glob::Pattern;

use crate::error::{TexforgeError, TexforgeResult};

/// LaTeX byproducts, rendered outputs, and editor droppings
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    "*.aux",
    "*.log",
    "*.toc",
    "*.out",
    "*.fls",
    "*.fdb_latexmk",
    "*.synctex.gz",
    "*.bbl",
    "*.blg",
    "*.lof",
    "*.lot",
    "*.nav",
    "*.snm",
    "*.vrb",
    "*.pdf",
    "*.png",
    "*.jpg",
    "*.swp",
    "*~",
    ".#*",
    "4913",
    ".DS_Store",
];

/// Sources that feed a document build
pub const DEFAULT_INCLUSIONS: &[&str] = &["*.tex", "*.yaml", "*.yml", "*.sty", "*.cls", "*.bib"];

#[derive(Debug, Clone)]
struct CompiledPattern {
    raw: String,
    glob: Pattern,
}

/// Immutable pair of pattern lists
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    exclusions: Vec<CompiledPattern>,
    inclusions: Vec<CompiledPattern>,
}

impl PatternSet {
    pub fn should_exclude(&self, path: &Path) -> bool {
        let name = base_name(path);
        self.exclusions.iter().any(|p| p.glob.matches(&name))
    }

    /// An empty inclusion list admits every path
    pub fn should_include(&self, path: &Path) -> bool {
        if self.inclusions.is_empty() {
            return true;
        }
        let name = base_name(path);
        self.inclusions.iter().any(|p| p.glob.matches(&name))
    }

    /// Exclusion wins over inclusion
    pub fn admits(&self, path: &Path) -> bool {
        !self.should_exclude(path) && self.should_include(path)
    }

    pub fn exclusions(&self) -> Vec<String> {
        self.exclusions.iter().map(|p| p.raw.clone()).collect()
    }

    pub fn inclusions(&self) -> Vec<String> {
        self.inclusions.iter().map(|p| p.raw.clone()).collect()
    }
}

/// Shared, reconfigurable pattern filter
#[derive(Debug, Default)]
pub struct PatternMatcher {
    active: RwLock<Arc<PatternSet>>,
}

impl PatternMatcher {
    /// Matcher with no patterns: nothing excluded, everything included
    pub fn new() -> Self {
        Self::default()
    }

    /// Matcher preloaded with [`DEFAULT_EXCLUSIONS`] and [`DEFAULT_INCLUSIONS`]
    pub fn with_defaults() -> Self {
        Self::from_patterns(DEFAULT_EXCLUSIONS, DEFAULT_INCLUSIONS)
            .unwrap_or_else(|_| Self::new())
    }

    pub fn from_patterns<E, I>(exclusions: &[E], inclusions: &[I]) -> TexforgeResult<Self>
    where
        E: AsRef<str>,
        I: AsRef<str>,
    {
        let set = PatternSet {
            exclusions: compile_all(exclusions)?,
            inclusions: compile_all(inclusions)?,
        };
        Ok(Self {
            active: RwLock::new(Arc::new(set)),
        })
    }

    /// Current pattern set; stays valid even if the matcher is reconfigured
    pub fn snapshot(&self) -> Arc<PatternSet> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn should_exclude(&self, path: &Path) -> bool {
        self.snapshot().should_exclude(path)
    }

    pub fn should_include(&self, path: &Path) -> bool {
        self.snapshot().should_include(path)
    }

    /// Include/exclude decision taken against a single snapshot
    pub fn admits(&self, path: &Path) -> bool {
        self.snapshot().admits(path)
    }

    /// Does the base name of `path` match any of `patterns`?
    ///
    /// Patterns that fail to compile never match.
    pub fn matches<S: AsRef<str>>(path: &Path, patterns: &[S]) -> bool {
        let name = base_name(path);
        patterns
            .iter()
            .filter_map(|p| Pattern::new(p.as_ref()).ok())
            .any(|p| p.matches(&name))
    }

    /// Replace (not extend) the exclusion list
    pub fn configure_exclusions<S: AsRef<str>>(&self, patterns: &[S]) -> TexforgeResult<()> {
        let compiled = compile_all(patterns)?;
        self.swap(|set| set.exclusions = compiled);
        Ok(())
    }

    /// Replace (not extend) the inclusion list
    pub fn configure_inclusions<S: AsRef<str>>(&self, patterns: &[S]) -> TexforgeResult<()> {
        let compiled = compile_all(patterns)?;
        self.swap(|set| set.inclusions = compiled);
        Ok(())
    }

    pub fn exclusions(&self) -> Vec<String> {
        self.snapshot().exclusions()
    }

    pub fn inclusions(&self) -> Vec<String> {
        self.snapshot().inclusions()
    }

    /// Cheap plausibility check: a glob has at least one of `* ? [ ]`.
    ///
    /// Not a grammar check; `configure_*` reports real syntax errors.
    pub fn validate_pattern(pattern: &str) -> bool {
        pattern.contains(['*', '?', '[', ']'])
    }

    fn swap(&self, update: impl FnOnce(&mut PatternSet)) {
        let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = PatternSet::clone(&active);
        update(&mut next);
        *active = Arc::new(next);
    }
}

fn compile_all<S: AsRef<str>>(patterns: &[S]) -> TexforgeResult<Vec<CompiledPattern>> {
    patterns
        .iter()
        .map(|p| p.as_ref().trim())
        .filter(|p| !p.is_empty())
        .map(|raw| {
            Pattern::new(raw)
                .map(|glob| CompiledPattern {
                    raw: raw.to_string(),
                    glob,
                })
                .map_err(|e| TexforgeError::InvalidPattern {
                    pattern: raw.to_string(),
                    message: e.msg.to_string(),
                })
        })
        .collect()
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
