//! Match/ignore glob filtering of relative paths

use glob::{MatchOptions, Pattern};

use crate::error::ConfigError;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Whether a pattern selects paths to keep or paths to drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Match,
    Ignore,
}

/// A compiled glob tagged with its role.
#[derive(Debug, Clone)]
pub struct PathPattern {
    pattern: String,
    glob: Pattern,
    role: Role,
}

impl PathPattern {
    /// Compile `pattern`. Malformed globs are rejected here so that matching
    /// itself can never fail.
    ///
    /// `**` has no recursive meaning: any run of `*` is a single `*`.
    pub fn new(pattern: &str, role: Role) -> Result<Self, ConfigError> {
        let glob = Pattern::new(&collapse_stars(pattern)).map_err(|source| {
            ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            glob,
            role,
        })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// The pattern as given.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// `*` and `?` never match a `/`.
    pub fn matches(&self, rel_path: &str) -> bool {
        self.glob.matches_with(rel_path, MATCH_OPTIONS)
    }
}

fn collapse_stars(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if c == '*' && out.ends_with('*') {
            continue;
        }
        out.push(c);
    }
    out
}

/// Ordered match/ignore patterns applied to slash separated relative paths.
#[derive(Debug, Clone, Default)]
pub struct PathFilter(Vec<PathPattern>);

impl PathFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pattern: PathPattern) {
        self.0.push(pattern);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn patterns(&self) -> &[PathPattern] {
        &self.0
    }

    /// Any ignore hit excludes the path. Otherwise, when match patterns exist,
    /// at least one of them must hit.
    pub fn is_included(&self, rel_path: &str) -> bool {
        let mut has_match = false;
        let mut matched = false;
        for pattern in &self.0 {
            let hit = pattern.matches(rel_path);
            match pattern.role {
                Role::Ignore if hit => return false,
                Role::Ignore => {}
                Role::Match => {
                    has_match = true;
                    matched |= hit;
                }
            }
        }
        !has_match || matched
    }
}
