//! Listing options and their resolution into a walk configuration

use crate::error::{ConfigError, Result};
use crate::kind::{FileKind, FileKinds};
use crate::mode::PrintMode;

use super::filter::{PathFilter, PathPattern, Role};

/// One caller supplied setting. Options are applied in order on top of
/// [`Config::default`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOption {
    /// Fields printed for each entry.
    Mode(PrintMode),
    /// Kinds to list, made of `f` (regular files), `d` (directories) and `?`
    /// (anything else). Replaces any previous type option.
    Type(String),
    /// Whether the root itself is listed, as `.`.
    IncludeRoot(bool),
    /// Drop paths matching the glob. Takes precedence over [`ListOption::Match`].
    Ignore(String),
    /// Only keep paths matching at least one such glob.
    Match(String),
    /// Number of path segments to descend; 0 means no limit.
    Depth(i64),
}

impl ListOption {
    pub const EXCLUDE_ROOT: ListOption = ListOption::IncludeRoot(false);

    fn apply(&self, cfg: &mut Config) -> std::result::Result<(), ConfigError> {
        match self {
            ListOption::Mode(mode) => cfg.mode = *mode,
            ListOption::Type(types) => cfg.kinds = FileKinds::parse(types)?,
            ListOption::IncludeRoot(show) => cfg.show_root = *show,
            ListOption::Ignore(pattern) => cfg.filter.push(PathPattern::new(pattern, Role::Ignore)?),
            ListOption::Match(pattern) => cfg.filter.push(PathPattern::new(pattern, Role::Match)?),
            ListOption::Depth(depth) => {
                cfg.max_depth = usize::try_from(*depth).map_err(|_| ConfigError::NegativeDepth(*depth))?;
            }
        }
        Ok(())
    }
}

impl From<PrintMode> for ListOption {
    fn from(mode: PrintMode) -> Self {
        ListOption::Mode(mode)
    }
}

/// Effective parameters of a walk.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: PrintMode,
    pub show_root: bool,
    /// 0 means unlimited.
    pub max_depth: usize,
    pub kinds: FileKinds,
    pub filter: PathFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: PrintMode::DEFAULT,
            show_root: true,
            max_depth: 0,
            kinds: FileKinds::all(),
            filter: PathFilter::new(),
        }
    }
}

impl Config {
    /// Fold `opts` over the defaults, stopping at the first invalid option.
    pub fn resolve(opts: &[ListOption]) -> Result<Self> {
        let mut cfg = Config::default();
        for opt in opts {
            opt.apply(&mut cfg)?;
        }
        Ok(cfg)
    }

    pub fn allows(&self, kind: FileKind) -> bool {
        self.kinds.allows(kind)
    }

    /// Whether a node `depth` segments deep is beyond the limit.
    pub fn exceeds_depth(&self, depth: usize) -> bool {
        self.max_depth != 0 && depth > self.max_depth
    }
}
