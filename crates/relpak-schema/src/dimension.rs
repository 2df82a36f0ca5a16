//! Canonical values for the three packaging dimensions.
//!
//! Every target is one point in OS × architecture × archive format. These
//! tables hold the values relpak knows about. OS and architecture names follow
//! the Go toolchain's `GOOS`/`GOARCH` spelling, since the binaries relpak
//! packages are usually cross-compiled Go programs.

use serde::{Deserialize, Serialize};

/// Every operating system a target can name by default.
pub const OS_LIST: &[&str] = &[
    "darwin",
    "dragonfly",
    "freebsd",
    "linux",
    "netbsd",
    "openbsd",
    "plan9",
    "solaris",
    "windows",
];

/// Every architecture a target can name by default.
pub const ARCH_LIST: &[&str] = &[
    "386", "amd64", "amd64p32", "arm", "arm64", "ppc64", "ppc64le",
];

/// Canonical archive format identifiers, in dispatch-table order.
pub const ARCHIVE_LIST: &[&str] = &[
    "zip", "tar", "tar.gz", "tar.bz2", "tar.xz", "tar.lz4", "tar.sz",
];

/// Short aliases accepted for archive formats, as `(alias, canonical)`.
pub const ARCHIVE_ALIASES: &[(&str, &str)] = &[
    ("tgz", "tar.gz"),
    ("tbz2", "tar.bz2"),
    ("txz", "tar.xz"),
    ("tlz4", "tar.lz4"),
    ("tsz", "tar.sz"),
];

/// Archive formats produced when the user asks for nothing in particular.
pub const DEFAULT_ARCHIVES: &[&str] = &["zip", "tar.gz", "tar.xz"];

/// Keyword selecting the full canonical list of a dimension.
pub const KEYWORD_ALL: &str = "all";

/// Keyword selecting the default list of a dimension.
pub const KEYWORD_DEFAULT: &str = "default";

/// One of the three independent packaging axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// Target operating system.
    Os,
    /// Target CPU architecture.
    Arch,
    /// Output archive format.
    Archive,
}

impl Dimension {
    /// Lowercase name, as used in flags and config keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Os => "os",
            Self::Arch => "arch",
            Self::Archive => "archive",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The canonical values of one dimension and how user input is checked
/// against them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionSpec {
    /// Which axis this spec describes.
    pub dimension: Dimension,
    /// Full canonical list, selected by `all`.
    pub values: &'static [&'static str],
    /// Alternate spellings as `(alias, canonical)` pairs.
    pub aliases: &'static [(&'static str, &'static str)],
    /// Base list used when the user gives no positive values.
    pub defaults: &'static [&'static str],
    /// Tokens that match neither a value nor an alias are dropped.
    pub strict: bool,
}

impl DimensionSpec {
    /// Operating systems. Unknown names pass through unchecked.
    pub const OS: Self = Self {
        dimension: Dimension::Os,
        values: OS_LIST,
        aliases: &[],
        defaults: OS_LIST,
        strict: false,
    };

    /// Architectures. Unknown names pass through unchecked.
    pub const ARCH: Self = Self {
        dimension: Dimension::Arch,
        values: ARCH_LIST,
        aliases: &[],
        defaults: ARCH_LIST,
        strict: false,
    };

    /// Archive formats. Only known formats and aliases survive resolution.
    pub const ARCHIVE: Self = Self {
        dimension: Dimension::Archive,
        values: ARCHIVE_LIST,
        aliases: ARCHIVE_ALIASES,
        defaults: DEFAULT_ARCHIVES,
        strict: true,
    };

    /// Spec for the given dimension.
    pub fn of(dimension: Dimension) -> Self {
        match dimension {
            Dimension::Os => Self::OS,
            Dimension::Arch => Self::ARCH,
            Dimension::Archive => Self::ARCHIVE,
        }
    }

    /// Canonical spelling of `value`, matched case-insensitively against
    /// both the value list and the alias table.
    pub fn canonical(&self, value: &str) -> Option<&'static str> {
        let lower = value.to_lowercase();
        self.values
            .iter()
            .copied()
            .find(|v| *v == lower)
            .or_else(|| {
                self.aliases
                    .iter()
                    .find(|(alias, _)| *alias == lower)
                    .map(|(_, canonical)| *canonical)
            })
    }

    /// Whether `value` names a known canonical value or alias.
    pub fn recognizes(&self, value: &str) -> bool {
        self.canonical(value).is_some()
    }
}
