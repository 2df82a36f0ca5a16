//! Archive format identifiers.

use serde::{Deserialize, Serialize};

/// A supported output archive format.
///
/// Parsing is case-insensitive and accepts the short aliases (`tgz`, `txz`,
/// ...), so both `tar.gz` and `TGZ` name [`ArchiveFormat::TarGz`].
///
/// # Example
///
/// ```
/// use relpak_schema::ArchiveFormat;
///
/// let format: ArchiveFormat = "tgz".parse().unwrap();
/// assert_eq!(format, ArchiveFormat::TarGz);
/// assert_eq!(format.to_string(), "tar.gz");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArchiveFormat {
    /// Zip archive, deflate compressed.
    #[serde(rename = "zip")]
    Zip,
    /// Uncompressed tar archive.
    #[serde(rename = "tar")]
    Tar,
    /// Gzip-compressed tar archive (`tgz`).
    #[serde(rename = "tar.gz")]
    TarGz,
    /// Bzip2-compressed tar archive (`tbz2`).
    #[serde(rename = "tar.bz2")]
    TarBz2,
    /// XZ-compressed tar archive (`txz`).
    #[serde(rename = "tar.xz")]
    TarXz,
    /// LZ4 frame-compressed tar archive (`tlz4`).
    #[serde(rename = "tar.lz4")]
    TarLz4,
    /// Snappy frame-compressed tar archive (`tsz`).
    #[serde(rename = "tar.sz")]
    TarSz,
}

impl ArchiveFormat {
    /// Every format, in the same order as [`crate::ARCHIVE_LIST`].
    pub const ALL: [Self; 7] = [
        Self::Zip,
        Self::Tar,
        Self::TarGz,
        Self::TarBz2,
        Self::TarXz,
        Self::TarLz4,
        Self::TarSz,
    ];

    /// Canonical identifier, which is also the conventional file extension.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Tar => "tar",
            Self::TarGz => "tar.gz",
            Self::TarBz2 => "tar.bz2",
            Self::TarXz => "tar.xz",
            Self::TarLz4 => "tar.lz4",
            Self::TarSz => "tar.sz",
        }
    }

    /// Short alias, if the format has one.
    pub fn alias(self) -> Option<&'static str> {
        match self {
            Self::Zip | Self::Tar => None,
            Self::TarGz => Some("tgz"),
            Self::TarBz2 => Some("tbz2"),
            Self::TarXz => Some("txz"),
            Self::TarLz4 => Some("tlz4"),
            Self::TarSz => Some("tsz"),
        }
    }

    /// Look up a format by canonical name or alias, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == lower || f.alias() == Some(lower.as_str()))
    }

    /// Whether the archive is a tar stream (possibly compressed).
    pub fn is_tar(self) -> bool {
        !matches!(self, Self::Zip)
    }
}

impl std::fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ArchiveFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("Unknown archive format: {s}"))
    }
}
