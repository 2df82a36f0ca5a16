//! Archive writers
//!
//! One writer per [`ArchiveFormat`], looked up through a static table. Every
//! manifest entry lands at the archive root under its base name; directories
//! are added recursively.

use relpak_schema::ArchiveFormat;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Errors raised while writing an archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// No writer exists for the requested format.
    #[error("unknown archive format '{0}'")]
    UnknownFormat(String),

    /// A manifest entry does not exist.
    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// A manifest entry has no usable base name.
    #[error("cannot archive '{}': no file name", .0.display())]
    InvalidEntry(PathBuf),

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Zip encoder error.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// LZ4 frame encoder error.
    #[error("lz4 error: {0}")]
    Lz4(#[from] lz4_flex::frame::Error),

    /// Error walking a directory entry.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Writes `files` into an already-created archive file.
pub type WriteFn = fn(File, &[PathBuf]) -> Result<(), ArchiveError>;

/// Format dispatch table, one entry per canonical format.
pub static WRITERS: &[(ArchiveFormat, WriteFn)] = &[
    (ArchiveFormat::Zip, write_zip as WriteFn),
    (ArchiveFormat::Tar, write_tar as WriteFn),
    (ArchiveFormat::TarGz, write_tar_gz as WriteFn),
    (ArchiveFormat::TarBz2, write_tar_bz2 as WriteFn),
    (ArchiveFormat::TarXz, write_tar_xz as WriteFn),
    (ArchiveFormat::TarLz4, write_tar_lz4 as WriteFn),
    (ArchiveFormat::TarSz, write_tar_sz as WriteFn),
];

/// Find the writer for `format`, accepting aliases in any case.
pub fn writer_for(format: &str) -> Option<WriteFn> {
    let format = ArchiveFormat::from_name(format)?;
    WRITERS
        .iter()
        .find(|(candidate, _)| *candidate == format)
        .map(|(_, writer)| *writer)
}

/// Write `files` to a new archive at `output`.
///
/// Parent directories are created as needed. Every input is checked before
/// the archive is created, and a partially written archive is removed.
///
/// # Errors
///
/// Fails on an unknown format, a missing input, or any encoder or I/O
/// error.
pub fn write_archive(output: &Path, format: &str, files: &[PathBuf]) -> Result<(), ArchiveError> {
    let writer =
        writer_for(format).ok_or_else(|| ArchiveError::UnknownFormat(format.to_string()))?;

    for file in files {
        if !file.exists() {
            return Err(ArchiveError::MissingFile(file.clone()));
        }
        entry_name(file)?;
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(output)?;
    let result = writer(file, files);
    if result.is_err() {
        let _ = fs::remove_file(output);
    }
    result
}

/// Base name an input is stored under.
fn entry_name(path: &Path) -> Result<String, ArchiveError> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| ArchiveError::InvalidEntry(path.to_path_buf()))
}

fn write_zip(file: File, files: &[PathBuf]) -> Result<(), ArchiveError> {
    let mut zip = zip::ZipWriter::new(BufWriter::new(file));

    for path in files {
        let name = entry_name(path)?;
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry?;
                let relative = entry.path().strip_prefix(path).unwrap_or(entry.path());
                let mut entry_path = name.clone();
                for component in relative.components() {
                    entry_path.push('/');
                    entry_path.push_str(&component.as_os_str().to_string_lossy());
                }
                let options = zip_options(unix_mode(entry.path())?);
                if entry.file_type().is_dir() {
                    zip.add_directory(entry_path, options)?;
                } else {
                    zip.start_file(entry_path, options)?;
                    io::copy(&mut File::open(entry.path())?, &mut zip)?;
                }
            }
        } else {
            zip.start_file(name, zip_options(unix_mode(path)?))?;
            io::copy(&mut File::open(path)?, &mut zip)?;
        }
    }

    zip.finish()?.flush()?;
    Ok(())
}

fn zip_options(mode: u32) -> zip::write::SimpleFileOptions {
    zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(mode)
}

#[cfg(unix)]
fn unix_mode(path: &Path) -> io::Result<u32> {
    use std::os::unix::fs::PermissionsExt;
    Ok(fs::metadata(path)?.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn unix_mode(path: &Path) -> io::Result<u32> {
    Ok(if fs::metadata(path)?.is_dir() { 0o755 } else { 0o644 })
}

/// Append every input to a tar stream and return the finished inner writer.
fn build_tar<W: Write>(writer: W, files: &[PathBuf]) -> Result<W, ArchiveError> {
    let mut builder = tar::Builder::new(writer);
    for path in files {
        let name = entry_name(path)?;
        if path.is_dir() {
            builder.append_dir_all(&name, path)?;
        } else {
            builder.append_path_with_name(path, &name)?;
        }
    }
    Ok(builder.into_inner()?)
}

fn write_tar(file: File, files: &[PathBuf]) -> Result<(), ArchiveError> {
    build_tar(BufWriter::new(file), files)?.flush()?;
    Ok(())
}

fn write_tar_gz(file: File, files: &[PathBuf]) -> Result<(), ArchiveError> {
    use flate2::Compression;
    use flate2::write::GzEncoder;

    let encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    build_tar(encoder, files)?.finish()?.flush()?;
    Ok(())
}

fn write_tar_bz2(file: File, files: &[PathBuf]) -> Result<(), ArchiveError> {
    use bzip2::Compression;
    use bzip2::write::BzEncoder;

    let encoder = BzEncoder::new(BufWriter::new(file), Compression::default());
    build_tar(encoder, files)?.finish()?.flush()?;
    Ok(())
}

fn write_tar_xz(file: File, files: &[PathBuf]) -> Result<(), ArchiveError> {
    let encoder = xz2::write::XzEncoder::new(BufWriter::new(file), 6);
    build_tar(encoder, files)?.finish()?.flush()?;
    Ok(())
}

fn write_tar_lz4(file: File, files: &[PathBuf]) -> Result<(), ArchiveError> {
    let encoder = lz4_flex::frame::FrameEncoder::new(BufWriter::new(file));
    build_tar(encoder, files)?.finish()?.flush()?;
    Ok(())
}

fn write_tar_sz(file: File, files: &[PathBuf]) -> Result<(), ArchiveError> {
    let encoder = snap::write::FrameEncoder::new(BufWriter::new(file));
    // Flushing the frame encoder also flushes the buffered file.
    build_tar(encoder, files)?.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        files: Vec<PathBuf>,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let bin = dir.path().join("bin");
        fs::create_dir(&bin).unwrap();
        let exe = bin.join("tool_linux_amd64");
        fs::write(&exe, b"\x7fELF fake binary").unwrap();
        let readme = dir.path().join("README.md");
        fs::write(&readme, "# tool\n").unwrap();
        let docs = dir.path().join("docs");
        fs::create_dir_all(docs.join("man")).unwrap();
        fs::write(docs.join("man").join("tool.1"), ".TH TOOL 1\n").unwrap();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();
        }

        Fixture {
            files: vec![exe, readme, docs],
            dir,
        }
    }

    fn tar_entries<R: Read>(reader: R) -> Vec<(String, u32)> {
        let mut archive = tar::Archive::new(reader);
        let mut names: Vec<(String, u32)> = archive
            .entries()
            .unwrap()
            .map(|entry| {
                let entry = entry.unwrap();
                let path = entry.path().unwrap().to_string_lossy().into_owned();
                (path.trim_end_matches('/').to_string(), entry.header().mode().unwrap())
            })
            .collect();
        names.sort();
        names
    }

    fn open_tar(path: &Path, format: ArchiveFormat) -> Box<dyn Read> {
        let file = File::open(path).unwrap();
        match format {
            ArchiveFormat::Tar => Box::new(file),
            ArchiveFormat::TarGz => Box::new(flate2::read::GzDecoder::new(file)),
            ArchiveFormat::TarBz2 => Box::new(bzip2::read::BzDecoder::new(file)),
            ArchiveFormat::TarXz => Box::new(xz2::read::XzDecoder::new(file)),
            ArchiveFormat::TarLz4 => Box::new(lz4_flex::frame::FrameDecoder::new(file)),
            ArchiveFormat::TarSz => Box::new(snap::read::FrameDecoder::new(file)),
            ArchiveFormat::Zip => unreachable!("not a tar format"),
        }
    }

    #[test]
    fn test_table_covers_every_format() {
        assert_eq!(WRITERS.len(), ArchiveFormat::ALL.len());
        for format in ArchiveFormat::ALL {
            assert!(writer_for(format.as_str()).is_some(), "{format}");
        }
        assert!(writer_for("TGZ").is_some());
        assert!(writer_for("rar").is_none());
    }

    #[test]
    fn test_tar_formats_round_trip() {
        let fx = fixture();
        for format in ArchiveFormat::ALL.into_iter().filter(|f| f.is_tar()) {
            let out = fx.dir.path().join(format!("dist/tool.{format}"));
            write_archive(&out, format.as_str(), &fx.files).unwrap();

            let names: Vec<String> = tar_entries(open_tar(&out, format))
                .into_iter()
                .map(|(name, _)| name)
                .collect();
            assert!(names.contains(&"tool_linux_amd64".to_string()), "{format}: {names:?}");
            assert!(names.contains(&"README.md".to_string()), "{format}");
            assert!(names.contains(&"docs/man/tool.1".to_string()), "{format}: {names:?}");
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_tar_keeps_permissions() {
        let fx = fixture();
        let out = fx.dir.path().join("tool.tar");
        write_archive(&out, "tar", &fx.files).unwrap();

        let entries = tar_entries(File::open(&out).unwrap());
        let exe = entries.iter().find(|(name, _)| name == "tool_linux_amd64").unwrap();
        assert_eq!(exe.1 & 0o777, 0o755);
    }

    #[test]
    fn test_zip_round_trip() {
        let fx = fixture();
        let out = fx.dir.path().join("tool.zip");
        write_archive(&out, "ZIP", &fx.files).unwrap();

        let mut zip = zip::ZipArchive::new(File::open(&out).unwrap()).unwrap();
        let names: Vec<String> = zip.file_names().map(str::to_string).collect();
        assert!(names.contains(&"tool_linux_amd64".to_string()));
        assert!(names.contains(&"docs/man/tool.1".to_string()), "{names:?}");

        let mut readme = String::new();
        zip.by_name("README.md").unwrap().read_to_string(&mut readme).unwrap();
        assert_eq!(readme, "# tool\n");

        #[cfg(unix)]
        {
            let exe = zip.by_name("tool_linux_amd64").unwrap();
            assert_eq!(exe.unix_mode().unwrap() & 0o777, 0o755);
        }
    }

    #[test]
    fn test_missing_file_leaves_nothing_behind() {
        let fx = fixture();
        let out = fx.dir.path().join("out/tool.tar.gz");
        let mut files = fx.files.clone();
        files.push(fx.dir.path().join("LICENSE"));

        let err = write_archive(&out, "tgz", &files).unwrap_err();
        assert!(matches!(err, ArchiveError::MissingFile(ref p) if p.ends_with("LICENSE")));
        assert!(!out.exists());
    }

    #[test]
    fn test_unknown_format() {
        let fx = fixture();
        let out = fx.dir.path().join("tool.rar");
        let err = write_archive(&out, "rar", &fx.files).unwrap_err();
        assert!(matches!(err, ArchiveError::UnknownFormat(ref f) if f == "rar"));
        assert!(!out.exists());
    }
}
