//! Archive manifests
//!
//! Attaches the extra files (`--files`) to every resolved target. No file is
//! checked for existence here; that happens when the archive is written.

use crate::resolver::split_list_items;
use relpak_schema::{BundledTarget, ResolvedTarget};
use std::path::PathBuf;

/// Bundle every resolved target with `extra_files`.
///
/// The extra file list goes through the same splitting as dimension lists.
/// Order and duplicates are kept, and the executable always comes first.
pub fn attach<S: AsRef<str>>(
    resolved: Vec<ResolvedTarget>,
    extra_files: &[S],
) -> Vec<BundledTarget> {
    let extra: Vec<PathBuf> = split_list_items(extra_files)
        .into_iter()
        .map(PathBuf::from)
        .collect();
    resolved
        .into_iter()
        .map(|target| BundledTarget::new(target, &extra))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use relpak_schema::Target;

    fn resolved(exe: &str) -> ResolvedTarget {
        ResolvedTarget::new(
            Target::new("linux", "x64", "zip"),
            "exe",
            exe,
            format!("{exe}.zip"),
        )
    }

    #[test]
    fn test_executable_then_extras() {
        let bundles = attach(vec![resolved("bin/exe-linux-x64")], &["readme.md license"]);
        assert_eq!(bundles.len(), 1);
        assert_eq!(
            bundles[0].files(),
            &[
                PathBuf::from("bin/exe-linux-x64"),
                PathBuf::from("readme.md"),
                PathBuf::from("license"),
            ]
        );
    }

    #[test]
    fn test_duplicates_kept() {
        let bundles = attach(vec![resolved("a"), resolved("b")], &["x,x"]);
        assert_eq!(bundles[1].files().len(), 3);
        assert_eq!(bundles[1].files()[0], PathBuf::from("b"));
    }

    #[test]
    fn test_no_extras() {
        let none: &[&str] = &[];
        let bundles = attach(vec![resolved("a")], none);
        assert_eq!(bundles[0].files(), &[PathBuf::from("a")]);
    }
}
