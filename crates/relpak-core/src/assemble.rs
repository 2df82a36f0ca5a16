//! Package set assembly
//!
//! Builds the cross product of the resolved dimension lists and then patches
//! it with explicit `os/arch/archive` entries from `--packages`. Explicit
//! entries win over dimension filtering in both directions.

use crate::resolver::split_list_items;
use relpak_schema::{ExplicitEntry, Target, TargetKey};
use std::collections::HashMap;

/// Insertion-ordered set of targets, deduplicated case-insensitively.
///
/// The first spelling of a triple wins. Removing a target leaves a hole so
/// the remaining targets keep their positions; re-inserting it appends at
/// the end.
#[derive(Debug, Clone, Default)]
pub struct TargetSet {
    slots: Vec<Option<Target>>,
    index: HashMap<TargetKey, usize>,
}

impl TargetSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `target` unless an equal triple is present. Returns `true` if
    /// it was added.
    pub fn insert(&mut self, target: Target) -> bool {
        let key = target.key();
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.slots.len());
        self.slots.push(Some(target));
        true
    }

    /// Remove the target matching `target` case-insensitively, returning the
    /// stored spelling.
    pub fn remove(&mut self, target: &Target) -> Option<Target> {
        let slot = self.index.remove(&target.key())?;
        self.slots.get_mut(slot).and_then(Option::take)
    }

    /// Whether a matching triple is present.
    pub fn contains(&self, target: &Target) -> bool {
        self.index.contains_key(&target.key())
    }

    /// Number of targets.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Targets in order.
    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.slots.iter().flatten()
    }

    /// Consume the set, returning the targets in order.
    pub fn into_vec(self) -> Vec<Target> {
        self.slots.into_iter().flatten().collect()
    }
}

impl FromIterator<Target> for TargetSet {
    fn from_iter<I: IntoIterator<Item = Target>>(iter: I) -> Self {
        let mut set = Self::new();
        for target in iter {
            set.insert(target);
        }
        set
    }
}

impl IntoIterator for TargetSet {
    type Item = Target;
    type IntoIter = std::iter::Flatten<std::vec::IntoIter<Option<Target>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter().flatten()
    }
}

/// Tokenize and parse `--packages` values.
///
/// Entries that are not a `[!]os/arch/archive` triple are skipped with a
/// warning.
pub fn parse_explicit_entries<S: AsRef<str>>(raw: &[S]) -> Vec<ExplicitEntry> {
    split_list_items(raw)
        .into_iter()
        .filter_map(|token| match token.parse::<ExplicitEntry>() {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("ignoring package entry: {e}");
                None
            }
        })
        .collect()
}

/// Build the final target set.
///
/// The cross product is laid out OS first, then architecture, then archive
/// format. Explicit entries are applied afterwards in the order given.
pub fn assemble<A, O, R, P>(
    arch_list: &[A],
    os_list: &[O],
    archive_list: &[R],
    explicit: &[P],
) -> TargetSet
where
    A: AsRef<str>,
    O: AsRef<str>,
    R: AsRef<str>,
    P: AsRef<str>,
{
    let mut set = TargetSet::new();
    for os in os_list {
        for arch in arch_list {
            for archive in archive_list {
                set.insert(Target::new(os.as_ref(), arch.as_ref(), archive.as_ref()));
            }
        }
    }
    let product = set.len();

    for entry in parse_explicit_entries(explicit) {
        if entry.negated {
            if set.remove(&entry.target).is_some() {
                tracing::debug!("excluded {}", entry.target);
            }
        } else {
            let label = entry.target.to_string();
            if set.insert(entry.target) {
                tracing::debug!("included {label}");
            }
        }
    }

    tracing::debug!(
        "assembled {} target(s) ({} from dimensions)",
        set.len(),
        product
    );
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{resolve_arch, resolve_archives, resolve_os};

    const NONE: &[&str] = &[];
    const OS_COUNT: usize = relpak_schema::OS_LIST.len();

    fn defaults() -> (Vec<String>, Vec<String>, Vec<String>) {
        (resolve_arch(NONE), resolve_os(NONE), resolve_archives(NONE))
    }

    fn triples(set: &TargetSet) -> Vec<String> {
        set.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_default_product() {
        let (arch, os, archive) = defaults();
        let set = assemble(&arch, &os, &archive, NONE);
        assert_eq!(set.len(), 189);

        let first: Vec<String> = triples(&set).into_iter().take(4).collect();
        assert_eq!(
            first,
            vec![
                "darwin/386/zip",
                "darwin/386/tar.gz",
                "darwin/386/tar.xz",
                "darwin/amd64/zip"
            ]
        );
    }

    #[test]
    fn test_all_archives_product() {
        let set = assemble(
            &resolve_arch(NONE),
            &resolve_os(NONE),
            &resolve_archives(&["all"]),
            NONE,
        );
        assert_eq!(set.len(), 441);
    }

    #[test]
    fn test_explicit_include_beats_dimension_negation() {
        let set = assemble(
            &resolve_arch(&["amd64"]),
            &resolve_os(&["!windows"]),
            &resolve_archives(&["zip"]),
            &["windows/amd64/zip"],
        );
        let all = triples(&set);
        assert_eq!(all.len(), OS_COUNT);
        assert_eq!(all.last().map(String::as_str), Some("windows/amd64/zip"));
    }

    #[test]
    fn test_explicit_exclude_removes_in_place() {
        let set = assemble(
            &["amd64", "arm64"],
            &["linux"],
            &["zip"],
            &["!linux/AMD64/ZIP"],
        );
        assert_eq!(triples(&set), vec!["linux/arm64/zip"]);
    }

    #[test]
    fn test_redundant_include_does_not_grow() {
        let set = assemble(&["amd64"], &["linux"], &["zip"], &["Linux/amd64/Zip"]);
        assert_eq!(triples(&set), vec!["linux/amd64/zip"]);
    }

    #[test]
    fn test_remove_then_readd_appends() {
        let set = assemble(
            &["amd64", "arm64"],
            &["linux"],
            &["zip"],
            &["!linux/amd64/zip linux/amd64/zip"],
        );
        assert_eq!(triples(&set), vec!["linux/arm64/zip", "linux/amd64/zip"]);
    }

    #[test]
    fn test_invalid_entry_is_skipped() {
        let set = assemble(&["amd64"], &["linux"], &["zip"], &["linux/amd64", "!darwin"]);
        assert_eq!(triples(&set), vec!["linux/amd64/zip"]);
        assert!(parse_explicit_entries(&["linux/amd64"]).is_empty());
    }

    #[test]
    fn test_set_deduplicates_case_insensitively() {
        let mut set: TargetSet = [
            Target::new("Linux", "amd64", "zip"),
            Target::new("linux", "AMD64", "zip"),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().map(|t| t.os.as_str()), Some("Linux"));

        let removed = set.remove(&Target::new("LINUX", "amd64", "ZIP"));
        assert_eq!(removed, Some(Target::new("Linux", "amd64", "zip")));
        assert!(set.is_empty());
        assert!(set.into_vec().is_empty());
    }
}
