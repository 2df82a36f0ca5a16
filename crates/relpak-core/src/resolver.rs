//! Dimension resolution
//!
//! Turns a raw user list for one dimension (`--os`, `--arch`, `--archive`)
//! into the ordered list of values to package. Lists accept whitespace or
//! comma separated items, `!value` negations and the `all`/`default`
//! keywords.

use relpak_schema::{DimensionSpec, KEYWORD_ALL, KEYWORD_DEFAULT, NEGATION_MARKER};
use std::collections::HashSet;

/// Split every item on whitespace and commas, keeping order and duplicates.
///
/// Empty fragments (from `"a,,b"` or trailing separators) are dropped.
pub fn split_list_items<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items
        .iter()
        .flat_map(|item| {
            item.as_ref()
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|fragment| !fragment.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Resolve one dimension's raw list against its spec.
///
/// Positives form the base list; with none, the spec's defaults are used.
/// A lone `all` or `default` keyword selects the full or default list,
/// even when negations are present: `all !zip` is every format but zip.
/// Negated values are then removed case-insensitively, wherever they
/// appeared in the input. For strict dimensions (archive formats) tokens
/// that are not a known value or alias are dropped silently; survivors keep
/// the user's spelling.
pub fn resolve_dimension<S: AsRef<str>>(tokens: &[S], spec: &DimensionSpec) -> Vec<String> {
    let mut positives = Vec::new();
    let mut negatives = HashSet::new();
    for token in split_list_items(tokens) {
        match token.strip_prefix(NEGATION_MARKER) {
            Some("") => {}
            Some(value) => {
                negatives.insert(value.to_lowercase());
            }
            None => positives.push(token),
        }
    }

    let keyword_base = match positives.as_slice() {
        [only] if only.eq_ignore_ascii_case(KEYWORD_ALL) => Some(spec.values),
        [only] if only.eq_ignore_ascii_case(KEYWORD_DEFAULT) => Some(spec.defaults),
        [] => Some(spec.defaults),
        _ => None,
    };
    let base: Vec<String> = match keyword_base {
        Some(list) => list.iter().map(|v| (*v).to_string()).collect(),
        None => positives,
    };

    let resolved: Vec<String> = base
        .into_iter()
        .filter(|value| !negatives.contains(&value.to_lowercase()))
        .filter(|value| !spec.strict || spec.recognizes(value))
        .collect();

    tracing::debug!(
        "resolved {}: {} value(s) {:?}",
        spec.dimension,
        resolved.len(),
        resolved
    );
    resolved
}

/// Resolve the operating system list.
pub fn resolve_os<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    resolve_dimension(tokens, &DimensionSpec::OS)
}

/// Resolve the architecture list.
pub fn resolve_arch<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    resolve_dimension(tokens, &DimensionSpec::ARCH)
}

/// Resolve the archive format list. Unknown formats are dropped.
pub fn resolve_archives<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    resolve_dimension(tokens, &DimensionSpec::ARCHIVE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use relpak_schema::{ARCH_LIST, ARCHIVE_LIST, DEFAULT_ARCHIVES, OS_LIST};

    const NONE: &[&str] = &[];

    #[test]
    fn test_split_list_items() {
        assert_eq!(
            split_list_items(&["linux darwin", "windows,plan9", "arm"]),
            vec!["linux", "darwin", "windows", "plan9", "arm"]
        );
        assert_eq!(split_list_items(&["a,,b ", " c"]), vec!["a", "b", "c"]);
        assert_eq!(split_list_items(&["x x"]), vec!["x", "x"]);
        assert!(split_list_items(NONE).is_empty());
    }

    #[test]
    fn test_empty_list_uses_defaults() {
        assert_eq!(resolve_os(NONE), OS_LIST);
        assert_eq!(resolve_arch(NONE), ARCH_LIST);
        assert_eq!(resolve_archives(NONE), DEFAULT_ARCHIVES);
    }

    #[test]
    fn test_keywords() {
        assert_eq!(resolve_os(&["all"]), OS_LIST);
        assert_eq!(resolve_arch(&["ALL"]), ARCH_LIST);
        assert_eq!(resolve_archives(&["all"]), ARCHIVE_LIST);
        assert_eq!(resolve_archives(&["default"]), DEFAULT_ARCHIVES);
        assert_eq!(resolve_os(&["default"]), OS_LIST);
    }

    #[test]
    fn test_keyword_with_negation() {
        let resolved = resolve_os(&["all !windows"]);
        assert_eq!(resolved.len(), OS_LIST.len() - 1);
        assert!(!resolved.contains(&"windows".to_string()));

        let resolved = resolve_archives(&["all", "!zip"]);
        assert_eq!(resolved, &ARCHIVE_LIST[1..]);
    }

    #[test]
    fn test_explicit_values_keep_order() {
        assert_eq!(resolve_arch(&["arm64", "amd64"]), vec!["arm64", "amd64"]);
        assert_eq!(resolve_os(&["linux,darwin"]), vec!["linux", "darwin"]);
    }

    #[test]
    fn test_only_negations_filter_defaults() {
        let resolved = resolve_arch(&["!386", "!arm"]);
        assert_eq!(
            resolved,
            vec!["amd64", "amd64p32", "arm64", "ppc64", "ppc64le"]
        );

        let resolved = resolve_archives(&["!zip"]);
        assert_eq!(resolved, vec!["tar.gz", "tar.xz"]);
    }

    #[test]
    fn test_negation_is_order_independent() {
        let before = resolve_os(&["!linux", "linux", "darwin"]);
        let after = resolve_os(&["linux", "darwin", "!linux"]);
        assert_eq!(before, vec!["darwin"]);
        assert_eq!(before, after);
    }

    #[test]
    fn test_negation_ignores_case() {
        assert_eq!(resolve_os(&["Linux Darwin !LINUX"]), vec!["Darwin"]);
    }

    #[test]
    fn test_bare_marker_is_ignored() {
        assert_eq!(resolve_arch(&["arm !"]), vec!["arm"]);
    }

    #[test]
    fn test_lenient_dimensions_pass_unknown_values() {
        assert_eq!(resolve_os(&["haiku"]), vec!["haiku"]);
        assert_eq!(resolve_arch(&["riscv64"]), vec!["riscv64"]);
    }

    #[test]
    fn test_archives_drop_unknown_and_keep_spelling() {
        assert_eq!(
            resolve_archives(&["TGZ", "rar", "tar.XZ", "7z"]),
            vec!["TGZ", "tar.XZ"]
        );
        assert!(resolve_archives(&["rar"]).is_empty());
    }
}
