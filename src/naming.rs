//! Path algebra between FullPaths and output paths.
//!
//! A group's FullPath is the `/`-joined chain of its ancestors' names, as
//! reported by the container; an object's FullPath appends its name. Output
//! paths substitute the container file with its output root (the input name
//! minus its `.root` suffix) and mirror the FullPath below it. Names that
//! contain `/`, are empty, or are `.`/`..` cannot be mirrored and are rejected
//! by containers when listed.

use crate::error::{Error, Result};
use regex::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

/// FullPath separator, both inside containers and in generated links.
pub const SEP: char = '/';

static SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(.+?)(?:\.canv)?\.root(?:\.\d*)?$").expect("Invalid input suffix regex")
});

/// Strip `.root`, an optional `.canv` before it and an optional `.N` after it.
///
/// `run1.canv.root` -> `run1`, `out/run1.root.2` -> `out/run1`.
pub fn strip_input_suffix(path: &str) -> Result<String> {
    SUFFIX_RE
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| Error::InvalidInputName(path.to_string()))
}

/// Whether `name` can be used as one segment of an output path.
pub fn is_mirrorable_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(SEP)
}

/// Join a group FullPath and an object name. Root-level objects have no prefix.
pub fn full_path(group: &str, name: &str) -> String {
    if group.is_empty() {
        name.to_string()
    } else {
        format!("{}{}{}", group, SEP, name)
    }
}

/// Base output path for an object: `<output_root>/<group>/<name>`, no extension.
pub fn join_output_path(output_root: &Path, group: &str, name: &str) -> PathBuf {
    let mut out = output_root.to_path_buf();
    for segment in group.split(SEP).filter(|s| !s.is_empty()) {
        out.push(segment);
    }
    out.push(name);
    out
}

/// Append an extension to a base path without replacing anything after a dot
/// already present in the object name.
pub fn with_suffix(base: &Path, ext: &str) -> PathBuf {
    let mut s = base.as_os_str().to_os_string();
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}

/// Lexical containment check; no filesystem access.
pub fn is_under_root(path: &Path, root: &Path) -> bool {
    normalize(path).starts_with(normalize(root))
}

/// `path` relative to `start`, both resolved against the working directory.
pub fn relpath(path: &Path, start: &Path) -> std::io::Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "no path specified",
        ));
    }
    let path = normalize(&std::path::absolute(path)?);
    let start = normalize(&std::path::absolute(start)?);

    let path_parts: Vec<Component> = path.components().collect();
    let start_parts: Vec<Component> = start.components().collect();
    let common = path_parts
        .iter()
        .zip(start_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..start_parts.len() {
        rel.push("..");
    }
    for part in &path_parts[common..] {
        rel.push(part.as_os_str());
    }
    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    Ok(rel)
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strips_known_suffixes() {
        assert_eq!(strip_input_suffix("run1.canv.root").unwrap(), "run1");
        assert_eq!(strip_input_suffix("run1.root.2").unwrap(), "run1");
        assert_eq!(strip_input_suffix("run1.root").unwrap(), "run1");
        assert_eq!(strip_input_suffix("plots/run1.canv.root.10").unwrap(), "plots/run1");
        assert_eq!(strip_input_suffix("a.b.root").unwrap(), "a.b");
    }

    #[test]
    fn rejects_other_suffixes() {
        assert!(matches!(
            strip_input_suffix("run1.txt"),
            Err(Error::InvalidInputName(_))
        ));
        assert!(strip_input_suffix(".root").is_err());
        assert!(strip_input_suffix("run1.root.x").is_err());
    }

    #[test]
    fn dot_names_and_separators_are_not_mirrorable() {
        assert!(is_mirrorable_name("h1"));
        assert!(is_mirrorable_name(".hidden"));
        assert!(is_mirrorable_name("a..b"));
        assert!(!is_mirrorable_name(""));
        assert!(!is_mirrorable_name("."));
        assert!(!is_mirrorable_name(".."));
        assert!(!is_mirrorable_name("a/b"));
    }

    #[test]
    fn full_path_at_root_has_no_prefix() {
        assert_eq!(full_path("", "h1"), "h1");
        assert_eq!(full_path("A/B", "h1"), "A/B/h1");
    }

    #[test]
    fn output_path_mirrors_groups() {
        let root = Path::new("out/run1");
        assert_eq!(
            join_output_path(root, "A/B", "h1"),
            PathBuf::from("out/run1/A/B/h1")
        );
        assert_eq!(join_output_path(root, "", "h1"), PathBuf::from("out/run1/h1"));
        assert_eq!(
            with_suffix(&join_output_path(root, "A", "h.v2"), "eps"),
            PathBuf::from("out/run1/A/h.v2.eps")
        );
    }

    #[test]
    fn containment_is_lexical() {
        assert!(is_under_root(Path::new("out/run1/A/h1"), Path::new("out/run1")));
        assert!(is_under_root(Path::new("out/./run1/A"), Path::new("out/run1")));
        assert!(!is_under_root(Path::new("out/run10/A"), Path::new("out/run1")));
        assert!(!is_under_root(Path::new("out/run1/../x"), Path::new("out/run1")));
    }

    #[test]
    fn relpath_walks_up_and_down() {
        assert_eq!(
            relpath(Path::new("/a/b/c.eps"), Path::new("/a/b")).unwrap(),
            PathBuf::from("c.eps")
        );
        assert_eq!(
            relpath(Path::new("/a/x/c.eps"), Path::new("/a/b")).unwrap(),
            PathBuf::from("../x/c.eps")
        );
        assert_eq!(relpath(Path::new("/a/b"), Path::new("/a/b")).unwrap(), PathBuf::from("."));
        assert!(relpath(Path::new(""), Path::new("/a")).is_err());
    }
}
