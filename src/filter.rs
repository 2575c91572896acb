//! Pattern filter over object FullPaths.

use crate::error::{Error, Result};
use regex::Regex;

/// Accepts a FullPath when the pattern matches at its start.
///
/// The match is anchored at the beginning only: `A/h` accepts `A/h1`.
/// An empty pattern accepts everything.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    re: Option<Regex>,
}

impl PathFilter {
    pub fn new(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Ok(Self::default());
        }
        // Group the user pattern so a top-level alternation stays anchored.
        let re = Regex::new(&format!("^(?:{})", pattern)).map_err(|source| {
            Error::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;
        Ok(Self { re: Some(re) })
    }

    pub fn matches(&self, full_path: &str) -> bool {
        match &self.re {
            Some(re) => re.is_match(full_path),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pattern_accepts_everything() {
        let f = PathFilter::new("").unwrap();
        assert!(f.matches("A/h1"));
        assert!(f.matches(""));
    }

    #[test]
    fn anchored_at_start_only() {
        let f = PathFilter::new("A/").unwrap();
        assert!(f.matches("A/h1"));
        assert!(!f.matches("B/A/h1"));

        let f = PathFilter::new("^A/").unwrap();
        assert!(f.matches("A/h1"));

        let f = PathFilter::new("A/h").unwrap();
        assert!(f.matches("A/h1/extra"));
    }

    #[test]
    fn alternation_stays_anchored() {
        let f = PathFilter::new("A|B").unwrap();
        assert!(f.matches("B/h1"));
        assert!(!f.matches("C/B"));
    }

    #[test]
    fn invalid_pattern_is_rejected_up_front() {
        assert!(matches!(
            PathFilter::new("A/(unclosed"),
            Err(Error::InvalidPattern { .. })
        ));
    }
}
