//! Null value handling for ingestion

use serde::{Serialize, Deserialize};

/// Null value configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NullConfig {
    /// Patterns to treat as null
    pub patterns: Vec<String>,

    /// Whether to trim whitespace before checking
    pub trim_whitespace: bool,

    /// Case sensitive matching
    pub case_sensitive: bool,
}

impl Default for NullConfig {
    fn default() -> Self {
        Self {
            patterns: vec![
                String::new(),      // Empty string
                "-".to_string(),
                "N/A".to_string(),
                "null".to_string(),
                "None".to_string(),
            ],
            trim_whitespace: true,
            case_sensitive: false,
        }
    }
}

impl NullConfig {
    /// Check if a value should be treated as null
    pub fn is_null(&self, value: &str) -> bool {
        let test_value = if self.trim_whitespace {
            value.trim()
        } else {
            value
        };

        self.patterns.iter().any(|pattern| {
            if self.case_sensitive {
                test_value == pattern
            } else {
                test_value.eq_ignore_ascii_case(pattern)
            }
        })
    }

    /// The trimmed value, or `None` when it matches a null pattern
    pub fn value<'a>(&self, value: &'a str) -> Option<&'a str> {
        if self.is_null(value) {
            None
        } else {
            Some(value.trim())
        }
    }

    /// Add a null pattern
    pub fn add_pattern(&mut self, pattern: String) {
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patterns() {
        let nulls = NullConfig::default();
        assert!(nulls.is_null(""));
        assert!(nulls.is_null("  n/a "));
        assert!(nulls.is_null("NULL"));
        assert!(!nulls.is_null("0"));
        // Namibia's alpha-2 code is data, not a missing value
        assert!(!nulls.is_null("NA"));
        assert_eq!(nulls.value(" US "), Some("US"));
        assert_eq!(nulls.value("none"), None);
    }

    #[test]
    fn test_case_sensitive_patterns() {
        let mut nulls = NullConfig {
            case_sensitive: true,
            ..NullConfig::default()
        };
        nulls.add_pattern("missing".to_string());
        assert!(nulls.is_null("missing"));
        assert!(!nulls.is_null("MISSING"));
        assert!(!nulls.is_null("none"));
    }
}
