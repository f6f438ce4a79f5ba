//! Deterministic rule names.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Error, Result};

/// Highest index that fits the three-digit name suffix.
pub const MAX_RULE_INDEX: usize = 999;

/// Longest resource name the compute API accepts.
pub const MAX_NAME_LEN: usize = 63;

/// Longest prefix that still leaves room for the `-NNN` suffix.
pub const MAX_PREFIX_LEN: usize = MAX_NAME_LEN - "-000".len();

/// A prefix followed by `-NNN` is a valid resource name exactly when it
/// starts with a lowercase letter and holds only `[-a-z0-9]`.
static PREFIX_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][-a-z0-9]*$").expect("prefix pattern compiles"));

/// Check that every name built from `prefix` is a valid resource name.
pub fn validate_prefix(prefix: &str) -> Result<()> {
    let reason = if prefix.len() > MAX_PREFIX_LEN {
        "longer than 59 characters"
    } else if !PREFIX_PATTERN.is_match(prefix) {
        "must start with a lowercase letter and contain only lowercase letters, digits and '-'"
    } else {
        return Ok(());
    };
    Err(Error::InvalidPrefix {
        prefix: prefix.to_string(),
        reason,
    })
}

/// Name of the rule at 1-based `index`: `{prefix}-{index:03}`.
///
/// Callers keep `index` within `1..=MAX_RULE_INDEX`; [`rule_names`] and
/// [`build_rules`](super::build_rules) enforce it.
pub fn rule_name(prefix: &str, index: usize) -> String {
    format!("{}-{:03}", prefix, index)
}

/// Names for indices `1..=count`, in ascending order.
pub fn rule_names(prefix: &str, count: usize) -> Result<Vec<String>> {
    if count > MAX_RULE_INDEX {
        return Err(Error::TooManyRules {
            count,
            max: MAX_RULE_INDEX,
        });
    }
    Ok((1..=count).map(|i| rule_name(prefix, i)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rule_name_padding() {
        assert_eq!(rule_name("block", 1), "block-001");
        assert_eq!(rule_name("block", 42), "block-042");
        assert_eq!(rule_name("block", 999), "block-999");
    }

    #[test]
    fn test_rule_name_keeps_prefix_verbatim() {
        assert_eq!(rule_name("deny-asia", 7), "deny-asia-007");
    }

    #[test]
    fn test_rule_names_ascending() {
        let names = rule_names("blk", 3).unwrap();
        assert_eq!(names, vec!["blk-001", "blk-002", "blk-003"]);
    }

    #[test]
    fn test_rule_names_injective() {
        let names = rule_names("p", MAX_RULE_INDEX).unwrap();
        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), MAX_RULE_INDEX);
        assert!(names.iter().all(|n| n.len() == "p-000".len()));
    }

    #[test]
    fn test_validate_prefix_accepts_resource_names() {
        for prefix in ["blk", "deny-asia", "a", "x1-"] {
            assert!(validate_prefix(prefix).is_ok(), "prefix={}", prefix);
        }
        assert!(validate_prefix(&"p".repeat(MAX_PREFIX_LEN)).is_ok());
    }

    #[test]
    fn test_validate_prefix_rejects_url_metacharacters() {
        for prefix in ["blk?", "blk#", "blk/x", "blk%3F", "a b", "Blk", "1blk", "-blk", ".."] {
            assert!(
                matches!(validate_prefix(prefix), Err(Error::InvalidPrefix { .. })),
                "prefix={}",
                prefix
            );
        }
    }

    #[test]
    fn test_validate_prefix_length() {
        let prefix = "p".repeat(MAX_PREFIX_LEN + 1);
        assert!(validate_prefix(&prefix).is_err());
        assert_eq!(rule_name(&"p".repeat(MAX_PREFIX_LEN), 999).len(), MAX_NAME_LEN);
    }

    #[test]
    fn test_rule_names_empty() {
        assert!(rule_names("blk", 0).unwrap().is_empty());
    }

    #[test]
    fn test_rule_names_over_limit() {
        let err = rule_names("blk", 1000).unwrap_err();
        assert!(matches!(
            err,
            Error::TooManyRules {
                count: 1000,
                max: MAX_RULE_INDEX
            }
        ));
    }
}
