//! Rule descriptors sent to the compute API.

use serde::{Deserialize, Serialize};

use super::name::{rule_name, MAX_RULE_INDEX};
use crate::partition::Chunk;
use crate::{Error, Result};

/// Priority given to every generated rule. Lower numbers win, so this
/// sits just below the reserved top range.
pub const RULE_PRIORITY: u32 = 100;

/// Protocol keyword denying all traffic.
pub const DENY_ALL: &str = "all";

/// A protocol entry of a rule's `denied` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeniedProtocol {
    #[serde(rename = "IPProtocol")]
    pub ip_protocol: String,
}

/// A firewall rule denying all traffic from a list of source ranges.
///
/// Serializes to the compute API's firewall resource shape:
///
/// ```
/// use fwblock::rule::RuleDescriptor;
///
/// let rule = RuleDescriptor::deny_all("blk-001", vec!["10.0.0.1".to_string()]);
/// let json = serde_json::to_value(&rule).unwrap();
/// assert_eq!(json["denied"][0]["IPProtocol"], "all");
/// assert_eq!(json["sourceRanges"][0], "10.0.0.1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDescriptor {
    pub name: String,
    pub denied: Vec<DeniedProtocol>,
    pub priority: u32,
    pub source_ranges: Vec<String>,
}

impl RuleDescriptor {
    /// Create a deny-all rule at the fixed priority.
    pub fn deny_all(name: impl Into<String>, source_ranges: Vec<String>) -> Self {
        Self {
            name: name.into(),
            denied: vec![DeniedProtocol {
                ip_protocol: DENY_ALL.to_string(),
            }],
            priority: RULE_PRIORITY,
            source_ranges,
        }
    }
}

/// Build the descriptor for one chunk.
pub fn build_rule(prefix: &str, chunk: &Chunk<'_>) -> RuleDescriptor {
    RuleDescriptor::deny_all(rule_name(prefix, chunk.index), chunk.addresses.to_vec())
}

/// Build descriptors for every chunk, in chunk order.
///
/// Fails without building anything if there are more chunks than the
/// naming scheme can address.
pub fn build_rules(prefix: &str, chunks: &[Chunk<'_>]) -> Result<Vec<RuleDescriptor>> {
    if chunks.len() > MAX_RULE_INDEX {
        return Err(Error::TooManyRules {
            count: chunks.len(),
            max: MAX_RULE_INDEX,
        });
    }
    Ok(chunks.iter().map(|c| build_rule(prefix, c)).collect())
}
