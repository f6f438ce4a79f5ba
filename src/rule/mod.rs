//! Firewall rule naming and descriptors.
//!
//! A rule's name is the only link between a `create` run and a later
//! `delete` run: deletion rebuilds the same names from the prefix and a
//! count instead of tracking any state.

mod descriptor;
mod name;

pub use descriptor::{
    build_rule, build_rules, DeniedProtocol, RuleDescriptor, DENY_ALL, RULE_PRIORITY,
};
pub use name::{
    rule_name, rule_names, validate_prefix, MAX_NAME_LEN, MAX_PREFIX_LEN, MAX_RULE_INDEX,
};
