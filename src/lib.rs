//! fwblock - Block batches of IP addresses with Compute Engine firewall rules.
//!
//! An address file is split into chunks of at most `max_per_rule`
//! entries, and each chunk becomes one deny-all firewall rule named
//! `{prefix}-{index:03}`. Because names are rebuilt from the prefix and
//! an index, a later delete only needs the same prefix and the number of
//! rules created. Nothing is stored between runs.
//!
//! # Quick Start
//!
//! ```
//! use fwblock::partition::partition;
//! use fwblock::rule::build_rules;
//!
//! let addresses: Vec<String> = (0..600)
//!     .map(|i| format!("10.0.{}.{}", i / 256, i % 256))
//!     .collect();
//! let chunks = partition(&addresses, 250).unwrap();
//! let rules = build_rules("blk", &chunks).unwrap();
//!
//! let names: Vec<&str> = rules.iter().map(|r| r.name.as_str()).collect();
//! assert_eq!(names, ["blk-001", "blk-002", "blk-003"]);
//! assert_eq!(rules[2].source_ranges.len(), 100);
//! ```
//!
//! # Remote calls
//!
//! The compute API is reached through the [`FirewallApi`] trait.
//! [`ComputeClient`] implements it over blocking HTTPS; the functions in
//! [`commands`] accept any implementation and never issue two calls at
//! once.
//!
//! # Limitations
//!
//! - A failed call stops the batch. Rules created (or deleted) before the
//!   failure are left as they are.
//! - At most 999 rules per prefix, so that names keep three digits.

mod error;

pub mod commands;
pub mod compute;
pub mod config;
pub mod loader;
pub mod partition;
pub mod rule;

pub use error::{Error, Result};

pub use compute::{AccessToken, ComputeClient, FirewallApi, FirewallPage, Operation, RuleLister};
pub use config::{ClientConfig, ConnectionOptions, CreateOptions, DeleteOptions};
pub use loader::{load_addresses, parse_addresses, AddressList};
pub use partition::{chunk_count, partition, Chunk, DEFAULT_MAX_PER_RULE};
pub use rule::{rule_name, rule_names, RuleDescriptor, MAX_RULE_INDEX, RULE_PRIORITY};
