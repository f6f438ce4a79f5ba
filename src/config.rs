//! Command options and their validation.
//!
//! Options arrive from the command line as optional strings. Each command
//! validates its own options before touching the network, so a missing or
//! empty value is reported by flag name and nothing remote happens.

use std::path::PathBuf;
use std::time::Duration;

use crate::partition::DEFAULT_MAX_PER_RULE;
use crate::rule::{validate_prefix, MAX_RULE_INDEX};
use crate::{Error, Result};

/// Default compute API base URL.
pub const DEFAULT_ENDPOINT: &str = "https://compute.googleapis.com/compute/v1";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Return the value if present and non-blank, else `MissingArgument(flag)`.
pub fn require<'a>(value: Option<&'a str>, flag: &'static str) -> Result<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::MissingArgument(flag)),
    }
}

/// HTTP client settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL, without a trailing slash
    pub endpoint: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a config for the given program version.
    pub fn new(version: &str) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("fwblock/{}", version),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Options naming the project and the credentials to reach it.
#[derive(Debug, Clone, Default)]
pub struct ConnectionOptions {
    pub project_id: Option<String>,
    pub key_path: Option<String>,
}

/// Validated connection options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub project_id: String,
    pub key_path: PathBuf,
}

impl ConnectionOptions {
    pub fn validate(&self) -> Result<Connection> {
        let key_path = require(self.key_path.as_deref(), "--key-path")?;
        let project_id = require(self.project_id.as_deref(), "--project-id")?;
        Ok(Connection {
            project_id: project_id.to_string(),
            key_path: PathBuf::from(key_path),
        })
    }
}

/// Options of the `create` command.
#[derive(Debug, Clone)]
pub struct CreateOptions {
    /// Path of the address list file
    pub filter: Option<String>,
    pub rule_prefix: Option<String>,
    pub max_per_rule: usize,
    /// Print descriptors instead of submitting them
    pub dry_run: bool,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            filter: None,
            rule_prefix: None,
            max_per_rule: DEFAULT_MAX_PER_RULE,
            dry_run: false,
        }
    }
}

/// Validated `create` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    pub filter: PathBuf,
    pub rule_prefix: String,
    pub max_per_rule: usize,
    pub dry_run: bool,
}

impl CreateOptions {
    pub fn validate(&self) -> Result<CreateRequest> {
        let filter = require(self.filter.as_deref(), "--filter")?;
        let rule_prefix = require(self.rule_prefix.as_deref(), "--rule-prefix")?;
        validate_prefix(rule_prefix)?;
        if self.max_per_rule == 0 {
            return Err(Error::InvalidChunkSize(self.max_per_rule));
        }
        Ok(CreateRequest {
            filter: PathBuf::from(filter),
            rule_prefix: rule_prefix.to_string(),
            max_per_rule: self.max_per_rule,
            dry_run: self.dry_run,
        })
    }
}

/// Options of the `delete` command.
#[derive(Debug, Clone, Default)]
pub struct DeleteOptions {
    pub rule_prefix: Option<String>,
    /// Number of rules to delete, as typed
    pub count: Option<String>,
    pub dry_run: bool,
}

/// Validated `delete` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub rule_prefix: String,
    pub count: usize,
    pub dry_run: bool,
}

impl DeleteOptions {
    pub fn validate(&self) -> Result<DeleteRequest> {
        let rule_prefix = require(self.rule_prefix.as_deref(), "--rule-prefix")?;
        validate_prefix(rule_prefix)?;
        let raw = require(self.count.as_deref(), "--count")?;
        let count = parse_count(raw)?;
        Ok(DeleteRequest {
            rule_prefix: rule_prefix.to_string(),
            count,
            dry_run: self.dry_run,
        })
    }
}

/// Parse a rule count: a positive integer no larger than `MAX_RULE_INDEX`.
pub fn parse_count(raw: &str) -> Result<usize> {
    let count: usize = raw
        .trim()
        .parse()
        .map_err(|_| Error::InvalidCount(raw.to_string()))?;
    if count == 0 {
        return Err(Error::InvalidCount(raw.to_string()));
    }
    if count > MAX_RULE_INDEX {
        return Err(Error::TooManyRules {
            count,
            max: MAX_RULE_INDEX,
        });
    }
    Ok(count)
}
