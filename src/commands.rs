//! The `list`, `create` and `delete` commands.
//!
//! All three run strictly in sequence: each remote call returns before the
//! next one starts, and each result is written to `out` as soon as it
//! arrives. A failed call stops the batch; rules already created or
//! deleted stay that way, nothing is rolled back.

use std::io::Write;

use serde::Serialize;

use crate::compute::{FirewallApi, Operation, RuleLister};
use crate::config::{CreateOptions, CreateRequest, DeleteOptions};
use crate::loader::load_addresses;
use crate::partition::partition;
use crate::rule::{build_rules, rule_names, RuleDescriptor};
use crate::{Error, Result};

/// Why a sequential batch stopped early.
#[derive(Debug)]
pub enum BatchFailure {
    /// The remote call for this rule failed
    Rejected { name: String, error: Error },
    /// A call succeeded but its result could not be written out
    Output(Error),
}

impl BatchFailure {
    pub fn error(&self) -> &Error {
        match self {
            BatchFailure::Rejected { error, .. } => error,
            BatchFailure::Output(error) => error,
        }
    }

    pub fn into_error(self) -> Error {
        match self {
            BatchFailure::Rejected { error, .. } => error,
            BatchFailure::Output(error) => error,
        }
    }
}

/// Progress of a sequential batch of remote calls.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Number of calls the batch was meant to make
    pub total: usize,
    /// Rules the remote side acknowledged, in order
    pub completed: Vec<String>,
    pub failure: Option<BatchFailure>,
}

impl BatchOutcome {
    fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// Completed names, or the error that stopped the batch.
    pub fn into_result(self) -> Result<Vec<String>> {
        match self.failure {
            None => Ok(self.completed),
            Some(failure) => Err(failure.into_error()),
        }
    }

    /// Log the partial-completion summary when the batch failed.
    fn report(&self, verb: &str) {
        let done = self.completed.len();
        match &self.failure {
            None => return,
            Some(BatchFailure::Rejected { name, error }) => log::error!(
                "{} {} of {} rules; {} failed: {}",
                verb,
                done,
                self.total,
                name,
                error
            ),
            Some(BatchFailure::Output(error)) => log::error!(
                "{} {} of {} rules; stopped after {} because its result could not be written: {}",
                verb,
                done,
                self.total,
                self.completed.last().map(String::as_str).unwrap_or("-"),
                error
            ),
        }
        if done > 0 {
            log::error!("Rules already {} are left in place", verb);
        }
    }
}

/// Run `call` for each item in order, echoing each result, until one fails.
fn run_batch<T, W, N, F>(items: &[T], name_of: N, mut call: F, out: &mut W) -> BatchOutcome
where
    W: Write,
    N: Fn(&T) -> &str,
    F: FnMut(&T) -> Result<Operation>,
{
    let mut outcome = BatchOutcome::new(items.len());

    for item in items {
        let name = name_of(item);
        match call(item) {
            Ok(op) => {
                outcome.completed.push(name.to_string());
                if let Err(e) = emit(out, &op) {
                    outcome.failure = Some(BatchFailure::Output(e));
                    break;
                }
            }
            Err(error) => {
                outcome.failure = Some(BatchFailure::Rejected {
                    name: name.to_string(),
                    error,
                });
                break;
            }
        }
    }

    outcome
}

/// Write one value as indented JSON followed by a newline.
pub fn emit<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Print every firewall rule of `project`. Returns the number printed.
pub fn list<A, W>(api: &A, project: &str, out: &mut W) -> Result<usize>
where
    A: FirewallApi + ?Sized,
    W: Write,
{
    let mut lister = RuleLister::new(api, project);
    let mut count = 0;
    for rule in lister.by_ref() {
        emit(out, &rule?)?;
        count += 1;
    }
    log::info!("Listed {} firewall rules ({} pages)", count, lister.pages());
    Ok(count)
}

/// Insert `rules` one after another, echoing each operation result.
pub fn submit_rules<A, W>(
    api: &A,
    project: &str,
    rules: &[RuleDescriptor],
    out: &mut W,
) -> BatchOutcome
where
    A: FirewallApi + ?Sized,
    W: Write,
{
    run_batch(
        rules,
        |rule| rule.name.as_str(),
        |rule| {
            log::debug!(
                "Creating {} with {} source ranges",
                rule.name,
                rule.source_ranges.len()
            );
            api.insert_rule(project, rule)
        },
        out,
    )
}

/// Delete the named rules one after another, echoing each result.
///
/// No existence check is made; deleting an absent rule fails remotely.
pub fn delete_by_names<A, W>(
    api: &A,
    project: &str,
    names: &[String],
    out: &mut W,
) -> BatchOutcome
where
    A: FirewallApi + ?Sized,
    W: Write,
{
    run_batch(
        names,
        |name| name.as_str(),
        |name| {
            log::debug!("Deleting {}", name);
            api.delete_rule(project, name)
        },
        out,
    )
}

/// Validated request turned into descriptors, plus the address count.
fn prepare_rules(request: &CreateRequest) -> Result<(usize, Vec<RuleDescriptor>)> {
    let addresses = load_addresses(&request.filter)?;
    let chunks = partition(addresses.addresses(), request.max_per_rule)?;
    let rules = build_rules(&request.rule_prefix, &chunks)?;
    Ok((addresses.len(), rules))
}

/// Print the rules `create` would submit, without any remote call.
pub fn plan_create<W: Write>(options: &CreateOptions, out: &mut W) -> Result<Vec<String>> {
    let request = options.validate()?;
    let (address_count, rules) = prepare_rules(&request)?;

    log::info!(
        "Dry run: {} rules for {} addresses would be created (up to {} per rule)",
        rules.len(),
        address_count,
        request.max_per_rule
    );

    for rule in &rules {
        emit(out, rule)?;
    }
    Ok(rules.into_iter().map(|r| r.name).collect())
}

/// Print the names `delete` would remove, without any remote call.
pub fn plan_delete<W: Write>(options: &DeleteOptions, out: &mut W) -> Result<Vec<String>> {
    let request = options.validate()?;
    let names = rule_names(&request.rule_prefix, request.count)?;

    log::info!("Dry run: {} rules would be deleted", names.len());

    for name in &names {
        writeln!(out, "{}", name)?;
    }
    Ok(names)
}

/// Load the address file, split it and create one rule per chunk.
///
/// Every option is validated and the whole rule set built before the
/// first remote call. Returns the names of the created rules.
pub fn create<A, W>(
    api: &A,
    project: &str,
    options: &CreateOptions,
    out: &mut W,
) -> Result<Vec<String>>
where
    A: FirewallApi + ?Sized,
    W: Write,
{
    if options.dry_run {
        return plan_create(options, out);
    }

    let request = options.validate()?;
    let (address_count, rules) = prepare_rules(&request)?;

    if rules.is_empty() {
        log::info!("No addresses in {:?}; nothing to create", request.filter);
        return Ok(Vec::new());
    }

    log::info!(
        "Creating {} rules for {} addresses (up to {} per rule)",
        rules.len(),
        address_count,
        request.max_per_rule
    );

    let outcome = submit_rules(api, project, &rules, out);
    outcome.report("created");
    let created = outcome.into_result()?;
    log::info!("Created {} rules", created.len());
    Ok(created)
}

/// Rebuild `count` rule names from the prefix and delete each in order.
pub fn delete<A, W>(
    api: &A,
    project: &str,
    options: &DeleteOptions,
    out: &mut W,
) -> Result<Vec<String>>
where
    A: FirewallApi + ?Sized,
    W: Write,
{
    if options.dry_run {
        return plan_delete(options, out);
    }

    let request = options.validate()?;
    let names = rule_names(&request.rule_prefix, request.count)?;

    log::info!(
        "Deleting {} rules with prefix {}",
        names.len(),
        request.rule_prefix
    );

    let outcome = delete_by_names(api, project, &names, out);
    outcome.report("deleted");
    let deleted = outcome.into_result()?;
    log::info!("Deleted {} rules", deleted.len());
    Ok(deleted)
}
