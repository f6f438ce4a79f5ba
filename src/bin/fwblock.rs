//! fwblock: CLI tool for blocking IP address lists with Compute Engine firewall rules.

use std::io;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use fwblock::commands;
use fwblock::config::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
use fwblock::{
    AccessToken, ClientConfig, ComputeClient, ConnectionOptions, CreateOptions, DeleteOptions,
    DEFAULT_MAX_PER_RULE,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "fwblock")]
#[command(author = "Kaitu.io")]
#[command(version)]
#[command(about = "Manage Compute Engine firewall rules that block IP address lists", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Project holding the firewall rules
    #[arg(long, global = true)]
    project_id: Option<String>,

    /// File holding the OAuth2 access token
    #[arg(long, global = true)]
    key_path: Option<String>,

    /// Compute API base URL
    #[arg(long, global = true, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every firewall rule of the project
    List,

    /// Create one deny-all rule per chunk of the address file
    Create {
        /// Address list file, one address per line
        #[arg(short, long)]
        filter: Option<String>,

        /// Prefix of the generated rule names
        #[arg(short, long)]
        rule_prefix: Option<String>,

        /// Maximum source ranges per rule
        #[arg(short, long, default_value_t = DEFAULT_MAX_PER_RULE)]
        max_per_rule: usize,

        /// Print the rules instead of creating them
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete rules `{prefix}-001` through `{prefix}-{count}`
    Delete {
        /// Prefix used when the rules were created
        #[arg(short, long)]
        rule_prefix: Option<String>,

        /// Number of rules to delete
        #[arg(short, long)]
        count: Option<String>,

        /// Print the names instead of deleting them
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the tool version
    Version,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.global.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(cli) {
        log::debug!("{:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::List => {
            let (project, client) = connect(&cli.global)?;
            commands::list(&client, &project, &mut out)?;
        }
        Commands::Create {
            filter,
            rule_prefix,
            max_per_rule,
            dry_run,
        } => {
            let options = CreateOptions {
                filter,
                rule_prefix,
                max_per_rule,
                dry_run,
            };
            if dry_run {
                commands::plan_create(&options, &mut out)?;
            } else {
                options.validate()?;
                let (project, client) = connect(&cli.global)?;
                commands::create(&client, &project, &options, &mut out)?;
            }
        }
        Commands::Delete {
            rule_prefix,
            count,
            dry_run,
        } => {
            let options = DeleteOptions {
                rule_prefix,
                count,
                dry_run,
            };
            if dry_run {
                commands::plan_delete(&options, &mut out)?;
            } else {
                options.validate()?;
                let (project, client) = connect(&cli.global)?;
                commands::delete(&client, &project, &options, &mut out)?;
            }
        }
        Commands::Version => {
            println!("fwblock {}", VERSION);
        }
    }

    Ok(())
}

/// Validate the connection options and build a client for them.
fn connect(global: &GlobalArgs) -> fwblock::Result<(String, ComputeClient)> {
    let connection = ConnectionOptions {
        project_id: global.project_id.clone(),
        key_path: global.key_path.clone(),
    }
    .validate()?;

    let config = ClientConfig::new(VERSION)
        .with_endpoint(global.endpoint.as_str())
        .with_timeout(Duration::from_secs(global.timeout));
    let token = AccessToken::from_key_file(&connection.key_path)?;
    let client = ComputeClient::new(&config, token)?;

    Ok((connection.project_id, client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_options_checked_before_credentials() {
        let cli = Cli::try_parse_from([
            "fwblock",
            "create",
            "--project-id",
            "proj",
            "--key-path",
            "/nonexistent/key",
            "--filter",
            "ips.txt",
        ])
        .unwrap();

        let err = run(cli).unwrap_err();
        assert_eq!(err.to_string(), "missing required argument: --rule-prefix");
    }

    #[test]
    fn test_dry_run_needs_no_credentials() {
        let cli = Cli::try_parse_from([
            "fwblock",
            "delete",
            "--rule-prefix",
            "blk",
            "--count",
            "2",
            "--dry-run",
        ])
        .unwrap();

        assert!(run(cli).is_ok());
    }

    #[test]
    fn test_live_run_still_needs_connection() {
        let cli = Cli::try_parse_from(["fwblock", "delete", "--rule-prefix", "blk", "--count", "2"])
            .unwrap();

        let err = run(cli).unwrap_err();
        assert_eq!(err.to_string(), "missing required argument: --key-path");
    }
}
