//! Hive Nodes Command Line Interface
//!
//! Resolves the node directories that Hive accounts publish in their JSON
//! metadata and prints them for humans or scripts.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use hive_nodes_directory::{DirectoryError, DirectoryResolver};
use hive_nodes_sdk::HiveClient;
use hive_nodes_types::{AccountName, NodeDirectory};
use serde_json::{json, Map, Value};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod settings;

use settings::{AppConfig, LogFormat};

#[derive(Parser)]
#[command(name = "hive-nodes")]
#[command(about = "Resolve Hive node directories published in account metadata", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML configuration file (defaults to ./hive-nodes.toml when present)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Hive API endpoints used for the account lookup, tried in order
    #[arg(long = "api", value_name = "URL", value_delimiter = ',')]
    api_nodes: Vec<String>,

    /// Timeout (in seconds) for each Hive API request
    #[arg(long)]
    timeout_seconds: Option<u64>,

    /// Log filter (overridden by RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the node directory published by one or more accounts
    Resolve(ResolveCommand),
}

#[derive(Args)]
struct ResolveCommand {
    /// Accounts to resolve (defaults to the configured account)
    accounts: Vec<String>,

    /// Resolve a well-known directory instead of naming an account
    #[arg(long, value_enum, conflicts_with = "accounts")]
    profile: Option<DirectoryProfile>,

    /// Emit JSON instead of a human readable listing
    #[arg(long)]
    json: bool,
}

/// Well-known accounts that publish node directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DirectoryProfile {
    /// Hive-Engine sidechain nodes
    Engine,
    /// Hive mainnet API nodes
    Mainnet,
}

impl DirectoryProfile {
    fn account(&self) -> &'static str {
        match self {
            DirectoryProfile::Engine => "flowerengine",
            DirectoryProfile::Mainnet => "nectarflower",
        }
    }
}

type Resolution = (AccountName, Result<NodeDirectory, DirectoryError>);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?.with_overrides(
        cli.api_nodes,
        cli.timeout_seconds,
        cli.log_level,
        cli.log_format,
    );
    init_logging(&config)?;
    debug!(?config, "Loaded configuration");

    match cli.command {
        Commands::Resolve(cmd) => handle_resolve(cmd, &config).await,
    }
}

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?,
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init()?,
    }

    Ok(())
}

async fn handle_resolve(cmd: ResolveCommand, config: &AppConfig) -> Result<()> {
    let accounts = select_accounts(&cmd.accounts, cmd.profile, &config.account)?;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    let client = HiveClient::with_http_client(&config.api_nodes, http)
        .context("invalid Hive API endpoint configuration")?;
    let resolver = DirectoryResolver::new(Arc::new(client));

    let results = resolver.resolve_many(&accounts).await;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&results_to_json(&results))?);
    } else {
        print!("{}", render_text(&results));
    }

    if results.iter().any(|(_, result)| result.is_err()) {
        std::process::exit(1);
    }
    Ok(())
}

fn select_accounts(
    accounts: &[String],
    profile: Option<DirectoryProfile>,
    configured: &str,
) -> Result<Vec<AccountName>> {
    let raw: Vec<&str> = if !accounts.is_empty() {
        accounts.iter().map(String::as_str).collect()
    } else if let Some(profile) = profile {
        vec![profile.account()]
    } else {
        vec![configured]
    };

    raw.into_iter()
        .map(|name| AccountName::new(name).with_context(|| format!("invalid account '{name}'")))
        .collect()
}

fn render_text(results: &[Resolution]) -> String {
    let mut out = String::new();
    for (idx, (account, result)) in results.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "Account: {account}");
        match result {
            Ok(directory) => {
                let _ = writeln!(out, "Available nodes:");
                for (position, node) in directory.nodes.iter().enumerate() {
                    let _ = writeln!(out, "{}. {node}", position + 1);
                }
                if !directory.failing_nodes.is_empty() {
                    let _ = writeln!(out, "Failing nodes:");
                    for (node, reason) in &directory.failing_nodes {
                        let _ = writeln!(out, "- {node}: {reason}");
                    }
                }
            }
            Err(err) => {
                let _ = writeln!(out, "Error ({}): {err}", err.kind());
            }
        }
    }
    out
}

fn results_to_json(results: &[Resolution]) -> Value {
    let mut map = Map::new();
    for (account, result) in results {
        let value = match result {
            Ok(directory) => json!(directory),
            Err(err) => json!({
                "error": {
                    "kind": err.kind().as_str(),
                    "message": err.to_string(),
                }
            }),
        };
        map.insert(account.to_string(), value);
    }
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn name(raw: &str) -> AccountName {
        AccountName::new(raw).unwrap()
    }

    fn sample_directory() -> NodeDirectory {
        let mut failing = BTreeMap::new();
        failing.insert("https://c/".to_string(), "timeout".to_string());
        NodeDirectory::new(vec!["https://a/".into(), "https://b/".into()], failing)
    }

    #[test]
    fn cli_parses_resolve_flags() {
        let cli = Cli::try_parse_from([
            "hive-nodes",
            "--api",
            "https://api.hive.blog,https://anyx.io",
            "--timeout-seconds",
            "4",
            "resolve",
            "--profile",
            "mainnet",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.api_nodes, vec!["https://api.hive.blog", "https://anyx.io"]);
        assert_eq!(cli.timeout_seconds, Some(4));
        let Commands::Resolve(cmd) = cli.command;
        assert_eq!(cmd.profile, Some(DirectoryProfile::Mainnet));
        assert!(cmd.json);
    }

    #[test]
    fn profile_conflicts_with_explicit_accounts() {
        let parsed =
            Cli::try_parse_from(["hive-nodes", "resolve", "alice", "--profile", "engine"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn account_selection_precedence() {
        let explicit = vec!["alice".to_string(), "bob".to_string()];
        assert_eq!(
            select_accounts(&explicit, None, "flowerengine").unwrap(),
            vec![name("alice"), name("bob")]
        );
        assert_eq!(
            select_accounts(&[], Some(DirectoryProfile::Mainnet), "flowerengine").unwrap(),
            vec![name("nectarflower")]
        );
        assert_eq!(
            select_accounts(&[], None, "flowerengine").unwrap(),
            vec![name("flowerengine")]
        );
        assert!(select_accounts(&["".to_string()], None, "flowerengine").is_err());
    }

    #[test]
    fn text_listing_matches_directory() {
        let results = vec![
            (name("flowerengine"), Ok(sample_directory())),
            (
                name("ghost"),
                Err(DirectoryError::AccountNotFound {
                    account: "ghost".into(),
                }),
            ),
        ];

        assert_eq!(
            render_text(&results),
            "Account: flowerengine\n\
             Available nodes:\n\
             1. https://a/\n\
             2. https://b/\n\
             Failing nodes:\n\
             - https://c/: timeout\n\
             \n\
             Account: ghost\n\
             Error (account_not_found): Account 'ghost' not found\n"
        );
    }

    #[test]
    fn text_listing_omits_empty_failing_section() {
        let results = vec![(
            name("nectarflower"),
            Ok(NodeDirectory::new(vec!["https://api.hive.blog".into()], BTreeMap::new())),
        )];
        let text = render_text(&results);
        assert!(text.contains("1. https://api.hive.blog"));
        assert!(!text.contains("Failing nodes"));
    }

    #[test]
    fn json_output_keys_by_account() {
        let results = vec![
            (name("flowerengine"), Ok(sample_directory())),
            (
                name("broken"),
                Err(DirectoryError::NodesFieldInvalid {
                    account: "broken".into(),
                }),
            ),
        ];

        let value = results_to_json(&results);
        assert_eq!(
            value["flowerengine"],
            json!({
                "nodes": ["https://a/", "https://b/"],
                "failing_nodes": {"https://c/": "timeout"}
            })
        );
        assert_eq!(value["broken"]["error"]["kind"], "nodes_field_invalid");
    }
}
