//! Gerbang Lalin CLI - scripted access to the toll-gate backend.
//!
//! # Usage
//!
//! ```bash
//! # List gates, optionally filtered by gate or branch name
//! lalin-cli gates list --search kayu
//!
//! # Create / update / delete a gate
//! lalin-cli gates create --id 5 --branch-id 2 --gate-name "Kayu Agung" --branch-name "Kapal Betung"
//! lalin-cli gates update --id 5 --branch-id 2 --gate-name "Kayu Agung 2" --branch-name "Kapal Betung"
//! lalin-cli gates delete --id 5 --branch-id 2 --yes
//!
//! # Export a day's traffic as CSV, or print its aggregates
//! lalin-cli traffic export --date 2023-11-01 --output report.csv
//! lalin-cli traffic summary --date 2023-11-01
//! ```
//!
//! # Environment Variables
//!
//! - `LALIN_API_URL` - Backend base URL (default: <http://localhost:8080/api>)
//! - `LALIN_USERNAME` - Backend username
//! - `LALIN_PASSWORD` - Backend password

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use lalin_admin::config::{DEFAULT_API_URL, DEFAULT_REPORT_DATE};

mod commands;

#[derive(Parser)]
#[command(name = "lalin-cli")]
#[command(author, version, about = "Gerbang Lalin CLI tools")]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

/// How to reach and authenticate against the backend.
#[derive(Args, Debug)]
struct ConnectionArgs {
    /// Backend base URL
    #[arg(long, env = "LALIN_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    /// Backend username
    #[arg(long, env = "LALIN_USERNAME", global = true)]
    username: Option<String>,

    /// Backend password
    #[arg(long, env = "LALIN_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10, global = true)]
    timeout_secs: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage gate master data
    Gates {
        #[command(subcommand)]
        action: GatesAction,
    },
    /// Traffic reports
    Traffic {
        #[command(subcommand)]
        action: TrafficAction,
    },
}

/// Gate fields as typed; validated before anything is sent.
#[derive(Args, Debug)]
struct GateFields {
    /// Gate id (integer)
    #[arg(long)]
    id: String,

    /// Branch id (integer)
    #[arg(long)]
    branch_id: String,

    /// Gate name
    #[arg(long)]
    gate_name: String,

    /// Branch name
    #[arg(long)]
    branch_name: String,
}

#[derive(Subcommand)]
enum GatesAction {
    /// List gates
    List {
        /// Case-insensitive substring of the gate or branch name
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Create a gate
    Create(GateFields),
    /// Update the gate with the given id
    Update(GateFields),
    /// Delete a gate
    Delete {
        /// Gate id
        #[arg(long)]
        id: i32,

        /// Branch id of the gate
        #[arg(long)]
        branch_id: i32,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum TrafficAction {
    /// Export a day's traffic as CSV
    Export {
        /// Day to export (YYYY-MM-DD)
        #[arg(short, long, default_value = DEFAULT_REPORT_DATE)]
        date: NaiveDate,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the dashboard aggregates of a day
    Summary {
        /// Day to summarize (YYYY-MM-DD)
        #[arg(short, long, default_value = DEFAULT_REPORT_DATE)]
        date: NaiveDate,
    },
}

#[tokio::main]
async fn main() {
    // Load .env before clap reads env-backed arguments
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lalin_cli=info,lalin_admin=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let connection = &cli.connection;

    match cli.command {
        Commands::Gates { action } => {
            let api = commands::connect(connection).await?;
            match action {
                GatesAction::List { search } => commands::gates::list(&api, &search).await?,
                GatesAction::Create(fields) => commands::gates::create(&api, fields.into()).await?,
                GatesAction::Update(fields) => commands::gates::update(&api, fields.into()).await?,
                GatesAction::Delete { id, branch_id, yes } => {
                    commands::gates::delete(&api, id, branch_id, yes).await?;
                }
            }
        }
        Commands::Traffic { action } => {
            let api = commands::connect(connection).await?;
            match action {
                TrafficAction::Export { date, output } => {
                    commands::traffic::export(&api, date, output.as_deref()).await?;
                }
                TrafficAction::Summary { date } => commands::traffic::summary(&api, date).await?,
            }
        }
    }
    Ok(())
}

impl From<GateFields> for lalin_core::GateDraft {
    fn from(fields: GateFields) -> Self {
        Self {
            id: fields.id,
            branch_id: fields.branch_id,
            gate_name: fields.gate_name,
            branch_name: fields.branch_name,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_gate_create() {
        let cli = Cli::try_parse_from([
            "lalin-cli",
            "--api-url",
            "http://backend:8080/api",
            "gates",
            "create",
            "--id",
            "5",
            "--branch-id",
            "2",
            "--gate-name",
            "A",
            "--branch-name",
            "B",
        ])
        .unwrap();

        assert_eq!(cli.connection.api_url, "http://backend:8080/api");
        let Commands::Gates {
            action: GatesAction::Create(fields),
        } = cli.command
        else {
            panic!("expected gates create");
        };
        let draft = lalin_core::GateDraft::from(fields);
        assert_eq!(draft.validate().unwrap().id.as_i32(), 5);
    }

    #[test]
    fn test_parse_traffic_export_date() {
        let cli = Cli::try_parse_from([
            "lalin-cli",
            "traffic",
            "export",
            "--date",
            "2023-11-02",
            "--output",
            "out.csv",
        ])
        .unwrap();

        let Commands::Traffic {
            action: TrafficAction::Export { date, output },
        } = cli.command
        else {
            panic!("expected traffic export");
        };
        assert_eq!(date.to_string(), "2023-11-02");
        assert_eq!(output, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn test_rejects_malformed_date() {
        assert!(Cli::try_parse_from(["lalin-cli", "traffic", "summary", "--date", "01/11/2023"]).is_err());
    }
}
