//! Command-line surface of the `clinica` binary.
//!
//! Each invocation opens one connection, runs one report and prints it as
//! JSON on stdout. Logs go to stderr.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rusqlite::Connection;
use serde::Serialize;
use uuid::Uuid;

use crate::config;
use crate::dashboard::{get_dashboard_data, DashboardQuery};
use crate::db::{count_tables, get_current_version, open_database};
use crate::protocols::get_protocol_report;
use crate::timeline::get_patient_timeline;

#[derive(Parser, Debug)]
#[command(name = "clinica", version)]
#[command(about = "Operational and clinical reports over the clinic database")]
pub struct Cli {
    /// SQLite database file (defaults to ~/Clinica/clinica.db)
    #[arg(long, global = true, env = config::DATABASE_ENV)]
    pub database: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Appointment, encounter and revenue metrics over a date window
    Dashboard(DashboardArgs),
    /// Pain reduction per treatment protocol
    Protocols,
    /// Care plans, pain curve and care steps of one patient
    Timeline {
        /// Patient id (UUID)
        patient_id: Uuid,
    },
    /// Create or upgrade the database schema
    Migrate,
}

#[derive(Args, Debug, Default, PartialEq)]
pub struct DashboardArgs {
    /// Trailing window length in days
    #[arg(long)]
    pub days: Option<i64>,

    /// Window start (YYYY-MM-DD), used together with --end
    #[arg(long)]
    pub start: Option<String>,

    /// Window end (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub end: Option<String>,

    /// Appointment status: scheduled, completed, no_show or cancelled
    #[arg(long)]
    pub status: Option<String>,

    /// Provider id (UUID)
    #[arg(long)]
    pub provider: Option<String>,
}

impl From<DashboardArgs> for DashboardQuery {
    fn from(args: DashboardArgs) -> Self {
        DashboardQuery {
            days: args.days,
            start: args.start,
            end: args.end,
            status: args.status,
            provider: args.provider,
        }
    }
}

#[derive(Debug, Serialize)]
struct MigrationStatus {
    schema_version: i64,
    tables: i64,
}

impl Cli {
    pub fn database_path(&self) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(config::default_database_path)
    }
}

/// Runs one subcommand against an open connection and returns its JSON payload.
pub fn execute(conn: &Connection, command: Command) -> anyhow::Result<serde_json::Value> {
    let value = match command {
        Command::Dashboard(args) => {
            let data = get_dashboard_data(conn, &args.into()).context("building dashboard")?;
            serde_json::to_value(data)?
        }
        Command::Protocols => {
            let report = get_protocol_report(conn).context("building protocol report")?;
            serde_json::to_value(report)?
        }
        Command::Timeline { patient_id } => {
            let timeline = get_patient_timeline(conn, &patient_id)
                .with_context(|| format!("building timeline for patient {patient_id}"))?;
            serde_json::to_value(timeline)?
        }
        Command::Migrate => serde_json::to_value(MigrationStatus {
            schema_version: get_current_version(conn),
            tables: count_tables(conn)?,
        })?,
    };
    Ok(value)
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let path = cli.database_path();
    tracing::info!(database = %path.display(), "Opening database");

    let conn = open_database(&path)
        .with_context(|| format!("opening database {}", path.display()))?;

    let value = execute(&conn, cli.command)?;
    let out = if cli.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    println!("{out}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::*;
    use crate::models::enums::Sex;
    use crate::models::Patient;
    use chrono::NaiveDateTime;

    #[test]
    fn parses_dashboard_flags() {
        let cli = Cli::try_parse_from([
            "clinica",
            "dashboard",
            "--start",
            "2024-01-01",
            "--end",
            "2024-01-31",
            "--status",
            "completed",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Command::Dashboard(DashboardArgs {
                start: Some("2024-01-01".into()),
                end: Some("2024-01-31".into()),
                status: Some("completed".into()),
                ..Default::default()
            })
        );
        assert!(!cli.pretty);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["clinica", "protocols", "--pretty", "--database", "/tmp/x.db"])
                .unwrap();
        assert_eq!(cli.command, Command::Protocols);
        assert!(cli.pretty);
        assert_eq!(cli.database_path(), PathBuf::from("/tmp/x.db"));
    }

    #[test]
    fn timeline_requires_uuid() {
        assert!(Cli::try_parse_from(["clinica", "timeline", "not-a-uuid"]).is_err());
        assert!(Cli::try_parse_from(["clinica", "timeline"]).is_err());

        let id = Uuid::new_v4();
        let cli = Cli::try_parse_from(["clinica", "timeline", &id.to_string()]).unwrap();
        assert_eq!(cli.command, Command::Timeline { patient_id: id });
    }

    #[test]
    fn missing_subcommand_rejected() {
        assert!(Cli::try_parse_from(["clinica"]).is_err());
    }

    #[test]
    fn dashboard_args_map_to_query() {
        let query: DashboardQuery = DashboardArgs {
            days: Some(7),
            provider: Some("abc".into()),
            ..Default::default()
        }
        .into();
        assert_eq!(query.days, Some(7));
        assert_eq!(query.provider.as_deref(), Some("abc"));
        assert!(query.start.is_none());
    }

    #[test]
    fn execute_migrate_reports_schema() {
        let conn = open_memory_database().unwrap();
        let value = execute(&conn, Command::Migrate).unwrap();
        assert_eq!(value["schema_version"], 1);
        assert_eq!(value["tables"], 14);
    }

    #[test]
    fn execute_dashboard_on_empty_store() {
        let conn = open_memory_database().unwrap();
        let value = execute(&conn, Command::Dashboard(DashboardArgs::default())).unwrap();
        assert_eq!(value["total"], 0);
        assert_eq!(value["completion_rate"], 0.0);
        assert!(value["daily"].as_array().unwrap().is_empty());
    }

    #[test]
    fn execute_timeline_unknown_patient_fails() {
        let conn = open_memory_database().unwrap();
        let err = execute(&conn, Command::Timeline { patient_id: Uuid::new_v4() }).unwrap_err();
        assert!(err.to_string().contains("building timeline"));
        assert!(err.root_cause().to_string().contains("not found"));
    }

    #[test]
    fn execute_timeline_known_patient() {
        let conn = open_memory_database().unwrap();
        let id = Uuid::new_v4();
        insert_patient(&conn, &Patient {
            id,
            full_name: "Ana Lima".into(),
            sex: Sex::Female,
            birth_date: None,
            created_at: NaiveDateTime::parse_from_str("2024-01-01 08:00:00", DATETIME_FORMAT)
                .unwrap(),
        })
        .unwrap();

        let value = execute(&conn, Command::Timeline { patient_id: id }).unwrap();
        assert_eq!(value["patient"]["full_name"], "Ana Lima");
        assert!(value["plans"].as_array().unwrap().is_empty());
    }

    #[test]
    fn run_creates_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("clinic.db");
        let cli = Cli {
            database: Some(path.clone()),
            pretty: false,
            command: Command::Migrate,
        };
        run(cli).unwrap();
        assert!(path.exists());
    }
}
