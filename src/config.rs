use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Clinica";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Trailing window (days) used when no explicit start/end is supplied.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Dashboard: number of diagnoses in the "top" list.
pub const TOP_DIAGNOSES_LIMIT: usize = 10;

/// Protocol report: number of care-step procedures in the support list.
pub const TOP_CARE_STEP_PROCEDURES: usize = 8;

/// Protocol report: weekly assessments tracked per plan.
pub const PROTOCOL_WEEKS: usize = 12;

/// Protocol report: assessment index used as the reduction checkpoint.
pub const PROTOCOL_CHECKPOINT_WEEK: usize = 8;

/// Environment variable overriding the database location.
pub const DATABASE_ENV: &str = "CLINICA_DB";

/// Get the application data directory
/// ~/Clinica/ on all platforms, falling back to the working directory
/// when no home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default SQLite file used when neither `--database` nor `CLINICA_DB` is set.
pub fn default_database_path() -> PathBuf {
    app_data_dir().join("clinica.db")
}

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "clinica=info,clinica_lib=info"
}
