use crate::days::{parse_date, DateRange};
use crate::storage::resolve_data_dir;
use chrono::NaiveDate;
use std::{env, path::PathBuf};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub range: DateRange,
    /// Enables remote backup when set.
    pub remote_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(8080);

        Self {
            port,
            data_dir: resolve_data_dir(),
            range: range_from_env(),
            remote_dir: env::var("REMOTE_DRIVE_DIR").ok().map(PathBuf::from),
        }
    }
}

fn range_from_env() -> DateRange {
    let default = DateRange::default();
    let start = env_date("ATTENDANCE_START").unwrap_or(default.start);
    let end = env_date("ATTENDANCE_END").unwrap_or(default.end);

    match DateRange::new(start, end) {
        Ok(range) => range,
        Err(err) => {
            warn!("{err} Using {} to {}", default.start, default.end);
            default
        }
    }
}

fn env_date(key: &str) -> Option<NaiveDate> {
    let value = env::var(key).ok()?;
    let parsed = parse_date(&value);
    if parsed.is_none() {
        warn!("{key}={value} is not a YYYY-MM-DD date; ignoring");
    }
    parsed
}
