use crate::csv_io::{self, HeaderMode};
use crate::days::DateRange;
use crate::errors::{ImportError, RangeError};
use crate::roster::Roster;
use crate::storage::{load_roster, save_roster, KeyValueStore};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, warn};

/// The register: roster, active range and the weekend days derived from it.
///
/// Every roster change is followed by a save to the injected key-value
/// store. Attendance rows are kept exactly as long as the day sequence.
pub struct AttendanceStore {
    backend: Arc<dyn KeyValueStore>,
    roster: Roster,
    range: DateRange,
    days: Vec<NaiveDate>,
    range_error: Option<RangeError>,
}

impl AttendanceStore {
    pub async fn load(backend: Arc<dyn KeyValueStore>, range: DateRange) -> Self {
        let mut roster = load_roster(backend.as_ref()).await;
        let days = range.weekend_days();
        let resized = roster.resize_attendance(days.len());
        if resized > 0 {
            warn!(resized, days = days.len(), "stored attendance resized to current range");
        }
        info!(students = roster.len(), days = days.len(), "register loaded");

        Self {
            backend,
            roster,
            range,
            days,
            range_error: None,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Last rejected range, cleared by the next accepted one.
    pub fn range_error(&self) -> Option<RangeError> {
        self.range_error
    }

    /// Applies a new range. An inverted range is reported and leaves the
    /// current range and days untouched.
    pub async fn set_range(&mut self, start: NaiveDate, end: NaiveDate) -> Result<(), RangeError> {
        let range = match DateRange::new(start, end) {
            Ok(range) => range,
            Err(err) => {
                self.range_error = Some(err);
                return Err(err);
            }
        };

        self.range = range;
        self.range_error = None;
        self.days = range.weekend_days();
        let day_count = self.days.len();
        if self.roster.resize_attendance(day_count) > 0 {
            self.save().await;
        }
        Ok(())
    }

    /// Runs `f` against the roster and persists the result.
    pub async fn mutate<T>(&mut self, f: impl FnOnce(&mut Roster, usize) -> T) -> T {
        let day_count = self.days.len();
        let out = f(&mut self.roster, day_count);
        self.save().await;
        out
    }

    pub async fn replace_roster(&mut self, mut roster: Roster) {
        roster.resize_attendance(self.days.len());
        self.roster = roster;
        self.save().await;
    }

    pub async fn save(&self) {
        save_roster(self.backend.as_ref(), &self.roster).await;
    }

    pub fn export_csv(&self) -> Result<String, csv::Error> {
        csv_io::encode_csv(&self.roster, &self.days)
    }

    /// Replaces the roster with the file's contents. The roster is left
    /// alone when the file is rejected.
    pub async fn import_csv(&mut self, input: &[u8], mode: HeaderMode) -> Result<usize, ImportError> {
        let roster = csv_io::decode_csv_with(input, self.days.len(), mode)?;
        let count = roster.len();
        self.replace_roster(roster).await;
        Ok(count)
    }
}
