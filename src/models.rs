use crate::days::{date_key, day_label};
use crate::roster::Totals;
use crate::store::AttendanceStore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RangeRequest {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Deserialize)]
pub struct NameRequest {
    pub name: String,
}

/// Final value of the name field that lost focus, applied before sorting.
#[derive(Debug, Deserialize)]
pub struct CommitNameRequest {
    pub index: usize,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct DayColumn {
    pub date: String,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct StudentRow {
    pub name: String,
    pub attendance: Vec<bool>,
    pub totals: Totals,
    pub percentage_label: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub start: String,
    pub end: String,
    pub days: Vec<DayColumn>,
    pub students: Vec<StudentRow>,
    pub range_error: Option<String>,
}

impl RegisterResponse {
    pub fn snapshot(store: &AttendanceStore) -> Self {
        let day_count = store.day_count();
        let range = store.range();
        Self {
            start: date_key(range.start),
            end: date_key(range.end),
            days: store
                .days()
                .iter()
                .map(|day| DayColumn {
                    date: date_key(*day),
                    label: day_label(*day),
                })
                .collect(),
            students: store
                .roster()
                .students()
                .iter()
                .map(|student| {
                    let totals = student.totals(day_count);
                    StudentRow {
                        name: student.name.clone(),
                        attendance: student.attendance.clone(),
                        percentage_label: totals.percentage_label(),
                        totals,
                    }
                })
                .collect(),
            range_error: store.range_error().map(|err| err.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddStudentResponse {
    pub index: usize,
    pub register: RegisterResponse,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RemoteStatusResponse {
    pub enabled: bool,
    pub signed_in: bool,
}
