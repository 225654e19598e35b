use icu_collator::{CaseFirst, Collator, CollatorOptions, Strength};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub name: String,
    pub attendance: Vec<bool>,
}

impl StudentRecord {
    pub fn new(day_count: usize) -> Self {
        Self {
            name: String::new(),
            attendance: vec![false; day_count],
        }
    }

    pub fn totals(&self, day_count: usize) -> Totals {
        compute_totals(&self.attendance, day_count)
    }
}

/// Students in display order. Stored as a bare JSON array of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Roster {
    students: Vec<StudentRecord>,
}

impl Roster {
    pub fn new(students: Vec<StudentRecord>) -> Self {
        Self { students }
    }

    pub fn students(&self) -> &[StudentRecord] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StudentRecord> {
        self.students.get(index)
    }

    /// Appends a blank student and returns its index. Order is left alone
    /// until the name edit is committed.
    pub fn add_student(&mut self, day_count: usize) -> usize {
        self.students.push(StudentRecord::new(day_count));
        self.students.len() - 1
    }

    pub fn set_name(&mut self, index: usize, value: impl Into<String>) {
        self.students[index].name = value.into();
    }

    /// Stable sort by name, run once a name field loses focus.
    pub fn commit_name_edit(&mut self) {
        match name_collator() {
            Ok(collator) => self
                .students
                .sort_by(|a, b| collator.compare(&a.name, &b.name)),
            Err(err) => {
                warn!("name collation unavailable, sorting case-insensitively: {err}");
                self.students.sort_by(|a, b| caseless_cmp(&a.name, &b.name));
            }
        }
    }

    /// Panics when either index is out of range.
    pub fn toggle_attendance(&mut self, student_index: usize, day_index: usize) {
        let cell = &mut self.students[student_index].attendance[day_index];
        *cell = !*cell;
    }

    pub fn delete_student(&mut self, index: usize) -> StudentRecord {
        self.students.remove(index)
    }

    /// Pads with absences or truncates so every record covers exactly
    /// `day_count` days.
    pub fn resize_attendance(&mut self, day_count: usize) -> usize {
        let mut changed = 0;
        for student in &mut self.students {
            if student.attendance.len() != day_count {
                student.attendance.resize(day_count, false);
                changed += 1;
            }
        }
        changed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    pub total_days: usize,
    pub present: usize,
    pub absent: usize,
    /// `NaN` when there are no days; serializes as `null`.
    pub percentage: f64,
}

impl Totals {
    pub fn percentage_label(&self) -> String {
        if self.percentage.is_nan() {
            "NaN".to_string()
        } else {
            format!("{:.2}", self.percentage)
        }
    }
}

pub fn compute_totals(attendance: &[bool], day_count: usize) -> Totals {
    let present = attendance.iter().filter(|day| **day).count();
    let absent = day_count as i64 - present as i64;
    let percentage = if day_count == 0 {
        f64::NAN
    } else {
        round_to_cents(present as f64 / day_count as f64 * 100.0)
    };

    Totals {
        total_days: day_count,
        present,
        absent: absent.max(0) as usize,
        percentage,
    }
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Root-locale collation: accents and case only break ties, and lowercase
/// sorts ahead of uppercase.
fn name_collator() -> Result<Collator, icu_collator::CollatorError> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Tertiary);
    options.case_first = Some(CaseFirst::LowerFirst);
    Collator::try_new(&Default::default(), options)
}

fn caseless_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(names: &[&str]) -> Roster {
        Roster::new(
            names
                .iter()
                .map(|name| StudentRecord {
                    name: name.to_string(),
                    attendance: vec![false; 2],
                })
                .collect(),
        )
    }

    fn names(roster: &Roster) -> Vec<&str> {
        roster.students().iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn add_student_appends_blank_record_without_sorting() {
        let mut roster = named(&["Zed", "Amy"]);
        let index = roster.add_student(3);
        assert_eq!(index, 2);
        assert_eq!(names(&roster), vec!["Zed", "Amy", ""]);
        assert_eq!(roster.get(2).unwrap().attendance, vec![false; 3]);
    }

    #[test]
    fn set_name_keeps_raw_value() {
        let mut roster = named(&["Amy"]);
        roster.set_name(0, "  ");
        assert_eq!(roster.get(0).unwrap().name, "  ");
    }

    #[test]
    fn commit_name_edit_sorts_stably() {
        let mut roster = Roster::new(vec![
            StudentRecord { name: "bob".into(), attendance: vec![true] },
            StudentRecord { name: "Alice".into(), attendance: vec![false] },
            StudentRecord { name: "bob".into(), attendance: vec![false] },
            StudentRecord { name: "carl".into(), attendance: vec![true] },
        ]);
        roster.commit_name_edit();
        assert_eq!(names(&roster), vec!["Alice", "bob", "bob", "carl"]);
        assert_eq!(roster.get(1).unwrap().attendance, vec![true]);
        assert_eq!(roster.get(2).unwrap().attendance, vec![false]);
    }

    #[test]
    fn locale_compare_ignores_case_first() {
        let mut roster = named(&["bea", "Adam", "", "alex", "Alex"]);
        roster.commit_name_edit();
        assert_eq!(names(&roster), vec!["", "Adam", "alex", "Alex", "bea"]);
    }

    #[test]
    fn accented_names_sort_with_their_base_letter() {
        let mut roster = named(&["Zoe", "Émile", "Dan", "Fay"]);
        roster.commit_name_edit();
        assert_eq!(names(&roster), vec!["Dan", "Émile", "Fay", "Zoe"]);

        let mut roster = named(&["Eve", "élise", "Ema", "Ève"]);
        roster.commit_name_edit();
        assert_eq!(names(&roster), vec!["élise", "Ema", "Eve", "Ève"]);
    }

    #[test]
    fn toggle_flips_single_cell() {
        let mut roster = named(&["Amy", "Ben"]);
        roster.toggle_attendance(1, 0);
        assert_eq!(roster.get(1).unwrap().attendance, vec![true, false]);
        roster.toggle_attendance(1, 0);
        assert_eq!(roster.get(1).unwrap().attendance, vec![false, false]);
        assert_eq!(roster.get(0).unwrap().attendance, vec![false, false]);
    }

    #[test]
    #[should_panic]
    fn toggle_out_of_range_day_panics() {
        let mut roster = named(&["Amy"]);
        roster.toggle_attendance(0, 2);
    }

    #[test]
    fn delete_preserves_survivor_order() {
        let mut roster = named(&["Cy", "Al", "Bo", "Di"]);
        let removed = roster.delete_student(1);
        assert_eq!(removed.name, "Al");
        assert_eq!(names(&roster), vec!["Cy", "Bo", "Di"]);
    }

    #[test]
    fn resize_pads_with_absences() {
        let mut roster = Roster::new(vec![StudentRecord {
            name: "Amy".into(),
            attendance: vec![true, true],
        }]);
        assert_eq!(roster.resize_attendance(4), 1);
        assert_eq!(roster.get(0).unwrap().attendance, vec![true, true, false, false]);
    }

    #[test]
    fn resize_truncates_extra_days() {
        let mut roster = Roster::new(vec![StudentRecord {
            name: "Amy".into(),
            attendance: vec![true, false, true],
        }]);
        assert_eq!(roster.resize_attendance(1), 1);
        assert_eq!(roster.get(0).unwrap().attendance, vec![true]);
        assert_eq!(roster.resize_attendance(1), 0);
    }

    #[test]
    fn totals_all_absent() {
        let totals = compute_totals(&[false; 4], 4);
        assert_eq!(totals.total_days, 4);
        assert_eq!(totals.present, 0);
        assert_eq!(totals.absent, 4);
        assert_eq!(totals.percentage_label(), "0.00");
    }

    #[test]
    fn totals_all_present() {
        let totals = compute_totals(&[true; 4], 4);
        assert_eq!(totals.present, 4);
        assert_eq!(totals.absent, 0);
        assert_eq!(totals.percentage, 100.0);
        assert_eq!(totals.percentage_label(), "100.00");
    }

    #[test]
    fn totals_without_days_is_nan() {
        let totals = compute_totals(&[], 0);
        assert_eq!(totals.total_days, 0);
        assert!(totals.percentage.is_nan());
        assert_eq!(totals.percentage_label(), "NaN");
    }

    #[test]
    fn totals_round_half_up() {
        let mut attendance = vec![false; 32];
        attendance[0] = true;
        assert_eq!(compute_totals(&attendance, 32).percentage_label(), "3.13");

        let mut attendance = vec![true; 15];
        attendance[0] = false;
        let totals = compute_totals(&attendance, 15);
        assert_eq!(totals.percentage_label(), "93.33");
        assert!(totals.percentage < 100.0);
    }

    #[test]
    fn roster_serializes_as_plain_array() {
        let roster = Roster::new(vec![StudentRecord {
            name: "Amy".into(),
            attendance: vec![true, false],
        }]);
        let json = serde_json::to_string(&roster).unwrap();
        assert_eq!(json, r#"[{"name":"Amy","attendance":[true,false]}]"#);
    }
}
