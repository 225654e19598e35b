//! CSV export and import of the register.
//!
//! Export writes fields joined by bare commas with no quoting, matching the
//! files users already hold. A name containing a comma or a quote therefore
//! does not survive a round trip.

use crate::days::day_label;
use crate::errors::ImportError;
use crate::roster::{Roster, StudentRecord};
use chrono::NaiveDate;
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};

pub const NAME_LABEL: &str = "Name";
pub const PRESENT: &str = "Present";
pub const ABSENT: &str = "Absent";
pub const TOTALS_LABELS: [&str; 4] = ["Total Days", "Days Present", "Days Absent", "Percentage"];

/// How the header row is pulled out of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMode {
    /// Every row is read raw and the first one is taken as the header.
    Raw,
    /// The reader splits off the header record itself.
    Keyed,
}

pub fn encode_csv(roster: &Roster, days: &[NaiveDate]) -> Result<String, csv::Error> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let mut header = Vec::with_capacity(days.len() + 1 + TOTALS_LABELS.len());
    header.push(NAME_LABEL.to_string());
    header.extend(days.iter().map(|day| day_label(*day)));
    header.extend(TOTALS_LABELS.iter().map(|label| label.to_string()));
    writer.write_record(&header)?;

    for student in roster.students() {
        writer.write_record(&student_row(student, days.len()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn student_row(student: &StudentRecord, day_count: usize) -> Vec<String> {
    let totals = student.totals(day_count);
    let mut row = Vec::with_capacity(day_count + 1 + TOTALS_LABELS.len());
    row.push(student.name.clone());
    for index in 0..day_count {
        let present = student.attendance.get(index).copied().unwrap_or(false);
        row.push(if present { PRESENT } else { ABSENT }.to_string());
    }
    row.push(totals.total_days.to_string());
    row.push(totals.present.to_string());
    row.push(totals.absent.to_string());
    row.push(totals.percentage_label());
    row
}

pub fn decode_csv(input: &[u8], expected_day_count: usize) -> Result<Roster, ImportError> {
    decode_csv_with(input, expected_day_count, HeaderMode::Raw)
}

/// Builds a fresh roster from CSV text. Totals columns in the file are
/// ignored; only the `Present`/`Absent` cells are read.
pub fn decode_csv_with(
    input: &[u8],
    expected_day_count: usize,
    mode: HeaderMode,
) -> Result<Roster, ImportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(mode == HeaderMode::Keyed)
        .flexible(true)
        .from_reader(input);

    let mut rows = Vec::new();
    let header = match mode {
        HeaderMode::Keyed => Some(reader.headers()?.clone()),
        HeaderMode::Raw => None,
    };
    for record in reader.records() {
        let record = record?;
        if is_blank(&record) {
            continue;
        }
        rows.push(record);
    }

    let (header, rows) = match header {
        Some(header) => (header, rows),
        None if rows.is_empty() => return Err(ImportError::InvalidFormat),
        None => {
            let header = rows.remove(0);
            (header, rows)
        }
    };

    if !header_matches(&header, expected_day_count) {
        return Err(ImportError::InvalidFormat);
    }
    if rows.iter().any(|row| row.len() != header.len()) {
        return Err(ImportError::InconsistentRowLength);
    }

    let students = rows
        .iter()
        .map(|row| StudentRecord {
            name: row.get(0).unwrap_or_default().to_string(),
            attendance: (1..=expected_day_count)
                .map(|column| row.get(column) == Some(PRESENT))
                .collect(),
        })
        .collect();

    Ok(Roster::new(students))
}

/// `Name` followed by one column per day, optionally followed by the four
/// totals columns that [`encode_csv`] writes.
fn header_matches(header: &StringRecord, day_count: usize) -> bool {
    if header.get(0) != Some(NAME_LABEL) {
        return false;
    }

    let bare = day_count + 1;
    if header.len() == bare {
        return true;
    }
    header.len() == bare + TOTALS_LABELS.len()
        && header.iter().skip(bare).eq(TOTALS_LABELS.iter().copied())
}

fn is_blank(record: &StringRecord) -> bool {
    record.len() == 1 && record.get(0).is_some_and(str::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::days::derive_weekend_days;
    use proptest::prelude::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn three_days() -> Vec<NaiveDate> {
        derive_weekend_days(ymd(2024, 6, 28), ymd(2024, 6, 30))
    }

    fn sample_roster() -> Roster {
        Roster::new(vec![
            StudentRecord {
                name: "Amy".into(),
                attendance: vec![true, false, true],
            },
            StudentRecord {
                name: "Ben Ortiz".into(),
                attendance: vec![false, false, false],
            },
        ])
    }

    #[test]
    fn export_layout() {
        let text = encode_csv(&sample_roster(), &three_days()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Name,Fri Jun 28 2024,Sat Jun 29 2024,Sun Jun 30 2024,Total Days,Days Present,Days Absent,Percentage"
        );
        assert_eq!(lines[1], "Amy,Present,Absent,Present,3,2,1,66.67");
        assert_eq!(lines[2], "Ben Ortiz,Absent,Absent,Absent,3,0,3,0.00");
        assert_eq!(lines.len(), 3);
        assert!(text.ends_with('\n'));
        assert!(!text.contains('\r'));
    }

    #[test]
    fn export_is_deterministic() {
        let days = three_days();
        let roster = sample_roster();
        assert_eq!(
            encode_csv(&roster, &days).unwrap(),
            encode_csv(&roster, &days).unwrap()
        );
    }

    #[test]
    fn export_does_not_quote_names() {
        let roster = Roster::new(vec![StudentRecord {
            name: "Doe, \"J\"".into(),
            attendance: vec![true],
        }]);
        let days = vec![ymd(2024, 6, 28)];
        let text = encode_csv(&roster, &days).unwrap();
        assert_eq!(text.lines().nth(1), Some("Doe, \"J\",Present,1,1,0,100.00"));
    }

    #[test]
    fn export_without_days_reports_nan() {
        let roster = Roster::new(vec![StudentRecord {
            name: "Amy".into(),
            attendance: Vec::new(),
        }]);
        let text = encode_csv(&roster, &[]).unwrap();
        assert_eq!(text.lines().nth(1), Some("Amy,0,0,0,NaN"));
    }

    #[test]
    fn export_then_import_keeps_names_and_marks() {
        let days = three_days();
        let roster = sample_roster();
        let text = encode_csv(&roster, &days).unwrap();
        let decoded = decode_csv(text.as_bytes(), days.len()).unwrap();
        assert_eq!(decoded, roster);
    }

    fn arb_roster() -> impl Strategy<Value = (usize, Roster)> {
        (0usize..8).prop_flat_map(|day_count| {
            let student = (
                "[A-Za-zÀ-ÿ\u{4e00}-\u{4e20}][A-Za-zÀ-ÿ\u{4e00}-\u{4e20} .'-]{0,15}",
                prop::collection::vec(any::<bool>(), day_count),
            )
                .prop_map(|(name, attendance)| StudentRecord { name, attendance });
            (
                Just(day_count),
                prop::collection::vec(student, 0..6).prop_map(Roster::new),
            )
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn generated_rosters_survive_export_and_import((day_count, roster) in arb_roster()) {
            let days: Vec<NaiveDate> = derive_weekend_days(ymd(2024, 6, 28), ymd(2024, 8, 31))
                .into_iter()
                .take(day_count)
                .collect();
            prop_assert_eq!(days.len(), day_count);

            let text = encode_csv(&roster, &days).unwrap();
            let raw = decode_csv(text.as_bytes(), day_count).unwrap();
            prop_assert_eq!(&raw, &roster);

            let keyed = decode_csv_with(text.as_bytes(), day_count, HeaderMode::Keyed).unwrap();
            prop_assert_eq!(&keyed, &roster);
        }
    }

    #[test]
    fn import_accepts_bare_header() {
        let text = "Name,d1,d2\nAmy,Present,Absent\nBen,yes,Present\n";
        let roster = decode_csv(text.as_bytes(), 2).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.get(0).unwrap().attendance, vec![true, false]);
        assert_eq!(roster.get(1).unwrap().name, "Ben");
        assert_eq!(roster.get(1).unwrap().attendance, vec![false, true]);
    }

    #[test]
    fn import_ignores_totals_columns() {
        let text = "Name,d1,Total Days,Days Present,Days Absent,Percentage\nAmy,Absent,9,9,9,99.00\n";
        let roster = decode_csv(text.as_bytes(), 1).unwrap();
        assert_eq!(roster.get(0).unwrap().attendance, vec![false]);
    }

    #[test]
    fn import_rejects_missing_day_column() {
        let text = "Name,d1\nAmy,Present\n";
        assert!(matches!(
            decode_csv(text.as_bytes(), 2),
            Err(ImportError::InvalidFormat)
        ));
    }

    #[test]
    fn import_rejects_wrong_first_label() {
        let text = "Student,d1\nAmy,Present\n";
        assert!(matches!(
            decode_csv(text.as_bytes(), 1),
            Err(ImportError::InvalidFormat)
        ));
    }

    #[test]
    fn import_rejects_mislabelled_totals() {
        let text = "Name,d1,a,b,c,d\nAmy,Present,1,1,0,100\n";
        assert!(matches!(
            decode_csv(text.as_bytes(), 1),
            Err(ImportError::InvalidFormat)
        ));
    }

    #[test]
    fn import_rejects_empty_file() {
        assert!(matches!(decode_csv(b"", 0), Err(ImportError::InvalidFormat)));
    }

    #[test]
    fn import_rejects_short_row() {
        let text = "Name,d1,d2\nAmy,Present,Absent\nBen,Present\n";
        assert!(matches!(
            decode_csv(text.as_bytes(), 2),
            Err(ImportError::InconsistentRowLength)
        ));
    }

    #[test]
    fn import_reports_unreadable_bytes() {
        let input = b"Name,d1\n\xff\xfe,Present\n";
        let err = decode_csv(input, 1).unwrap_err();
        assert!(matches!(err, ImportError::Parse(_)));
        assert_eq!(err.to_string(), "Error: Unable to parse CSV.");
    }

    #[test]
    fn keyed_mode_reads_the_same_rows() {
        let days = three_days();
        let text = encode_csv(&sample_roster(), &days).unwrap();
        let raw = decode_csv_with(text.as_bytes(), days.len(), HeaderMode::Raw).unwrap();
        let keyed = decode_csv_with(text.as_bytes(), days.len(), HeaderMode::Keyed).unwrap();
        assert_eq!(raw, keyed);
    }

    #[test]
    fn keyed_mode_checks_header_shape() {
        let text = "Name,d1\nAmy,Present\n";
        assert!(matches!(
            decode_csv_with(text.as_bytes(), 3, HeaderMode::Keyed),
            Err(ImportError::InvalidFormat)
        ));
    }
}
