//! # Tabular Records
//!
//! Reads the column and corbel input tables exported from the global
//! analysis model, and writes schedules back out as CSV text.
//!
//! ## Column table
//!
//! `Column_ID, Shape, b_mm, h_mm, D_mm, NEd_kN, fck_MPa, cover_mm`
//!
//! `Column_ID`, `Shape`, `NEd_kN`, `fck_MPa` and `cover_mm` are required; a
//! table without one of them is rejected before any row is read. The
//! geometry columns are optional. Empty cells read as missing; cells that
//! are not numbers are flagged on their row and never reject the table.
//!
//! ## Corbel table
//!
//! `V, H, Location` (all required)
//!
//! ## Example
//!
//! ```rust
//! use calc_core::table::parse_column_sections;
//!
//! let csv = "Column_ID,Shape,D_mm,NEd_kN,fck_MPa,cover_mm\nC1,circ,400,1500,30,40\n";
//! let sections = parse_column_sections(csv).unwrap();
//! assert_eq!(sections[0].d_mm, Some(400.0));
//! assert_eq!(sections[0].b_mm, None);
//! ```

use std::borrow::Cow;

use crate::calculations::column_schedule::{ColumnScheduleRow, ColumnSection, ColumnShape};
use crate::calculations::corbel::{CorbelBatchResult, CorbelLoad};
use crate::errors::{CalcError, CalcResult};

/// Required columns of the column table
pub const COLUMN_REQUIRED: [&str; 5] = ["Column_ID", "Shape", "NEd_kN", "fck_MPa", "cover_mm"];

/// Optional geometry columns of the column table
pub const COLUMN_GEOMETRY: [&str; 3] = ["b_mm", "h_mm", "D_mm"];

/// Required columns of the corbel load table
pub const CORBEL_REQUIRED: [&str; 3] = ["V", "H", "Location"];

/// Header of the exported column schedule
pub const SCHEDULE_HEADER: [&str; 13] = [
    "Column_ID",
    "Shape",
    "b_mm",
    "h_mm",
    "D_mm",
    "NEd_kN",
    "fck_MPa",
    "cover_mm",
    "Ac_mm2",
    "n_bars",
    "bar_diam_mm",
    "As_provided_mm2",
    "Notes",
];

/// Header of the exported corbel schedule
pub const CORBEL_HEADER: [&str; 7] = ["V", "H", "Location", "Column Size", "As Anchorage", "As Stirrups", "Notes"];

/// A parsed CSV table: trimmed headers plus raw rows.
struct RawTable<'a> {
    headers: Vec<String>,
    rows: Vec<(usize, Vec<Cow<'a, str>>)>,
}

impl<'a> RawTable<'a> {
    fn parse(text: &'a str) -> CalcResult<Self> {
        let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

        let (_, header_line) = lines.next().ok_or_else(|| CalcError::missing_field("header row"))?;
        let headers = split_record(header_line)
            .into_iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let rows = lines.map(|(i, line)| (i + 1, split_record(line))).collect();
        Ok(RawTable { headers, rows })
    }

    fn index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    fn require(&self, name: &str) -> CalcResult<usize> {
        self.index(name).ok_or_else(|| CalcError::missing_field(name))
    }
}

/// Split one CSV record, honouring double-quoted fields.
fn split_record(line: &str) -> Vec<Cow<'_, str>> {
    let mut fields = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(clean_field(&line[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }
    fields.push(clean_field(&line[start..]));
    fields
}

/// Trim a field and undo quoting (`"a ""b"""` reads as `a "b"`).
fn clean_field(field: &str) -> Cow<'_, str> {
    let field = field.trim();
    match field.strip_prefix('"').and_then(|f| f.strip_suffix('"')) {
        Some(inner) if inner.contains("\"\"") => Cow::Owned(inner.replace("\"\"", "\"").trim().to_string()),
        Some(inner) => Cow::Borrowed(inner.trim()),
        None => Cow::Borrowed(field),
    }
}

fn cell<'r>(fields: &'r [Cow<'_, str>], idx: Option<usize>) -> &'r str {
    idx.and_then(|i| fields.get(i)).map(|f| &**f).unwrap_or("")
}

/// A numeric cell: empty, "nan" and "none" read as missing.
#[derive(Debug, Clone, Copy, PartialEq)]
enum NumberCell {
    Value(f64),
    Missing,
    Invalid,
}

impl NumberCell {
    fn parse(cell: &str) -> Self {
        let cell = cell.trim();
        if cell.is_empty() || cell.eq_ignore_ascii_case("nan") || cell.eq_ignore_ascii_case("none") {
            return NumberCell::Missing;
        }
        match cell.parse::<f64>() {
            Ok(v) if v.is_finite() => NumberCell::Value(v),
            _ => NumberCell::Invalid,
        }
    }

    fn value(self) -> Option<f64> {
        match self {
            NumberCell::Value(v) => Some(v),
            NumberCell::Missing | NumberCell::Invalid => None,
        }
    }
}

/// Parse the column table.
///
/// Unreadable numeric cells do not stop the table: the value is left empty
/// and the column name is recorded in [`ColumnSection::invalid_fields`].
///
/// # Errors
///
/// `CalcError::MissingField` when a required column is absent (names it).
pub fn parse_column_sections(text: &str) -> CalcResult<Vec<ColumnSection>> {
    let table = RawTable::parse(text)?;

    let id_idx = table.require("Column_ID")?;
    let shape_idx = table.require("Shape")?;
    let ned_idx = table.require("NEd_kN")?;
    let fck_idx = table.require("fck_MPa")?;
    let cover_idx = table.require("cover_mm")?;

    let b_idx = table.index("b_mm");
    let h_idx = table.index("h_mm");
    let d_idx = table.index("D_mm");

    let mut sections = Vec::with_capacity(table.rows.len());
    for (line, fields) in &table.rows {
        let mut invalid_fields = Vec::new();
        let mut number = |column: &str, idx: Option<usize>| {
            let parsed = NumberCell::parse(cell(fields, idx));
            if parsed == NumberCell::Invalid {
                tracing::warn!(line, column, value = cell(fields, idx), "unreadable number in column table");
                invalid_fields.push(column.to_string());
            }
            parsed.value()
        };

        let b_mm = number("b_mm", b_idx);
        let h_mm = number("h_mm", h_idx);
        let d_mm = number("D_mm", d_idx);
        let axial_load_kn = number("NEd_kN", Some(ned_idx));
        let fck_mpa = number("fck_MPa", Some(fck_idx));
        let cover_mm = number("cover_mm", Some(cover_idx));

        sections.push(ColumnSection {
            id: cell(fields, Some(id_idx)).to_string(),
            shape: ColumnShape::parse(cell(fields, Some(shape_idx))),
            b_mm,
            h_mm,
            d_mm,
            axial_load_kn,
            fck_mpa,
            cover_mm,
            invalid_fields,
        });
    }

    tracing::debug!(rows = sections.len(), "parsed column table");
    Ok(sections)
}

/// Parse the corbel load table (`V, H, Location`).
///
/// A force cell that is empty or not a number is kept as `None`; that row
/// fails on its own when the schedule is sized.
///
/// # Errors
///
/// `CalcError::MissingField` when a required column is absent.
pub fn parse_corbel_loads(text: &str) -> CalcResult<Vec<CorbelLoad>> {
    let table = RawTable::parse(text)?;

    let v_idx = table.require("V")?;
    let h_idx = table.require("H")?;
    let loc_idx = table.require("Location")?;

    let mut loads = Vec::with_capacity(table.rows.len());
    for (line, fields) in &table.rows {
        let force = |idx: usize| {
            let value = NumberCell::parse(cell(fields, Some(idx))).value();
            if value.is_none() {
                tracing::warn!(line, column = %table.headers[idx], "no numeric force in corbel table");
            }
            value
        };

        loads.push(CorbelLoad {
            location: cell(fields, Some(loc_idx)).to_string(),
            vertical_force_kn: force(v_idx),
            horizontal_force_kn: force(h_idx),
        });
    }

    tracing::debug!(rows = loads.len(), "parsed corbel load table");
    Ok(loads)
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn optional_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_record(out: &mut String, fields: &[String]) {
    let line: Vec<String> = fields.iter().map(|f| escape(f)).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

/// Render a column schedule as CSV (input columns plus computed fields).
pub fn schedule_to_csv(rows: &[ColumnScheduleRow]) -> String {
    let mut out = String::new();
    write_record(&mut out, &SCHEDULE_HEADER.map(String::from));
    for row in rows {
        let s = &row.section;
        write_record(
            &mut out,
            &[
                s.id.clone(),
                s.shape.code().to_string(),
                optional_cell(s.b_mm),
                optional_cell(s.h_mm),
                optional_cell(s.d_mm),
                optional_cell(s.axial_load_kn),
                optional_cell(s.fck_mpa),
                optional_cell(s.cover_mm),
                row.ac_mm2.to_string(),
                row.n_bars.to_string(),
                row.bar_diam_mm.to_string(),
                format!("{:.2}", row.as_provided_mm2),
                row.notes.clone(),
            ],
        );
    }
    out
}

/// Render a corbel schedule as CSV, areas rounded to 0.01 cm².
///
/// Rows that could not be sized keep empty area cells and carry the error
/// message in `Notes`.
pub fn corbel_results_to_csv(result: &CorbelBatchResult) -> String {
    let mut out = String::new();
    write_record(&mut out, &CORBEL_HEADER.map(String::from));
    for row in &result.rows {
        let (as1, as2, notes) = match &row.outcome {
            Ok(r) => (format!("{:.2}", r.as1_cm2), format!("{:.2}", r.as2_cm2), String::new()),
            Err(e) => (String::new(), String::new(), e.to_string()),
        };
        write_record(
            &mut out,
            &[
                optional_cell(row.load.vertical_force_kn),
                optional_cell(row.load.horizontal_force_kn),
                row.load.location.clone(),
                result.column_size_tag.clone(),
                as1,
                as2,
                notes,
            ],
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::column_schedule::generate_schedule;
    use crate::calculations::corbel::{calculate_batch, CorbelBatchInput};

    const COLUMNS: &str = "\
Column_ID, Shape ,b_mm,h_mm,D_mm,NEd_kN,fck_MPa,cover_mm
C1,RECT,300,300,,1200,30,40
C2,circ,,,,1500,35,40
C3, Round ,,,450,2000,30,45
";

    #[test]
    fn test_parse_columns() {
        let sections = parse_column_sections(COLUMNS).unwrap();
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].shape, ColumnShape::Rect);
        assert_eq!(sections[0].b_mm, Some(300.0));
        assert_eq!(sections[1].shape, ColumnShape::Circ);
        assert_eq!(sections[1].d_mm, None);
        assert_eq!(sections[2].shape, ColumnShape::Circ);
        assert_eq!(sections[2].d_mm, Some(450.0));
        assert_eq!(sections[2].cover_mm, Some(45.0));
    }

    #[test]
    fn test_missing_geometry_columns_are_synthesized() {
        let csv = "Column_ID,Shape,NEd_kN,fck_MPa,cover_mm\nC1,RECT,1200,30,40\n";
        let sections = parse_column_sections(csv).unwrap();
        assert_eq!(sections[0].b_mm, None);
        assert_eq!(sections[0].h_mm, None);
        assert_eq!(sections[0].d_mm, None);
    }

    #[test]
    fn test_missing_required_column_names_it() {
        let csv = "Column_ID,Shape,b_mm,h_mm,NEd_kN,cover_mm\nC1,RECT,300,300,1200,40\n";
        let err = parse_column_sections(csv).unwrap_err();
        assert_eq!(err, CalcError::missing_field("fck_MPa"));
    }

    #[test]
    fn test_bad_row_keeps_siblings() {
        let csv = "\
Column_ID,Shape,b_mm,h_mm,D_mm,NEd_kN,fck_MPa,cover_mm
C1,RECT,300,300,,1200,30,40
C2,RECT,300,300,,,30,40
C3,CIRC,,,400,1500,30,40
C4,RECT,300,300,,lots,30,40
";
        let sections = parse_column_sections(csv).unwrap();
        assert_eq!(sections.len(), 4);
        assert_eq!(sections[0].axial_load_kn, Some(1200.0));
        assert_eq!(sections[1].axial_load_kn, None);
        assert!(sections[1].invalid_fields.is_empty());
        assert_eq!(sections[2].d_mm, Some(400.0));
        assert_eq!(sections[3].invalid_fields, vec!["NEd_kN"]);

        let rows = generate_schedule(&sections, 12.0);
        assert_eq!(rows[0].notes, "");
        assert_eq!(rows[1].notes, "Missing NEd_kN");
        assert_eq!(rows[2].notes, "");
        assert_eq!(rows[3].notes, "Invalid NEd_kN");
        assert_eq!(rows[3].ac_mm2, 90_000.0);
    }

    #[test]
    fn test_unreadable_geometry_is_not_reported_missing() {
        let csv = "Column_ID,Shape,D_mm,NEd_kN,fck_MPa,cover_mm\nC1,CIRC,abc,900,30,40\n";
        let sections = parse_column_sections(csv).unwrap();
        assert_eq!(sections[0].d_mm, None);

        let rows = generate_schedule(&sections, 12.0);
        assert!(rows[0].ac_mm2.is_nan());
        assert_eq!(rows[0].notes, "Invalid D_mm");
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(parse_column_sections("").unwrap_err(), CalcError::missing_field("header row"));
    }

    #[test]
    fn test_parse_corbel_loads() {
        let csv = "V,H,Location\n150,120,Corbel 1\n250,65,\"Axis B, 4\"\n";
        let loads = parse_corbel_loads(csv).unwrap();
        assert_eq!(loads.len(), 2);
        assert_eq!(loads[1].location, "Axis B, 4");
        assert_eq!(loads[1].vertical_force_kn, Some(250.0));

        let err = parse_corbel_loads("V,Location\n1,x\n").unwrap_err();
        assert_eq!(err, CalcError::missing_field("H"));
    }

    #[test]
    fn test_schedule_export() {
        let sections = parse_column_sections(COLUMNS).unwrap();
        let csv = schedule_to_csv(&generate_schedule(&sections, 12.0));
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with("As_provided_mm2,Notes"));
        assert!(lines[1].starts_with("C1,RECT,300,300,,1200,30,40,90000,4,12,452.39,"));
        assert!(lines[2].contains(",NaN,6,12,"));
        assert!(lines[2].ends_with("Missing D_mm for circular column"));
    }

    #[test]
    fn test_corbel_export() {
        let result = calculate_batch(&CorbelBatchInput::default()).unwrap();
        let csv = corbel_results_to_csv(&result);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "V,H,Location,Column Size,As Anchorage,As Stirrups,Notes");
        assert_eq!(lines[3], "200,120,Corbel 3,80 x 80,57.98,28.99,");
    }

    #[test]
    fn test_bad_force_fails_only_its_row() {
        let csv = "V,H,Location\n150,120,Corbel 1\nabc,65,Corbel 2\n200,120,Corbel 3\n";
        let loads = parse_corbel_loads(csv).unwrap();
        assert_eq!(loads.len(), 3);
        assert_eq!(loads[1].vertical_force_kn, None);

        let input = CorbelBatchInput {
            loads,
            ..CorbelBatchInput::default()
        };
        let result = calculate_batch(&input).unwrap();
        assert!(result.rows[0].outcome.is_ok());
        assert!(result.rows[1].outcome.is_err());
        assert!(result.rows[2].outcome.is_ok());

        let csv = corbel_results_to_csv(&result);
        assert!(csv.lines().nth(2).unwrap().starts_with(",65,Corbel 2,80 x 80,,,"));
    }

    #[test]
    fn test_quoted_location_survives_export_and_import() {
        let input = CorbelBatchInput {
            loads: vec![CorbelLoad::new("Axis \"B\", level 2", 250.0, 85.0)],
            ..CorbelBatchInput::default()
        };
        let csv = corbel_results_to_csv(&calculate_batch(&input).unwrap());
        assert!(csv.contains("\"Axis \"\"B\"\", level 2\""));

        let loads = parse_corbel_loads(&csv).unwrap();
        assert_eq!(loads[0].location, "Axis \"B\", level 2");
        assert_eq!(loads[0].vertical_force_kn, Some(250.0));
    }

    #[test]
    fn test_split_record_quotes() {
        assert_eq!(split_record("a, \"b,c\" ,d"), vec!["a", "b,c", "d"]);
    }
}
