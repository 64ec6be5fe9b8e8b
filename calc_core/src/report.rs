//! # Corbel Calculation Record
//!
//! Collects the values a corbel calculation sheet prints (project data,
//! material grades, geometry check, reinforcement) into one serializable
//! record, and renders it as a Markdown summary.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::corbel::{CorbelCase, CorbelGeometry};
//! use calc_core::report::{CorbelReport, ReportHeader};
//!
//! let case = CorbelCase {
//!     label: "corbel 1.0".to_string(),
//!     vertical_force_kn: 250.0,
//!     horizontal_force_kn: 85.0,
//!     geometry: CorbelGeometry { corbel_depth_cm: 30.0, ..CorbelGeometry::default() },
//! };
//!
//! let header = ReportHeader::new("P 001", "Engineer 1");
//! let report = CorbelReport::build(header, &case).unwrap();
//! assert_eq!(report.check, "True");
//! assert!(report.to_markdown().contains("| As1 |"));
//! ```

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calculations::corbel::{check_geometry, size_corbel, CorbelCase, CONCRETE_GRADE, STEEL_GRADE};
use crate::errors::CalcResult;

/// Title block of a calculation sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportHeader {
    pub project_name: String,
    pub engineer_name: String,
    pub date: NaiveDate,
}

impl ReportHeader {
    /// Header dated today (UTC)
    pub fn new(project_name: impl Into<String>, engineer_name: impl Into<String>) -> Self {
        ReportHeader {
            project_name: project_name.into(),
            engineer_name: engineer_name.into(),
            date: Utc::now().date_naive(),
        }
    }
}

/// Values printed on a corbel calculation sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorbelReport {
    #[serde(flatten)]
    pub header: ReportHeader,
    pub element_name: String,
    pub concrete_grade: String,
    pub steel_grade: String,
    /// Load lever arm (cm)
    pub ac_cm: f64,
    /// Corbel height (cm)
    pub hc_cm: f64,
    /// "True" when ac / hc <= 0.5
    pub check: String,
    pub classification: String,
    pub as1_cm2: f64,
    pub as2_cm2: f64,
}

impl CorbelReport {
    /// Size the case and collect the sheet values.
    pub fn build(header: ReportHeader, case: &CorbelCase) -> CalcResult<Self> {
        let result = size_corbel(case)?;
        let check = check_geometry(&case.geometry);

        Ok(CorbelReport {
            header,
            element_name: case.label.clone(),
            concrete_grade: CONCRETE_GRADE.label().to_string(),
            steel_grade: STEEL_GRADE.label().to_string(),
            ac_cm: check.ac_cm,
            hc_cm: check.hc_cm,
            check: if check.passes { "True" } else { "False" }.to_string(),
            classification: result.classification.description().to_string(),
            as1_cm2: result.as1_cm2,
            as2_cm2: result.as2_cm2,
        })
    }

    /// Markdown summary, areas rounded to 0.01 cm².
    pub fn to_markdown(&self) -> String {
        let mut out = String::with_capacity(1024);
        out.push_str(&format!("# Corbel Calculation: {}\n\n", self.element_name));
        out.push_str(&format!(
            "Project: {}  \nEngineer: {}  \nDate: {}\n\n",
            self.header.project_name, self.header.engineer_name, self.header.date
        ));

        out.push_str("## Materials\n\n");
        out.push_str(&format!("- Concrete: {}\n- Steel: {}\n\n", self.concrete_grade, self.steel_grade));

        out.push_str("## Geometry\n\n");
        out.push_str(&format!("- ac = {} cm\n- hc = {} cm\n", self.ac_cm, self.hc_cm));
        out.push_str(&format!("- ac / hc <= 0.5: {}\n", self.check));
        out.push_str(&format!("- Type: {}\n\n", self.classification));

        out.push_str("## Reinforcement\n\n");
        out.push_str("| Bar | Area |\n|-----|------|\n");
        out.push_str(&format!("| As1 | {:.2} cm2 |\n", self.as1_cm2));
        out.push_str(&format!("| As2 | {:.2} cm2 |\n", self.as2_cm2));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::corbel::CorbelGeometry;

    fn header() -> ReportHeader {
        ReportHeader {
            project_name: "P 001".to_string(),
            engineer_name: "Engineer 1".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 2, 12).unwrap(),
        }
    }

    fn case(depth: f64) -> CorbelCase {
        CorbelCase {
            label: "corbel 1.0".to_string(),
            vertical_force_kn: 250.0,
            horizontal_force_kn: 85.0,
            geometry: CorbelGeometry {
                corbel_depth_cm: depth,
                ..CorbelGeometry::default()
            },
        }
    }

    #[test]
    fn test_report_values() {
        let report = CorbelReport::build(header(), &case(30.0)).unwrap();
        assert_eq!(report.concrete_grade, "C50/60");
        assert_eq!(report.steel_grade, "B500B");
        assert_eq!(report.ac_cm, 25.0);
        assert_eq!(report.hc_cm, 65.0);
        assert_eq!(report.check, "True");
        assert_eq!(report.as2_cm2, report.as1_cm2 * 0.5);
    }

    #[test]
    fn test_failed_check() {
        let report = CorbelReport::build(header(), &case(40.0)).unwrap();
        assert_eq!(report.check, "False");
    }

    #[test]
    fn test_markdown() {
        let md = CorbelReport::build(header(), &case(30.0)).unwrap().to_markdown();
        assert!(md.starts_with("# Corbel Calculation: corbel 1.0"));
        assert!(md.contains("Date: 2026-02-12"));
        assert!(md.contains("- Concrete: C50/60"));
        assert!(md.contains("- ac / hc <= 0.5: True"));
    }

    #[test]
    fn test_invalid_geometry_propagates() {
        let mut bad = case(30.0);
        bad.geometry.column_width_cm = 0.0;
        assert!(CorbelReport::build(header(), &bad).is_err());
    }
}
