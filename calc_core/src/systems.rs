//! # Construction Systems Matrix
//!
//! Fixed comparison table of six prefabricated / modular floor systems,
//! each scored 1–5 on five criteria. Higher is always better, so the
//! `cost` score reads as affordability.
//!
//! The table is static data: lookups borrow from it and nothing mutates it.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::systems::{get_by_name, list_systems, Criterion};
//!
//! assert_eq!(list_systems().len(), 6);
//!
//! let semi = get_by_name("Semi-Precast Slabs").unwrap();
//! assert_eq!(semi.score(Criterion::Speed), 3.5);
//!
//! assert!(get_by_name("Igloo").is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Scoring criterion of the comparison matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Criterion {
    Speed,
    Cost,
    Sustainability,
    Logistics,
    Quality,
}

impl Criterion {
    /// All criteria, in radar-chart axis order
    pub const ALL: [Criterion; 5] = [
        Criterion::Speed,
        Criterion::Cost,
        Criterion::Sustainability,
        Criterion::Logistics,
        Criterion::Quality,
    ];

    /// Criteria shown in the grouped bar chart
    pub const BAR_CHART: [Criterion; 3] = [Criterion::Speed, Criterion::Cost, Criterion::Logistics];

    pub fn display_name(&self) -> &'static str {
        match self {
            Criterion::Speed => "Speed",
            Criterion::Cost => "Cost",
            Criterion::Sustainability => "Sustainability",
            Criterion::Logistics => "Logistics",
            Criterion::Quality => "Quality",
        }
    }

    /// Parse from a criterion name, ignoring case and surrounding whitespace
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_uppercase().as_str() {
            "SPEED" => Ok(Criterion::Speed),
            "COST" => Ok(Criterion::Cost),
            "SUSTAINABILITY" => Ok(Criterion::Sustainability),
            "LOGISTICS" => Ok(Criterion::Logistics),
            "QUALITY" => Ok(Criterion::Quality),
            _ => Err(CalcError::invalid_input(
                "criterion",
                s,
                "Expected one of Speed, Cost, Sustainability, Logistics, Quality",
            )),
        }
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One construction system with its normalized scores (1–5).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemProfile {
    /// Full system name, the lookup key
    pub name: &'static str,
    /// Short label for chart axes
    pub short_name: &'static str,
    pub speed: f64,
    /// Economic viability (higher = more affordable)
    pub cost: f64,
    pub sustainability: f64,
    pub logistics: f64,
    pub quality: f64,
}

impl SystemProfile {
    /// Score for a single criterion
    pub fn score(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Speed => self.speed,
            Criterion::Cost => self.cost,
            Criterion::Sustainability => self.sustainability,
            Criterion::Logistics => self.logistics,
            Criterion::Quality => self.quality,
        }
    }

    /// Unweighted mean over all five criteria
    pub fn mean_score(&self) -> f64 {
        Criterion::ALL.iter().map(|c| self.score(*c)).sum::<f64>() / Criterion::ALL.len() as f64
    }
}

const fn profile(
    name: &'static str,
    short_name: &'static str,
    scores: [f64; 5],
) -> SystemProfile {
    SystemProfile {
        name,
        short_name,
        speed: scores[0],
        cost: scores[1],
        sustainability: scores[2],
        logistics: scores[3],
        quality: scores[4],
    }
}

//                                                              Speed Cost Sust Logi Qual
static SYSTEMS: [SystemProfile; 6] = [
    profile("Fully In-Situ Slabs", "In-Situ Slab", [2.0, 5.0, 2.0, 5.0, 2.0]),
    profile("Semi-Precast Slabs", "Semi-Precast", [3.5, 4.5, 2.5, 4.0, 4.0]),
    profile("Steel Beams with Hollowcore", "Steel/Hollowcore", [4.5, 3.0, 4.0, 3.0, 3.5]),
    profile("Prefabricated Timber Panels", "Timber Panel", [4.0, 3.5, 5.0, 4.5, 4.0]),
    profile("Volumetric Concrete Box", "Concrete Box", [5.0, 2.0, 3.0, 1.5, 5.0]),
    profile("Volumetric Steel Box", "Steel Box", [5.0, 2.0, 4.0, 2.0, 5.0]),
];

/// System selected as the final recommendation
pub const RECOMMENDED_SYSTEM: &str = "Semi-Precast Slabs";

/// All six systems in their fixed display order.
pub fn list_systems() -> &'static [SystemProfile] {
    &SYSTEMS
}

/// Look up a system by its exact full name.
///
/// # Errors
///
/// `CalcError::SystemNotFound` when `name` is not one of the six systems.
pub fn get_by_name(name: &str) -> CalcResult<&'static SystemProfile> {
    SYSTEMS
        .iter()
        .find(|s| s.name == name)
        .ok_or_else(|| CalcError::system_not_found(name))
}

/// Look up a system by full or short name, ignoring case and whitespace.
pub fn find_flexible(name: &str) -> CalcResult<&'static SystemProfile> {
    let wanted = name.trim();
    SYSTEMS
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(wanted) || s.short_name.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| CalcError::system_not_found(name))
}

/// Systems ordered by descending score on one criterion.
///
/// Ties keep the matrix order.
pub fn ranked_by(criterion: Criterion) -> Vec<&'static SystemProfile> {
    let mut ranked: Vec<_> = SYSTEMS.iter().collect();
    ranked.sort_by(|a, b| b.score(criterion).total_cmp(&a.score(criterion)));
    ranked
}

/// One bar-chart group: a system's short name and its scores per criterion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreGroup {
    pub label: &'static str,
    pub scores: Vec<(Criterion, f64)>,
}

/// Series for a grouped bar chart over the given criteria.
pub fn grouped_scores(criteria: &[Criterion]) -> Vec<ScoreGroup> {
    SYSTEMS
        .iter()
        .map(|s| ScoreGroup {
            label: s.short_name,
            scores: criteria.iter().map(|c| (*c, s.score(*c))).collect(),
        })
        .collect()
}

/// Radar-chart values for one system over all five axes.
pub fn radar_series(name: &str) -> CalcResult<Vec<(Criterion, f64)>> {
    let system = get_by_name(name)?;
    Ok(Criterion::ALL.iter().map(|c| (*c, system.score(*c))).collect())
}

/// A row of the selection-logic summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionNote {
    pub system: &'static str,
    pub benefit: &'static str,
    pub trade_off: &'static str,
}

static SELECTION_NOTES: [SelectionNote; 4] = [
    SelectionNote {
        system: "Semi-Precast Slabs",
        benefit: "Balanced Speed/Cost/Risk",
        trade_off: "Limited span (6m)",
    },
    SelectionNote {
        system: "In-Situ Slab",
        benefit: "Lowest direct cost",
        trade_off: "Slowest onsite delivery",
    },
    SelectionNote {
        system: "Steel/Hollowcore",
        benefit: "High span & disassembly",
        trade_off: "High regional material cost",
    },
    SelectionNote {
        system: "Volumetric Boxes",
        benefit: "Maximum Speed & Quality",
        trade_off: "Highest logistics & cost barriers",
    },
];

/// Benefit / trade-off summary behind the recommendation.
pub fn selection_notes() -> &'static [SelectionNote] {
    &SELECTION_NOTES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_systems_in_order() {
        let names: Vec<_> = list_systems().iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "Fully In-Situ Slabs",
                "Semi-Precast Slabs",
                "Steel Beams with Hollowcore",
                "Prefabricated Timber Panels",
                "Volumetric Concrete Box",
                "Volumetric Steel Box",
            ]
        );
    }

    #[test]
    fn test_scores_within_scale() {
        for system in list_systems() {
            for criterion in Criterion::ALL {
                let score = system.score(criterion);
                assert!((1.0..=5.0).contains(&score), "{} {}", system.name, criterion);
            }
        }
    }

    #[test]
    fn test_get_by_name() {
        let timber = get_by_name("Prefabricated Timber Panels").unwrap();
        assert_eq!(timber.short_name, "Timber Panel");
        assert_eq!(timber.sustainability, 5.0);
    }

    #[test]
    fn test_get_by_name_miss() {
        let err = get_by_name("Timber Panel").unwrap_err();
        assert_eq!(err, CalcError::system_not_found("Timber Panel"));
        assert!(get_by_name("semi-precast slabs").is_err());
    }

    #[test]
    fn test_find_flexible() {
        assert_eq!(find_flexible(" steel box ").unwrap().name, "Volumetric Steel Box");
        assert_eq!(find_flexible("semi-precast slabs").unwrap().name, "Semi-Precast Slabs");
        assert!(find_flexible("Box").is_err());
    }

    #[test]
    fn test_ranked_by_speed_is_stable() {
        let ranked = ranked_by(Criterion::Speed);
        assert_eq!(ranked[0].name, "Volumetric Concrete Box");
        assert_eq!(ranked[1].name, "Volumetric Steel Box");
        assert_eq!(ranked[5].name, "Fully In-Situ Slabs");
    }

    #[test]
    fn test_grouped_scores() {
        let groups = grouped_scores(&Criterion::BAR_CHART);
        assert_eq!(groups.len(), 6);
        assert_eq!(groups[4].label, "Concrete Box");
        assert_eq!(
            groups[4].scores,
            vec![(Criterion::Speed, 5.0), (Criterion::Cost, 2.0), (Criterion::Logistics, 1.5)]
        );
    }

    #[test]
    fn test_radar_series() {
        let series = radar_series("Steel Beams with Hollowcore").unwrap();
        let values: Vec<f64> = series.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![4.5, 3.0, 4.0, 3.0, 3.5]);
    }

    #[test]
    fn test_recommendation_is_in_matrix() {
        assert!(get_by_name(RECOMMENDED_SYSTEM).is_ok());
        assert_eq!(selection_notes().len(), 4);
    }

    #[test]
    fn test_criterion_parse() {
        assert_eq!(Criterion::from_str_flexible(" logistics").unwrap(), Criterion::Logistics);
        assert!(Criterion::from_str_flexible("price").is_err());
    }

    #[test]
    fn test_mean_score() {
        let in_situ = get_by_name("Fully In-Situ Slabs").unwrap();
        assert!((in_situ.mean_score() - 3.2).abs() < 1e-12);
    }
}
