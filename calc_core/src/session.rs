//! # Design Session
//!
//! A `DesignSession` holds everything a user edits between calculations:
//! the column and corbel input grids, layout studies, and the bar diameter
//! settings. The shell owns it and hands it by reference to the
//! calculation functions, which stay pure.
//!
//! Sessions serialize to `.pcs` files as human-readable JSON (see
//! [`crate::file_io`]).
//!
//! ## Structure
//!
//! ```text
//! DesignSession
//! ├── meta: SessionMetadata (version, project, engineer, timestamps)
//! ├── settings: GlobalSettings (allowed / chosen bar diameters)
//! └── items: HashMap<Uuid, CalculationItem>
//! ```
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::{CalculationItem, CorbelBatchInput};
//! use calc_core::session::DesignSession;
//!
//! let mut session = DesignSession::new("VIE23 P017", "W. Engineer");
//! let id = session.add_item(CalculationItem::CorbelBatch(CorbelBatchInput::default()));
//!
//! let output = session.evaluate(&id).unwrap();
//! let json = serde_json::to_string_pretty(&output).unwrap();
//! assert!(json.contains("Corbel 3"));
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{CalculationItem, CalculationOutput};
use crate::errors::{CalcError, CalcResult};
use crate::materials::{is_standard_diameter, DEFAULT_ALLOWED_BAR_DIAMETERS_MM};

/// Current schema version for session files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root session container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignSession {
    pub meta: SessionMetadata,
    pub settings: GlobalSettings,
    /// All calculation items, keyed by UUID
    pub items: HashMap<Uuid, CalculationItem>,
}

impl DesignSession {
    /// Create a new empty session.
    ///
    /// ```rust
    /// use calc_core::session::DesignSession;
    ///
    /// let session = DesignSession::new("VIE23 P017", "Engineer 1");
    /// assert_eq!(session.meta.project_name, "VIE23 P017");
    /// assert_eq!(session.item_count(), 0);
    /// ```
    pub fn new(project_name: impl Into<String>, engineer: impl Into<String>) -> Self {
        let now = Utc::now();
        DesignSession {
            meta: SessionMetadata {
                version: SCHEMA_VERSION.to_string(),
                project_name: project_name.into(),
                engineer: engineer.into(),
                model_reference: String::new(),
                created: now,
                modified: now,
            },
            settings: GlobalSettings::default(),
            items: HashMap::new(),
        }
    }

    /// A session pre-filled with the default corbel, column and layout grids.
    pub fn with_default_items(project_name: impl Into<String>, engineer: impl Into<String>) -> Self {
        use crate::calculations::{ColumnScheduleInput, CorbelBatchInput, LayoutInput};

        let mut session = DesignSession::new(project_name, engineer);
        session.add_item(CalculationItem::CorbelBatch(CorbelBatchInput::default()));
        session.add_item(CalculationItem::ColumnSchedule(ColumnScheduleInput::default()));
        session.add_item(CalculationItem::Layout(LayoutInput::default()));
        session
    }

    /// Add a calculation item; returns its new UUID.
    pub fn add_item(&mut self, item: CalculationItem) -> Uuid {
        let id = Uuid::new_v4();
        self.items.insert(id, item);
        self.touch();
        id
    }

    /// Remove a calculation item by UUID.
    pub fn remove_item(&mut self, id: &Uuid) -> Option<CalculationItem> {
        let item = self.items.remove(id);
        if item.is_some() {
            self.touch();
        }
        item
    }

    pub fn get_item(&self, id: &Uuid) -> Option<&CalculationItem> {
        self.items.get(id)
    }

    /// Mutable access for grid edits; marks the session modified.
    pub fn get_item_mut(&mut self, id: &Uuid) -> Option<&mut CalculationItem> {
        if self.items.contains_key(id) {
            self.meta.modified = Utc::now();
            self.items.get_mut(id)
        } else {
            None
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Items sorted by label, for stable listings
    pub fn items_by_label(&self) -> Vec<(&Uuid, &CalculationItem)> {
        let mut items: Vec<_> = self.items.iter().collect();
        items.sort_by(|a, b| a.1.label().cmp(b.1.label()).then(a.0.cmp(b.0)));
        items
    }

    /// Evaluate one stored item with this session's settings.
    pub fn evaluate(&self, id: &Uuid) -> CalcResult<CalculationOutput> {
        let item = self
            .items
            .get(id)
            .ok_or_else(|| CalcError::invalid_input("item_id", id.to_string(), "No calculation with this id"))?;
        tracing::debug!(%id, kind = item.calc_type(), label = item.label(), "evaluating session item");
        item.evaluate(&self.settings)
    }
}

impl Default for DesignSession {
    fn default() -> Self {
        DesignSession::new("", "")
    }
}

/// Session metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Project name or number (e.g., "VIE23 P017")
    pub project_name: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Analysis model the loads came from (name and version)
    #[serde(default)]
    pub model_reference: String,

    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Session-wide calculation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Bar diameters the detailer may use (mm)
    pub allowed_bar_diameters_mm: Vec<f64>,

    /// Selected default diameter; the smallest allowed one when unset
    pub bar_diameter_mm: Option<f64>,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        GlobalSettings {
            allowed_bar_diameters_mm: DEFAULT_ALLOWED_BAR_DIAMETERS_MM.to_vec(),
            bar_diameter_mm: None,
        }
    }
}

impl GlobalSettings {
    /// Check that every allowed diameter is a catalogue size.
    pub fn validate(&self) -> CalcResult<()> {
        if let Some(d) = self
            .allowed_bar_diameters_mm
            .iter()
            .find(|d| !is_standard_diameter(**d))
        {
            return Err(CalcError::invalid_input(
                "allowed_bar_diameters_mm",
                d.to_string(),
                "Not a standard bar diameter",
            ));
        }
        Ok(())
    }

    /// Default bar diameter for column detailing.
    ///
    /// # Errors
    ///
    /// `CalcError::InvalidInput` when no diameter is allowed, or the selected
    /// diameter is not in the allowed set.
    pub fn chosen_bar_diameter_mm(&self) -> CalcResult<f64> {
        self.validate()?;
        let smallest = self
            .allowed_bar_diameters_mm
            .iter()
            .copied()
            .min_by(f64::total_cmp)
            .ok_or_else(|| {
                CalcError::invalid_input("allowed_bar_diameters_mm", "[]", "Select at least one bar diameter")
            })?;

        match self.bar_diameter_mm {
            None => Ok(smallest),
            Some(d) if self.allowed_bar_diameters_mm.contains(&d) => Ok(d),
            Some(d) => Err(CalcError::invalid_input(
                "bar_diameter_mm",
                d.to_string(),
                "Selected diameter is not in the allowed set",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{CorbelBatchInput, LayoutInput};

    #[test]
    fn test_session_creation() {
        let session = DesignSession::new("VIE23 P017", "Engineer 1");
        assert_eq!(session.meta.engineer, "Engineer 1");
        assert_eq!(session.meta.version, SCHEMA_VERSION);
        assert_eq!(session.settings, GlobalSettings::default());
    }

    #[test]
    fn test_session_serialization() {
        let session = DesignSession::with_default_items("P 001", "Jane Engineer");
        let json = serde_json::to_string_pretty(&session).unwrap();
        assert!(json.contains("Jane Engineer"));
        assert!(json.contains("\"CorbelBatch\""));

        let roundtrip: DesignSession = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.item_count(), 3);
    }

    #[test]
    fn test_add_remove_item() {
        let mut session = DesignSession::new("P", "E");
        let id = session.add_item(CalculationItem::Layout(LayoutInput::default()));
        assert!(session.get_item(&id).is_some());

        assert!(session.remove_item(&id).is_some());
        assert_eq!(session.item_count(), 0);
        assert!(session.remove_item(&id).is_none());
    }

    #[test]
    fn test_grid_edit_through_session() {
        let mut session = DesignSession::new("P", "E");
        let id = session.add_item(CalculationItem::CorbelBatch(CorbelBatchInput::default()));

        if let Some(CalculationItem::CorbelBatch(batch)) = session.get_item_mut(&id) {
            batch.loads.truncate(1);
        }

        match session.evaluate(&id).unwrap() {
            CalculationOutput::CorbelBatch(result) => assert_eq!(result.rows.len(), 1),
            other => panic!("unexpected output {:?}", other),
        }
    }

    #[test]
    fn test_evaluate_unknown_item() {
        let session = DesignSession::new("P", "E");
        assert!(session.evaluate(&Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_chosen_bar_diameter() {
        let mut settings = GlobalSettings::default();
        assert_eq!(settings.chosen_bar_diameter_mm().unwrap(), 12.0);

        settings.bar_diameter_mm = Some(20.0);
        assert_eq!(settings.chosen_bar_diameter_mm().unwrap(), 20.0);

        settings.bar_diameter_mm = Some(32.0);
        assert!(settings.chosen_bar_diameter_mm().is_err());

        settings.allowed_bar_diameters_mm = vec![25.0, 16.0];
        settings.bar_diameter_mm = None;
        assert_eq!(settings.chosen_bar_diameter_mm().unwrap(), 16.0);

        settings.allowed_bar_diameters_mm.clear();
        assert!(settings.chosen_bar_diameter_mm().is_err());
    }

    #[test]
    fn test_non_catalogue_diameter_rejected() {
        let settings = GlobalSettings {
            allowed_bar_diameters_mm: vec![12.0, 18.0],
            bar_diameter_mm: None,
        };
        assert!(settings.validate().is_err());
    }
}
