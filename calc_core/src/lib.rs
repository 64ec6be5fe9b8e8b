//! # calc_core - Precast Design Calculation Engine
//!
//! `calc_core` holds the calculations behind the precast concrete design tools:
//! construction system comparison, modular stacking layouts, corbel
//! reinforcement and column minimum detailing. All inputs and outputs are
//! JSON-serializable so the same engine serves the CLI and any other shell.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize (inputs also Deserialize)
//! - **Rich Errors**: Structured error types, not just strings
//! - **Per-row failures**: Batch calculations report bad rows without aborting
//!
//! ## Quick Start
//!
//! ```rust
//! use calc_core::calculations::corbel::{size_corbel, CorbelCase, CorbelGeometry};
//!
//! let case = CorbelCase {
//!     label: "Corbel 1".to_string(),
//!     vertical_force_kn: 250.0,
//!     horizontal_force_kn: 85.0,
//!     geometry: CorbelGeometry::default(),
//! };
//! let result = size_corbel(&case).unwrap();
//! assert!((result.as1_cm2 - 56.622).abs() < 0.01);
//! ```
//!
//! ## Modules
//!
//! - [`systems`] - Construction system scores and rankings
//! - [`calculations`] - Layout, corbel and column schedule calculations
//! - [`session`] - Session container and global settings
//! - [`materials`] - Concrete and reinforcement grades, bar catalogue
//! - [`table`] - CSV input/output tables
//! - [`report`] - Corbel calculation record
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - Session files with atomic saves

pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod materials;
pub mod report;
pub mod session;
pub mod systems;
pub mod table;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_session, save_session};
pub use session::{DesignSession, GlobalSettings, SessionMetadata};
