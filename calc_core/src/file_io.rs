//! # File I/O Module
//!
//! Session files and input/output tables:
//! - **Atomic saves**: write to `.tmp`, sync, rename to prevent corruption
//! - **Version validation**: refuse sessions written by an incompatible schema
//! - **Tables**: read column / corbel CSV exports, write schedules
//!
//! ## File Format
//!
//! Sessions are saved as `.pcs` files containing JSON.
//!
//! ## Example
//!
//! ```rust,no_run
//! use calc_core::file_io::{save_session, load_session};
//! use calc_core::session::DesignSession;
//! use std::path::Path;
//!
//! let session = DesignSession::with_default_items("VIE23 P017", "Engineer");
//! let path = Path::new("tower.pcs");
//!
//! save_session(&session, path)?;
//! let loaded = load_session(path)?;
//! assert_eq!(loaded.item_count(), 3);
//! # Ok::<(), calc_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::calculations::column_schedule::ColumnSection;
use crate::calculations::corbel::CorbelLoad;
use crate::errors::{CalcError, CalcResult};
use crate::session::{DesignSession, SCHEMA_VERSION};
use crate::table;

/// Write text to `path` atomically (temp file, fsync, rename).
pub fn write_text(path: &Path, contents: &str) -> CalcResult<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    let written = File::create(tmp_path)
        .map_err(|e| ("create temp file", e))
        .and_then(|mut tmp_file| {
            tmp_file.write_all(contents.as_bytes()).map_err(|e| ("write temp file", e))?;
            tmp_file.sync_all().map_err(|e| ("sync temp file", e))
        })
        .and_then(|()| fs::rename(tmp_path, path).map_err(|e| ("rename to final", e)));

    if let Err((operation, e)) = written {
        // Never leave a partial temp file behind
        let _ = fs::remove_file(tmp_path);
        return Err(CalcError::file_error(operation, path.display().to_string(), e.to_string()));
    }

    Ok(())
}

fn read_text(path: &Path) -> CalcResult<String> {
    fs::read_to_string(path).map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))
}

/// Save a session with atomic write semantics.
pub fn save_session(session: &DesignSession, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(session)?;
    write_text(path, &json)?;
    tracing::info!(path = %path.display(), items = session.item_count(), "saved session");
    Ok(())
}

/// Load a session file.
///
/// # Returns
///
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_session(path: &Path) -> CalcResult<DesignSession> {
    let contents = read_text(path)?;

    let session: DesignSession = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    validate_version(&session.meta.version)?;
    session.settings.validate()?;

    tracing::debug!(path = %path.display(), items = session.item_count(), "loaded session");
    Ok(session)
}

/// Read a column table (CSV) from disk.
pub fn read_column_sections(path: &Path) -> CalcResult<Vec<ColumnSection>> {
    table::parse_column_sections(&read_text(path)?)
}

/// Read a corbel load table (CSV) from disk.
pub fn read_corbel_loads(path: &Path) -> CalcResult<Vec<CorbelLoad>> {
    table::parse_corbel_loads(&read_text(path)?)
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version.split('.').filter_map(|p| p.parse().ok()).collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION.split('.').filter_map(|p| p.parse().ok()).collect();

    let (Some(file_major), Some(current_major)) = (file_parts.first(), current_parts.first()) else {
        return Err(mismatch());
    };
    if file_major != current_major {
        return Err(mismatch());
    }

    // 0.x: a newer minor version may carry breaking changes
    if *current_major == 0 {
        if let (Some(file_minor), Some(current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.pcs");

        let session = DesignSession::with_default_items("VIE23 P017", "Test Engineer");
        save_session(&session, &path).unwrap();

        let loaded = load_session(&path).unwrap();
        assert_eq!(loaded.meta.engineer, "Test Engineer");
        assert_eq!(loaded.item_count(), 3);
        assert_eq!(loaded.settings, session.settings);
    }

    #[test]
    fn test_atomic_save_leaves_no_tmp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atomic.pcs");

        save_session(&DesignSession::default(), &path).unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("atomic.pcs.tmp").exists());
    }

    #[test]
    fn test_load_rejects_future_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.pcs");

        let mut session = DesignSession::default();
        session.meta.version = "0.9.0".to_string();
        save_session(&session, &path).unwrap();

        assert_eq!(load_session(&path).unwrap_err().error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pcs");
        fs::write(&path, "{ not json").unwrap();

        assert_eq!(load_session(&path).unwrap_err().error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_missing_file() {
        let err = read_column_sections(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_failed_write_removes_tmp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory at the target path makes the final rename fail
        let target = dir.path().join("schedule.csv");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();

        let err = write_text(&target, "V,H,Location\n").unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
        assert!(!dir.path().join("schedule.csv.tmp").exists());
        assert!(target.join("keep").exists());
    }

    #[test]
    fn test_read_tables() {
        let dir = tempfile::tempdir().unwrap();
        let columns = dir.path().join("columns.csv");
        let corbels = dir.path().join("corbels.csv");
        fs::write(&columns, "Column_ID,Shape,D_mm,NEd_kN,fck_MPa,cover_mm\nC1,CIRC,400,900,30,40\n").unwrap();
        fs::write(&corbels, "Location,V,H\nCorbel 1,150,120\n").unwrap();

        assert_eq!(read_column_sections(&columns).unwrap()[0].d_mm, Some(400.0));
        assert_eq!(read_corbel_loads(&corbels).unwrap()[0].horizontal_force_kn, Some(120.0));
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.5").is_ok());
        assert!(validate_version("0.0.9").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }
}
