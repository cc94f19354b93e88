//! Save/load system
//!
//! The persisted slice of engine state and JSON file helpers for hosts
//! without their own save pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Save file version for compatibility checking
pub const SAVE_VERSION: u32 = 1;

/// Everything that crosses session boundaries: the global pool counters and
/// the per-ability experience records. Registrations and snapshots are
/// rebuilt at runtime and deliberately absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub global_exp: u64,
    pub unspent_points: u64,
    pub abilities: Vec<AbilityProgressData>,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            version: SAVE_VERSION,
            global_exp: 0,
            unspent_points: 0,
            abilities: Vec::new(),
        }
    }
}

/// One persisted ability counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityProgressData {
    pub owner_id: String,
    pub ability_id: String,
    pub total_exp_spent: u64,
}

/// Save error types
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Get the save directory path
pub fn save_directory() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "wellspring", "Wellspring") {
        let mut path = proj_dirs.data_local_dir().to_path_buf();
        path.push("saves");
        path
    } else {
        // Fallback to current directory
        PathBuf::from("./saves")
    }
}

/// Get the path for a specific save slot
pub fn save_path(slot: u8) -> PathBuf {
    let mut path = save_directory();
    path.push(format!("progress_{}.json", slot));
    path
}

/// Check if a save exists in the given slot
pub fn save_exists(slot: u8) -> bool {
    save_path(slot).exists()
}

/// Write save data to a specific file
pub fn write_save_to(data: &SaveData, path: &Path) -> Result<(), SaveError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json)?;
    Ok(())
}

/// Write save data to a slot
pub fn write_save(data: &SaveData, slot: u8) -> Result<(), SaveError> {
    write_save_to(data, &save_path(slot))?;
    log::info!("Progression saved to slot {}", slot);
    Ok(())
}

/// Read save data from a specific file, rejecting mismatched versions
pub fn read_save_from(path: &Path) -> Result<SaveData, SaveError> {
    let data = fs::read_to_string(path)?;
    let save: SaveData = serde_json::from_str(&data)?;

    if save.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save.version,
        });
    }
    Ok(save)
}

/// Read save data from a slot
pub fn read_save(slot: u8) -> Result<SaveData, SaveError> {
    let save = read_save_from(&save_path(slot))?;
    log::info!("Progression loaded from slot {}", slot);
    Ok(save)
}

/// Delete a save slot
pub fn delete_save(slot: u8) -> Result<(), SaveError> {
    let path = save_path(slot);
    if path.exists() {
        fs::remove_file(&path)?;
        log::info!("Deleted save slot {}", slot);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_data_round_trips_through_json() {
        let data = SaveData {
            version: SAVE_VERSION,
            global_exp: 80,
            unspent_points: 3,
            abilities: vec![AbilityProgressData {
                owner_id: "mod".to_string(),
                ability_id: "focus".to_string(),
                total_exp_spent: 400,
            }],
        };
        let json = serde_json::to_string(&data).unwrap();
        let back: SaveData = serde_json::from_str(&json).unwrap();
        assert_eq!(back.global_exp, 80);
        assert_eq!(back.unspent_points, 3);
        assert_eq!(back.abilities.len(), 1);
        assert_eq!(back.abilities[0].total_exp_spent, 400);
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join("wellspring_save_round_trip.json");
        let data = SaveData {
            global_exp: 42,
            ..SaveData::default()
        };
        write_save_to(&data, &path).unwrap();
        let back = read_save_from(&path).unwrap();
        assert_eq!(back.global_exp, 42);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_mismatch_is_rejected() {
        let path = std::env::temp_dir().join("wellspring_save_bad_version.json");
        let mut data = SaveData::default();
        data.version = SAVE_VERSION + 1;
        write_save_to(&data, &path).unwrap();

        let result = read_save_from(&path);
        assert!(matches!(
            result,
            Err(SaveError::VersionMismatch { found, .. }) if found == SAVE_VERSION + 1
        ));
        let _ = fs::remove_file(&path);
    }
}
