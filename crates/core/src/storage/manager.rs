use crate::errors::CoreError;
use crate::models::journal::Journal;

use super::format;

/// High-level storage operations: save/load a journal to/from bytes or files.
pub struct StorageManager;

impl StorageManager {
    /// Serialize a journal to raw bytes (portable, platform-independent).
    ///
    /// Flow: Journal → bincode → TJRN format bytes
    pub fn save_to_bytes(journal: &Journal) -> Result<Vec<u8>, CoreError> {
        let payload = bincode::serialize(journal)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize journal: {e}")))?;

        Ok(format::write_file(
            format::JOURNAL_MAGIC,
            format::CURRENT_VERSION,
            &payload,
        ))
    }

    /// Deserialize a journal from raw bytes.
    ///
    /// Flow: TJRN bytes → parse header → bincode → Journal
    pub fn load_from_bytes(data: &[u8]) -> Result<Journal, CoreError> {
        let (_version, payload) = format::read_file(format::JOURNAL_MAGIC, data)?;

        let journal: Journal = bincode::deserialize(payload)
            .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize journal: {e}")))?;

        Ok(journal)
    }

    pub fn save_to_file(journal: &Journal, path: &str) -> Result<(), CoreError> {
        let bytes = Self::save_to_bytes(journal)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    pub fn load_from_file(path: &str) -> Result<Journal, CoreError> {
        let bytes = std::fs::read(path)?;
        Self::load_from_bytes(&bytes)
    }
}
