use crate::errors::CoreError;

/// Magic bytes identifying a journal file (.tjrn).
pub const JOURNAL_MAGIC: &[u8; 4] = b"TJRN";

/// Magic bytes identifying an offline cache snapshot.
pub const CACHE_MAGIC: &[u8; 4] = b"TJCS";

/// Current file format version (shared by both file kinds).
pub const CURRENT_VERSION: u16 = 1;

/// magic(4) + version(2) + payload_len(8)
pub const HEADER_SIZE: usize = 14;

/// Wrap a bincode payload in a framed file.
///
/// Layout:
/// ```text
/// [magic: 4B] [version: 2B LE] [payload_len: 8B LE] [payload: variable]
/// ```
pub fn write_file(magic: &[u8; 4], version: u16, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    buf.extend_from_slice(magic);
    buf.extend_from_slice(&version.to_le_bytes());
    buf.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    buf.extend_from_slice(payload);
    buf
}

/// Validate the header against the expected `magic` and return the version
/// and the payload slice.
pub fn read_file<'a>(magic: &[u8; 4], data: &'a [u8]) -> Result<(u16, &'a [u8]), CoreError> {
    if data.len() < HEADER_SIZE {
        return Err(CoreError::InvalidFileFormat(format!(
            "File too small: {} bytes, header needs {HEADER_SIZE}",
            data.len()
        )));
    }

    if &data[0..4] != magic {
        return Err(CoreError::InvalidFileFormat(format!(
            "Invalid magic bytes, expected {}",
            String::from_utf8_lossy(magic)
        )));
    }

    let version = u16::from_le_bytes([data[4], data[5]]);
    if version == 0 || version > CURRENT_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }

    let payload_len = u64::from_le_bytes(
        data[6..HEADER_SIZE].try_into().map_err(|_| {
            CoreError::InvalidFileFormat("Failed to read payload length".into())
        })?,
    );

    let available = (data.len() - HEADER_SIZE) as u64;
    if available < payload_len {
        return Err(CoreError::InvalidFileFormat(format!(
            "File truncated: expected {payload_len} bytes of payload, got {available}"
        )));
    }

    let end = HEADER_SIZE + payload_len as usize;
    Ok((version, &data[HEADER_SIZE..end]))
}
