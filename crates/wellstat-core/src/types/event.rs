use serde::{Deserialize, Serialize};

/// Width of the wellbore id field in binary status records.
pub const WELLBORE_ID_LEN: usize = 32;

/// One row of the event log.
///
/// `timestamp_millis` is `seconds * 1000 + milliseconds`. A row stored
/// without a payload decodes with an empty `auxiliary` buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub wellbore_id: String,
    pub level: String,
    pub description_code: u32,
    pub timestamp_millis: u64,
    pub auxiliary: Vec<u8>,
}

impl EventRecord {
    /// Combine a second/millisecond pair into the stored timestamp.
    pub fn timestamp_from_parts(seconds: u32, millis: u32) -> u64 {
        u64::from(seconds) * 1000 + u64::from(millis)
    }

    pub fn time_sec(&self) -> u64 {
        self.timestamp_millis / 1000
    }

    pub fn time_millis(&self) -> u32 {
        (self.timestamp_millis % 1000) as u32
    }

    pub fn auxiliary_len(&self) -> usize {
        self.auxiliary.len()
    }

    /// Wellbore id in its fixed-width transport form.
    pub fn wellbore_id_bytes(&self) -> [u8; WELLBORE_ID_LEN] {
        encode_wellbore_id(&self.wellbore_id)
    }
}

/// Encode a wellbore id into the fixed-width field, truncating long ids
/// and zero-padding short ones.
pub fn encode_wellbore_id(wellbore_id: &str) -> [u8; WELLBORE_ID_LEN] {
    let mut out = [0u8; WELLBORE_ID_LEN];
    let bytes = wellbore_id.as_bytes();
    let len = bytes.len().min(WELLBORE_ID_LEN);
    out[..len].copy_from_slice(&bytes[..len]);
    out
}

/// Decode a fixed-width wellbore id field; the id ends at the first NUL.
pub fn decode_wellbore_id(field: &[u8]) -> String {
    let end = field.iter().position(|b| *b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}
