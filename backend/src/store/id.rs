use common::model::uniform::Uniform;
use std::time::{SystemTime, UNIX_EPOCH};

/// Current Unix time in milliseconds.
pub fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Timestamp-derived id, bumped past any id already in `records`.
pub fn next_id(records: &[Uniform]) -> String {
    next_id_from(unix_millis(), records)
}

fn next_id_from(mut stamp: u128, records: &[Uniform]) -> String {
    loop {
        let candidate = stamp.to_string();
        if !records.iter().any(|r| r.id() == Some(candidate.as_str())) {
            return candidate;
        }
        stamp += 1;
    }
}
