use crate::models::ReminderRecord;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use tracing::warn;

pub fn encode_reminders(reminders: &[ReminderRecord]) -> Result<String, serde_json::Error> {
    let payload = serde_json::to_vec(reminders)?;
    Ok(URL_SAFE_NO_PAD.encode(payload))
}

/// Anything that fails to decode is an empty list.
pub fn decode_reminders(blob: &str) -> Vec<ReminderRecord> {
    let blob = blob.trim();
    if blob.is_empty() {
        return Vec::new();
    }

    let bytes = match URL_SAFE_NO_PAD.decode(blob) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("discarding reminders cookie with invalid encoding: {err}");
            return Vec::new();
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(reminders) => reminders,
        Err(err) => {
            warn!("discarding unparseable reminders cookie: {err}");
            Vec::new()
        }
    }
}
