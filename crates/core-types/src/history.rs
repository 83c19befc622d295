use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use crate::snapshot::TransmissionStatus;
use crate::SessionId;

/// Summary of one completed session as listed by `/api/history`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryEntry {
    pub date: String,
    pub total_rtt: f64,
    pub total_packets: u64,
    pub packet_loss_rate: f64,
}

/// Backend answer to a start/stop request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToggleResponse {
    #[serde(default = "unknown_status")]
    pub status: TransmissionStatus,
    #[serde(default, deserialize_with = "session_id_lenient")]
    pub session_id: Option<SessionId>,
}

fn unknown_status() -> TransmissionStatus {
    TransmissionStatus::Unknown(String::new())
}

// The backend has sent numeric ids as well as strings.
fn session_id_lenient<'de, D>(deserializer: D) -> Result<Option<SessionId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(match value {
        Some(JsonValue::String(raw)) if !raw.is_empty() => Some(SessionId(raw)),
        Some(JsonValue::Number(n)) => Some(SessionId(n.to_string())),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_response_accepts_legacy_vocabulary() {
        let resp: ToggleResponse =
            serde_json::from_str(r#"{"status": "started", "session_id": 42}"#).expect("decode");
        assert_eq!(resp.status, TransmissionStatus::Running);
        assert_eq!(resp.session_id, Some(SessionId::new("42")));

        let resp: ToggleResponse =
            serde_json::from_str(r#"{"status": "idle", "session_id": null}"#).expect("decode");
        assert_eq!(resp.status, TransmissionStatus::Idle);
        assert_eq!(resp.session_id, None);
    }

    #[test]
    fn history_entry_tolerates_missing_fields() {
        let entries: Vec<HistoryEntry> =
            serde_json::from_str(r#"[{"date": "2024-05-01", "total_rtt": 12.5}]"#).expect("decode");
        assert_eq!(entries[0].total_packets, 0);
        assert_eq!(entries[0].date, "2024-05-01");
    }
}
