//! JSON shapes exchanged with the game server.
//!
//! Every field the device reads has a default, and an explicit `null` is
//! treated like a missing field.

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::{GAME_STATE_OVER, STATUS_FINISHED};

fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One entry of `GET /api/games/in-progress`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub nickname: String,
}

/// Body of `GET /api/game?id=..`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Raw elements; see [`crate::tone::Tone::from_remote`].
    #[serde(default, deserialize_with = "null_default")]
    pub sequence: Vec<i64>,
    #[serde(default, deserialize_with = "null_default")]
    pub completed: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub game_state: String,
}

impl SessionSnapshot {
    pub fn is_game_over(&self) -> bool {
        self.game_state == GAME_STATE_OVER
    }
}

fn in_progress() -> String {
    String::from("in-progress")
}

/// Body of `GET /api/game/status?id=..`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct StatusReply {
    #[serde(default = "in_progress")]
    pub status: String,
}

/// Whether the server considers a session over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionStatus {
    Finished,
    InProgress,
}

impl From<StatusReply> for SessionStatus {
    fn from(reply: StatusReply) -> Self {
        if reply.status == STATUS_FINISHED {
            SessionStatus::Finished
        } else {
            SessionStatus::InProgress
        }
    }
}

/// One entry of `GET /api/highscores`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScoreEntry {
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub points: i64,
}

/// Body of `POST /api/game/update`.
#[derive(Debug, Serialize)]
pub(crate) struct SubmitRequest<'a> {
    pub id: &'a str,
    #[serde(rename = "espData")]
    pub esp_data: Vec<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_defaults_missing_and_null_fields() {
        let snap: SessionSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snap, SessionSnapshot::default());

        let snap: SessionSnapshot =
            serde_json::from_str(r#"{"sequence":null,"completed":null,"gameState":null}"#).unwrap();
        assert!(snap.sequence.is_empty());
        assert!(!snap.completed);
        assert!(!snap.is_game_over());
    }

    #[test]
    fn snapshot_reads_camel_case_state() {
        let snap: SessionSnapshot = serde_json::from_str(
            r#"{"sequence":[5,7,11],"completed":true,"gameState":"game_over","extra":1}"#,
        )
        .unwrap();
        assert_eq!(snap.sequence, [5, 7, 11]);
        assert!(snap.completed);
        assert!(snap.is_game_over());
    }

    #[test]
    fn session_summary_uses_mongo_id() {
        let list: Vec<SessionSummary> =
            serde_json::from_str(r#"[{"_id":"abc","nickname":"ann"},{"_id":"def"}]"#).unwrap();
        assert_eq!(list[0].id, "abc");
        assert_eq!(list[0].nickname, "ann");
        assert_eq!(list[1].nickname, "");
    }

    #[test]
    fn status_defaults_to_in_progress() {
        let reply: StatusReply = serde_json::from_str("{}").unwrap();
        assert_eq!(SessionStatus::from(reply), SessionStatus::InProgress);
        let reply: StatusReply = serde_json::from_str(r#"{"status":"finished"}"#).unwrap();
        assert_eq!(SessionStatus::from(reply), SessionStatus::Finished);
    }

    #[test]
    fn submit_body_names_esp_data() {
        let body = SubmitRequest {
            id: "abc",
            esp_data: alloc::vec![262, 440],
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"id":"abc","espData":[262,440]}"#
        );
    }
}
