//! Typed calls against the game server.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;

use super::api::{ScoreEntry, SessionSnapshot, SessionStatus, SessionSummary, StatusReply, SubmitRequest};
use super::{HttpResponse, HttpTransport};
use crate::config::{PATH_GAME, PATH_GAME_STATUS, PATH_GAME_UPDATE, PATH_HIGH_SCORES, PATH_IN_PROGRESS};
use crate::error::ErrorKind;
use crate::tone::Tone;

/// Query values keep the RFC 3986 unreserved characters as they are.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

fn check_status(response: HttpResponse) -> Result<HttpResponse, ErrorKind> {
    if response.is_ok() {
        Ok(response)
    } else {
        warn!("Server answered HTTP {}", response.status);
        Err(ErrorKind::ServerError(response.status))
    }
}

pub struct SessionClient<T> {
    transport: T,
    base_url: String,
}

impl<T: HttpTransport> SessionClient<T> {
    /// `base_url` is scheme + host (+ optional prefix), without a trailing
    /// slash; one is stripped if present.
    pub fn new(transport: T, base_url: &str) -> Self {
        Self {
            transport,
            base_url: String::from(base_url.trim_end_matches('/')),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn url_with_id(&self, path: &str, id: &str) -> String {
        format!("{}{}?id={}", self.base_url, path, utf8_percent_encode(id, QUERY_VALUE))
    }

    async fn get_json<R: DeserializeOwned>(&mut self, url: &str) -> Result<R, ErrorKind> {
        debug!("GET {}", url);
        let response = self.transport.get(url).await.map_err(|e| {
            warn!("GET failed: {:?}", e);
            ErrorKind::from(e)
        })?;
        let response = check_status(response)?;
        let decoded = serde_json::from_slice(&response.body).map_err(|_| {
            warn!("Undecodable body from {}", url);
            ErrorKind::ConnectionError
        })?;
        Ok(decoded)
    }

    /// Sessions that can be joined, in server order.
    pub async fn list_sessions(&mut self) -> Result<Vec<SessionSummary>, ErrorKind> {
        let url = self.url(PATH_IN_PROGRESS);
        self.get_json(&url).await
    }

    /// Current state of one session.
    pub async fn fetch_session(&mut self, id: &str) -> Result<SessionSnapshot, ErrorKind> {
        let url = self.url_with_id(PATH_GAME, id);
        self.get_json(&url).await
    }

    /// Send the tones the player entered. Only the status code matters.
    pub async fn submit(&mut self, id: &str, tones: &[Tone]) -> Result<(), ErrorKind> {
        let url = self.url(PATH_GAME_UPDATE);
        let body = SubmitRequest {
            id,
            esp_data: tones.iter().map(|t| t.hz()).collect(),
        };
        let body = serde_json::to_vec(&body)?;

        debug!("POST {} ({} tones)", url.as_str(), tones.len());
        let response = self.transport.post_json(&url, &body).await.map_err(|e| {
            warn!("POST failed: {:?}", e);
            ErrorKind::from(e)
        })?;
        check_status(response)?;
        Ok(())
    }

    pub async fn session_status(&mut self, id: &str) -> Result<SessionStatus, ErrorKind> {
        let url = self.url_with_id(PATH_GAME_STATUS, id);
        let reply: StatusReply = self.get_json(&url).await?;
        Ok(reply.into())
    }

    /// Leaderboard as sent by the server (already ordered).
    pub async fn high_scores(&mut self) -> Result<Vec<ScoreEntry>, ErrorKind> {
        let url = self.url(PATH_HIGH_SCORES);
        self.get_json(&url).await
    }
}
