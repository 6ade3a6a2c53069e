//! Session handshake (`/api/auth`)

use crate::error::{PiholeError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, PiholeErrorMapper};
use crate::utils::log_sanitizer::mask_secret;

use super::types::{AuthRequest, AuthResponse};
use super::{PiholeClient, Session};

impl PiholeClient {
    /// Returns the current session id, authenticating first if needed.
    ///
    /// The session lock is held across the handshake so concurrent callers
    /// share a single login.
    pub(crate) async fn session_id(&self) -> Result<Option<String>> {
        let mut session = self.session.lock().await;
        if let Some(current) = session.as_ref() {
            return Ok(current.sid.clone());
        }

        let fresh = self.login().await?;
        let sid = fresh.sid.clone();
        *session = Some(fresh);
        Ok(sid)
    }

    /// Drops the cached session so the next request logs in again.
    pub(crate) async fn invalidate_session(&self) {
        *self.session.lock().await = None;
    }

    /// Performs a fresh handshake and returns the new session id.
    ///
    /// Test fixtures use this to obtain a session to hand to later clients.
    pub async fn authenticate(&self) -> Result<Option<String>> {
        let fresh = self.login().await?;
        let sid = fresh.sid.clone();
        *self.session.lock().await = Some(fresh);
        Ok(sid)
    }

    async fn login(&self) -> Result<Session> {
        let url = format!("{}/api/auth", self.base_url);
        let body = AuthRequest {
            password: self.credentials.secret(),
        };
        let request = self.http.post(&url).json(&body);

        let (status, text) =
            HttpUtils::execute_request_with_retry(request, "POST", "/api/auth", self.max_retries)
                .await?;

        if !(200..300).contains(&status) {
            return Err(self.map_error(Self::raw_error(status, &text), ErrorContext::default()));
        }

        let response: AuthResponse = HttpUtils::parse_json(&text)?;
        if !response.session.valid {
            return Err(PiholeError::InvalidCredentials {
                raw_message: response.session.message,
            });
        }

        log::debug!(
            "[pihole] Authenticated new session sid={}",
            response
                .session
                .sid
                .as_deref()
                .map_or_else(|| "<none>".to_string(), mask_secret)
        );
        Ok(Session {
            sid: response.session.sid,
        })
    }
}
