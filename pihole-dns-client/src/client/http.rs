//! Authenticated request helpers

use reqwest::Method;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, PiholeErrorMapper};

use super::{PiholeClient, SID_HEADER};

impl PiholeClient {
    /// Sends an authenticated request and returns the body of a 2xx response.
    ///
    /// A 401 drops the cached session and retries once with a fresh login.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        context: &ErrorContext,
    ) -> Result<String> {
        let mut reauthenticated = false;

        loop {
            let sid = self.session_id().await?;
            let url = format!("{}{path}", self.base_url);

            let mut request = self.http.request(method.clone(), &url);
            if let Some(sid) = sid.as_deref() {
                request = request.header(SID_HEADER, sid);
            }

            let (status, body) = HttpUtils::execute_request_with_retry(
                request,
                method.as_str(),
                path,
                self.max_retries,
            )
            .await?;

            if status == 401 && !reauthenticated {
                log::warn!("[pihole] Session rejected on {method} {path}, re-authenticating");
                self.invalidate_session().await;
                reauthenticated = true;
                continue;
            }

            if (200..300).contains(&status) {
                return Ok(body);
            }

            let err = self.map_error(Self::raw_error(status, &body), context.clone());
            if err.is_expected() {
                log::warn!("[pihole] {method} {path} failed: {err}");
            } else {
                log::error!("[pihole] {method} {path} failed: {err}");
            }
            return Err(err);
        }
    }

    /// GET + JSON decode
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        context: &ErrorContext,
    ) -> Result<T> {
        let body = self.send(Method::GET, path, context).await?;
        HttpUtils::parse_json(&body)
    }
}
