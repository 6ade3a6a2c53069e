//! Pi-hole error mapping

use crate::error::PiholeError;
use crate::traits::{ErrorContext, PiholeErrorMapper, RawApiError};

use super::PiholeClient;
use super::types::ApiErrorResponse;

impl PiholeClient {
    /// Extracts `error.key`/`error.message` from a failed response body.
    pub(crate) fn raw_error(status: u16, body: &str) -> RawApiError {
        match serde_json::from_str::<ApiErrorResponse>(body) {
            Ok(resp) => {
                let message = match resp.error.hint {
                    Some(hint) if !hint.is_empty() => format!("{} ({hint})", resp.error.message),
                    _ => resp.error.message,
                };
                RawApiError::with_key(status, resp.error.key, message)
            }
            Err(_) if body.is_empty() => RawApiError::new(status, format!("HTTP {status}")),
            Err(_) => RawApiError::new(status, body.to_string()),
        }
    }
}

/// Pi-hole error key mapping
/// Reference: `src/api/docs/content/specs/common.yaml` in the FTL repository
impl PiholeErrorMapper for PiholeClient {
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> PiholeError {
        match (raw.key.as_deref(), raw.status) {
            (Some("unauthorized"), _) | (None, 401) => PiholeError::InvalidCredentials {
                raw_message: Some(raw.message),
            },

            (Some("forbidden"), _) | (None, 403) => PiholeError::PermissionDenied {
                raw_message: Some(raw.message),
            },

            (Some("not_found"), _) | (None, 404) => match (context.kind, context.domain) {
                (Some(kind), Some(domain)) => PiholeError::RecordNotFound {
                    kind,
                    domain,
                    raw_message: Some(raw.message),
                },
                _ => self.unknown_error(raw),
            },

            // "Item already present" on PUT of a duplicate entry
            (Some("bad_request"), _) if raw.message.contains("already present") => {
                match (context.kind, context.domain) {
                    (Some(kind), Some(domain)) => PiholeError::RecordExists {
                        kind,
                        domain,
                        raw_message: Some(raw.message),
                    },
                    _ => self.unknown_error(raw),
                }
            }

            (Some("bad_request"), _) | (None, 400) => PiholeError::InvalidParameter {
                param: context
                    .kind
                    .map_or("request", |kind| kind.config_key())
                    .to_string(),
                detail: raw.message,
            },

            _ => self.unknown_error(raw),
        }
    }
}
