//! Merchant session record.
//!
//! # Purpose
//! Defines the session row created at install/auth time by the platform
//! framework and consumed here for scope reporting and shop-redact deletion.
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque session identifier assigned by the platform at auth time.
    pub id: String,
    /// Shop domain the session belongs to, e.g. `test.myshopify.com`.
    pub shop: String,
    /// Admin API access token minted for this session.
    pub access_token: String,
    /// Comma-joined granted scope string, absent until the first grant.
    pub scope: Option<String>,
    /// Expiry as Unix seconds; offline sessions carry no expiry.
    pub expires_at: Option<i64>,
}

impl Session {
    /// Short non-sensitive preview of the access token for display.
    pub fn token_preview(&self) -> String {
        let head: String = self.access_token.chars().take(10).collect();
        if head.is_empty() {
            "Not available".to_string()
        } else {
            format!("{head}...")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(token: &str) -> Session {
        Session {
            id: "sess-1".to_string(),
            shop: "test.myshopify.com".to_string(),
            access_token: token.to_string(),
            scope: None,
            expires_at: None,
        }
    }

    #[test]
    fn token_preview_truncates_long_tokens() {
        assert_eq!(session("shpat_abcdef012345").token_preview(), "shpat_abcd...");
    }

    #[test]
    fn token_preview_handles_missing_token() {
        assert_eq!(session("").token_preview(), "Not available");
    }
}
