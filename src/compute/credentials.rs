//! Bearer token loading.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::{Error, Result};

/// OAuth2 access token sent as `Authorization: Bearer`.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

#[derive(Deserialize)]
struct TokenDocument {
    access_token: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Read a token from the key file.
    ///
    /// Accepts either a JSON document with an `access_token` field, or a
    /// file whose trimmed contents are the token itself (the output of
    /// `gcloud auth print-access-token`). Service-account key documents
    /// are rejected: exchanging them for a token is not done here.
    pub fn from_key_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
            .map_err(|msg| Error::Credentials(format!("{}: {}", path.display(), msg)))
    }

    fn parse(content: &str) -> std::result::Result<Self, String> {
        let content = content.trim();
        if content.is_empty() {
            return Err("key file is empty".to_string());
        }

        if !content.starts_with('{') {
            return Ok(Self(content.to_string()));
        }

        let doc: TokenDocument =
            serde_json::from_str(content).map_err(|e| format!("invalid key document: {}", e))?;
        match (doc.access_token, doc.kind.as_deref()) {
            (Some(token), _) if !token.trim().is_empty() => Ok(Self(token.trim().to_string())),
            (_, Some("service_account")) => Err(
                "service account keys are not exchanged for tokens; supply an access token file"
                    .to_string(),
            ),
            _ => Err("key document has no access_token".to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(****)")
    }
}
