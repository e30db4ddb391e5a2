use crate::union::json_union;
use serde::{Deserialize, Serialize};

/// OAuth tokens for a provider. `expires` is epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuth {
    pub refresh: String,
    pub access: String,
    pub expires: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiAuth {
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellKnownAuth {
    pub key: String,
    pub token: String,
}

json_union! {
    /// Provider credentials.
    pub struct Auth;
    pub enum AuthType;
    tag = "type";
    variants {
        OAuth("oauth") => as_oauth: OAuth,
        Api("api") => as_api: ApiAuth,
        WellKnown("wellknown") => as_well_known: WellKnownAuth,
    }
}

impl Auth {
    /// An API-key credential.
    pub fn api_key(key: impl Into<String>) -> Result<Self, serde_json::Error> {
        Self::from_variant(&ApiAuth { key: key.into() })
    }
}
