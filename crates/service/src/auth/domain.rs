use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity space a principal belongs to; carried in the token's `kind` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    User,
    Mechanic,
}

impl PrincipalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrincipalKind::User => "user",
            PrincipalKind::Mechanic => "mechanic",
        }
    }

    /// Message returned on a failed login; names the identity field.
    pub fn invalid_credentials_message(&self) -> &'static str {
        match self {
            PrincipalKind::User => "Incorrect email or password",
            PrincipalKind::Mechanic => "Incorrect login or password",
        }
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Principal id.
    pub sub: String,
    pub kind: PrincipalKind,
    pub iat: i64,
    pub exp: i64,
}

/// Bearer token handed out on login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

impl AccessToken {
    pub fn bearer(token: String) -> Self {
        Self { access_token: token, token_type: "bearer".into() }
    }
}
