use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::db::row::SqlParam;

/// Sign-in request body.
///
/// Both values are compared byte-for-byte against stored plaintext; there is
/// no hashing, trimming or case folding.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub account_email: JsonValue,
    pub account_password: JsonValue,
}

impl Credentials {
    pub fn params(&self) -> [SqlParam; 2] {
        [
            SqlParam::from(&self.account_email),
            SqlParam::from(&self.account_password),
        ]
    }
}
