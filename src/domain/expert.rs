use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::db::row::SqlParam;

/// Request body for creating or updating an expert.
///
/// Fields are kept as raw JSON: nothing is validated, a missing field binds
/// as NULL and any scalar goes to the store untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExpertSubmission {
    pub account_id: JsonValue,
    pub app_id: JsonValue,
    pub category_id: JsonValue,
    pub label_one_s: JsonValue,
    pub label_two_s: JsonValue,
    pub relevant_one_s: JsonValue,
    pub label_one_desc_s: JsonValue,
    pub label_two_desc_s: JsonValue,
    pub relevant_two_s: JsonValue,
    pub label_one_c: JsonValue,
    pub label_two_c: JsonValue,
    pub relevant_one_c: JsonValue,
    pub label_one_desc_c: JsonValue,
    pub label_two_desc_c: JsonValue,
    pub relevant_two_c: JsonValue,
}

/// Columns written on both insert and update, in statement order.
pub const EXPERT_DETAIL_COLUMNS: [&str; 13] = [
    "category_id",
    "label_one_s",
    "label_two_s",
    "relevant_one_s",
    "label_one_desc_s",
    "label_two_desc_s",
    "relevant_two_s",
    "label_one_c",
    "label_two_c",
    "relevant_one_c",
    "label_one_desc_c",
    "label_two_desc_c",
    "relevant_two_c",
];

impl ExpertSubmission {
    /// The `(account_id, app_id)` natural key.
    pub fn key_params(&self) -> [SqlParam; 2] {
        [
            SqlParam::from(&self.account_id),
            SqlParam::from(&self.app_id),
        ]
    }

    /// Values for [`EXPERT_DETAIL_COLUMNS`], same order.
    pub fn detail_params(&self) -> [SqlParam; 13] {
        [
            &self.category_id,
            &self.label_one_s,
            &self.label_two_s,
            &self.relevant_one_s,
            &self.label_one_desc_s,
            &self.label_two_desc_s,
            &self.relevant_two_s,
            &self.label_one_c,
            &self.label_two_c,
            &self.relevant_one_c,
            &self.label_one_desc_c,
            &self.label_two_desc_c,
            &self.relevant_two_c,
        ]
        .map(SqlParam::from)
    }
}

/// Which write the create endpoint ended up performing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated { rows: u64 },
}
