//! Repository layer for the ccs tables.
//!
//! The schema belongs to the external database; nothing here creates or
//! migrates tables.

use crate::db::gateway::Gateway;
use crate::db::row::{JsonRow, SqlParam};
use crate::domain::{Credentials, ExpertSubmission, UpsertOutcome};

const SELECT_APPS: &str = "SELECT * FROM ccs_app";

const SELECT_CATEGORIES: &str = "SELECT * FROM ccs_category";

const SELECT_EXPERTS_WITH_EMAIL: &str = r#"
    SELECT e.*, a.account_email
    FROM ccs_expert e
    JOIN ccs_account a ON e.account_id = a.account_id
"#;

const SELECT_EXPERT_BY_KEY: &str = "SELECT * FROM ccs_expert WHERE account_id = ? AND app_id = ?";

const UPDATE_EXPERT_BY_KEY: &str = r#"
    UPDATE ccs_expert SET
        category_id = ?,
        label_one_s = ?, label_two_s = ?, relevant_one_s = ?,
        label_one_desc_s = ?, label_two_desc_s = ?, relevant_two_s = ?,
        label_one_c = ?, label_two_c = ?, relevant_one_c = ?,
        label_one_desc_c = ?, label_two_desc_c = ?, relevant_two_c = ?
    WHERE account_id = ? AND app_id = ?
"#;

const INSERT_EXPERT: &str = r#"
    INSERT INTO ccs_expert (
        account_id, app_id, category_id,
        label_one_s, label_two_s, relevant_one_s,
        label_one_desc_s, label_two_desc_s, relevant_two_s,
        label_one_c, label_two_c, relevant_one_c,
        label_one_desc_c, label_two_desc_c, relevant_two_c
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

const SELECT_ACCOUNT_BY_CREDENTIALS: &str =
    "SELECT * FROM ccs_account WHERE account_email = ? AND account_password = ?";

/// Repository for database operations.
pub struct Repository {
    gateway: Gateway,
}

impl Repository {
    /// Create a new repository over the given gateway.
    pub fn new(gateway: Gateway) -> Self {
        Repository { gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// All apps, in whatever order the store returns them.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_apps(&self) -> Result<Vec<JsonRow>, sqlx::Error> {
        self.gateway.fetch_all(SELECT_APPS, &[]).await
    }

    /// All categories, in whatever order the store returns them.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<JsonRow>, sqlx::Error> {
        self.gateway.fetch_all(SELECT_CATEGORIES, &[]).await
    }

    /// All experts that have an account, each with the account's email added.
    ///
    /// Inner join: experts whose `account_id` matches no account are left out.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_experts(&self) -> Result<Vec<JsonRow>, sqlx::Error> {
        self.gateway.fetch_all(SELECT_EXPERTS_WITH_EMAIL, &[]).await
    }

    /// Expert rows matching the submission's `(account_id, app_id)`.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn find_experts_by_key(
        &self,
        submission: &ExpertSubmission,
    ) -> Result<Vec<JsonRow>, sqlx::Error> {
        self.gateway
            .fetch_all(SELECT_EXPERT_BY_KEY, &submission.key_params())
            .await
    }

    /// Overwrite the detail columns of every row with the submission's key.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub async fn update_expert(&self, submission: &ExpertSubmission) -> Result<u64, sqlx::Error> {
        let params: Vec<SqlParam> = submission
            .detail_params()
            .into_iter()
            .chain(submission.key_params())
            .collect();
        self.gateway.execute(UPDATE_EXPERT_BY_KEY, &params).await
    }

    /// Insert a new expert row from the submission.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_expert(&self, submission: &ExpertSubmission) -> Result<(), sqlx::Error> {
        let params: Vec<SqlParam> = submission
            .key_params()
            .into_iter()
            .chain(submission.detail_params())
            .collect();
        self.gateway.execute(INSERT_EXPERT, &params).await?;
        Ok(())
    }

    /// Update the expert for this key if one exists, otherwise insert it.
    ///
    /// The existence check and the write are separate statements with no
    /// transaction; two concurrent calls for a new key can both insert.
    ///
    /// # Errors
    /// Returns an error if any statement fails.
    pub async fn upsert_expert(
        &self,
        submission: &ExpertSubmission,
    ) -> Result<UpsertOutcome, sqlx::Error> {
        let existing = self.find_experts_by_key(submission).await?;
        if existing.is_empty() {
            self.insert_expert(submission).await?;
            Ok(UpsertOutcome::Created)
        } else {
            let rows = self.update_expert(submission).await?;
            Ok(UpsertOutcome::Updated { rows })
        }
    }

    /// First account whose stored email and password equal the credentials.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn find_account_by_credentials(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<JsonRow>, sqlx::Error> {
        let rows = self
            .gateway
            .fetch_all(SELECT_ACCOUNT_BY_CREDENTIALS, &credentials.params())
            .await?;
        Ok(rows.into_iter().next())
    }
}
