pub mod account;
pub mod expert;

pub use account::Credentials;
pub use expert::{ExpertSubmission, UpsertOutcome, EXPERT_DETAIL_COLUMNS};
