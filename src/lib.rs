pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;

pub use config::Config;
pub use db::{Gateway, Repository};
pub use domain::{Credentials, ExpertSubmission, UpsertOutcome};
pub use error::AppError;
