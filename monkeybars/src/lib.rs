mod body_diff;
mod checker;
mod checker_configuration;
pub mod contract_file;
mod data;
mod error;
mod expectation;
mod http_client;
mod mismatch;
mod report;
pub mod scenarios;
mod util;

pub use body_diff::BodyDifference;
pub use checker::ContractChecker;
pub use checker_configuration::{CheckerConfiguration, FailurePolicy};
pub use data::{RequestData, ResponseData};
pub use error::Error;
pub use expectation::{Expectation, HeaderExpectation};
pub use http_client::{HttpClient, ReqwestHttpClient};
pub use mismatch::Mismatch;
pub use report::{ContractReport, ScenarioOutcome, ScenarioStatus};
