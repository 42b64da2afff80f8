use crate::{contract_file, report::ContractReport};
use reqwest::header;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The checker hasn't been configured with a base url")]
    NotConfigured,
    #[error("IoError: {0}")]
    IoError(#[from] io::Error),
    #[error("reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),
    #[error("Invalid header name: {0}")]
    InvalidHeaderName(#[from] header::InvalidHeaderName),
    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] header::InvalidHeaderValue),
    #[error("Invalid http method: {0}")]
    InvalidMethod(String),
    #[error("Json error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error(transparent)]
    ContractFile(#[from] contract_file::Error),
    #[error("The contract was violated:\n{0}")]
    ContractViolated(ContractReport),
}
