use std::{fmt, io};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IoError: {0}")]
    IoError(#[from] io::Error),
    #[error("Couldn't render the contract: {0}")]
    FormatError(#[from] fmt::Error),
    #[error("Contract file contains no scenarios")]
    InvalidContractFormat,
    #[error("Invalid scenario heading: \"{0}\"")]
    InvalidScenarioHeading(String),
    #[error("Couldn't parse scenario number from the contract file")]
    InvalidScenarioNumber,
    #[error("Scenario {scenario}: the \"{section}\" section or its code block is missing")]
    MissingSection {
        scenario: u32,
        section: &'static str,
    },
    #[error("Scenario {scenario}: a code block is never closed")]
    UnterminatedBlock { scenario: u32 },
    #[error("Scenario {scenario}: \"{line}\" is not a `name: value` header line")]
    InvalidHeaderLine { scenario: u32, line: String },
    #[error("Scenario {scenario}: request header \"{header}\" can't be sent over http")]
    InvalidRequestHeader { scenario: u32, header: String },
    #[error("Scenario {scenario}: the status code is invalid")]
    InvalidStatusCode { scenario: u32 },
    #[error("Scenario {scenario}: {part} body is not valid json: {source}")]
    InvalidJsonBody {
        scenario: u32,
        part: &'static str,
        source: serde_json::Error,
    },
    #[error("Scenario {scenario}: header \"{header}\" has an invalid pattern: {source}")]
    InvalidHeaderPattern {
        scenario: u32,
        header: String,
        source: regex::Error,
    },
}
