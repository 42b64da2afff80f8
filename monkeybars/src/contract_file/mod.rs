//! Markdown contract scripts.
//!
//! A contract file holds one section per scenario:
//!
//! ````markdown
//! ## Scenario 1: POST /naughty (submit naughty classification)
//!
//! ### Request headers:
//!
//! ```
//! accept: application/json
//! ```
//!
//! ### Request body:
//!
//! ```
//! {"name":"Bobby"}
//! ```
//!
//! ### Expected response headers:
//!
//! ```
//! content-type: json
//! ```
//!
//! ### Expected response body (200):
//!
//! ```
//! {"name":"Bobby"}
//! ```
//! ````
//!
//! Expected header values are regular expressions. The status in the last heading is
//! optional, and an empty body block means "no body" for requests and "not checked" for
//! responses.
//!
//! All four sections are required in every scenario, and every `## ` heading has to be a
//! scenario heading. Header lines are `name: value` with exactly one space after the colon;
//! anything after it, surrounding whitespace included, is the value. Scenario names,
//! header values and patterns have to fit on one line. Backticks in json bodies are
//! written as `\u0060` so they can't close the code block.

mod error;

pub use error::Error;

use crate::Expectation;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::header::{HeaderName, HeaderValue};
use serde_json::Value;
use std::{fmt::Write as _, fs, path::Path};

const REQUEST_HEADERS: &str = "Request headers";
const REQUEST_BODY: &str = "Request body";
const RESPONSE_HEADERS: &str = "Expected response headers";
const RESPONSE_BODY: &str = "Expected response body";
const FENCE: &str = "```";

lazy_static! {
    static ref HEADING_REGEX: Regex = Regex::new(
        r"^Scenario (?P<number>[0-9]+): (?P<method>[A-Za-z]+) (?P<path>\S+)(?: \((?P<name>.*)\))?$"
    )
    .unwrap();
    static ref HEADER_REGEX: Regex =
        Regex::new(r"^(?P<header_key>[a-zA-Z0-9\-]+): (?P<header_value>.*)$").unwrap();
    static ref RESPONSE_BODY_REGEX: Regex =
        Regex::new(r"^Expected response body(?: \((?P<status_code>[^)]*)\))?:?$").unwrap();
}

#[derive(Debug)]
struct Section {
    title: String,
    fences: usize,
    lines: Vec<String>,
}

#[derive(Debug)]
struct ScenarioChunk {
    number: u32,
    method: String,
    path: String,
    name: Option<String>,
    sections: Vec<Section>,
}

impl ScenarioChunk {
    /// The code block of the first section whose title starts with `title`.
    fn block(&self, title: &'static str) -> Result<&[String], Error> {
        let section = self
            .sections
            .iter()
            .find(|section| section.title.starts_with(title))
            .ok_or(Error::MissingSection {
                scenario: self.number,
                section: title,
            })?;

        match section.fences {
            2 => Ok(&section.lines),
            1 => Err(Error::UnterminatedBlock {
                scenario: self.number,
            }),
            _ => Err(Error::MissingSection {
                scenario: self.number,
                section: title,
            }),
        }
    }

    fn title(&self, title: &'static str) -> Result<&str, Error> {
        self.sections
            .iter()
            .find(|section| section.title.starts_with(title))
            .map(|section| section.title.as_str())
            .ok_or(Error::MissingSection {
                scenario: self.number,
                section: title,
            })
    }
}

pub fn load_contract<P: AsRef<Path>>(filename: P) -> Result<Vec<Expectation>, Error> {
    let file_contents = fs::read_to_string(filename)?;
    parse_contract(&file_contents)
}

pub fn parse_contract(contents: &str) -> Result<Vec<Expectation>, Error> {
    let scenarios = split_scenarios(contents)?
        .iter()
        .map(build_expectation)
        .collect::<Result<Vec<_>, _>>()?;

    if scenarios.is_empty() {
        Err(Error::InvalidContractFormat)
    } else {
        Ok(scenarios)
    }
}

/// Cuts the file into one chunk per `## ` heading, and each chunk into its `### ` sections.
/// Headings inside code blocks are content, not structure.
fn split_scenarios(contents: &str) -> Result<Vec<ScenarioChunk>, Error> {
    let mut chunks: Vec<ScenarioChunk> = Vec::new();
    let mut in_block = false;

    for line in contents.lines() {
        let section = chunks
            .last_mut()
            .and_then(|chunk| chunk.sections.last_mut());

        if line.trim_start().starts_with(FENCE) {
            in_block = !in_block;
            if let Some(section) = section {
                section.fences += 1;
            }
        } else if in_block {
            if let Some(section) = section.filter(|section| section.fences == 1) {
                section.lines.push(line.into());
            }
        } else if let Some(heading) = line.strip_prefix("## ") {
            chunks.push(parse_heading(heading.trim())?);
        } else if let Some(title) = line.strip_prefix("### ") {
            if let Some(chunk) = chunks.last_mut() {
                chunk.sections.push(Section {
                    title: title.trim().into(),
                    fences: 0,
                    lines: Vec::new(),
                });
            }
        }
    }

    Ok(chunks)
}

fn parse_heading(heading: &str) -> Result<ScenarioChunk, Error> {
    let captures = HEADING_REGEX
        .captures(heading)
        .ok_or_else(|| Error::InvalidScenarioHeading(heading.into()))?;

    Ok(ScenarioChunk {
        number: captures["number"]
            .parse()
            .map_err(|_| Error::InvalidScenarioNumber)?,
        method: captures["method"].into(),
        path: captures["path"].into(),
        name: captures.name("name").map(|name| name.as_str().trim().into()),
        sections: Vec::new(),
    })
}

fn build_expectation(chunk: &ScenarioChunk) -> Result<Expectation, Error> {
    let scenario = chunk.number;
    let mut expectation = Expectation::new(&chunk.method, &chunk.path);

    if let Some(name) = &chunk.name {
        expectation = expectation.named(name);
    }

    for (key, value) in parse_headers(scenario, chunk.block(REQUEST_HEADERS)?)? {
        if HeaderName::from_bytes(key.to_lowercase().as_bytes()).is_err()
            || HeaderValue::from_str(&value).is_err()
        {
            return Err(Error::InvalidRequestHeader {
                scenario,
                header: key,
            });
        }
        expectation = expectation.set(key, value);
    }

    if let Some(body) = parse_body(scenario, "request", chunk.block(REQUEST_BODY)?)? {
        expectation = expectation.send(body);
    }

    for (key, value) in parse_headers(scenario, chunk.block(RESPONSE_HEADERS)?)? {
        let pattern = Regex::new(&value).map_err(|source| Error::InvalidHeaderPattern {
            scenario,
            header: key.clone(),
            source,
        })?;
        expectation = expectation.expect_header(key, pattern);
    }

    let status_code = RESPONSE_BODY_REGEX
        .captures(chunk.title(RESPONSE_BODY)?)
        .ok_or(Error::InvalidStatusCode { scenario })?
        .name("status_code")
        .map(|status_code| status_code.as_str().trim().parse::<u16>())
        .transpose()
        .map_err(|_| Error::InvalidStatusCode { scenario })?;
    if let Some(status_code) = status_code {
        expectation = expectation.expect_status(status_code);
    }

    if let Some(body) = parse_body(scenario, "response", chunk.block(RESPONSE_BODY)?)? {
        expectation = expectation.expect_body(body);
    }

    Ok(expectation)
}

fn parse_headers(scenario: u32, lines: &[String]) -> Result<Vec<(String, String)>, Error> {
    let mut headers = Vec::new();

    for line in lines.iter().filter(|line| !line.trim().is_empty()) {
        let capture = HEADER_REGEX
            .captures(line)
            .ok_or_else(|| Error::InvalidHeaderLine {
                scenario,
                line: line.clone(),
            })?;
        headers.push((
            String::from(&capture["header_key"]),
            String::from(&capture["header_value"]),
        ));
    }

    Ok(headers)
}

fn parse_body(scenario: u32, part: &'static str, lines: &[String]) -> Result<Option<Value>, Error> {
    let body_part = lines.join("\n");
    if body_part.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str(&body_part)
        .map(Some)
        .map_err(|source| Error::InvalidJsonBody {
            scenario,
            part,
            source,
        })
}

/// Backticks only ever occur inside json strings, where ``` means the same thing.
fn fenced_json(body: &Value) -> String {
    body.to_string().replace('`', "\\u0060")
}

pub fn render_contract<'a, I: IntoIterator<Item = &'a Expectation>>(
    scenarios: I,
) -> Result<String, Error> {
    let mut contents = String::new();

    for (number, expectation) in scenarios.into_iter().enumerate() {
        write_scenario(&mut contents, number + 1, expectation)?;
    }

    Ok(contents)
}

fn write_scenario(
    out: &mut String,
    number: usize,
    expectation: &Expectation,
) -> std::fmt::Result {
    write!(
        out,
        "## Scenario {}: {} {}",
        number,
        expectation.method(),
        expectation.path()
    )?;
    if let Some(name) = expectation.explicit_name() {
        write!(out, " ({})", name)?;
    }
    write!(out, "\n\n")?;

    write!(out, "### {}:\n\n{}\n", REQUEST_HEADERS, FENCE)?;
    for (key, value) in expectation.request_headers() {
        writeln!(out, "{}: {}", key, value)?;
    }
    write!(out, "{}\n\n", FENCE)?;

    write!(out, "### {}:\n\n{}\n", REQUEST_BODY, FENCE)?;
    if let Some(body) = expectation.request_body() {
        writeln!(out, "{}", fenced_json(body))?;
    }
    write!(out, "{}\n\n", FENCE)?;

    write!(out, "### {}:\n\n{}\n", RESPONSE_HEADERS, FENCE)?;
    for header in expectation.response_headers() {
        writeln!(out, "{}: {}", header.name(), header.pattern().as_str())?;
    }
    write!(out, "{}\n\n", FENCE)?;

    write!(out, "### {}", RESPONSE_BODY)?;
    if let Some(status_code) = expectation.status_code() {
        write!(out, " ({})", status_code)?;
    }
    write!(out, ":\n\n{}\n", FENCE)?;
    if let Some(body) = expectation.response_body() {
        writeln!(out, "{}", fenced_json(body))?;
    }
    write!(out, "{}\n\n", FENCE)
}

pub fn save_contract<'a, P: AsRef<Path>, I: IntoIterator<Item = &'a Expectation>>(
    contract_path: P,
    scenarios: I,
) -> Result<(), Error> {
    fs::write(contract_path, render_contract(scenarios)?)?;
    Ok(())
}
