use crate::{body_diff, data::RequestData, mismatch::Mismatch, ResponseData};
use regex::Regex;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

const CONTENT_TYPE: &str = "content-type";
const JSON_CONTENT_TYPE: &str = "application/json";

/// A response header whose value has to match a pattern somewhere (the pattern is not
/// anchored, so `json` matches `application/json; charset=utf-8`).
#[derive(Debug, Clone)]
pub struct HeaderExpectation {
    name: String,
    pattern: Regex,
}

impl HeaderExpectation {
    pub fn new<S: Into<String>>(name: S, pattern: Regex) -> Self {
        Self {
            name: name.into().to_lowercase(),
            pattern,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    fn verify(&self, response: &ResponseData) -> Option<Mismatch> {
        match response.header(&self.name) {
            None => Some(Mismatch::MissingHeader {
                name: self.name.clone(),
                pattern: self.pattern.as_str().into(),
            }),
            Some(value) if !self.pattern.is_match(value) => Some(Mismatch::HeaderValue {
                name: self.name.clone(),
                pattern: self.pattern.as_str().into(),
                actual: value.clone(),
            }),
            Some(_) => None,
        }
    }
}

/// One scenario: the request to send and everything the response is compared against.
///
/// Built fluently, the same way the request is described in prose:
///
/// ```
/// use monkeybars::Expectation;
/// use serde_json::json;
///
/// let expectation = Expectation::post("/nice")
///     .send(json!({ "name": "Timmy" }))
///     .expect_status(200);
///
/// assert_eq!(expectation.method(), "POST");
/// ```
#[derive(Debug, Clone)]
pub struct Expectation {
    name: Option<String>,
    method: String,
    path: String,
    request_headers: BTreeMap<String, String>,
    request_body: Option<Value>,
    status_code: Option<u16>,
    response_headers: Vec<HeaderExpectation>,
    response_body: Option<Value>,
}

impl Expectation {
    pub fn new<M: AsRef<str>, P: Into<String>>(method: M, path: P) -> Self {
        Self {
            name: None,
            method: method.as_ref().to_uppercase(),
            path: path.into(),
            request_headers: BTreeMap::new(),
            request_body: None,
            status_code: None,
            response_headers: Vec::new(),
            response_body: None,
        }
    }

    pub fn get<P: Into<String>>(path: P) -> Self {
        Self::new("GET", path)
    }

    pub fn post<P: Into<String>>(path: P) -> Self {
        Self::new("POST", path)
    }

    pub fn named<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets a request header.
    pub fn set<S1: Into<String>, S2: Into<String>>(mut self, name: S1, value: S2) -> Self {
        self.request_headers
            .insert(name.into().to_lowercase(), value.into());
        self
    }

    /// Sends `body` as the json request body.
    pub fn send(mut self, body: Value) -> Self {
        self.request_body = Some(body);
        self
    }

    pub fn expect_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn expect_header<S: Into<String>>(mut self, name: S, pattern: Regex) -> Self {
        self.response_headers
            .push(HeaderExpectation::new(name, pattern));
        self
    }

    /// The response body has to deep-equal `body`, with no extra keys.
    pub fn expect_body(mut self, body: Value) -> Self {
        self.response_body = Some(body);
        self
    }

    /// The descriptive name, or `METHOD path` when none was given.
    pub fn name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("{} {}", self.method, self.path))
    }

    pub fn explicit_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn request_headers(&self) -> &BTreeMap<String, String> {
        &self.request_headers
    }

    pub fn request_body(&self) -> Option<&Value> {
        self.request_body.as_ref()
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn response_headers(&self) -> &[HeaderExpectation] {
        &self.response_headers
    }

    pub fn response_body(&self) -> Option<&Value> {
        self.response_body.as_ref()
    }

    /// Builds the wire request. `default_headers` are applied first so that headers set on
    /// the expectation win.
    pub fn request_data<'a, I: IntoIterator<Item = (&'a String, &'a String)>>(
        &self,
        default_headers: I,
    ) -> Result<RequestData, serde_json::Error> {
        let mut headers = default_headers
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v.clone()))
            .collect::<HashMap<_, _>>();

        let body = match &self.request_body {
            Some(body) => {
                headers
                    .entry(CONTENT_TYPE.into())
                    .or_insert_with(|| JSON_CONTENT_TYPE.into());
                serde_json::to_string(body)?
            }
            None => String::new(),
        };

        headers.extend(
            self.request_headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        Ok(RequestData {
            uri: self.path.clone(),
            method: self.method.clone(),
            headers,
            body,
        })
    }

    /// Compares `response` against every expectation and returns all mismatches, in the
    /// order status, headers, body.
    pub fn verify(&self, response: &ResponseData) -> Vec<Mismatch> {
        let mut mismatches = Vec::new();

        if let Some(expected) = self.status_code {
            if expected != response.status_code {
                mismatches.push(Mismatch::Status {
                    expected,
                    actual: response.status_code,
                });
            }
        }

        mismatches.extend(
            self.response_headers
                .iter()
                .filter_map(|header| header.verify(response)),
        );

        if let Some(expected_body) = &self.response_body {
            match serde_json::from_str::<Value>(&response.body) {
                Ok(actual_body) => {
                    let differences = body_diff::differences(expected_body, &actual_body);
                    if !differences.is_empty() {
                        mismatches.push(Mismatch::Body(differences));
                    }
                }
                Err(_) => mismatches.push(Mismatch::BodyNotJson {
                    body: response.body.clone(),
                }),
            }
        }

        mismatches
    }
}
