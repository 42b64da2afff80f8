//! The naughty-or-nice contract: classify two children, then read their status back.

use crate::Expectation;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::json;

lazy_static! {
    /// Matches any json media type, including `application/json; charset=utf-8`.
    pub static ref JSON_MEDIA_TYPE: Regex = Regex::new("json").unwrap();
}

pub fn submit_naughty() -> Expectation {
    Expectation::post("/naughty")
        .named("submit naughty classification")
        .send(json!({ "name": "Bobby" }))
        .expect_status(200)
        .set("Accept", "application/json")
        .expect_header("Content-Type", JSON_MEDIA_TYPE.clone())
        .expect_body(json!({ "name": "Bobby" }))
}

pub fn submit_nice() -> Expectation {
    Expectation::post("/nice")
        .named("submit nice classification")
        .send(json!({ "name": "Timmy" }))
        .expect_status(200)
}

pub fn check_naughty() -> Expectation {
    status_check("query status, expect naughty", "Bobby", "naughty")
}

pub fn check_nice() -> Expectation {
    status_check("query status, expect nice", "Timmy", "nice")
}

fn status_check(name: &str, child: &str, status: &str) -> Expectation {
    Expectation::get("/check")
        .named(name)
        .set("Accept", "application/json")
        .expect_header("Content-Type", JSON_MEDIA_TYPE.clone())
        .expect_status(200)
        .expect_body(json!({ "name": child, "status": status }))
}

/// The full sequence. The two status checks read what the submissions wrote, so the
/// order matters.
pub fn naughty_or_nice() -> Vec<Expectation> {
    vec![submit_naughty(), submit_nice(), check_naughty(), check_nice()]
}
