use crate::body_diff::BodyDifference;
use std::fmt::Display;

/// The one kind of failure a scenario can have: the service did not answer the way the
/// expectation says it should.
#[derive(Debug, Clone, PartialEq)]
pub enum Mismatch {
    Status {
        expected: u16,
        actual: u16,
    },
    MissingHeader {
        name: String,
        pattern: String,
    },
    HeaderValue {
        name: String,
        pattern: String,
        actual: String,
    },
    BodyNotJson {
        body: String,
    },
    Body(Vec<BodyDifference>),
    /// The request never produced a response.
    Transport(String),
}

const BODY_EXCERPT_LEN: usize = 80;

impl Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mismatch::Status { expected, actual } => {
                write!(f, "expected status {}, got {}", expected, actual)
            }
            Mismatch::MissingHeader { name, pattern } => write!(
                f,
                "expected header \"{}\" matching /{}/, but it is missing",
                name, pattern
            ),
            Mismatch::HeaderValue {
                name,
                pattern,
                actual,
            } => write!(
                f,
                "expected header \"{}\" matching /{}/, got \"{}\"",
                name, pattern, actual
            ),
            Mismatch::BodyNotJson { body } => {
                let excerpt: String = body.chars().take(BODY_EXCERPT_LEN).collect();
                write!(
                    f,
                    "expected a json body, got \"{}\"",
                    excerpt.escape_default()
                )
            }
            Mismatch::Body(differences) => {
                write!(f, "body differs:")?;
                for difference in differences {
                    write!(f, " [{}]", difference)?;
                }
                Ok(())
            }
            Mismatch::Transport(message) => write!(f, "request failed: {}", message),
        }
    }
}
