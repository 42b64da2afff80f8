use serde_json::Value;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum BodyDifference {
    MissingKey {
        path: String,
    },
    UnexpectedKey {
        path: String,
    },
    LengthDiffers {
        path: String,
        expected: usize,
        actual: usize,
    },
    ValueDiffers {
        path: String,
        expected: Value,
        actual: Value,
    },
}

impl BodyDifference {
    pub fn path(&self) -> &str {
        match self {
            BodyDifference::MissingKey { path }
            | BodyDifference::UnexpectedKey { path }
            | BodyDifference::LengthDiffers { path, .. }
            | BodyDifference::ValueDiffers { path, .. } => path,
        }
    }
}

impl Display for BodyDifference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BodyDifference::MissingKey { path } => write!(f, "{}: missing", path),
            BodyDifference::UnexpectedKey { path } => write!(f, "{}: unexpected key", path),
            BodyDifference::LengthDiffers {
                path,
                expected,
                actual,
            } => write!(
                f,
                "{}: expected {} elements, got {}",
                path, expected, actual
            ),
            BodyDifference::ValueDiffers {
                path,
                expected,
                actual,
            } => write!(f, "{}: expected {}, got {}", path, expected, actual),
        }
    }
}

/// Compares two JSON documents and returns every place where `actual` departs from
/// `expected`. Objects must have exactly the same key set. An empty result means the
/// documents are deep-equal.
pub fn differences(expected: &Value, actual: &Value) -> Vec<BodyDifference> {
    let mut found = Vec::new();
    collect_differences("$", expected, actual, &mut found);
    found
}

fn collect_differences(
    path: &str,
    expected: &Value,
    actual: &Value,
    found: &mut Vec<BodyDifference>,
) {
    match (expected, actual) {
        (Value::Object(expected_map), Value::Object(actual_map)) => {
            for (key, expected_value) in expected_map {
                let child_path = format!("{}.{}", path, key);
                match actual_map.get(key) {
                    Some(actual_value) => {
                        collect_differences(&child_path, expected_value, actual_value, found)
                    }
                    None => found.push(BodyDifference::MissingKey { path: child_path }),
                }
            }

            for key in actual_map.keys() {
                if !expected_map.contains_key(key) {
                    found.push(BodyDifference::UnexpectedKey {
                        path: format!("{}.{}", path, key),
                    });
                }
            }
        }
        (Value::Array(expected_items), Value::Array(actual_items)) => {
            if expected_items.len() != actual_items.len() {
                found.push(BodyDifference::LengthDiffers {
                    path: path.into(),
                    expected: expected_items.len(),
                    actual: actual_items.len(),
                });
            }

            for (index, (expected_item, actual_item)) in
                expected_items.iter().zip(actual_items).enumerate()
            {
                let child_path = format!("{}[{}]", path, index);
                collect_differences(&child_path, expected_item, actual_item, found);
            }
        }
        _ => {
            if expected != actual {
                found.push(BodyDifference::ValueDiffers {
                    path: path.into(),
                    expected: expected.clone(),
                    actual: actual.clone(),
                });
            }
        }
    }
}
