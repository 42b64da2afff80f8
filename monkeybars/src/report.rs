use crate::{error::Error, mismatch::Mismatch};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioStatus {
    Passed,
    Failed(Vec<Mismatch>),
    /// Not run because an earlier scenario failed under `FailurePolicy::FailFast`.
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioOutcome {
    /// 1-based position in the sequence.
    pub index: usize,
    pub name: String,
    pub method: String,
    pub path: String,
    pub status: ScenarioStatus,
}

impl ScenarioOutcome {
    pub fn is_passed(&self) -> bool {
        self.status == ScenarioStatus::Passed
    }

    pub fn mismatches(&self) -> &[Mismatch] {
        match &self.status {
            ScenarioStatus::Failed(mismatches) => mismatches,
            _ => &[],
        }
    }
}

impl Display for ScenarioOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.status {
            ScenarioStatus::Passed => "PASS",
            ScenarioStatus::Failed(_) => "FAIL",
            ScenarioStatus::Skipped => "SKIP",
        };

        write!(
            f,
            "[{}] {}. {} ({} {})",
            label, self.index, self.name, self.method, self.path
        )?;

        for mismatch in self.mismatches() {
            write!(f, "\n    - {}", mismatch)?;
        }

        Ok(())
    }
}

/// Outcomes of a whole run, in execution order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContractReport {
    outcomes: Vec<ScenarioOutcome>,
}

impl ContractReport {
    pub fn new(outcomes: Vec<ScenarioOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[ScenarioOutcome] {
        &self.outcomes
    }

    pub fn passed(&self) -> usize {
        self.count(|status| matches!(status, ScenarioStatus::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, ScenarioStatus::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|status| matches!(status, ScenarioStatus::Skipped))
    }

    /// True only when every scenario ran and passed.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(ScenarioOutcome::is_passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ScenarioOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome.status, ScenarioStatus::Failed(_)))
    }

    pub fn into_result(self) -> Result<Self, Error> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::ContractViolated(self))
        }
    }

    fn count<F: Fn(&ScenarioStatus) -> bool>(&self, predicate: F) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| predicate(&outcome.status))
            .count()
    }
}

impl Display for ContractReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for outcome in &self.outcomes {
            writeln!(f, "{}", outcome)?;
        }

        write!(
            f,
            "{} passed, {} failed, {} skipped",
            self.passed(),
            self.failed(),
            self.skipped()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(index: usize, status: ScenarioStatus) -> ScenarioOutcome {
        ScenarioOutcome {
            index,
            name: format!("scenario {}", index),
            method: "GET".into(),
            path: "/check".into(),
            status,
        }
    }

    #[test]
    fn summary_lists_every_outcome() {
        let report = ContractReport::new(vec![
            outcome(1, ScenarioStatus::Passed),
            outcome(
                2,
                ScenarioStatus::Failed(vec![Mismatch::Status {
                    expected: 200,
                    actual: 500,
                }]),
            ),
            outcome(3, ScenarioStatus::Skipped),
        ]);

        assert_eq!(
            report.to_string(),
            "[PASS] 1. scenario 1 (GET /check)\n\
             [FAIL] 2. scenario 2 (GET /check)\n    - expected status 200, got 500\n\
             [SKIP] 3. scenario 3 (GET /check)\n\
             1 passed, 1 failed, 1 skipped"
        );
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn skipped_scenarios_make_the_report_unsuccessful() {
        let report = ContractReport::new(vec![
            outcome(1, ScenarioStatus::Passed),
            outcome(2, ScenarioStatus::Skipped),
        ]);

        assert!(!report.is_success());
        assert!(matches!(
            report.into_result(),
            Err(Error::ContractViolated(_))
        ));
    }

    #[test]
    fn all_passed_report_converts_to_ok() {
        let report = ContractReport::new(vec![outcome(1, ScenarioStatus::Passed)]);

        assert!(report.into_result().is_ok());
    }
}
