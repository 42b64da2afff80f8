use crate::{
    checker_configuration::{CheckerConfiguration, FailurePolicy},
    error::Error,
    http_client::HttpClient,
    report::{ContractReport, ScenarioOutcome, ScenarioStatus},
    util, Expectation, Mismatch, RequestData,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Sends each scenario's request to the service and verifies the response.
#[derive(Debug)]
pub struct ContractChecker {
    configuration: CheckerConfiguration,
    http_client: Arc<dyn HttpClient + Send + Sync>,
}

impl ContractChecker {
    pub fn new(configuration: CheckerConfiguration) -> Self {
        let http_client = configuration.http_client();

        Self {
            configuration,
            http_client,
        }
    }

    pub fn configuration(&self) -> &CheckerConfiguration {
        &self.configuration
    }

    /// Runs a single scenario. Mismatches end up in the outcome; only setup problems are
    /// returned as errors.
    pub async fn check(&self, expectation: &Expectation) -> Result<ScenarioOutcome, Error> {
        let request_data = self.prepare(expectation)?;
        self.check_at(1, expectation, &request_data).await
    }

    /// Runs `scenarios` strictly one after another: a request is only sent once the
    /// previous response has been verified, since later scenarios may read state the
    /// earlier ones wrote.
    ///
    /// Every request is built and validated before the first one goes out, so a bad
    /// scenario fails the run without touching the service.
    pub async fn run<'a, I: IntoIterator<Item = &'a Expectation>>(
        &self,
        scenarios: I,
    ) -> Result<ContractReport, Error> {
        let prepared = scenarios
            .into_iter()
            .map(|expectation| Ok((expectation, self.prepare(expectation)?)))
            .collect::<Result<Vec<_>, Error>>()?;

        let mut outcomes = Vec::new();
        let mut halted = false;

        for (position, (expectation, request_data)) in prepared.iter().enumerate() {
            let index = position + 1;

            if halted {
                outcomes.push(Self::outcome(index, expectation, ScenarioStatus::Skipped));
                continue;
            }

            let outcome = self.check_at(index, expectation, request_data).await?;
            if !outcome.is_passed() && self.configuration.failure_policy() == FailurePolicy::FailFast
            {
                warn!(scenario = index, "failing fast, remaining scenarios are skipped");
                halted = true;
            }

            outcomes.push(outcome);
        }

        let report = ContractReport::new(outcomes);
        info!(
            passed = report.passed(),
            failed = report.failed(),
            skipped = report.skipped(),
            "contract run finished"
        );

        Ok(report)
    }

    fn prepare(&self, expectation: &Expectation) -> Result<RequestData, Error> {
        let request_data = expectation.request_data(self.configuration.default_headers())?;
        util::validate_request(&request_data)?;
        Ok(request_data)
    }

    async fn check_at(
        &self,
        index: usize,
        expectation: &Expectation,
        request_data: &RequestData,
    ) -> Result<ScenarioOutcome, Error> {
        let base_url = self
            .configuration
            .base_url()
            .ok_or(Error::NotConfigured)?;

        info!(
            scenario = index,
            name = %expectation.name(),
            method = %expectation.method(),
            path = %expectation.path(),
            "checking scenario"
        );

        let mismatches = match self
            .http_client
            .make_request(base_url, request_data)
            .await
        {
            Ok(response) => expectation.verify(&response),
            Err(Error::ReqwestError(e)) => vec![Mismatch::Transport(e.to_string())],
            Err(e) => return Err(e),
        };

        let status = if mismatches.is_empty() {
            info!(scenario = index, "scenario passed");
            ScenarioStatus::Passed
        } else {
            for mismatch in &mismatches {
                warn!(scenario = index, mismatch = %mismatch, "expectation mismatch");
            }
            ScenarioStatus::Failed(mismatches)
        };

        Ok(Self::outcome(index, expectation, status))
    }

    fn outcome(index: usize, expectation: &Expectation, status: ScenarioStatus) -> ScenarioOutcome {
        ScenarioOutcome {
            index,
            name: expectation.name(),
            method: expectation.method().into(),
            path: expectation.path().into(),
            status,
        }
    }
}
