use crate::http_client::{HttpClient, ReqwestHttpClient};
use std::{collections::BTreeMap, sync::Arc};

/// What the checker does once a scenario fails.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum FailurePolicy {
    /// Keep going and report every scenario.
    #[default]
    CollectAll,
    /// Stop at the first failed scenario; the rest are reported as skipped.
    FailFast,
}

#[derive(Debug, Default)]
pub struct CheckerConfiguration {
    base_url: Option<String>,
    failure_policy: FailurePolicy,
    default_headers: BTreeMap<String, String>,
    http_client: Option<Arc<dyn HttpClient + Send + Sync>>,
}

impl CheckerConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_base_url<S: Into<String>>(&mut self, base_url: S) {
        self.base_url = Some(base_url.into());
    }

    pub fn base_url(&self) -> Option<&String> {
        self.base_url.as_ref()
    }

    pub fn set_failure_policy(&mut self, failure_policy: FailurePolicy) {
        self.failure_policy = failure_policy;
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Adds a header sent with every request unless the scenario sets it itself.
    pub fn add_default_header<S1: Into<String>, S2: Into<String>>(&mut self, name: S1, value: S2) {
        self.default_headers
            .insert(name.into().to_lowercase(), value.into());
    }

    pub fn default_headers(&self) -> &BTreeMap<String, String> {
        &self.default_headers
    }

    pub fn http_client(&self) -> Arc<dyn HttpClient + Send + Sync> {
        self.http_client
            .clone()
            .unwrap_or_else(|| Arc::new(ReqwestHttpClient::new()))
    }

    pub fn set_http_client(&mut self, http_client: Arc<dyn HttpClient + Send + Sync>) {
        self.http_client = Some(http_client);
    }
}
