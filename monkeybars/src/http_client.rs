use crate::{error::Error, util, RequestData, ResponseData};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use std::fmt::Debug;
use tracing::debug;

#[async_trait]
pub trait HttpClient: Debug {
    async fn make_request(
        &self,
        base_url: &str,
        request_data: &RequestData,
    ) -> Result<ResponseData, Error>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Wraps a pre-configured reqwest client, e.g. one with a proxy or custom TLS roots.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn make_request(
        &self,
        base_url: &str,
        request_data: &RequestData,
    ) -> Result<ResponseData, Error> {
        let url = format!("{}{}", base_url.trim_end_matches('/'), request_data.uri);
        let method = util::parse_method(&request_data.method)?;

        let mut headers = HeaderMap::new();
        util::put_headers(
            &mut headers,
            request_data
                .headers
                .iter()
                .filter(|(header_name, _)| header_name.as_str() != "host"),
        )?;

        debug!(method = %method, url = %url, "sending request");

        let mut request_builder = self.client.request(method, url.as_str()).headers(headers);
        if !request_data.body.is_empty() {
            request_builder = request_builder.body(request_data.body.clone());
        }

        let response = request_builder.send().await?;

        let status_code = response.status().as_u16();
        let headers = util::extract_headers(response.headers());
        let body = response.text().await?;

        Ok(ResponseData {
            status_code,
            headers,
            body,
        })
    }
}
