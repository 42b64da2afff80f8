use crate::{data::RequestData, error::Error};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Method,
};
use std::collections::HashMap;

pub fn extract_headers(header_map: &HeaderMap) -> HashMap<String, String> {
    // header values with opaque characters are dropped
    header_map
        .iter()
        .map(|(k, v)| (String::from(k.as_str()), v.to_str()))
        .filter_map(|(key, value)| value.ok().map(|v| (key, String::from(v))))
        .collect::<HashMap<_, _>>()
}

pub fn put_headers<'a, I: IntoIterator<Item = (&'a String, &'a String)>>(
    header_map: &mut HeaderMap<HeaderValue>,
    headers: I,
) -> Result<(), Error> {
    for (key, value) in headers {
        let header_name = HeaderName::from_lowercase(key.to_lowercase().as_bytes())?;
        let header_value = HeaderValue::from_str(value)?;
        header_map.insert(header_name, header_value);
    }

    Ok(())
}

pub fn parse_method(method: &str) -> Result<Method, Error> {
    Method::from_bytes(method.as_bytes()).map_err(|_| Error::InvalidMethod(method.into()))
}

/// Fails if `request_data` couldn't be turned into an http request.
pub fn validate_request(request_data: &RequestData) -> Result<(), Error> {
    parse_method(&request_data.method)?;
    put_headers(&mut HeaderMap::new(), &request_data.headers)
}
