//! High-level transport for the OpenF1 API
//!
//! Wraps [`HttpClient`] with filter encoding and response shaping. Data
//! requests are relative to the base URL; the token exchange goes through
//! [`Transport::post_form`] against an absolute URL.

use super::config::{ClientConfig, ResponseFormat};
use super::http::{FormFields, HttpClient};
use super::query::{Filters, build_query_params};
use crate::error::{OpenF1Error, Result};
use log::debug;
use reqwest::Method;
use serde_json::{Map, Value};

/// One JSON record as returned by the API
pub type Record = Map<String, Value>;

/// Body of a data request in its effective format
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult {
    Json(Vec<Record>),
    Csv(String),
}

impl FetchResult {
    pub fn into_json(self) -> Option<Vec<Record>> {
        match self {
            FetchResult::Json(records) => Some(records),
            FetchResult::Csv(_) => None,
        }
    }

    pub fn into_csv(self) -> Option<String> {
        match self {
            FetchResult::Csv(text) => Some(text),
            FetchResult::Json(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Transport {
    http: HttpClient,
}

impl Transport {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        self.http.config()
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// GET `endpoint` with encoded filters; `format` overrides the configured default
    pub async fn fetch(
        &self,
        endpoint: &str,
        filters: &Filters,
        format: Option<ResponseFormat>,
    ) -> Result<FetchResult> {
        let effective = format.unwrap_or_else(|| self.config().default_format());
        let params = build_query_params(filters, Some(effective));

        let response = self.http.get(endpoint, Some(&params)).await?;

        match effective {
            ResponseFormat::Csv => Ok(FetchResult::Csv(response.body)),
            ResponseFormat::Json => {
                let value: Value = response.json()?;
                Ok(FetchResult::Json(into_records(value)?))
            }
        }
    }

    /// JSON-pinned fetch; a non-JSON result collapses to an empty list
    pub async fn fetch_json(&self, endpoint: &str, filters: &Filters) -> Result<Vec<Record>> {
        let result = self.fetch(endpoint, filters, Some(ResponseFormat::Json)).await?;
        Ok(result.into_json().unwrap_or_default())
    }

    /// CSV-pinned fetch; a non-CSV result collapses to an empty string
    pub async fn fetch_csv(&self, endpoint: &str, filters: &Filters) -> Result<String> {
        let result = self.fetch(endpoint, filters, Some(ResponseFormat::Csv)).await?;
        Ok(result.into_csv().unwrap_or_default())
    }

    /// Form-encoded POST to an absolute URL, returning the decoded JSON body
    pub async fn post_form(&self, url: &str, form: &FormFields) -> Result<Value> {
        let response = self.http.send_absolute(Method::POST, url, Some(form)).await?;
        response.json()
    }

    /// Drop this handle and its HTTP client
    pub fn close(self) {
        debug!("Closing transport");
        self.http.close();
    }
}

fn into_records(value: Value) -> Result<Vec<Record>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(record) => Ok(record),
                other => Err(OpenF1Error::Validation {
                    message: "Expected a JSON object in the response array".to_string(),
                    field: None,
                    value: Some(other),
                }),
            })
            .collect(),
        Value::Object(record) => Ok(vec![record]),
        other => Err(OpenF1Error::Validation {
            message: "Expected a JSON array of objects".to_string(),
            field: None,
            value: Some(other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_into_records_accepts_arrays_of_objects() {
        let records = into_records(json!([{"lap_number": 1}, {"lap_number": 2}])).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("lap_number"), Some(&json!(2)));
    }

    #[test]
    fn test_into_records_wraps_single_object() {
        let records = into_records(json!({"detail": "x"})).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_into_records_rejects_scalars() {
        assert!(matches!(
            into_records(json!([1, 2])),
            Err(OpenF1Error::Validation { .. })
        ));
        assert!(matches!(into_records(json!("nope")), Err(OpenF1Error::Validation { .. })));
    }

    #[test]
    fn test_fetch_result_coercion() {
        assert_eq!(FetchResult::Csv("a,b".into()).into_json(), None);
        assert_eq!(FetchResult::Json(vec![]).into_csv(), None);
        assert_eq!(FetchResult::Csv("a,b".into()).into_csv().as_deref(), Some("a,b"));
    }
}
