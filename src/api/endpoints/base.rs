//! Generic typed view over one API endpoint

use crate::api::config::ResponseFormat;
use crate::api::models::Resource;
use crate::api::query::Filters;
use crate::api::transport::{FetchResult, Record, Transport};
use crate::csv_parser::{CsvRow, parse_csv_response};
use crate::error::{OpenF1Error, Result};
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// Typed operations for resource `T`
pub struct Endpoint<T: Resource> {
    transport: Transport,
    _resource: PhantomData<fn() -> T>,
}

impl<T: Resource> Endpoint<T> {
    pub fn new(transport: Transport) -> Self {
        Self {
            transport,
            _resource: PhantomData,
        }
    }

    pub fn path(&self) -> &'static str {
        T::ENDPOINT
    }

    /// Fetch and validate every matching record
    pub async fn list(&self, filters: &Filters) -> Result<Vec<T>> {
        let records = self.transport.fetch_json(T::ENDPOINT, filters).await?;
        parse_records(records)
    }

    /// Fetch without model validation, in the requested (or default) format
    pub async fn list_raw(&self, filters: &Filters, format: Option<ResponseFormat>) -> Result<FetchResult> {
        self.transport.fetch(T::ENDPOINT, filters, format).await
    }

    pub async fn list_csv(&self, filters: &Filters) -> Result<String> {
        self.transport.fetch_csv(T::ENDPOINT, filters).await
    }

    pub async fn list_csv_parsed(&self, filters: &Filters) -> Result<Vec<CsvRow>> {
        let text = self.list_csv(filters).await?;
        parse_csv_response(&text)
    }

    pub async fn first(&self, filters: &Filters) -> Result<Option<T>> {
        Ok(self.list(filters).await?.into_iter().next())
    }

    /// Number of matching records; the API has no count endpoint, so this
    /// fetches them all
    pub async fn count(&self, filters: &Filters) -> Result<usize> {
        Ok(self.transport.fetch_json(T::ENDPOINT, filters).await?.len())
    }
}

impl<T: Resource> Clone for Endpoint<T> {
    fn clone(&self) -> Self {
        Self::new(self.transport.clone())
    }
}

impl<T: Resource> fmt::Debug for Endpoint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint").field("path", &T::ENDPOINT).finish()
    }
}

pub(crate) fn parse_records<T: Resource>(records: Vec<Record>) -> Result<Vec<T>> {
    records.into_iter().map(parse_record).collect()
}

pub(crate) fn parse_record<T: Resource>(record: Record) -> Result<T> {
    let value = Value::Object(record);
    T::deserialize(&value).map_err(|e| OpenF1Error::Validation {
        message: format!("Failed to validate {}", T::NAME),
        field: error_field(&e.to_string()),
        value: Some(value.clone()),
    })
}

// serde_json names the offending field in backticks for missing/unknown fields
fn error_field(message: &str) -> Option<String> {
    let start = message.find('`')? + 1;
    let len = message[start..].find('`')?;
    Some(message[start..start + len].to_string())
}
