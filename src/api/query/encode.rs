//! Query parameter encoding
//!
//! Turns a [`Filters`] map into wire query parameters. Equality emits the
//! bare field name; every other operator is appended to the field name
//! (`speed>=`), so one field may produce several independent parameters.

use super::filters::{FilterValue, Filters, Operator};
use crate::api::config::ResponseFormat;
use crate::api::constants::format::{CSV_PARAM, CSV_VALUE};
use std::collections::BTreeMap;

/// Encoded query parameters, keyed by wire name
pub type QueryParams = BTreeMap<String, String>;

/// Keys whose values never reach the logs
const SENSITIVE_KEYS: [&str; 7] = [
    "password",
    "token",
    "access_token",
    "refresh_token",
    "authorization",
    "secret",
    "api_key",
];

const REDACTED: &str = "[REDACTED]";

/// Encode filters (and an optional format hint) as query parameters
pub fn build_query_params(filters: &Filters, format: Option<ResponseFormat>) -> QueryParams {
    let mut params = QueryParams::new();

    for (field, value) in filters.iter() {
        match value {
            None => continue,
            Some(FilterValue::Scalar(scalar)) => {
                params.insert(field.clone(), scalar.to_param());
            }
            Some(FilterValue::Ops(ops)) => {
                for (operator, scalar) in ops {
                    let key = match operator {
                        Operator::Eq => field.clone(),
                        other => format!("{}{}", field, other.symbol()),
                    };
                    params.insert(key, scalar.to_param());
                }
            }
        }
    }

    if format == Some(ResponseFormat::Csv) {
        params.insert(CSV_PARAM.to_string(), CSV_VALUE.to_string());
    }

    params
}

/// Copy of `params` with secret values replaced, for log output
pub fn sanitize_for_logging<'a, I>(params: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    params
        .into_iter()
        .map(|(k, v)| {
            if SENSITIVE_KEYS.contains(&k.to_lowercase().as_str()) {
                (k.clone(), REDACTED.to_string())
            } else {
                (k.clone(), v.clone())
            }
        })
        .collect()
}

/// Render parameters as a percent-encoded query string
pub fn to_query_string(params: &QueryParams) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
