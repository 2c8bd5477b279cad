//! Command-line filter expressions
//!
//! `field=value`, `field>=value`, `field<=value`, `field>value` and
//! `field<value`. Values that look like integers, floats or booleans are
//! typed; everything else is passed through as text.

use crate::api::query::{FilterBuilder, Filters, Operator, Scalar};
use anyhow::{Result, bail};

/// Split one expression into field, operator and value
pub fn parse_expression(expr: &str) -> Result<(String, Operator, Scalar)> {
    let Some(pos) = expr.find(['>', '<', '=']) else {
        bail!("Invalid filter '{}': expected field<op>value", expr);
    };

    let field = expr[..pos].trim();
    if field.is_empty() {
        bail!("Invalid filter '{}': missing field name", expr);
    }

    let rest = &expr[pos..];
    let (operator, value) = if let Some(value) = rest.strip_prefix(">=") {
        (Operator::Gte, value)
    } else if let Some(value) = rest.strip_prefix("<=") {
        (Operator::Lte, value)
    } else if let Some(value) = rest.strip_prefix('>') {
        (Operator::Gt, value)
    } else if let Some(value) = rest.strip_prefix('<') {
        (Operator::Lt, value)
    } else {
        (Operator::Eq, &rest[1..])
    };

    Ok((field.to_string(), operator, typed_value(value.trim())))
}

// Numbers are typed only when they render back to the exact input text
fn typed_value(raw: &str) -> Scalar {
    let numeric = raw
        .parse::<i64>()
        .map(Scalar::Int)
        .ok()
        .or_else(|| raw.parse::<f64>().ok().filter(|f| f.is_finite()).map(Scalar::Float))
        .filter(|scalar| scalar.to_param() == raw);
    if let Some(scalar) = numeric {
        return scalar;
    }
    match raw {
        "true" => Scalar::Bool(true),
        "false" => Scalar::Bool(false),
        _ => Scalar::Str(raw.to_string()),
    }
}

/// Fold expressions into one filter set; several operators may share a field
pub fn parse_filters<S: AsRef<str>>(exprs: &[S]) -> Result<Filters> {
    let mut builder = FilterBuilder::new();
    for expr in exprs {
        let (field, operator, value) = parse_expression(expr.as_ref())?;
        builder = match operator {
            Operator::Eq => builder.eq(field, value),
            Operator::Gte => builder.gte(field, value),
            Operator::Lte => builder.lte(field, value),
            Operator::Gt => builder.gt(field, value),
            Operator::Lt => builder.lt(field, value),
        };
    }
    Ok(builder.build())
}
