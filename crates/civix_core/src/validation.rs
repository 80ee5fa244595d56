//! Attribute value validation — coerces raw submitted values into typed
//! `SelectedValue`s against a service's declared schema.
//!
//! All-or-nothing: the first failure aborts the whole submission, so a
//! failed creation never persists anything.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::{CivicError, ValidationError, ValidationErrorKind};
use crate::schema::{AttributeKind, ServiceDefinitionAttribute};
use crate::types::{AttributeValue, SelectedValue};

/// Raw submitted attribute values keyed by attribute code, as collected by
/// the HTTP layer from `attribute[KEY]` form entries. A key may carry
/// several values (multi-select).
#[derive(Debug, Clone, Default)]
pub struct RawAttributes(BTreeMap<String, Vec<String>>);

impl RawAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, code: impl Into<String>, value: impl Into<String>) {
        self.0.entry(code.into()).or_default().push(value.into());
    }

    pub fn get(&self, code: &str) -> &[String] {
        self.0.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawAttributes {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut raw = RawAttributes::new();
        for (k, v) in iter {
            raw.push(k, v);
        }
        raw
    }
}

/// Validate submitted values against the schema, in schema-declared order.
///
/// Required attributes must be present and non-blank; optional absent
/// attributes are skipped; unknown submitted keys are silently ignored so
/// forward-compatible clients keep working.
pub fn validate_attributes(
    schema: &[ServiceDefinitionAttribute],
    submitted: &RawAttributes,
) -> Result<Vec<SelectedValue>, CivicError> {
    let mut selected = Vec::new();
    for attr in schema {
        // Blank entries count as absent; surviving values stay verbatim.
        let values: Vec<&str> = submitted
            .get(&attr.code)
            .iter()
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
            .collect();

        if values.is_empty() {
            if attr.required {
                return Err(ValidationError::new(
                    ValidationErrorKind::MissingRequiredAttribute,
                    &attr.code,
                )
                .into());
            }
            continue;
        }

        let value = coerce(attr, &values)?;
        selected.push(SelectedValue {
            code: attr.code.clone(),
            value,
        });
    }
    Ok(selected)
}

/// Coerce non-empty raw values into the attribute's declared kind.
fn coerce(
    attr: &ServiceDefinitionAttribute,
    values: &[&str],
) -> Result<AttributeValue, CivicError> {
    let first = values[0];
    match attr.kind {
        AttributeKind::String | AttributeKind::Text => Ok(AttributeValue::Text(first.to_string())),
        AttributeKind::Number => first
            .parse::<Decimal>()
            .map(AttributeValue::Number)
            .map_err(|_| {
                ValidationError::new(ValidationErrorKind::InvalidNumber, &attr.code).into()
            }),
        AttributeKind::Datetime => DateTime::parse_from_rfc3339(first)
            .map(|t| AttributeValue::Timestamp(t.with_timezone(&Utc)))
            .map_err(|_| {
                ValidationError::new(ValidationErrorKind::InvalidDateTime, &attr.code).into()
            }),
        AttributeKind::SingleValueList => {
            if attr.permits(first) {
                Ok(AttributeValue::Choice(first.to_string()))
            } else {
                Err(ValidationError::new(ValidationErrorKind::InvalidSelectValue, &attr.code)
                    .into())
            }
        }
        AttributeKind::MultiValueList => {
            for v in values {
                if !attr.permits(v) {
                    return Err(ValidationError::new(
                        ValidationErrorKind::InvalidSelectValue,
                        &attr.code,
                    )
                    .into());
                }
            }
            Ok(AttributeValue::Choices(
                values.iter().map(|v| v.to_string()).collect(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ServiceDefinitionAttribute as Attr;

    fn sidewalk_schema() -> Vec<Attr> {
        vec![
            Attr::new("SDWLK", "Condition", AttributeKind::SingleValueList, true, 1)
                .with_options(["NARROW", "CRACKED", "UNEVEN"]),
            Attr::new("SDWLK_NEAR", "Nearest landmark", AttributeKind::String, false, 2),
            Attr::new("SDWLK_WIDTH", "Width in feet", AttributeKind::Number, false, 3),
            Attr::new("SDWLK_DATETIME", "Observed at", AttributeKind::Datetime, false, 4),
            Attr::new("SDWLK_CMNTS", "Comments", AttributeKind::Text, false, 5),
            Attr::new("SDWLK_HAZARDS", "Hazards", AttributeKind::MultiValueList, false, 6)
                .with_options(["ICE", "DEBRIS", "FLOODING"]),
        ]
    }

    fn kind_of(err: CivicError) -> ValidationErrorKind {
        match err {
            CivicError::Validation(v) => v.kind,
            other => panic!("expected validation error, got: {other}"),
        }
    }

    #[test]
    fn missing_required_attribute_fails() {
        let err =
            validate_attributes(&sidewalk_schema(), &RawAttributes::new()).unwrap_err();
        assert_eq!(kind_of(err), ValidationErrorKind::MissingRequiredAttribute);
    }

    #[test]
    fn blank_required_attribute_fails() {
        let raw: RawAttributes = [("SDWLK", "   ")].into_iter().collect();
        let err = validate_attributes(&sidewalk_schema(), &raw).unwrap_err();
        assert_eq!(kind_of(err), ValidationErrorKind::MissingRequiredAttribute);
    }

    #[test]
    fn optional_absent_attributes_are_skipped() {
        let raw: RawAttributes = [("SDWLK", "NARROW")].into_iter().collect();
        let selected = validate_attributes(&sidewalk_schema(), &raw).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].code, "SDWLK");
        assert_eq!(selected[0].value, AttributeValue::Choice("NARROW".into()));
    }

    #[test]
    fn unknown_submitted_keys_are_ignored() {
        let raw: RawAttributes = [("SDWLK", "NARROW"), ("FUTURE_FIELD", "whatever")]
            .into_iter()
            .collect();
        let selected = validate_attributes(&sidewalk_schema(), &raw).unwrap();
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn results_follow_schema_declared_order() {
        // BTreeMap iteration would put SDWLK_CMNTS before SDWLK_NEAR; the
        // output must follow the schema order instead.
        let raw: RawAttributes = [
            ("SDWLK_CMNTS", "a comment"),
            ("SDWLK", "NARROW"),
            ("SDWLK_NEAR", "the library"),
        ]
        .into_iter()
        .collect();
        let selected = validate_attributes(&sidewalk_schema(), &raw).unwrap();
        let codes: Vec<&str> = selected.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["SDWLK", "SDWLK_NEAR", "SDWLK_CMNTS"]);
    }

    #[test]
    fn number_coercion_round_trips() {
        let raw: RawAttributes = [("SDWLK", "NARROW"), ("SDWLK_WIDTH", "5")]
            .into_iter()
            .collect();
        let selected = validate_attributes(&sidewalk_schema(), &raw).unwrap();
        assert_eq!(
            selected[1].value,
            AttributeValue::Number("5".parse().unwrap())
        );
        assert_eq!(selected[1].value.values(), vec!["5".to_string()]);
    }

    #[test]
    fn malformed_number_fails() {
        let raw: RawAttributes = [("SDWLK", "NARROW"), ("SDWLK_WIDTH", "NotANumber")]
            .into_iter()
            .collect();
        let err = validate_attributes(&sidewalk_schema(), &raw).unwrap_err();
        assert_eq!(kind_of(err), ValidationErrorKind::InvalidNumber);
    }

    #[test]
    fn iso8601_datetime_round_trips() {
        let raw: RawAttributes = [
            ("SDWLK", "NARROW"),
            ("SDWLK_DATETIME", "2015-04-14T11:07:36.639Z"),
        ]
        .into_iter()
        .collect();
        let selected = validate_attributes(&sidewalk_schema(), &raw).unwrap();
        match &selected[1].value {
            AttributeValue::Timestamp(t) => {
                assert_eq!(t.timestamp_millis(), 1_429_009_656_639);
            }
            other => panic!("expected timestamp, got {other:?}"),
        }
    }

    #[test]
    fn malformed_datetime_fails() {
        let raw: RawAttributes = [("SDWLK", "NARROW"), ("SDWLK_DATETIME", "0015/04/14Z")]
            .into_iter()
            .collect();
        let err = validate_attributes(&sidewalk_schema(), &raw).unwrap_err();
        assert_eq!(kind_of(err), ValidationErrorKind::InvalidDateTime);
    }

    #[test]
    fn single_select_outside_permitted_list_fails() {
        let raw: RawAttributes = [("SDWLK", "WIDE")].into_iter().collect();
        let err = validate_attributes(&sidewalk_schema(), &raw).unwrap_err();
        assert_eq!(kind_of(err), ValidationErrorKind::InvalidSelectValue);
    }

    #[test]
    fn single_select_is_case_sensitive() {
        let raw: RawAttributes = [("SDWLK", "narrow")].into_iter().collect();
        let err = validate_attributes(&sidewalk_schema(), &raw).unwrap_err();
        assert_eq!(kind_of(err), ValidationErrorKind::InvalidSelectValue);
    }

    #[test]
    fn multi_select_accepts_members_and_keeps_all() {
        let mut raw = RawAttributes::new();
        raw.push("SDWLK", "NARROW");
        raw.push("SDWLK_HAZARDS", "ICE");
        raw.push("SDWLK_HAZARDS", "DEBRIS");
        let selected = validate_attributes(&sidewalk_schema(), &raw).unwrap();
        assert_eq!(
            selected[1].value,
            AttributeValue::Choices(vec!["ICE".into(), "DEBRIS".into()])
        );
    }

    #[test]
    fn multi_select_rejects_any_non_member() {
        let mut raw = RawAttributes::new();
        raw.push("SDWLK", "NARROW");
        raw.push("SDWLK_HAZARDS", "ICE");
        raw.push("SDWLK_HAZARDS", "LAVA");
        let err = validate_attributes(&sidewalk_schema(), &raw).unwrap_err();
        assert_eq!(kind_of(err), ValidationErrorKind::InvalidSelectValue);
    }

    #[test]
    fn text_kinds_are_verbatim() {
        let raw: RawAttributes = [
            ("SDWLK", "NARROW"),
            ("SDWLK_CMNTS", "Multi\nline comment"),
        ]
        .into_iter()
        .collect();
        let selected = validate_attributes(&sidewalk_schema(), &raw).unwrap();
        assert_eq!(
            selected[1].value,
            AttributeValue::Text("Multi\nline comment".into())
        );
    }

    #[test]
    fn empty_schema_accepts_anything() {
        let raw: RawAttributes = [("WHATEVER", "x")].into_iter().collect();
        let selected = validate_attributes(&[], &raw).unwrap();
        assert!(selected.is_empty());
    }
}
