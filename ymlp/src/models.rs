use crate::{
    error::{Error, Result},
    params::Params,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::{collections::BTreeMap, fmt::Display};

/// The `{Code, Output}` wrapper around every structured response.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Envelope {
    #[serde(rename = "Code", default, deserialize_with = "deserialize_code")]
    pub code: Option<i64>,
    #[serde(rename = "Output", default)]
    pub output: Value,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCode {
    Int(i64),
    Text(String),
}

fn deserialize_code<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<i64>, D::Error> {
    match Option::<RawCode>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawCode::Int(code)) => Ok(Some(code)),
        Some(RawCode::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("non-numeric Code {text:?}"))),
    }
}

impl Envelope {
    /// Decodes a response body. Anything but a JSON object, including bytes
    /// that are not valid UTF-8, is rejected.
    pub fn decode<B: AsRef<[u8]>>(body: B) -> Result<Self> {
        let value: Value = serde_json::from_slice(body.as_ref())
            .map_err(|e| Error::MalformedResponse(format!("invalid JSON: {e}")))?;

        if !value.is_object() {
            return Err(Error::MalformedResponse(format!(
                "expected a JSON object, got {}",
                kind_of(&value)
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| Error::MalformedResponse(format!("invalid envelope: {e}")))
    }

    /// Unwraps `Output`, or turns a non-zero `Code` into [`Error::Api`].
    pub fn into_output(self) -> Result<Value> {
        match self.code {
            Some(code) if code != 0 => Err(Error::Api {
                code,
                message: output_to_string(self.output),
            }),
            _ => Ok(self.output),
        }
    }
}

fn output_to_string(output: Value) -> String {
    match output {
        Value::String(message) => message,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SortOrder::Ascending => "Ascending",
            SortOrder::Descending => "Descending",
        })
    }
}

/// Page selection for the read endpoints. Unset fields are left to the
/// service's own defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub page: Option<u32>,
    pub number_per_page: Option<u32>,
}

impl Pagination {
    fn write_params(&self, params: &mut Params) {
        params
            .insert_opt("Page", self.page)
            .insert_opt("NumberPerPage", self.number_per_page);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub stop: Option<NaiveDate>,
}

impl DateRange {
    fn write_params(&self, params: &mut Params) {
        params
            .insert_date("StartDate", self.start)
            .insert_date("StopDate", self.stop);
    }
}

/// Paging and sorting shared by most archive reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub pagination: Pagination,
    pub sorting: Option<SortOrder>,
}

impl ListQuery {
    pub(crate) fn write_params(&self, params: &mut Params) {
        self.pagination.write_params(params);
        params.insert_opt("Sorting", self.sorting);
    }
}

/// Filters for the `Contacts.Get*` listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactQuery {
    /// Custom fields to include for each contact.
    pub fields: Vec<u64>,
    pub dates: DateRange,
    pub pagination: Pagination,
    pub sorting: Option<SortOrder>,
}

impl ContactQuery {
    pub(crate) fn write_params(&self, params: &mut Params) {
        params.insert_list("FieldID", &self.fields);
        self.dates.write_params(params);
        self.pagination.write_params(params);
        params.insert_opt("Sorting", self.sorting);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveQuery {
    pub pagination: Pagination,
    pub dates: DateRange,
    pub sorting: Option<SortOrder>,
    pub show_test_messages: bool,
}

impl ArchiveQuery {
    pub(crate) fn write_params(&self, params: &mut Params) {
        self.pagination.write_params(params);
        self.dates.write_params(params);
        params
            .insert_opt("Sorting", self.sorting)
            .insert_flag("ShowTestMessages", self.show_test_messages);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BounceQuery {
    pub show_hard_bounces: bool,
    pub show_soft_bounces: bool,
    pub list: ListQuery,
}

impl BounceQuery {
    pub(crate) fn write_params(&self, params: &mut Params) {
        params
            .insert_flag("ShowHardBounces", self.show_hard_bounces)
            .insert_flag("ShowSoftBounces", self.show_soft_bounces);
        self.list.write_params(params);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickQuery {
    /// Restrict to a single tracked link.
    pub link_id: Option<u64>,
    pub unique_clicks: bool,
    pub list: ListQuery,
}

impl ClickQuery {
    pub(crate) fn write_params(&self, params: &mut Params) {
        params
            .insert_opt("LinkID", self.link_id)
            .insert_flag("UniqueClicks", self.unique_clicks);
        self.list.write_params(params);
    }
}

/// Custom field values for a contact, keyed by field id.
pub type ContactFields = BTreeMap<u64, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewField {
    pub name: String,
    pub alias: Option<String>,
    pub default_value: Option<String>,
    pub correct_uppercase: bool,
}

impl NewField {
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub(crate) fn write_params(&self, params: &mut Params) {
        params
            .insert("FieldName", &self.name)
            .insert_opt("Alias", self.alias.as_ref())
            .insert_opt("DefaultValue", self.default_value.as_ref())
            .insert_flag("CorrectUppercase", self.correct_uppercase);
    }
}

/// Partial update of a custom field; `None` leaves the setting untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldUpdate {
    pub name: Option<String>,
    pub alias: Option<String>,
    pub default_value: Option<String>,
    pub correct_uppercase: Option<bool>,
}

impl FieldUpdate {
    pub(crate) fn write_params(&self, params: &mut Params) {
        params
            .insert_opt("FieldName", self.name.as_ref())
            .insert_opt("Alias", self.alias.as_ref())
            .insert_opt("DefaultValue", self.default_value.as_ref())
            .insert_opt(
                "CorrectUppercase",
                self.correct_uppercase.map(|on| if on { "1" } else { "0" }),
            );
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewFilter {
    pub name: String,
    pub field: String,
    pub operand: String,
    pub value: String,
}

impl NewFilter {
    pub(crate) fn write_params(&self, params: &mut Params) {
        params
            .insert("FilterName", &self.name)
            .insert("Field", &self.field)
            .insert("Operand", &self.operand)
            .insert("Value", &self.value);
    }
}

/// A message to queue with `Newsletter.Send`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Newsletter {
    pub subject: String,
    pub html: Option<String>,
    pub text: Option<String>,
    /// Send later instead of immediately.
    pub delivery_time: Option<NaiveDateTime>,
    pub from_id: u64,
    pub track_opens: bool,
    pub track_clicks: bool,
    pub test_message: bool,
    pub groups: Vec<u64>,
    pub filters: Option<Vec<u64>>,
    pub combine_filters: bool,
}

impl Newsletter {
    pub(crate) fn write_params(&self, params: &mut Params) {
        params
            .insert("Subject", &self.subject)
            .insert_opt("HTML", self.html.as_ref())
            .insert_opt("Text", self.text.as_ref())
            .insert_date_time("DeliveryTime", self.delivery_time)
            .insert("FromID", self.from_id)
            .insert_flag("TrackOpens", self.track_opens)
            .insert_flag("TrackClicks", self.track_clicks)
            .insert_flag("TestMessage", self.test_message)
            .insert_list("GroupID", &self.groups);
        if let Some(filters) = &self.filters {
            params.insert_list("FilterID", filters);
        }
        params.insert_flag("CombineFilters", self.combine_filters);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_yields_output() {
        let envelope = Envelope::decode(r#"{"Code": 0, "Output": "Hello!"}"#).unwrap();
        assert_eq!(envelope.into_output().unwrap(), json!("Hello!"));
    }

    #[test]
    fn missing_code_is_success() {
        let envelope = Envelope::decode(r#"{"Output": [{"ID": "1"}]}"#).unwrap();
        assert_eq!(envelope.into_output().unwrap(), json!([{"ID": "1"}]));
    }

    #[test]
    fn missing_output_is_null() {
        let envelope = Envelope::decode(r#"{"Code": 0}"#).unwrap();
        assert_eq!(envelope.into_output().unwrap(), Value::Null);
    }

    #[test]
    fn non_zero_code_is_api_error() {
        let err = Envelope::decode(r#"{"Code": 5, "Output": "duplicate"}"#)
            .unwrap()
            .into_output()
            .unwrap_err();
        match err {
            Error::Api { code, message } => {
                assert_eq!(code, 5);
                assert_eq!(message, "duplicate");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn string_code_is_accepted() {
        let err = Envelope::decode(r#"{"Code": "101", "Output": {"reason": "bad key"}}"#)
            .unwrap()
            .into_output()
            .unwrap_err();
        match err {
            Error::Api { code, message } => {
                assert_eq!(code, 101);
                assert_eq!(message, r#"{"reason":"bad key"}"#);
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_json_and_non_objects() {
        for body in ["<html>oops</html>", "", "[1, 2]", "\"text\"", "42"] {
            let err = Envelope::decode(body).unwrap_err();
            assert!(
                matches!(err, Error::MalformedResponse(_)),
                "{body:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn rejects_invalid_utf8() {
        let err = Envelope::decode(b"{\"Code\": 0, \"Output\": \"caf\xe9\"}").unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn rejects_non_numeric_code() {
        let err = Envelope::decode(r#"{"Code": "oops", "Output": ""}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn contact_query_params() {
        let query = ContactQuery {
            fields: vec![3, 4],
            dates: DateRange {
                start: NaiveDate::from_ymd_opt(2024, 1, 1),
                stop: None,
            },
            pagination: Pagination {
                page: Some(2),
                number_per_page: None,
            },
            sorting: Some(SortOrder::Descending),
        };
        let mut params = Params::new();
        query.write_params(&mut params);

        assert_eq!(params.get("FieldID"), Some("3,4"));
        assert_eq!(params.get("StartDate"), Some("2024-01-01"));
        assert_eq!(params.get("Page"), Some("2"));
        assert_eq!(params.get("Sorting"), Some("Descending"));
        assert!(!params.contains_key("StopDate"));
        assert!(!params.contains_key("NumberPerPage"));
    }

    #[test]
    fn field_update_sends_explicit_false() {
        let update = FieldUpdate {
            correct_uppercase: Some(false),
            ..Default::default()
        };
        let mut params = Params::new();
        update.write_params(&mut params);
        assert_eq!(params.get("CorrectUppercase"), Some("0"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn newsletter_params() {
        let newsletter = Newsletter {
            subject: "Spring sale".to_string(),
            text: Some("Everything must go".to_string()),
            from_id: 7,
            track_clicks: true,
            groups: vec![1, 2],
            filters: Some(vec![9]),
            ..Default::default()
        };
        let mut params = Params::new();
        newsletter.write_params(&mut params);

        assert_eq!(params.get("Subject"), Some("Spring sale"));
        assert_eq!(params.get("Text"), Some("Everything must go"));
        assert_eq!(params.get("FromID"), Some("7"));
        assert_eq!(params.get("TrackClicks"), Some("1"));
        assert_eq!(params.get("GroupID"), Some("1,2"));
        assert_eq!(params.get("FilterID"), Some("9"));
        assert!(!params.contains_key("HTML"));
        assert!(!params.contains_key("TrackOpens"));
        assert!(!params.contains_key("CombineFilters"));
    }
}
