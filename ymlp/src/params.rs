use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::{collections::BTreeMap, fmt::Display};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Form fields sent with a single API call.
///
/// Keys are kept sorted so the encoded request is deterministic. Values are
/// always sent as strings, which is what the remote API receives anyway once
/// they are URL-encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, replacing any previous value.
    pub fn insert<K: Into<String>, V: Display>(&mut self, key: K, value: V) -> &mut Self {
        self.0.insert(key.into(), value.to_string());
        self
    }

    /// Chained form of [`Params::insert`].
    pub fn with<K: Into<String>, V: Display>(mut self, key: K, value: V) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets `key` only when a value is given.
    pub fn insert_opt<K: Into<String>, V: Display>(&mut self, key: K, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    /// Sets `key` to the comma-joined values. An empty list still sets the key.
    pub fn insert_list<K, I, V>(&mut self, key: K, values: I) -> &mut Self
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Display,
    {
        let joined = values
            .into_iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.0.insert(key.into(), joined);
        self
    }

    /// Sets `key` to `"1"` when `on`, leaves it out otherwise.
    pub fn insert_flag<K: Into<String>>(&mut self, key: K, on: bool) -> &mut Self {
        if on {
            self.insert(key, "1");
        }
        self
    }

    pub fn insert_date<K: Into<String>>(&mut self, key: K, date: Option<NaiveDate>) -> &mut Self {
        self.insert_opt(key, date.map(|d| d.format(DATE_FORMAT)))
    }

    pub fn insert_date_time<K: Into<String>>(
        &mut self,
        key: K,
        at: Option<NaiveDateTime>,
    ) -> &mut Self {
        self.insert_opt(key, at.map(|t| t.format(DATE_TIME_FORMAT)))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `application/x-www-form-urlencoded` rendering, without a leading `?`.
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for Params {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut params = Params::new();
        params.extend(iter);
        params
    }
}

impl<K: Into<String>, V: Display> Extend<(K, V)> for Params {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_existing_value() {
        let mut params = Params::new();
        params.insert("Email", "a@example.com");
        params.insert("Email", "b@example.com");
        assert_eq!(params.get("Email"), Some("b@example.com"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn lists_are_comma_joined() {
        let mut params = Params::new();
        params.insert_list("GroupID", [1u64, 2, 3]);
        params.insert_list("FieldID", Vec::<u64>::new());
        assert_eq!(params.get("GroupID"), Some("1,2,3"));
        assert_eq!(params.get("FieldID"), Some(""));
    }

    #[test]
    fn optional_values_and_flags_are_skipped_when_absent() {
        let mut params = Params::new();
        params
            .insert_opt("Alias", None::<&str>)
            .insert_opt("Page", Some(2))
            .insert_flag("TrackOpens", false)
            .insert_flag("TrackClicks", true);
        assert!(!params.contains_key("Alias"));
        assert!(!params.contains_key("TrackOpens"));
        assert_eq!(params.get("Page"), Some("2"));
        assert_eq!(params.get("TrackClicks"), Some("1"));
    }

    #[test]
    fn dates_use_remote_formats() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let at = day.and_hms_opt(14, 5, 0).unwrap();
        let mut params = Params::new();
        params
            .insert_date("StartDate", Some(day))
            .insert_date_time("DeliveryTime", Some(at));
        assert_eq!(params.get("StartDate"), Some("2024-03-09"));
        assert_eq!(params.get("DeliveryTime"), Some("2024-03-09 14:05"));
    }

    #[test]
    fn query_string_is_sorted_and_encoded() {
        let params: Params = [("Subject", "Hi there & welcome"), ("Email", "a+b@example.com")]
            .into_iter()
            .collect();
        assert_eq!(
            params.to_query_string(),
            "Email=a%2Bb%40example.com&Subject=Hi+there+%26+welcome"
        );
    }
}
