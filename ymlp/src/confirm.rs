//! Success sentences returned as `Output` by the write endpoints.
//!
//! The service reports many successful writes only as a plain English
//! sentence, so every literal the client compares against lives here.

use crate::error::{Error, Result};
use serde_json::Value;
use std::fmt::Display;

const NEW_ID_PREFIX: &str = "ID: ";

pub(crate) fn contact_added(email: &str) -> String {
    format!("{email} has been added")
}

pub(crate) fn contact_removed(email: &str) -> String {
    format!("{email} has been removed")
}

pub(crate) fn contact_unsubscribed(email: &str) -> String {
    format!("{email} has been unsubscribed")
}

pub(crate) fn removed_id<I: Display>(id: I) -> String {
    format!("Removed ID: {id}")
}

pub(crate) fn updated_id<I: Display>(id: I) -> String {
    format!("Updated ID: {id}")
}

pub(crate) const MESSAGE_QUEUED: &str = "Message queued for delivery";

/// True when the payload is exactly the expected sentence.
pub(crate) fn matches(output: &Value, expected: &str) -> bool {
    output.as_str() == Some(expected)
}

/// Extracts the identifier from an `"ID: <n>"` payload.
pub(crate) fn new_id(output: &Value) -> Result<u64> {
    let text = match output {
        Value::String(text) => text.as_str(),
        Value::Number(n) => return n.as_u64().ok_or_else(|| unexpected(output)),
        _ => return Err(unexpected(output)),
    };

    text.trim()
        .strip_prefix(NEW_ID_PREFIX)
        .unwrap_or(text.trim())
        .trim()
        .parse()
        .map_err(|_| unexpected(output))
}

fn unexpected(output: &Value) -> Error {
    Error::MalformedResponse(format!("expected \"{NEW_ID_PREFIX}<id>\", got {output}"))
}
