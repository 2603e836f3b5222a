//! Shared helpers for the mock-server tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::collections::HashMap;
use wiremock::{MockServer, Request, ResponseTemplate};
use ymlp::Client;

pub const USERNAME: &str = "jane";
pub const API_KEY: &str = "secret-key";

/// A client pointed at `<mock>/api` with test credentials.
pub fn client_for(server: &MockServer) -> Client {
    Client::builder(USERNAME, API_KEY)
        .base_url(format!("{}/api", server.uri()))
        .build()
        .unwrap()
}

/// A `200 OK` carrying a `{Code, Output}` envelope.
pub fn envelope(code: i64, output: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "Code": code, "Output": output }))
}

/// Form fields the server received, from the POST body or the query string.
pub fn sent_params(request: &Request) -> HashMap<String, String> {
    if request.body.is_empty() {
        request.url.query_pairs().into_owned().collect()
    } else {
        url::form_urlencoded::parse(&request.body).into_owned().collect()
    }
}

pub async fn only_request(server: &MockServer) -> Request {
    let mut requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "expected exactly one request");
    requests.remove(0)
}
