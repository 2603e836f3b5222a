use crate::{
    error::{Error, Result},
    models::Envelope,
    params::Params,
};
use reqwest::{header::USER_AGENT, redirect, Method, Url};
use serde_json::Value;
use std::{fmt, time::Duration};
use tracing::debug;

pub const API_HOST: &str = "www.ymlp.com";
pub const API_PORT: u16 = 443;
pub const API_URL: &str = "https://www.ymlp.com/api";
pub const CLIENT_ID: &str = "ymlp-rs";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const KEY_PARAM: &str = "Key";
const USERNAME_PARAM: &str = "Username";
const OUTPUT_PARAM: &str = "Output";
const OUTPUT_JSON: &str = "JSON";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeout(Duration);

impl Default for Timeout {
    fn default() -> Self {
        Self(Duration::from_secs(60))
    }
}

impl Timeout {
    /// Fails with [`Error::InvalidArgument`] for a zero timeout.
    pub fn from_secs(secs: u64) -> Result<Self> {
        if secs == 0 {
            return Err(Error::InvalidArgument(
                "timeout must be at least one second".to_string(),
            ));
        }
        Ok(Self(Duration::from_secs(secs)))
    }

    pub fn as_secs(&self) -> u64 {
        self.0.as_secs()
    }
}

#[derive(Clone)]
struct Credentials {
    username: String,
    api_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// A single request, fully resolved but not yet sent.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PreparedRequest {
    pub method: Method,
    pub url: String,
    /// POST body; GET requests carry everything in `url`.
    pub form: Option<Params>,
}

/// Settings for a [`Client`].
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    credentials: Credentials,
    base_url: Option<String>,
    timeout: Timeout,
    user_agent: String,
    insecure_skip_verify: bool,
    follow_redirects: bool,
}

impl ClientBuilder {
    /// Points the client somewhere else than the public API, e.g. a mock server.
    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: Timeout) -> Self {
        self.timeout = timeout;
        self
    }

    /// Appended to `ymlp-rs/<version>` in the `User-Agent` header.
    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Accepts any TLS certificate. Off by default; only meant for
    /// environments that intercept TLS with their own certificates.
    pub fn insecure_skip_verify(mut self, insecure: bool) -> Self {
        self.insecure_skip_verify = insecure;
        self
    }

    /// Follow HTTP redirects (the default). Turn this off where outbound
    /// requests must stay on the configured host.
    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    pub fn build(self) -> Result<Client> {
        let base_url = Url::parse(self.base_url.as_deref().unwrap_or(API_URL))
            .map_err(|e| Error::InvalidArgument(format!("invalid base URL: {e}")))?;
        if base_url.cannot_be_a_base() || base_url.query().is_some() || base_url.fragment().is_some() {
            return Err(Error::InvalidArgument(format!(
                "base URL must not carry a query or fragment: {base_url}"
            )));
        }

        let redirect = if self.follow_redirects {
            redirect::Policy::default()
        } else {
            redirect::Policy::none()
        };

        let http = reqwest::Client::builder()
            .redirect(redirect)
            .danger_accept_invalid_certs(self.insecure_skip_verify)
            .build()
            .map_err(config_error)?;

        Ok(Client {
            base_url,
            credentials: self.credentials,
            http,
            timeout: self.timeout,
            user_agent: self.user_agent,
        })
    }
}

/// Client for the YMLP API.
///
/// Every call is one request/response round trip. The credentials are fixed
/// at construction; timeout and user agent can be changed between calls.
#[derive(Clone, Debug)]
pub struct Client {
    base_url: Url,
    credentials: Credentials,
    http: reqwest::Client,
    timeout: Timeout,
    user_agent: String,
}

impl Client {
    /// Initializes a client against the public API using default settings.
    pub fn new<S: Into<String>>(username: S, api_key: S) -> Result<Self> {
        Self::builder(username, api_key).build()
    }

    pub fn builder<S: Into<String>>(username: S, api_key: S) -> ClientBuilder {
        ClientBuilder {
            credentials: Credentials {
                username: username.into(),
                api_key: api_key.into(),
            },
            base_url: None,
            timeout: Timeout::default(),
            user_agent: String::new(),
            insecure_skip_verify: false,
            follow_redirects: true,
        }
    }

    pub fn timeout(&self) -> Timeout {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Timeout) {
        self.timeout = timeout;
    }

    /// The full `User-Agent` header value sent with each request.
    pub fn user_agent(&self) -> String {
        format!("{CLIENT_ID}/{VERSION} {}", self.user_agent)
            .trim_end()
            .to_string()
    }

    pub fn set_user_agent<S: Into<String>>(&mut self, user_agent: S) {
        self.user_agent = user_agent.into();
    }

    /// Calls a remote operation and unwraps the `Output` of its JSON envelope.
    ///
    /// `path` is the operation name, e.g. `Contacts.Add`. Authentication and
    /// output-format fields are added to `params`, replacing any the caller set.
    ///
    /// ## Example
    ///
    /// ```no_run
    /// use ymlp::{Client, Method, Params};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = Client::new("username", "api-key")?;
    ///     let params = Params::new().with("Email", "jane@example.com");
    ///     let contact = client.call("Contacts.GetContact", params, Method::GET).await?;
    ///     println!("{contact}");
    ///     Ok(())
    /// }
    /// ```
    pub async fn call(&self, path: &str, params: Params, method: Method) -> Result<Value> {
        let body = self.send(path, params, method).await?;
        let output = Envelope::decode(&body)?.into_output();
        if let Err(Error::Api { code, .. }) = &output {
            debug!(path, code, "YMLP reported an error");
        }
        output
    }

    /// Like [`Client::call`] but returns the body bytes verbatim, without decoding.
    pub async fn call_raw(&self, path: &str, params: Params, method: Method) -> Result<Vec<u8>> {
        self.send(path, params, method).await
    }

    pub(crate) async fn get(&self, path: &str, params: Params) -> Result<Value> {
        self.call(path, params, Method::GET).await
    }

    pub(crate) async fn post(&self, path: &str, params: Params) -> Result<Value> {
        self.call(path, params, Method::POST).await
    }

    async fn send(&self, path: &str, params: Params, method: Method) -> Result<Vec<u8>> {
        let keys = params.keys().map(str::to_owned).collect::<Vec<_>>();
        let request = self.prepare(path, params, method)?;

        debug!(path, method = %request.method, params = ?keys, "sending request");

        let mut builder = self
            .http
            .request(request.method, &request.url)
            .timeout(self.timeout.0)
            .header(USER_AGENT, self.user_agent());
        if let Some(form) = &request.form {
            builder = builder.form(form);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;

        debug!(path, %status, bytes = body.len(), "received response");

        Ok(body.to_vec())
    }

    pub(crate) fn prepare(&self, path: &str, mut params: Params, method: Method) -> Result<PreparedRequest> {
        if method != Method::GET && method != Method::POST {
            return Err(Error::InvalidArgument(format!(
                "unsupported method {method}, expected GET or POST"
            )));
        }
        if path.is_empty() {
            return Err(Error::InvalidArgument("empty operation path".to_string()));
        }

        params
            .insert(KEY_PARAM, &self.credentials.api_key)
            .insert(USERNAME_PARAM, &self.credentials.username)
            .insert(OUTPUT_PARAM, OUTPUT_JSON);

        let mut url = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );

        if method == Method::POST {
            return Ok(PreparedRequest {
                method,
                url,
                form: Some(params),
            });
        }

        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str(&params.to_query_string());

        Ok(PreparedRequest {
            method,
            url,
            form: None,
        })
    }
}

/// Building the HTTP stack fails only on bad settings, never on the network.
fn config_error(e: reqwest::Error) -> Error {
    Error::InvalidArgument(format!("invalid client settings: {e}"))
}
