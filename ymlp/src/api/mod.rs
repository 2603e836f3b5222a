//! Endpoint methods, one module per remote namespace.

mod archive;
mod contacts;
mod fields;
mod filters;
mod groups;
mod newsletter;

use crate::{client::Client, error::Result, params::Params};
use serde_json::Value;

impl Client {
    /// Checks that the service is reachable and the credentials are accepted.
    ///
    /// ## Example
    ///
    /// ```no_run
    /// use ymlp::Client;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let client = Client::new("username", "api-key").unwrap();
    ///     match client.ping().await {
    ///         Ok(greeting) => println!("{greeting}"),
    ///         Err(err) => eprintln!("Error: {err}"),
    ///     }
    /// }
    /// ```
    pub async fn ping(&self) -> Result<Value> {
        self.get("Ping", Params::new()).await
    }
}
