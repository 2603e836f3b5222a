//! A client for the Your Mailing List Provider (YMLP) HTTP API.
//!
//! Each method sends one authenticated request to `https://www.ymlp.com/api`
//! and unwraps the `{Code, Output}` JSON envelope the service answers with.
//! A non-zero `Code` surfaces as [`Error::Api`].
//!
//! ## Example
//!
//! ```no_run
//! use ymlp::{Client, ContactFields};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("username", "api-key")?;
//!
//!     let group = client.groups_add("Customers").await?;
//!     let added = client
//!         .contacts_add("jane@example.com", &[group], &ContactFields::new(), false)
//!         .await?;
//!
//!     println!("added to group {group}: {added}");
//!     Ok(())
//! }
//! ```

mod api;
pub mod client;
mod confirm;
pub mod error;
pub mod models;
pub mod params;

pub use client::{Client, ClientBuilder, Timeout};
pub use error::{Error, Result};
pub use models::{
    ArchiveQuery, BounceQuery, ClickQuery, ContactFields, ContactQuery, DateRange, Envelope,
    FieldUpdate, ListQuery, NewField, NewFilter, Newsletter, Pagination, SortOrder,
};
pub use params::Params;
pub use reqwest::Method;
