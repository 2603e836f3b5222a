use crate::{client::Client, confirm, error::Result, models::Newsletter, params::Params};
use serde_json::Value;

impl Client {
    /// Sender addresses available for newsletters.
    pub async fn newsletter_get_froms(&self) -> Result<Value> {
        self.get("Newsletter.GetFroms", Params::new()).await
    }

    /// Registers a sender address and returns its id.
    pub async fn newsletter_add_from(&self, email: &str, name: &str) -> Result<u64> {
        let params = Params::new().with("FromEmail", email).with("FromName", name);

        let output = self.post("Newsletter.AddFrom", params).await?;
        confirm::new_id(&output)
    }

    pub async fn newsletter_delete_from(&self, id: u64) -> Result<bool> {
        let output = self
            .post("Newsletter.DeleteFrom", Params::new().with("FromID", id))
            .await?;
        Ok(confirm::matches(&output, &confirm::removed_id(id)))
    }

    /// Queues a newsletter for delivery.
    ///
    /// ## Example
    ///
    /// ```no_run
    /// use ymlp::{Client, Newsletter};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = Client::new("username", "api-key")?;
    ///     let newsletter = Newsletter {
    ///         subject: "Spring sale".to_string(),
    ///         text: Some("Everything must go".to_string()),
    ///         from_id: 1,
    ///         groups: vec![1],
    ///         ..Default::default()
    ///     };
    ///
    ///     if client.newsletter_send(&newsletter).await? {
    ///         println!("queued");
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub async fn newsletter_send(&self, newsletter: &Newsletter) -> Result<bool> {
        let mut params = Params::new();
        newsletter.write_params(&mut params);

        let output = self.post("Newsletter.Send", params).await?;
        Ok(confirm::matches(&output, confirm::MESSAGE_QUEUED))
    }
}
