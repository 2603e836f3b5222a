use crate::{
    client::Client,
    confirm,
    error::Result,
    models::{ContactFields, ContactQuery},
    params::Params,
};
use serde_json::Value;

impl Client {
    /// Adds a contact to one or more groups.
    ///
    /// `fields` holds custom field values keyed by field id. Returns `true`
    /// when the service confirms the address was added.
    ///
    /// ## Example
    ///
    /// ```no_run
    /// use ymlp::{Client, ContactFields};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = Client::new("username", "api-key")?;
    ///     let mut fields = ContactFields::new();
    ///     fields.insert(1, "Jane".to_string());
    ///
    ///     let added = client.contacts_add("jane@example.com", &[1, 2], &fields, false).await?;
    ///     println!("added: {added}");
    ///     Ok(())
    /// }
    /// ```
    pub async fn contacts_add(
        &self,
        email: &str,
        groups: &[u64],
        fields: &ContactFields,
        overrule_unsubscribed_bounced: bool,
    ) -> Result<bool> {
        let mut params = Params::new().with("Email", email);
        params.extend(fields.iter().map(|(id, value)| (format!("Field{id}"), value)));
        params
            .insert_list("GroupID", groups)
            .insert_flag("OverruleUnsubscribedBounced", overrule_unsubscribed_bounced);

        let output = self.post("Contacts.Add", params).await?;
        Ok(confirm::matches(&output, &confirm::contact_added(email)))
    }

    /// Removes a contact from the given groups.
    pub async fn contacts_delete(&self, email: &str, groups: &[u64]) -> Result<bool> {
        let mut params = Params::new().with("Email", email);
        params.insert_list("GroupID", groups);

        let output = self.post("Contacts.Delete", params).await?;
        Ok(confirm::matches(&output, &confirm::contact_removed(email)))
    }

    pub async fn contacts_unsubscribe(&self, email: &str) -> Result<bool> {
        let params = Params::new().with("Email", email);

        let output = self.post("Contacts.Unsubscribe", params).await?;
        Ok(confirm::matches(&output, &confirm::contact_unsubscribed(email)))
    }

    /// Everything the service stores about one contact.
    pub async fn contacts_get_contact(&self, email: &str) -> Result<Value> {
        self.get("Contacts.GetContact", Params::new().with("Email", email))
            .await
    }

    /// Active contacts in the given groups.
    pub async fn contacts_get_list(&self, groups: &[u64], query: &ContactQuery) -> Result<Value> {
        let mut params = Params::new();
        params.insert_list("GroupID", groups);
        query.write_params(&mut params);

        self.get("Contacts.GetList", params).await
    }

    pub async fn contacts_get_unsubscribed(&self, query: &ContactQuery) -> Result<Value> {
        self.contact_listing("Contacts.GetUnsubscribed", query).await
    }

    pub async fn contacts_get_deleted(&self, query: &ContactQuery) -> Result<Value> {
        self.contact_listing("Contacts.GetDeleted", query).await
    }

    pub async fn contacts_get_bounced(&self, query: &ContactQuery) -> Result<Value> {
        self.contact_listing("Contacts.GetBounced", query).await
    }

    async fn contact_listing(&self, path: &str, query: &ContactQuery) -> Result<Value> {
        let mut params = Params::new();
        query.write_params(&mut params);
        self.get(path, params).await
    }
}
