use crate::{
    client::Client,
    error::Result,
    models::{ArchiveQuery, BounceQuery, ClickQuery, ListQuery},
    params::Params,
};
use serde_json::Value;

impl Client {
    /// Newsletters sent so far.
    pub async fn archive_get_list(&self, query: &ArchiveQuery) -> Result<Value> {
        let mut params = Params::new();
        query.write_params(&mut params);

        self.get("Archive.GetList", params).await
    }

    /// Delivery statistics for one newsletter.
    pub async fn archive_get_summary(&self, newsletter_id: u64) -> Result<Value> {
        self.get("Archive.GetSummary", newsletter(newsletter_id))
            .await
    }

    pub async fn archive_get_recipients(&self, newsletter_id: u64, query: &ListQuery) -> Result<Value> {
        self.newsletter_listing("Archive.GetRecipients", newsletter_id, query)
            .await
    }

    pub async fn archive_get_delivered(&self, newsletter_id: u64, query: &ListQuery) -> Result<Value> {
        self.newsletter_listing("Archive.GetDelivered", newsletter_id, query)
            .await
    }

    pub async fn archive_get_bounces(&self, newsletter_id: u64, query: &BounceQuery) -> Result<Value> {
        let mut params = newsletter(newsletter_id);
        query.write_params(&mut params);

        self.get("Archive.GetBounces", params).await
    }

    /// Opens for a newsletter; `unique_opens` counts each contact once.
    pub async fn archive_get_opens(
        &self,
        newsletter_id: u64,
        unique_opens: bool,
        query: &ListQuery,
    ) -> Result<Value> {
        let mut params = newsletter(newsletter_id);
        params.insert_flag("UniqueOpens", unique_opens);
        query.write_params(&mut params);

        self.get("Archive.GetOpens", params).await
    }

    pub async fn archive_get_unopened(&self, newsletter_id: u64, query: &ListQuery) -> Result<Value> {
        self.newsletter_listing("Archive.GetUnopened", newsletter_id, query)
            .await
    }

    pub async fn archive_get_tracked_links(&self, newsletter_id: u64) -> Result<Value> {
        self.get("Archive.GetTrackedLinks", newsletter(newsletter_id))
            .await
    }

    pub async fn archive_get_clicks(&self, newsletter_id: u64, query: &ClickQuery) -> Result<Value> {
        let mut params = newsletter(newsletter_id);
        query.write_params(&mut params);

        self.get("Archive.GetClicks", params).await
    }

    pub async fn archive_get_forwards(&self, newsletter_id: u64, query: &ListQuery) -> Result<Value> {
        self.newsletter_listing("Archive.GetForwards", newsletter_id, query)
            .await
    }

    async fn newsletter_listing(&self, path: &str, newsletter_id: u64, query: &ListQuery) -> Result<Value> {
        let mut params = newsletter(newsletter_id);
        query.write_params(&mut params);
        self.get(path, params).await
    }
}

fn newsletter(id: u64) -> Params {
    Params::new().with("NewsletterID", id)
}
