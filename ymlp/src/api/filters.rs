use crate::{client::Client, confirm, error::Result, models::NewFilter, params::Params};
use serde_json::Value;

impl Client {
    /// Lists saved filters; `overrule_deleted` includes deleted ones.
    pub async fn filters_get_list(&self, overrule_deleted: bool) -> Result<Value> {
        let mut params = Params::new();
        params.insert_flag("OverruleDeleted", overrule_deleted);

        self.get("Filters.GetList", params).await
    }

    /// Creates a filter and returns its id.
    pub async fn filters_add(&self, filter: &NewFilter) -> Result<u64> {
        let mut params = Params::new();
        filter.write_params(&mut params);

        let output = self.post("Filters.Add", params).await?;
        confirm::new_id(&output)
    }

    pub async fn filters_delete(&self, id: u64) -> Result<Value> {
        self.post("Filters.Delete", Params::new().with("FilterID", id))
            .await
    }
}
