use crate::{
    client::Client,
    confirm,
    error::Result,
    models::{FieldUpdate, NewField},
    params::Params,
};
use serde_json::Value;

impl Client {
    pub async fn fields_get_list(&self) -> Result<Value> {
        self.get("Fields.GetList", Params::new()).await
    }

    /// Creates a custom contact field and returns its id.
    pub async fn fields_add(&self, field: &NewField) -> Result<u64> {
        let mut params = Params::new();
        field.write_params(&mut params);

        let output = self.post("Fields.Add", params).await?;
        confirm::new_id(&output)
    }

    pub async fn fields_delete(&self, id: u64) -> Result<bool> {
        let output = self
            .post("Fields.Delete", Params::new().with("FieldID", id))
            .await?;
        Ok(confirm::matches(&output, &confirm::removed_id(id)))
    }

    pub async fn fields_update(&self, id: u64, update: &FieldUpdate) -> Result<bool> {
        let mut params = Params::new().with("FieldID", id);
        update.write_params(&mut params);

        let output = self.post("Fields.Update", params).await?;
        Ok(confirm::matches(&output, &confirm::updated_id(id)))
    }
}
