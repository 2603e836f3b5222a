use crate::{client::Client, confirm, error::Result, params::Params};
use serde_json::Value;

impl Client {
    pub async fn groups_get_list(&self) -> Result<Value> {
        self.get("Groups.GetList", Params::new()).await
    }

    /// Creates a group and returns its id.
    pub async fn groups_add(&self, name: &str) -> Result<u64> {
        let output = self
            .post("Groups.Add", Params::new().with("GroupName", name))
            .await?;
        confirm::new_id(&output)
    }

    pub async fn groups_delete(&self, id: u64) -> Result<bool> {
        let output = self
            .post("Groups.Delete", Params::new().with("GroupID", id))
            .await?;
        Ok(confirm::matches(&output, &confirm::removed_id(id)))
    }

    /// Renames a group.
    pub async fn groups_update(&self, id: u64, name: &str) -> Result<bool> {
        let params = Params::new().with("GroupID", id).with("GroupName", name);

        let output = self.post("Groups.Update", params).await?;
        Ok(confirm::matches(&output, &confirm::updated_id(id)))
    }

    /// Removes every contact from a group, keeping the group itself.
    pub async fn groups_empty(&self, id: u64) -> Result<Value> {
        self.post("Groups.Empty", Params::new().with("GroupID", id))
            .await
    }
}
