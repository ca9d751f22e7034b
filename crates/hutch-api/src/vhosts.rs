// Virtual host endpoints.

use serde_json::json;
use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::{Permission, VHost};
use crate::paths::Endpoint;

impl Client {
    /// `GET /api/vhosts`
    pub async fn vhosts(&self) -> Result<Vec<VHost>, Error> {
        let path = Self::path(Endpoint::AllVhosts, &[])?;
        self.get_list(&path).await
    }

    /// Just the vhost names.
    pub async fn vhost_names(&self) -> Result<Vec<String>, Error> {
        Ok(self.vhosts().await?.into_iter().map(|v| v.name).collect())
    }

    /// `GET /api/vhosts/{name}`
    pub async fn vhost(&self, name: &str) -> Result<VHost, Error> {
        let path = Self::path(Endpoint::VhostByName, &[name])?;
        self.get_one(&path).await
    }

    /// `PUT /api/vhosts/{name}`
    pub async fn create_vhost(&self, name: &str) -> Result<bool, Error> {
        let path = Self::path(Endpoint::VhostByName, &[name])?;
        debug!(vhost = name, "creating vhost");
        self.put(&path, &json!({})).await
    }

    /// Delete a vhost. The broker drops every exchange, queue and
    /// permission that lived in it.
    ///
    /// `DELETE /api/vhosts/{name}`
    pub async fn delete_vhost(&self, name: &str) -> Result<bool, Error> {
        let path = Self::path(Endpoint::VhostByName, &[name])?;
        debug!(vhost = name, "deleting vhost");
        self.delete(&path).await
    }

    /// All permissions granted in a vhost. Requires administrator rights.
    ///
    /// `GET /api/vhosts/{name}/permissions`
    pub async fn vhost_permissions(&self, name: &str) -> Result<Vec<Permission>, Error> {
        self.require_admin("vhost_permissions").await?;
        let path = Self::path(Endpoint::VhostPermissions, &[name])?;
        self.get_list(&path).await
    }
}
