// User and permission endpoints. All of them require administrator rights.

use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::{Permission, PermissionParams, User, UserParams};
use crate::paths::Endpoint;

impl Client {
    // ── Users ────────────────────────────────────────────────────────

    /// `GET /api/users`
    pub async fn users(&self) -> Result<Vec<User>, Error> {
        self.require_admin("users").await?;
        let path = Self::path(Endpoint::AllUsers, &[])?;
        match self.get_list(&path).await {
            Err(err) if err.status() == Some(401) => Err(Error::api(
                format!("User '{}' is not an administrator", self.username()),
                err,
            )),
            other => other,
        }
    }

    /// `GET /api/users/{name}`
    pub async fn user(&self, name: &str) -> Result<User, Error> {
        self.require_admin("user").await?;
        let path = Self::path(Endpoint::UserByName, &[name])?;
        self.get_one(&path).await
    }

    /// Create a user, or replace the password and tags of an existing one.
    ///
    /// `PUT /api/users/{name}`
    pub async fn create_user(&self, name: &str, params: &UserParams) -> Result<bool, Error> {
        self.require_admin("create_user").await?;
        let path = Self::path(Endpoint::UserByName, &[name])?;
        debug!(user = name, tags = %params.tags, "creating user");
        self.put(&path, params).await
    }

    /// `DELETE /api/users/{name}`
    pub async fn delete_user(&self, name: &str) -> Result<bool, Error> {
        self.require_admin("delete_user").await?;
        let path = Self::path(Endpoint::UserByName, &[name])?;
        debug!(user = name, "deleting user");
        self.delete(&path).await
    }

    /// Every permission granted to one user, across vhosts.
    ///
    /// `GET /api/users/{name}/permissions`
    pub async fn user_permissions(&self, name: &str) -> Result<Vec<Permission>, Error> {
        self.require_admin("user_permissions").await?;
        let path = Self::path(Endpoint::UserPermissions, &[name])?;
        self.get_list(&path).await
    }

    // ── Permissions ──────────────────────────────────────────────────

    /// `GET /api/permissions`
    pub async fn permissions(&self) -> Result<Vec<Permission>, Error> {
        self.require_admin("permissions").await?;
        let path = Self::path(Endpoint::AllPermissions, &[])?;
        self.get_list(&path).await
    }

    /// `GET /api/permissions/{vhost}/{user}`
    pub async fn permission(&self, vhost: &str, user: &str) -> Result<Permission, Error> {
        self.require_admin("permission").await?;
        let path = Self::path(Endpoint::PermissionsByVhostUser, &[vhost, user])?;
        self.get_one(&path).await
    }

    /// Grant `user` the given configure / write / read patterns on `vhost`.
    /// Both must already exist.
    ///
    /// `PUT /api/permissions/{vhost}/{user}`
    pub async fn set_permission(
        &self,
        vhost: &str,
        user: &str,
        params: &PermissionParams,
    ) -> Result<bool, Error> {
        self.require_admin("set_permission").await?;
        let path = Self::path(Endpoint::PermissionsByVhostUser, &[vhost, user])?;
        debug!(vhost, user, "setting permissions");
        self.put(&path, params).await
    }

    /// `DELETE /api/permissions/{vhost}/{user}`
    pub async fn delete_permission(&self, vhost: &str, user: &str) -> Result<bool, Error> {
        self.require_admin("delete_permission").await?;
        let path = Self::path(Endpoint::PermissionsByVhostUser, &[vhost, user])?;
        debug!(vhost, user, "revoking permissions");
        self.delete(&path).await
    }
}
