// Broker-level endpoints: overview, identity, nodes, aliveness.

use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::{AlivenessStatus, Node, Overview, Whoami};
use crate::paths::Endpoint;

impl Client {
    /// Broker overview.
    ///
    /// `GET /api/overview`
    pub async fn overview(&self) -> Result<Overview, Error> {
        let path = Self::path(Endpoint::Overview, &[])?;
        self.get_one(&path).await
    }

    /// Who the broker thinks the configured credentials belong to.
    ///
    /// `GET /api/whoami`
    pub async fn whoami(&self) -> Result<Whoami, Error> {
        let path = Self::path(Endpoint::Whoami, &[])?;
        self.get_one(&path).await
    }

    /// `GET /api/nodes`
    pub async fn nodes(&self) -> Result<Vec<Node>, Error> {
        let path = Self::path(Endpoint::AllNodes, &[])?;
        self.get_list(&path).await
    }

    /// `GET /api/nodes/{name}`
    pub async fn node(&self, name: &str) -> Result<Node, Error> {
        let path = Self::path(Endpoint::NodeByName, &[name])?;
        self.get_one(&path).await
    }

    /// Run the broker-side aliveness test on `vhost`.
    ///
    /// The broker declares a test queue, publishes to it and consumes the
    /// message back. Returns `true` when it reports `"ok"`. Requires
    /// administrator rights; a missing vhost is reported as [`Error::Api`].
    ///
    /// `GET /api/aliveness-test/{vhost}`
    pub async fn is_alive(&self, vhost: &str) -> Result<bool, Error> {
        self.require_admin("is_alive").await?;

        let path = Self::path(Endpoint::AlivenessTest, &[vhost])?;
        debug!(vhost, "running aliveness test");
        let status: AlivenessStatus = match self.get_one(&path).await {
            Ok(status) => status,
            Err(err) if err.is_not_found() => {
                return Err(Error::api(format!("No vhost named '{vhost}'"), err));
            }
            Err(err) => return Err(err),
        };
        Ok(status.status == "ok")
    }
}
