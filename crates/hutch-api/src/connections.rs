// Connection and channel endpoints (read-only, plus force-close).

use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::{Channel, Connection};
use crate::paths::Endpoint;

impl Client {
    /// `GET /api/connections`
    pub async fn connections(&self) -> Result<Vec<Connection>, Error> {
        let path = Self::path(Endpoint::AllConnections, &[])?;
        self.get_list(&path).await
    }

    /// `GET /api/connections/{name}`
    pub async fn connection(&self, name: &str) -> Result<Connection, Error> {
        let path = Self::path(Endpoint::ConnectionByName, &[name])?;
        self.get_one(&path).await
    }

    /// Force-close a client connection. `reason` is passed to the broker in
    /// the `X-Reason` header and shows up in the client's close frame.
    ///
    /// `DELETE /api/connections/{name}`
    pub async fn delete_connection(&self, name: &str, reason: Option<&str>) -> Result<bool, Error> {
        let path = Self::path(Endpoint::ConnectionByName, &[name])?;
        debug!(connection = name, ?reason, "closing connection");

        let headers = match reason {
            Some(reason) => {
                let value = HeaderValue::from_str(reason).map_err(|e| Error::Api {
                    message: format!("invalid close reason: {e}"),
                    source: None,
                })?;
                let mut headers = HeaderMap::new();
                headers.insert("X-Reason", value);
                Some(headers)
            }
            None => None,
        };
        self.delete_with_headers(&path, headers).await
    }

    /// `GET /api/connections/{name}/channels`
    pub async fn connection_channels(&self, name: &str) -> Result<Vec<Channel>, Error> {
        let path = Self::path(Endpoint::ChannelsOnConnection, &[name])?;
        self.get_list(&path).await
    }

    /// `GET /api/channels`
    pub async fn channels(&self) -> Result<Vec<Channel>, Error> {
        let path = Self::path(Endpoint::AllChannels, &[])?;
        self.get_list(&path).await
    }

    /// `GET /api/channels/{name}`
    pub async fn channel(&self, name: &str) -> Result<Channel, Error> {
        let path = Self::path(Endpoint::ChannelByName, &[name])?;
        self.get_one(&path).await
    }
}
