// Exchange endpoints, including publishing through the management API.

use tracing::debug;

use crate::client::{Client, expect_record};
use crate::error::Error;
use crate::models::{Binding, Exchange, ExchangeParams, PublishOutcome, PublishParams};
use crate::paths::Endpoint;

impl Client {
    /// Exchanges in `vhost`, or in every vhost when `None`.
    ///
    /// `GET /api/exchanges[/{vhost}]`
    pub async fn exchanges(&self, vhost: Option<&str>) -> Result<Vec<Exchange>, Error> {
        let path = match vhost {
            Some(vhost) => Self::path(Endpoint::ExchangesByVhost, &[vhost])?,
            None => Self::path(Endpoint::AllExchanges, &[])?,
        };
        self.get_list(&path).await
    }

    /// `GET /api/exchanges/{vhost}/{name}`
    pub async fn exchange(&self, vhost: &str, name: &str) -> Result<Exchange, Error> {
        let path = Self::path(Endpoint::ExchangeByName, &[vhost, name])?;
        self.get_one(&path).await
    }

    /// Declare an exchange. See [`ExchangeParams::default`] for the
    /// durable / non-auto-delete / non-internal defaults.
    ///
    /// `PUT /api/exchanges/{vhost}/{name}`
    pub async fn create_exchange(
        &self,
        vhost: &str,
        name: &str,
        params: &ExchangeParams,
    ) -> Result<bool, Error> {
        let path = Self::path(Endpoint::ExchangeByName, &[vhost, name])?;
        debug!(vhost, exchange = name, kind = %params.kind, "declaring exchange");
        self.put(&path, params).await
    }

    /// `DELETE /api/exchanges/{vhost}/{name}`
    pub async fn delete_exchange(&self, vhost: &str, name: &str) -> Result<bool, Error> {
        let path = Self::path(Endpoint::ExchangeByName, &[vhost, name])?;
        debug!(vhost, exchange = name, "deleting exchange");
        self.delete(&path).await
    }

    /// Publish one message. Returns whether the broker routed it to at
    /// least one queue.
    ///
    /// `POST /api/exchanges/{vhost}/{name}/publish`
    pub async fn publish(
        &self,
        vhost: &str,
        exchange: &str,
        params: &PublishParams,
    ) -> Result<bool, Error> {
        let path = Self::path(Endpoint::PublishToExchange, &[vhost, exchange])?;
        debug!(vhost, exchange, routing_key = %params.routing_key, "publishing message");
        let reply = self.post(&path, params).await?;
        let outcome: PublishOutcome = expect_record(&path, reply)?;
        Ok(outcome.routed)
    }

    /// Bindings in which `exchange` is the source.
    ///
    /// `GET /api/exchanges/{vhost}/{name}/bindings/source`
    pub async fn exchange_bindings_as_source(
        &self,
        vhost: &str,
        exchange: &str,
    ) -> Result<Vec<Binding>, Error> {
        let path = Self::path(Endpoint::BindingsBySourceExchange, &[vhost, exchange])?;
        self.get_list(&path).await
    }

    /// Bindings in which `exchange` is the destination.
    ///
    /// `GET /api/exchanges/{vhost}/{name}/bindings/destination`
    pub async fn exchange_bindings_as_destination(
        &self,
        vhost: &str,
        exchange: &str,
    ) -> Result<Vec<Binding>, Error> {
        let path = Self::path(Endpoint::BindingsByDestExchange, &[vhost, exchange])?;
        self.get_list(&path).await
    }
}
