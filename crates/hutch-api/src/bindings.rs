// Binding endpoints.
//
// A single binding is addressed by its "properties key". For bindings
// without arguments the broker derives it from the routing key, which is
// what `delete_binding` and `delete_exchange_binding` rely on.

use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::{Binding, BindingParams};
use crate::paths::{Endpoint, binding_props_key};

impl Client {
    /// Bindings in `vhost`, or in every vhost when `None`.
    ///
    /// `GET /api/bindings[/{vhost}]`
    pub async fn bindings(&self, vhost: Option<&str>) -> Result<Vec<Binding>, Error> {
        let path = match vhost {
            Some(vhost) => Self::path(Endpoint::BindingsByVhost, &[vhost])?,
            None => Self::path(Endpoint::AllBindings, &[])?,
        };
        self.get_list(&path).await
    }

    /// Every binding from `exchange` to `queue`.
    ///
    /// `GET /api/bindings/{vhost}/e/{exchange}/q/{queue}`
    pub async fn bindings_between(
        &self,
        vhost: &str,
        exchange: &str,
        queue: &str,
    ) -> Result<Vec<Binding>, Error> {
        let path = Self::path(Endpoint::BindingsBetweenExchQueue, &[vhost, exchange, queue])?;
        self.get_list(&path).await
    }

    /// Bind `queue` to `exchange`.
    ///
    /// `POST /api/bindings/{vhost}/e/{exchange}/q/{queue}`
    pub async fn create_binding(
        &self,
        vhost: &str,
        exchange: &str,
        queue: &str,
        params: &BindingParams,
    ) -> Result<bool, Error> {
        let path = Self::path(Endpoint::BindingsBetweenExchQueue, &[vhost, exchange, queue])?;
        debug!(vhost, exchange, queue, routing_key = %params.routing_key, "creating binding");
        self.post(&path, params).await?;
        Ok(true)
    }

    /// Remove the argument-less binding from `exchange` to `queue` with
    /// the given routing key.
    ///
    /// `DELETE /api/bindings/{vhost}/e/{exchange}/q/{queue}/{props}`
    pub async fn delete_binding(
        &self,
        vhost: &str,
        exchange: &str,
        queue: &str,
        routing_key: &str,
    ) -> Result<bool, Error> {
        let props = binding_props_key(routing_key);
        let path = Self::path(Endpoint::BindingBetweenExchQueue, &[vhost, exchange, queue, props])?;
        debug!(vhost, exchange, queue, routing_key, "deleting binding");
        self.delete(&path).await
    }

    /// Bind exchange `destination` to exchange `source`.
    ///
    /// `POST /api/bindings/{vhost}/e/{source}/e/{destination}`
    pub async fn create_exchange_binding(
        &self,
        vhost: &str,
        source: &str,
        destination: &str,
        params: &BindingParams,
    ) -> Result<bool, Error> {
        let path = Self::path(Endpoint::BindingsBetweenExchanges, &[vhost, source, destination])?;
        debug!(vhost, source, destination, routing_key = %params.routing_key, "creating exchange binding");
        self.post(&path, params).await?;
        Ok(true)
    }

    /// Every binding from exchange `source` to exchange `destination`.
    ///
    /// `GET /api/bindings/{vhost}/e/{source}/e/{destination}`
    pub async fn exchange_bindings_between(
        &self,
        vhost: &str,
        source: &str,
        destination: &str,
    ) -> Result<Vec<Binding>, Error> {
        let path = Self::path(Endpoint::BindingsBetweenExchanges, &[vhost, source, destination])?;
        self.get_list(&path).await
    }

    /// `DELETE /api/bindings/{vhost}/e/{source}/e/{destination}/{props}`
    pub async fn delete_exchange_binding(
        &self,
        vhost: &str,
        source: &str,
        destination: &str,
        routing_key: &str,
    ) -> Result<bool, Error> {
        let props = binding_props_key(routing_key);
        let path = Self::path(
            Endpoint::BindingBetweenExchanges,
            &[vhost, source, destination, props],
        )?;
        debug!(vhost, source, destination, routing_key, "deleting exchange binding");
        self.delete(&path).await
    }
}
