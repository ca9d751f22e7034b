// Queue endpoints: declaration, depth, purge and message fetching.

use std::collections::BTreeMap;

use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::client::{Client, decode};
use crate::error::Error;
use crate::models::{Binding, GetMessagesBody, GetMessagesParams, Message, Queue, QueueParams};
use crate::paths::Endpoint;

impl Client {
    /// Queues in `vhost`, or in every vhost when `None`.
    ///
    /// `GET /api/queues[/{vhost}]`
    pub async fn queues(&self, vhost: Option<&str>) -> Result<Vec<Queue>, Error> {
        let path = match vhost {
            Some(vhost) => Self::path(Endpoint::QueuesByVhost, &[vhost])?,
            None => Self::path(Endpoint::AllQueues, &[])?,
        };
        self.get_list(&path).await
    }

    /// `GET /api/queues/{vhost}/{name}`
    pub async fn queue(&self, vhost: &str, name: &str) -> Result<Queue, Error> {
        let path = Self::path(Endpoint::QueueByName, &[vhost, name])?;
        self.get_one(&path).await
    }

    /// Number of messages in a queue: the `messages` field of its record.
    ///
    /// Some broker versions answer with a one-element list; the entry
    /// named `name` is used then. A record without the field counts as 0.
    pub async fn queue_depth(&self, vhost: &str, name: &str) -> Result<u64, Error> {
        let path = Self::path(Endpoint::QueueByName, &[vhost, name])?;
        let record = match self.call(Method::GET, &path, None, None).await? {
            Some(Value::Array(items)) => items
                .into_iter()
                .find(|q| q.get("name").and_then(Value::as_str) == Some(name)),
            other => other,
        };
        let Some(record) = record else {
            return Err(Error::Api {
                message: format!("empty response from {path}"),
                source: None,
            });
        };

        Ok(record
            .get("messages")
            .and_then(Value::as_u64)
            .unwrap_or(0))
    }

    /// Depth of every queue in `vhost` (or everywhere), keyed by queue name.
    ///
    /// Across vhosts, queues sharing a name are summed.
    pub async fn queue_depths(&self, vhost: Option<&str>) -> Result<BTreeMap<String, u64>, Error> {
        let mut depths = BTreeMap::new();
        for q in self.queues(vhost).await? {
            *depths.entry(q.name).or_insert(0) += q.messages.unwrap_or(0);
        }
        Ok(depths)
    }

    /// Declare a queue. Unset fields are left to the broker's defaults.
    ///
    /// `PUT /api/queues/{vhost}/{name}`
    pub async fn create_queue(
        &self,
        vhost: &str,
        name: &str,
        params: &QueueParams,
    ) -> Result<bool, Error> {
        let path = Self::path(Endpoint::QueueByName, &[vhost, name])?;
        debug!(vhost, queue = name, "declaring queue");
        self.put(&path, params).await
    }

    /// Delete a queue and its messages. Use [`purge_queue`](Self::purge_queue)
    /// to keep the queue and drop only the messages.
    ///
    /// `DELETE /api/queues/{vhost}/{name}`
    pub async fn delete_queue(&self, vhost: &str, name: &str) -> Result<bool, Error> {
        let path = Self::path(Endpoint::QueueByName, &[vhost, name])?;
        debug!(vhost, queue = name, "deleting queue");
        self.delete(&path).await
    }

    /// Drop every ready message from a queue.
    ///
    /// `DELETE /api/queues/{vhost}/{name}/contents`
    pub async fn purge_queue(&self, vhost: &str, name: &str) -> Result<bool, Error> {
        let path = Self::path(Endpoint::PurgeQueue, &[vhost, name])?;
        debug!(vhost, queue = name, "purging queue");
        self.delete(&path).await
    }

    /// Purge several `(vhost, queue)` pairs in order, stopping at the first
    /// failure.
    pub async fn purge_queues(&self, queues: &[(&str, &str)]) -> Result<bool, Error> {
        for (vhost, name) in queues {
            self.purge_queue(vhost, name).await?;
        }
        Ok(true)
    }

    /// Take up to `params.count` messages off a queue.
    ///
    /// Without `requeue` the messages are acknowledged and gone; with it
    /// they return to the queue flagged as redelivered.
    ///
    /// `POST /api/queues/{vhost}/{name}/get`
    pub async fn get_messages(
        &self,
        vhost: &str,
        queue: &str,
        params: &GetMessagesParams,
    ) -> Result<Vec<Message>, Error> {
        let path = Self::path(Endpoint::GetFromQueue, &[vhost, queue])?;
        debug!(vhost, queue, count = params.count, requeue = params.requeue, "fetching messages");
        match self.post(&path, &GetMessagesBody::from(params)).await? {
            Some(value) => decode(&value),
            None => Ok(Vec::new()),
        }
    }

    /// `GET /api/queues/{vhost}/{name}/bindings`
    pub async fn queue_bindings(&self, vhost: &str, queue: &str) -> Result<Vec<Binding>, Error> {
        let path = Self::path(Endpoint::BindingsOnQueue, &[vhost, queue])?;
        self.get_list(&path).await
    }
}
