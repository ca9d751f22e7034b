// Administrator gate.
//
// Privileged methods call `require_admin` first. The answer comes from the
// `administrator` role tag of `GET /api/whoami` and is cached for the life
// of the client: one lookup per instance, no invalidation. A failed lookup
// is not cached.

use tokio::sync::OnceCell;
use tracing::debug;

use crate::client::Client;
use crate::error::Error;

/// Per-client memo of the authenticated user's admin status.
#[derive(Debug, Default)]
pub(crate) struct AdminGate {
    is_admin: OnceCell<bool>,
}

impl AdminGate {
    /// The cached answer, if a lookup already happened.
    pub(crate) fn cached(&self) -> Option<bool> {
        self.is_admin.get().copied()
    }
}

impl Client {
    /// Whether the configured credentials carry the `administrator` tag.
    ///
    /// The first call issues `GET /api/whoami`; later calls reuse the answer.
    pub async fn has_admin_rights(&self) -> Result<bool, Error> {
        let is_admin = self
            .admin
            .is_admin
            .get_or_try_init(|| async {
                let me = self.whoami().await?;
                let is_admin = me.is_administrator();
                debug!(user = %me.name, is_admin, "resolved administrator status");
                Ok::<_, Error>(is_admin)
            })
            .await?;
        Ok(*is_admin)
    }

    /// Fail with [`Error::Permission`] unless the user is an administrator.
    ///
    /// Runs before any request specific to `operation` is sent.
    pub(crate) async fn require_admin(&self, operation: &str) -> Result<(), Error> {
        if self.has_admin_rights().await? {
            Ok(())
        } else {
            Err(Error::Permission {
                user: self.username().to_owned(),
                operation: operation.to_owned(),
            })
        }
    }

    /// The cached admin status, without triggering a lookup.
    pub fn cached_admin_rights(&self) -> Option<bool> {
        self.admin.cached()
    }
}
