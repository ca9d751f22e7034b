// Management API path table
//
// Every endpoint the client talks to is listed here once, as a relative
// template under `/api/`. Placeholders are positional `{}` markers and are
// always filled with percent-escaped values, so names containing '/' (the
// default vhost) or other reserved characters stay inside their segment.

use crate::error::Error;

/// Logical name of a management API endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Overview,
    Whoami,
    AllNodes,
    NodeByName,
    AllVhosts,
    VhostByName,
    AllExchanges,
    ExchangesByVhost,
    ExchangeByName,
    PublishToExchange,
    BindingsBySourceExchange,
    BindingsByDestExchange,
    AllQueues,
    QueuesByVhost,
    QueueByName,
    PurgeQueue,
    GetFromQueue,
    BindingsOnQueue,
    AllBindings,
    BindingsByVhost,
    BindingsBetweenExchQueue,
    BindingBetweenExchQueue,
    BindingsBetweenExchanges,
    BindingBetweenExchanges,
    AllConnections,
    ConnectionByName,
    ChannelsOnConnection,
    AllChannels,
    ChannelByName,
    AllUsers,
    UserByName,
    UserPermissions,
    AllPermissions,
    VhostPermissions,
    PermissionsByVhostUser,
    AlivenessTest,
}

impl Endpoint {
    /// The URL template, relative to the `/api/` base.
    pub const fn template(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Whoami => "whoami",
            Self::AllNodes => "nodes",
            Self::NodeByName => "nodes/{}",
            Self::AllVhosts => "vhosts",
            Self::VhostByName => "vhosts/{}",
            Self::AllExchanges => "exchanges",
            Self::ExchangesByVhost => "exchanges/{}",
            Self::ExchangeByName => "exchanges/{}/{}",
            Self::PublishToExchange => "exchanges/{}/{}/publish",
            Self::BindingsBySourceExchange => "exchanges/{}/{}/bindings/source",
            Self::BindingsByDestExchange => "exchanges/{}/{}/bindings/destination",
            Self::AllQueues => "queues",
            Self::QueuesByVhost => "queues/{}",
            Self::QueueByName => "queues/{}/{}",
            Self::PurgeQueue => "queues/{}/{}/contents",
            Self::GetFromQueue => "queues/{}/{}/get",
            Self::BindingsOnQueue => "queues/{}/{}/bindings",
            Self::AllBindings => "bindings",
            Self::BindingsByVhost => "bindings/{}",
            Self::BindingsBetweenExchQueue => "bindings/{}/e/{}/q/{}",
            Self::BindingBetweenExchQueue => "bindings/{}/e/{}/q/{}/{}",
            Self::BindingsBetweenExchanges => "bindings/{}/e/{}/e/{}",
            Self::BindingBetweenExchanges => "bindings/{}/e/{}/e/{}/{}",
            Self::AllConnections => "connections",
            Self::ConnectionByName => "connections/{}",
            Self::ChannelsOnConnection => "connections/{}/channels",
            Self::AllChannels => "channels",
            Self::ChannelByName => "channels/{}",
            Self::AllUsers => "users",
            Self::UserByName => "users/{}",
            Self::UserPermissions => "users/{}/permissions",
            Self::AllPermissions => "permissions",
            Self::VhostPermissions => "vhosts/{}/permissions",
            Self::PermissionsByVhostUser => "permissions/{}/{}",
            Self::AlivenessTest => "aliveness-test/{}",
        }
    }

    /// Number of `{}` placeholders in the template.
    pub fn arity(self) -> usize {
        self.template().matches("{}").count()
    }

    /// Render the template, percent-escaping each argument in order.
    pub fn render(self, args: &[&str]) -> Result<String, Error> {
        let template = self.template();
        let expected = self.arity();
        if args.len() != expected {
            return Err(Error::Path {
                template,
                expected,
                got: args.len(),
            });
        }

        // URL normalization resolves `.` and `..` (escaped or not), which
        // would move the request onto another endpoint.
        if let Some(segment) = args.iter().find(|a| matches!(**a, "." | "..")) {
            return Err(Error::DotSegment {
                template,
                segment: (*segment).to_owned(),
            });
        }

        let mut out = String::with_capacity(template.len());
        let mut pieces = template.split("{}");
        if let Some(head) = pieces.next() {
            out.push_str(head);
        }
        for (piece, arg) in pieces.zip(args) {
            out.push_str(&escape(arg));
            out.push_str(piece);
        }
        Ok(out)
    }
}

/// Percent-escape a single path segment (`/` becomes `%2F`).
pub fn escape(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// The binding "properties key" the broker assigns to a binding without
/// arguments: the routing key itself, or `~` when the key is empty.
pub fn binding_props_key(routing_key: &str) -> &str {
    if routing_key.is_empty() { "~" } else { routing_key }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_vhost_is_escaped() {
        let path = Endpoint::QueueByName.render(&["/", "orders"]).unwrap();
        assert_eq!(path, "queues/%2F/orders");
        assert!(!path.contains("//"));
    }

    #[test]
    fn reserved_characters_never_leak_into_the_path() {
        for vhost in ["/", "a/b", "prod/eu-1", "x?y", "with space", "hash#tag"] {
            let path = Endpoint::VhostByName.render(&[vhost]).unwrap();
            let segment = path.strip_prefix("vhosts/").unwrap();
            assert!(!segment.contains('/'), "raw '/' in {path}");
            assert!(!segment.contains('?'), "raw '?' in {path}");
            assert!(!segment.contains('#'), "raw '#' in {path}");
            assert!(!segment.contains(' '), "raw ' ' in {path}");
        }
    }

    #[test]
    fn percent_sign_is_escaped_too() {
        // A caller passing an already escaped "%2F" names a vhost literally
        // called "%2F", which must not collapse into the default vhost.
        let path = Endpoint::VhostByName.render(&["%2F"]).unwrap();
        assert_eq!(path, "vhosts/%252F");
    }

    #[test]
    fn placeholders_in_the_middle_of_a_template() {
        let path = Endpoint::BindingBetweenExchQueue
            .render(&["/", "amq.direct", "jobs", "~"])
            .unwrap();
        assert_eq!(path, "bindings/%2F/e/amq.direct/q/jobs/~");
    }

    #[test]
    fn static_templates_render_verbatim() {
        assert_eq!(Endpoint::Overview.render(&[]).unwrap(), "overview");
        assert_eq!(Endpoint::AllQueues.render(&[]).unwrap(), "queues");
    }

    #[test]
    fn arity_mismatch_is_an_error() {
        let err = Endpoint::QueueByName.render(&["/"]).unwrap_err();
        assert!(matches!(
            err,
            Error::Path {
                expected: 2,
                got: 1,
                ..
            }
        ));
    }

    #[test]
    fn dot_segments_are_refused() {
        for name in [".", ".."] {
            let err = Endpoint::QueueByName.render(&["/", name]).unwrap_err();
            assert!(
                matches!(err, Error::DotSegment { ref segment, .. } if segment == name),
                "{name} rendered: {err}"
            );
        }
        // Dots inside a name are ordinary characters
        assert_eq!(
            Endpoint::QueueByName.render(&["/", "..jobs."]).unwrap(),
            "queues/%2F/..jobs."
        );
    }

    #[test]
    fn props_key_for_empty_routing_key() {
        assert_eq!(binding_props_key(""), "~");
        assert_eq!(binding_props_key("orders.created"), "orders.created");
    }
}
