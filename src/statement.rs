//! Ad-hoc statements built directly from query strings.

use arc_swap::ArcSwapOption;
use bytes::Bytes;
use derive_more::Constructor;
use std::sync::Arc;
use tracing::*;

use crate::error::Result;
use crate::routing::serialize_routing_key;

/// Routing hints snapshot handed to a load balancing policy when picking
/// nodes for a statement.
#[derive(Constructor, Clone, Debug)]
pub struct RoutingInfo {
    /// Statement keyspace, if explicitly set.
    pub keyspace: Option<Arc<String>>,
    /// Statement routing key, if explicitly set.
    pub routing_key: Option<Bytes>,
}

/// A simple statement built directly from a query string.
///
/// The keyspace and routing key are optional hints for token-aware load
/// balancing and are never derived by parsing the query text. Both are
/// published atomically, so a statement can be shared with an executing
/// thread while another keeps updating the hints; a reader sees either the
/// previous or the fully-formed new value.
#[derive(Debug)]
pub struct SimpleStatement {
    query: String,
    keyspace: ArcSwapOption<String>,
    routing_key: ArcSwapOption<Bytes>,
}

impl SimpleStatement {
    /// Creates a new statement with the given query string.
    pub fn new(query: impl Into<String>) -> Self {
        SimpleStatement {
            query: query.into(),
            keyspace: ArcSwapOption::empty(),
            routing_key: ArcSwapOption::empty(),
        }
    }

    /// Returns the query string.
    #[inline]
    pub fn query_string(&self) -> &str {
        &self.query
    }

    /// Returns the keyspace this statement operates on.
    ///
    /// Unless the keyspace has been explicitly set with
    /// [`set_keyspace`](Self::set_keyspace), returns `None` to avoid having
    /// to parse the query string.
    #[inline]
    pub fn keyspace(&self) -> Option<Arc<String>> {
        self.keyspace.load().clone()
    }

    /// Sets the keyspace this statement operates on.
    ///
    /// Optional hint for the load balancing layer, never mandatory. The
    /// name is not validated here; unknown keyspaces surface when the
    /// statement is executed. Statements using a fully qualified keyspace,
    /// or relying on the global one, do not need this.
    pub fn set_keyspace(&self, keyspace: String) -> &Self {
        self.keyspace.store(Some(Arc::new(keyspace)));
        self
    }

    /// Returns the routing key for this statement.
    ///
    /// Unless the routing key has been explicitly set, returns `None` to
    /// avoid having to parse the query string for the partition key.
    #[inline]
    pub fn routing_key(&self) -> Option<Bytes> {
        self.routing_key.load().as_deref().cloned()
    }

    /// Sets the routing key from a single raw value, stored verbatim.
    ///
    /// Optional hint for token-aware load balancing, never mandatory. If
    /// the partition key is composite, use
    /// [`set_composite_routing_key`](Self::set_composite_routing_key)
    /// instead.
    pub fn set_routing_key(&self, routing_key: impl Into<Bytes>) -> &Self {
        self.routing_key.store(Some(Arc::new(routing_key.into())));
        self
    }

    /// Sets the routing key from the values of a composite partition key,
    /// given in partition key column order.
    ///
    /// The components are serialized with
    /// [`serialize_routing_key`](crate::routing::serialize_routing_key)
    /// and replace any previously set routing key. On error the previous
    /// routing key stays in place.
    pub fn set_composite_routing_key<C: AsRef<[u8]>>(&self, components: &[C]) -> Result<&Self> {
        if components.is_empty() {
            warn!("Composing a routing key from no components!");
        }

        let routing_key = serialize_routing_key(components)?;
        self.routing_key.store(Some(Arc::new(routing_key)));

        Ok(self)
    }

    /// Returns a snapshot of the routing hints for the load balancing
    /// layer.
    pub fn routing_info(&self) -> RoutingInfo {
        RoutingInfo::new(self.keyspace(), self.routing_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::routing::MAX_COMPONENT_LEN;
    use std::thread;

    #[test]
    fn test_query_string() {
        let statement = SimpleStatement::new("SELECT * FROM users");
        assert_eq!(statement.query_string(), "SELECT * FROM users");
    }

    #[test]
    fn test_hints_default_to_none() {
        let statement = SimpleStatement::new("SELECT * FROM users");
        assert!(statement.keyspace().is_none());
        assert!(statement.routing_key().is_none());
    }

    #[test]
    fn test_set_keyspace_overwrites() {
        let statement = SimpleStatement::new("SELECT * FROM users");
        statement.set_keyspace("first".into());
        statement.set_keyspace("second".into());
        assert_eq!(statement.keyspace().unwrap().as_str(), "second");
    }

    #[test]
    fn test_set_routing_key_stores_bytes_verbatim() {
        let statement = SimpleStatement::new("SELECT * FROM users WHERE id = 1");

        // not a valid composite encoding, must still be stored untouched
        statement.set_routing_key(vec![0xFF, 0xFF]);
        assert_eq!(statement.routing_key().unwrap().as_ref(), &[0xFF, 0xFF]);
    }

    #[test]
    fn test_set_composite_routing_key_matches_serializer() {
        let components: &[&[u8]] = &[b"John", b"Doe"];
        let statement = SimpleStatement::new("SELECT * FROM users WHERE first = ? AND last = ?");
        statement.set_composite_routing_key(components).unwrap();

        assert_eq!(
            statement.routing_key().unwrap(),
            serialize_routing_key(components).unwrap()
        );
    }

    #[test]
    fn test_set_composite_routing_key_replaces_previous() {
        let statement = SimpleStatement::new("SELECT * FROM users WHERE id = ?");
        statement.set_composite_routing_key(&[b"first"]).unwrap();
        statement.set_composite_routing_key(&[b"other"]).unwrap();

        assert_eq!(
            statement.routing_key().unwrap(),
            serialize_routing_key(&[b"other"]).unwrap()
        );
    }

    #[test]
    fn test_set_composite_routing_key_with_no_components() {
        let statement = SimpleStatement::new("SELECT * FROM users");
        statement
            .set_composite_routing_key::<&[u8]>(&[])
            .unwrap();

        let routing_key = statement.routing_key().unwrap();
        assert!(routing_key.is_empty());
    }

    #[test]
    fn test_failed_composite_encoding_retains_previous_key() {
        let statement = SimpleStatement::new("SELECT * FROM users WHERE id = ?");
        statement.set_routing_key(vec![1, 2, 3]);

        let oversized = vec![0; MAX_COMPONENT_LEN + 1];
        let result = statement.set_composite_routing_key(&[&oversized]);

        assert!(matches!(result, Err(Error::ValueTooLarge(_))));
        assert_eq!(statement.routing_key().unwrap().as_ref(), &[1, 2, 3]);
    }

    #[test]
    fn test_setters_never_touch_query_string() {
        let statement = SimpleStatement::new("SELECT * FROM users WHERE id = ?");
        statement
            .set_keyspace("test_ks".into())
            .set_routing_key(vec![1])
            .set_composite_routing_key(&[b"1"])
            .unwrap();

        assert_eq!(
            statement.query_string(),
            "SELECT * FROM users WHERE id = ?"
        );
    }

    #[test]
    fn test_routing_info_snapshot() {
        let statement = SimpleStatement::new("SELECT * FROM users WHERE id = ?");
        statement.set_keyspace("test_ks".into()).set_routing_key(vec![1, 2]);

        let info = statement.routing_info();
        assert_eq!(info.keyspace.unwrap().as_str(), "test_ks");
        assert_eq!(info.routing_key.unwrap().as_ref(), &[1, 2]);
    }

    #[test]
    fn test_routing_key_visible_across_threads() {
        let statement = Arc::new(SimpleStatement::new("SELECT * FROM users WHERE id = ?"));

        let reader = {
            let statement = statement.clone();
            thread::spawn(move || loop {
                match statement.routing_key() {
                    Some(routing_key) => return routing_key,
                    None => thread::yield_now(),
                }
            })
        };

        statement.set_routing_key(vec![4, 2]);
        assert_eq!(reader.join().unwrap().as_ref(), &[4, 2]);
    }
}
