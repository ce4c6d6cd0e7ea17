//! Client-side query statements with token-aware routing hints for
//! ring-partitioned data stores.
//!
//! A [`SimpleStatement`](statement::SimpleStatement) wraps a query string
//! together with two optional hints a token-aware load balancer can use to
//! reach the replicas owning the relevant partition without parsing the
//! query text: a keyspace and a routing key. For composite partition keys,
//! the routing key is built from the individual component values using the
//! same wire format the storage layer hashes internally.
//!
//! ```rust
//! use ring_statement::statement::SimpleStatement;
//!
//! let statement =
//!     SimpleStatement::new("SELECT * FROM users WHERE first = 'John' AND last = 'Doe'");
//! statement
//!     .set_keyspace("test_ks".into())
//!     .set_composite_routing_key(&[b"John".as_ref(), b"Doe".as_ref()])
//!     .unwrap();
//!
//! assert_eq!(statement.keyspace().unwrap().as_str(), "test_ks");
//! assert!(statement.routing_key().is_some());
//! ```
//!
//! How the resulting key is hashed to a ring position, and which replicas
//! are then selected, is up to the consuming routing layer.

pub mod error;
pub mod routing;
pub mod statement;

pub use crate::statement::{RoutingInfo, SimpleStatement};

pub type Error = error::Error;
pub type Result<T> = error::Result<T>;
