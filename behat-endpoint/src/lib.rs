//! Remote-call endpoint for Behat.
//!
//! A behavior-driven test run needs fixture content on the site under
//! test. The test driver sends an operation name and a JSON payload;
//! [`Endpoint::execute`] decodes the payload, resolves the operation from a
//! static table and runs it against the site services:
//!
//! | Operation | Result |
//! |---|---|
//! | `create-node` | created node fields, with `nid` |
//! | `delete-node` | nothing |
//! | `create-taxonomy-term` | created term fields, with `tid` |
//! | `delete-taxonomy-term` | nothing |
//! | `is-field` | `true` if `[entity_type, field_name]` is a configurable field |
//!
//! Before an entity is stored, each configurable field in the payload is
//! expanded through the handler registered for its field type, turning
//! loose test input such as `"3"` into `[{"target_id": 3}]`.
//!
//! # Example
//!
//! ```
//! use behat_endpoint::Endpoint;
//! use behat_storage::MemorySite;
//! use std::sync::Arc;
//!
//! let endpoint = Endpoint::for_site(Arc::new(MemorySite::with_defaults()));
//! let node = endpoint
//!     .execute("create-node", r#"{"title":"Example page","type":"page"}"#)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(node["nid"], 1);
//! assert_eq!(node["status"], true);
//! ```

mod dispatch;
mod error;
pub mod fields;
mod ops;

pub use dispatch::{Endpoint, Operation};
pub use error::{EndpointError, EndpointResult};
pub use ops::EntityRef;
