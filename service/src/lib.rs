//! Bind request and response record codecs into named service contracts.
//!
//! A request/response transport needs, for every service it dispatches, a codec for each
//! direction and a name to look the pair up by. This crate provides:
//!
//! - [TypeSupport]: the object-safe surface a dispatcher calls for one record type
//! - [Service]: a named pairing of a request shape and a response shape
//! - [Registry]: an in-memory lookup of types and services by qualified name
//!
//! # Example
//!
//! ```
//! use typesupport_codec::{Shape, SizeClass};
//! use typesupport_service::{Registry, Service};
//!
//! let request = Shape::builder("robethichor_interfaces::srv", "UserStatusService_Request")
//!     .build()
//!     .unwrap();
//! let response = Shape::builder("robethichor_interfaces::srv", "UserStatusService_Response")
//!     .string("data")
//!     .build()
//!     .unwrap();
//!
//! let mut registry = Registry::new();
//! let service = Service::bind("UserStatusService", request, response).unwrap();
//! registry.register_service(service).unwrap();
//!
//! let service = registry
//!     .service("robethichor_interfaces::srv::UserStatusService")
//!     .unwrap();
//! assert_eq!(service.request_support().size_class(), SizeClass::Plain(1));
//! assert_eq!(service.response_support().size_class(), SizeClass::Unbounded);
//! ```

mod error;
pub mod registry;
pub mod service;
pub mod support;

pub use error::Error;
pub use registry::Registry;
pub use service::Service;
pub use support::TypeSupport;
