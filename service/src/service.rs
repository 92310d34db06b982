//! Named pairing of a request shape and a response shape.

use crate::{Error, TypeSupport};
use std::sync::Arc;
use tracing::debug;
use typesupport_codec::Shape;

/// A bidirectional service contract.
///
/// The service never touches bytes itself: it only pairs the two record codecs under one name
/// for a transport to look up. Binding two services with the same name is allowed; uniqueness
/// is enforced by whoever performs the lookup (see [crate::Registry]).
#[derive(Clone, Debug)]
pub struct Service {
    namespace: String,
    name: String,
    request: Arc<Shape>,
    response: Arc<Shape>,
}

impl Service {
    /// Binds `request` and `response` under `name`.
    ///
    /// The service lives in the namespace of its request type. `name` must be a non-empty
    /// identifier (ASCII letters, digits and `_`, not starting with a digit).
    pub fn bind(
        name: impl Into<String>,
        request: Arc<Shape>,
        response: Arc<Shape>,
    ) -> Result<Self, Error> {
        let name = name.into();
        validate_name(&name)?;
        let service = Self {
            namespace: request.namespace().to_string(),
            name,
            request,
            response,
        };
        debug!(
            service = %service.qualified_name(),
            request = %service.request.qualified_name(),
            response = %service.response.qualified_name(),
            "bound service"
        );
        Ok(service)
    }

    /// Name of the service.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace of the service.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns `namespace::name`, the key a transport looks the service up by.
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.namespace, self.name)
        }
    }

    /// Shape of the request.
    pub fn request(&self) -> &Arc<Shape> {
        &self.request
    }

    /// Shape of the response.
    pub fn response(&self) -> &Arc<Shape> {
        &self.response
    }

    /// Codec surface of the request.
    pub fn request_support(&self) -> &dyn TypeSupport {
        &self.request
    }

    /// Codec surface of the response.
    pub fn response_support(&self) -> &dyn TypeSupport {
        &self.response
    }
}

pub(crate) fn validate_name(name: &str) -> Result<(), Error> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if !valid {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(())
}
