//! In-memory lookup of record types and services by qualified name.

use crate::{Error, Service, TypeSupport};
use std::{
    collections::{hash_map::Entry, HashMap},
    sync::Arc,
};
use tracing::debug;
use typesupport_codec::{Resolver, Shape};

/// Types and services registered by qualified name (`namespace::Name`).
///
/// Names are unique: registering a second, different type or any second service under an
/// existing name fails with [Error::Duplicate]. Registering the same shape twice is a no-op.
#[derive(Debug, Default)]
pub struct Registry {
    types: HashMap<String, Arc<Shape>>,
    services: HashMap<String, Arc<Service>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a record type under its qualified name.
    pub fn register_type(&mut self, shape: Arc<Shape>) -> Result<(), Error> {
        let name = shape.qualified_name();
        match self.types.entry(name) {
            Entry::Occupied(existing) => {
                if Arc::ptr_eq(existing.get(), &shape) || **existing.get() == *shape {
                    return Ok(());
                }
                Err(Error::Duplicate(existing.key().clone()))
            }
            Entry::Vacant(slot) => {
                debug!(name = %slot.key(), class = ?shape.classify(), "registered type");
                slot.insert(shape);
                Ok(())
            }
        }
    }

    /// Registers a service along with its request and response types.
    ///
    /// Nothing is registered if any of the three names conflicts.
    pub fn register_service(&mut self, service: Service) -> Result<Arc<Service>, Error> {
        let name = service.qualified_name();
        if self.services.contains_key(&name) {
            return Err(Error::Duplicate(name));
        }
        for shape in [service.request(), service.response()] {
            if let Some(existing) = self.types.get(&shape.qualified_name()) {
                if !Arc::ptr_eq(existing, shape) && **existing != **shape {
                    return Err(Error::Duplicate(shape.qualified_name()));
                }
            }
        }

        self.register_type(service.request().clone())?;
        self.register_type(service.response().clone())?;
        let service = Arc::new(service);
        self.services.insert(name.clone(), service.clone());
        debug!(name = %name, "registered service");
        Ok(service)
    }

    /// Binds a service from the qualified names of already registered types and registers it.
    pub fn bind_service(
        &mut self,
        name: &str,
        request: &str,
        response: &str,
    ) -> Result<Arc<Service>, Error> {
        let request = self.require(request)?;
        let response = self.require(response)?;
        self.register_service(Service::bind(name, request, response)?)
    }

    /// Returns the codec surface of a registered type.
    pub fn type_support(&self, qualified_name: &str) -> Option<&dyn TypeSupport> {
        self.types
            .get(qualified_name)
            .map(|shape| shape as &dyn TypeSupport)
    }

    /// Returns a registered service.
    pub fn service(&self, qualified_name: &str) -> Option<&Arc<Service>> {
        self.services.get(qualified_name)
    }

    /// Iterates over registered services in no particular order.
    pub fn services(&self) -> impl Iterator<Item = &Arc<Service>> {
        self.services.values()
    }

    fn require(&self, qualified_name: &str) -> Result<Arc<Shape>, Error> {
        self.types
            .get(qualified_name)
            .cloned()
            .ok_or_else(|| Error::UnknownType(qualified_name.to_string()))
    }
}

impl Resolver for Registry {
    fn resolve(&self, qualified_name: &str) -> Option<Arc<Shape>> {
        self.types.get(qualified_name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typesupport_codec::{Primitive, SizeClass};
    use typesupport_macros::test_traced;

    fn point() -> Arc<Shape> {
        Shape::builder("geometry", "Point")
            .scalar("x", Primitive::F64)
            .scalar("y", Primitive::F64)
            .build()
            .unwrap()
    }

    #[test_traced]
    fn test_register_type() {
        let mut registry = Registry::new();
        let shape = point();
        registry.register_type(shape.clone()).unwrap();

        // Same shape (or an identical one) again is fine.
        registry.register_type(shape.clone()).unwrap();
        registry.register_type(point()).unwrap();

        let other = Shape::builder("geometry", "Point")
            .scalar("x", Primitive::F32)
            .build()
            .unwrap();
        assert!(matches!(
            registry.register_type(other),
            Err(Error::Duplicate(name)) if name == "geometry::Point"
        ));

        let support = registry.type_support("geometry::Point").unwrap();
        assert_eq!(support.size_class(), SizeClass::Plain(16));
        assert!(registry.type_support("geometry::Pose").is_none());
    }

    #[test]
    fn test_resolver() {
        let mut registry = Registry::new();
        registry.register_type(point()).unwrap();
        let path = Shape::builder("geometry", "Path")
            .nested_named("start", &registry, "geometry::Point")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(path.classify(), SizeClass::Plain(16));

        let missing = Shape::builder("geometry", "Path").nested_named(
            "start",
            &registry,
            "geometry::Pose",
        );
        assert!(missing.is_err());
    }

    #[test]
    fn test_bind_service_by_name() {
        let mut registry = Registry::new();
        let reply = Shape::builder("geometry::srv", "Locate_Response")
            .nested("at", point())
            .build()
            .unwrap();
        let query = Shape::builder("geometry::srv", "Locate_Request")
            .string("name")
            .build()
            .unwrap();
        registry.register_type(query).unwrap();
        registry.register_type(reply).unwrap();

        let service = registry
            .bind_service(
                "Locate",
                "geometry::srv::Locate_Request",
                "geometry::srv::Locate_Response",
            )
            .unwrap();
        assert_eq!(service.qualified_name(), "geometry::srv::Locate");
        assert_eq!(registry.services().count(), 1);

        assert!(matches!(
            registry.bind_service("Find", "geometry::srv::Find_Request", "x"),
            Err(Error::UnknownType(name)) if name == "geometry::srv::Find_Request"
        ));
    }

    #[test]
    fn test_conflicting_service_registers_nothing() {
        let mut registry = Registry::new();
        let request = Shape::builder("demo::srv", "Ping_Request").build().unwrap();
        let response = Shape::builder("demo::srv", "Ping_Response")
            .scalar("ok", Primitive::Bool)
            .build()
            .unwrap();
        let conflicting = Shape::builder("demo::srv", "Ping_Response")
            .string("ok")
            .build()
            .unwrap();
        registry.register_type(conflicting).unwrap();

        let service = Service::bind("Ping", request, response).unwrap();
        assert!(matches!(
            registry.register_service(service),
            Err(Error::Duplicate(name)) if name == "demo::srv::Ping_Response"
        ));
        assert!(registry.type_support("demo::srv::Ping_Request").is_none());
        assert!(registry.service("demo::srv::Ping").is_none());
    }
}
