use std::sync::Arc;
use typesupport_codec::{Config, Endianness, Record, Shape, SizeClass, Value, Writer};
use typesupport_macros::test_traced;
use typesupport_service::{Error, Registry, Service, TypeSupport};

const NAMESPACE: &str = "robethichor_interfaces::srv";

fn request() -> Arc<Shape> {
    Shape::builder(NAMESPACE, "UserStatusService_Request")
        .build()
        .unwrap()
}

fn response() -> Arc<Shape> {
    Shape::builder(NAMESPACE, "UserStatusService_Response")
        .string("data")
        .build()
        .unwrap()
}

fn round_trip(support: &dyn TypeSupport, record: &Record, cfg: &Config) -> Vec<u8> {
    let mut writer = Writer::new(cfg);
    support.serialize(record, &mut writer).unwrap();
    assert_eq!(writer.len(), support.serialized_size(record, cfg.origin));
    let bytes = writer.freeze();

    let mut target = Record::empty(record.shape().clone());
    let mut reader = typesupport_codec::Reader::new(&bytes[..], cfg);
    support.deserialize(&mut reader, &mut target).unwrap();
    assert_eq!(&target, record);
    bytes.to_vec()
}

#[test_traced]
fn test_user_status_service() {
    let service = Service::bind("UserStatusService", request(), response()).unwrap();
    assert_eq!(
        service.qualified_name(),
        "robethichor_interfaces::srv::UserStatusService"
    );

    let request_support = service.request_support();
    assert_eq!(request_support.size_class(), SizeClass::Plain(1));
    let bytes = round_trip(
        request_support,
        &Record::new(service.request().clone()),
        &Config::default(),
    );
    assert_eq!(bytes, vec![0x00]);

    let response_support = service.response_support();
    assert_eq!(response_support.size_class(), SizeClass::Unbounded);
    let record = Record::new(service.response().clone())
        .with("data", "ok")
        .unwrap();
    let bytes = round_trip(response_support, &record, &Config::default());
    assert_eq!(bytes, vec![0x03, 0, 0, 0, b'o', b'k', 0]);

    let bytes = round_trip(response_support, &record, &Config::new(Endianness::Big));
    assert_eq!(bytes, vec![0, 0, 0, 0x03, b'o', b'k', 0]);
}

#[test]
fn test_response_after_transport_header() {
    // A transport that already wrote a 1-byte header continues alignment from there.
    let shape = response();
    let record = Record::new(shape.clone()).with("data", "ok").unwrap();
    let cfg = Config::default().with_origin(1);
    let bytes = round_trip(&shape, &record, &cfg);
    assert_eq!(bytes, vec![0, 0, 0, 0x03, 0, 0, 0, b'o', b'k', 0]);
}

#[test]
fn test_same_name_different_shapes() {
    // The descriptor accepts it; only the registry rejects it.
    let first = Service::bind("UserStatusService", request(), response()).unwrap();
    let second = Service::bind("UserStatusService", response(), request()).unwrap();
    assert_eq!(first.qualified_name(), second.qualified_name());

    let mut registry = Registry::new();
    registry.register_service(first).unwrap();
    assert!(matches!(
        registry.register_service(second),
        Err(Error::Duplicate(name)) if name == "robethichor_interfaces::srv::UserStatusService"
    ));
}

#[test]
fn test_lookup_by_name() {
    let mut registry = Registry::new();
    registry
        .register_service(Service::bind("UserStatusService", request(), response()).unwrap())
        .unwrap();

    let support = registry
        .type_support("robethichor_interfaces::srv::UserStatusService_Response")
        .unwrap();
    let shape = registry
        .service("robethichor_interfaces::srv::UserStatusService")
        .unwrap()
        .response()
        .clone();
    let record = Record::new(shape).with("data", "busy").unwrap();
    let bytes = round_trip(support, &record, &Config::default());
    assert_eq!(bytes.len(), 9);

    let decoded = registry
        .service("robethichor_interfaces::srv::UserStatusService")
        .unwrap()
        .response()
        .decode(&bytes[..], &Config::default())
        .unwrap();
    assert_eq!(decoded.get("data"), Some(&Value::from("busy")));
}

#[test]
fn test_null_slot_rejected() {
    let shape = response();
    let record = Record::empty(shape.clone());
    let mut writer = Writer::new(&Config::default());
    let err = TypeSupport::serialize(&shape, &record, &mut writer).unwrap_err();
    assert!(matches!(err, typesupport_codec::Error::NullInput { .. }));
    assert!(writer.is_empty());
}
