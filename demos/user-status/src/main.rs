//! Encode and decode the `UserStatusService` request and response.
//!
//! The request carries no fields (it is encoded as a single marker byte) and the response
//! carries one string. Both directions are encoded with the configured byte order and stream
//! origin, logged as hex, decoded back and compared.

use clap::{value_parser, Arg, ArgAction, Command};
use std::process::ExitCode;
use tracing::{debug, error, info, Level};
use typesupport_codec::{Config, Endianness, Reader, Record, Shape, Writer};
use typesupport_service::{Error, Registry, Service, TypeSupport};

const NAMESPACE: &str = "robethichor_interfaces::srv";
const SERVICE: &str = "UserStatusService";

/// Converts bytes to a hexadecimal string.
fn hex(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

/// Builds the service and registers it with its types.
fn register(registry: &mut Registry) -> Result<(), Error> {
    let request = Shape::builder(NAMESPACE, format!("{SERVICE}_Request")).build()?;
    let response = Shape::builder(NAMESPACE, format!("{SERVICE}_Response"))
        .string("data")
        .build()?;
    registry.register_service(Service::bind(SERVICE, request, response)?)?;
    Ok(())
}

/// Encodes `record`, decodes it back into an empty record and checks the two match.
fn exchange(support: &dyn TypeSupport, record: &Record, cfg: &Config) -> Result<bool, Error> {
    let mut writer = Writer::new(cfg);
    support.serialize(record, &mut writer)?;
    let frame = writer.freeze();
    info!(
        kind = %support.qualified_name(),
        class = ?support.size_class(),
        exact = support.serialized_size(record, cfg.origin),
        frame = %hex(&frame),
        "encoded"
    );

    let mut decoded = Record::empty(record.shape().clone());
    let mut reader = Reader::new(&frame[..], cfg);
    support.deserialize(&mut reader, &mut decoded)?;
    debug!(?decoded, remaining = reader.remaining(), "decoded");
    Ok(decoded == *record && reader.remaining() == 0)
}

fn run(data: &str, cfg: &Config) -> Result<bool, Error> {
    let mut registry = Registry::new();
    register(&mut registry)?;
    let qualified = format!("{NAMESPACE}::{SERVICE}");
    let service = registry
        .service(&qualified)
        .ok_or_else(|| Error::UnknownType(qualified.clone()))?;

    let request = Record::new(service.request().clone());
    let response = Record::new(service.response().clone()).with("data", data)?;
    let request_ok = exchange(service.request_support(), &request, cfg)?;
    let response_ok = exchange(service.response_support(), &response, cfg)?;
    Ok(request_ok && response_ok)
}

fn main() -> ExitCode {
    let matches = Command::new("typesupport-user-status")
        .about("Encode and decode the UserStatusService request and response")
        .arg(
            Arg::new("data")
                .long("data")
                .required(true)
                .value_parser(value_parser!(String))
                .help("Status text carried by the response"),
        )
        .arg(
            Arg::new("endianness")
                .long("endianness")
                .default_value("little")
                .value_parser(["little", "big"])
                .help("Byte order of scalars and length prefixes"),
        )
        .arg(
            Arg::new("origin")
                .long("origin")
                .default_value("0")
                .value_parser(value_parser!(usize))
                .help("Stream offset of the first encoded byte (e.g. after a transport header)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log decoded records"),
        )
        .get_matches();

    // Initialize logging
    let level = if matches.get_flag("verbose") {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let endianness = match matches.get_one::<String>("endianness").map(String::as_str) {
        Some("big") => Endianness::Big,
        _ => Endianness::Little,
    };
    let origin = matches.get_one::<usize>("origin").copied().unwrap_or(0);
    let cfg = Config::new(endianness).with_origin(origin);
    let data = matches
        .get_one::<String>("data")
        .map(String::as_str)
        .unwrap_or_default();

    match run(data, &cfg) {
        Ok(true) => {
            info!("round trip succeeded");
            ExitCode::SUCCESS
        }
        Ok(false) => {
            error!("decoded records do not match");
            ExitCode::FAILURE
        }
        Err(err) => {
            error!(%err, "exchange failed");
            ExitCode::FAILURE
        }
    }
}
