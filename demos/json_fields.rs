//! Structured fields example
//!
//! Demonstrates every kind of field value rendered as JSON lines.
//!
//! Run with: cargo run --example json_fields

use chrono::Utc;
use field_logger::core::field::Complex;
use field_logger::prelude::*;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct Upstream {
    host: String,
    port: u16,
    tls: bool,
}

struct Version(u8, u8, u8);

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}.{}.{}", self.0, self.1, self.2)
    }
}

fn main() -> Result<()> {
    let logger = Logger::new(Options::new().level("debug").format("json"))?;

    logger.info_with(
        "numbers",
        &[
            Field::int8("i8", -8),
            Field::uint64("u64", u64::MAX),
            Field::float32("f32", 1.5),
            Field::float64("nan", f64::NAN),
            Field::complex128("z", Complex::new(1.0, -2.0)),
        ],
    );

    logger.info_with(
        "text and time",
        &[
            Field::string("user", "alice"),
            Field::binary("digest", vec![0xde, 0xad, 0xbe, 0xef]),
            Field::time("at", Utc::now()),
            Field::duration("elapsed", Duration::from_millis(1250)),
            Field::stringer("version", Version(0, 3, 1)),
        ],
    );

    logger.info_with(
        "composite",
        &[
            Field::array(
                "tags",
                vec![
                    FieldContent::from("a"),
                    FieldContent::Int(1),
                    FieldContent::Array(vec![FieldContent::Bool(true)]),
                ],
            ),
            Field::json("limits", serde_json::json!({"rps": 100, "burst": 20})),
            Field::reflect(
                "upstream",
                Upstream {
                    host: "db.internal".to_string(),
                    port: 5432,
                    tls: true,
                },
            ),
        ],
    );

    let err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
    logger.error_with(
        "dial failed",
        &[Field::error("error", err), Field::nil("skipped")],
    );

    logger
        .debug_builder()
        .message("built fluently")
        .field("attempt", 3u32)
        .field("ok", false)
        .log();

    logger.flush()
}
