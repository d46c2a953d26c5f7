//! Basic logger usage example
//!
//! Demonstrates console output, log levels, named loggers and bound fields.
//!
//! Run with: cargo run --example basic_usage

use field_logger::prelude::*;
use field_logger::{build_identity, info, warn};

fn main() -> Result<()> {
    println!("=== Field Logger - Basic Usage Example ===\n");

    // Colored console output, debug and above
    let logger = Logger::builder()
        .min_level(LogLevel::Debug)
        .color(true)
        .build_identity(build_identity!())
        .build()?;

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message (stderr)");

    println!("\n2. Raising the threshold on a derived logger:");
    let quiet = logger.with_level(LogLevel::Warn);
    quiet.info("Info message (hidden)");
    quiet.warn("Warning message (visible)");

    println!("\n3. Named loggers with bound fields:");
    let http = logger
        .with_name("http")
        .with([Field::string("listen", "0.0.0.0:8080")]);
    http.info_with(
        "request",
        &[
            Field::string("path", "/health"),
            Field::uint16("status", 200),
        ],
    );
    http.with_name("auth").warn("token near expiry");

    println!("\n4. Macros and formatted messages:");
    let port = 8080;
    info!(logger, "Server listening on port {}", port);
    warn!(logger, "Slow request"; Field::uint64("ms", 950));
    logger.infof(format_args!("{} workers ready", 4));

    logger.flush()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
