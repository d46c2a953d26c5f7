//! File logging example
//!
//! Demonstrates routing low-severity records and errors to separate files.
//!
//! Run with: cargo run --example file_logging

use field_logger::prelude::*;
use std::fs;

fn main() -> Result<()> {
    println!("=== Field Logger - File Logging Example ===\n");

    // Warn and below go to application.log, error and above to errors.log
    let logger = Logger::builder()
        .format(OutputFormat::Json)
        .low_output("application.log")
        .high_output("errors.log")
        .build()?;

    println!("1. Logging to application.log and errors.log:");
    let app = logger.with([Field::string("component", "bootstrap")]);
    app.info("Application started");
    app.debug("Loading configuration... (below threshold)");
    app.info("Configuration loaded successfully");
    app.warn("Using default settings for some options");
    app.info_with(
        "Database connection established",
        &[Field::uint16("pool", 16)],
    );
    app.error("Failed to load optional plugin");
    app.info("Application initialization complete");

    println!("\n2. Bridging a line-oriented writer:");
    {
        use std::io::Write;
        let mut legacy = logger.with_name("legacy").standard();
        writeln!(legacy, "legacy subsystem says hello")?;
    }

    logger.flush()?;
    println!(
        "   {} records written, {} lost",
        logger.metrics().total_written(),
        logger.metrics().total_lost()
    );

    for path in ["application.log", "errors.log"] {
        println!("\n=== {} ===", path);
        print!("{}", fs::read_to_string(path)?);
    }

    Ok(())
}
