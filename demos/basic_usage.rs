//! Basic logger usage example
//!
//! Demonstrates console and file output, thresholds, categories and
//! per-call options.
//!
//! Run with: cargo run --example basic_usage

use message_logger::prelude::*;
use message_logger::{information, warning};

fn main() -> Result<()> {
    println!("=== Message Logger - Basic Usage Example ===\n");

    let log_dir = std::env::temp_dir().join("message_logger_demo");
    let logger = Logger::builder()
        .sink(ConsoleSink::new())
        .sink(FileSink::new())
        .build();

    logger.patch_configuration(
        &ConfigPatch::new()
            .log_level(Severity::Verbose)
            .log_file_name(log_dir.join("Demo.log").to_string_lossy())
            .include_date_in_file_name(),
    )?;

    println!("1. Logging at different levels:");
    logger.error("This is an error message");
    logger.warning("This is a warning message");
    logger.information("This is an information message");
    logger.debug("This is a debug message");
    logger.verbose("This is a verbose message");

    println!("\n2. Threshold set to Information - debug and verbose won't show:");
    logger.patch_configuration(&ConfigPatch::new().log_level(Severity::Information))?;
    logger.debug("Debug message (hidden)");
    logger.information("Information message (visible)");

    println!("\n3. Categories and per-call options:");
    logger.log_category(Severity::Information, "Success", "Deployment finished");
    logger.log_category(Severity::Warning, "PartialFailure", "2 of 3 hosts updated");
    logger.submit(
        "Custom layout",
        &SubmitOptions::new()
            .template("{Timestamp:HH:mm:ss} [{MessageLevel}] {Message}")
            .host_color(Color::Magenta),
    )?;

    println!("\n4. Severity streams:");
    logger.patch_configuration(&ConfigPatch::new().write_to_streams())?;
    warning!(logger, "Disk usage at {}%", 91);
    information!(logger, "Logged from {}", module_path!());

    logger.flush()?;
    println!(
        "\nLog file: {}",
        logger.store().resolved_file_path().display()
    );
    logger.reset_configuration();

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
