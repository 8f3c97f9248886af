use crate::parser::{load_records, Metric};
use crate::utils::config::{FIELD_OFFSET, SCHEMA_VERSION};
use anyhow::Result;
use std::path::PathBuf;

/// Validate a dataset file and print the detected schema
pub fn validate_dataset_file(file_path: PathBuf) -> Result<()> {
    println!("Validating dataset: {}", file_path.display());

    let records = load_records(&file_path)?;
    let schema = records.schema();

    let metrics: Vec<&str> = schema.metrics.iter().map(|m| m.field_name()).collect();

    println!("✓ Valid timing dataset");
    println!("  Records: {}", records.len());
    println!("  Metrics: {}", metrics.join(", "));
    println!("  Posttransfer: {}", yes_no(schema.has_posttransfer));
    println!("  Offsets: {}", yes_no(schema.has_offset));

    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Curl Metrics Input Schema");
    println!("Report Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Input: JSON array of objects, one per request (seconds)");
        for metric in Metric::ALL {
            let requirement = if metric.is_required() {
                "required"
            } else {
                "optional"
            };
            println!("  {:<20} number  {}", metric.field_name(), requirement);
        }
        println!(
            "  {:<20} number  optional - request start within the session",
            FIELD_OFFSET
        );
        println!();
        println!("time_redirect is 0 when no redirect happened.");
        println!("All other time_* fields are cumulative from request start.");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Curl Metrics v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Statistics and phase timelines for curl request timings.");
}
