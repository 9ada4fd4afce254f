use anyhow::{bail, Result};
use chainlist_core::constants::DUMP_HEADER_LEN;
use chainlist_core::{DumpHeader, List, ListError};
use colored::*;
use tracing::{info, warn};

use super::read_input;

/// Outcome of inspecting a dump
#[derive(Debug)]
pub struct InspectReport {
    pub header: DumpHeader,
    pub file_len: usize,
    /// Elements appended by the trial restore
    pub restored: usize,
    /// Validation failure, if any
    pub error: Option<ListError>,
}

impl InspectReport {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Parse the header as found and run a full trial restore of `data`
///
/// The header is not validated here, so dumps of an unknown version are
/// still reported field by field.
pub fn inspect_bytes(data: &[u8]) -> Result<InspectReport> {
    let raw: Option<&[u8; DUMP_HEADER_LEN]> =
        data.get(..DUMP_HEADER_LEN).and_then(|head| head.try_into().ok());
    let Some(raw) = raw else {
        bail!(
            "File too short for a dump header: {} bytes, need {}",
            data.len(),
            DUMP_HEADER_LEN
        );
    };
    let header = DumpHeader::from_bytes(raw);

    let mut list: List<Vec<u8>> = List::new();
    let error = list.restore_from_bytes(data).err();

    Ok(InspectReport {
        header,
        file_len: data.len(),
        restored: list.len(),
        error,
    })
}

pub fn execute(input: &str) -> Result<()> {
    info!("Inspecting dump: {}", input);

    let data = read_input(input)?;
    let report = inspect_bytes(&data)?;
    let header = &report.header;

    println!("\n=== Dump Header ===");
    println!("Version:            {}", header.version);
    println!("Timestamp:          {} us", header.timestamp);
    println!("Terminator:         {:08x}", header.terminator);
    println!("Elements:           {}", header.count);
    println!("Payload bytes:      {}", header.total_len);
    if header.is_fixed() {
        println!("Encoding:           fixed ({} bytes each)", header.element_len);
    } else {
        println!("Encoding:           variable (length-prefixed)");
    }
    println!("Hash:               {:08x}", header.hash);
    println!("File size:          {} bytes", report.file_len);

    println!("\n=== Validation ===");
    match &report.error {
        None => println!(
            "{} Dump is valid, {} elements restored",
            "✓".green(),
            report.restored
        ),
        Some(err) => {
            warn!("Restore failed after {} elements: {}", report.restored, err);
            println!("{} {}", "✗".red(), err);
            println!(
                "Elements readable:  {}",
                report.restored.to_string().yellow()
            );
        }
    }

    Ok(())
}
