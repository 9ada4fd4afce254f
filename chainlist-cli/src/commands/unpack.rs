use anyhow::{Context, Result};
use chainlist_core::List;
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::info;

use super::read_input;

/// One restored element in JSON-friendly form
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UnpackedElement {
    pub index: usize,
    pub len: usize,
    /// `utf8` or `hex`
    pub encoding: String,
    pub value: String,
}

impl UnpackedElement {
    fn from_bytes(index: usize, bytes: &[u8]) -> Self {
        let (encoding, value) = match std::str::from_utf8(bytes) {
            Ok(s) => ("utf8", s.to_string()),
            Err(_) => ("hex", hex::encode(bytes)),
        };
        Self {
            index,
            len: bytes.len(),
            encoding: encoding.to_string(),
            value,
        }
    }
}

pub fn execute(input: &str, output: Option<&str>) -> Result<()> {
    info!("Unpacking dump: {}", input);

    let data = read_input(input)?;
    let mut list: List<Vec<u8>> = List::new();
    let restored = list
        .restore_from_bytes(&data)
        .with_context(|| format!("Failed to restore dump: {}", input))?;

    info!("Restored {} elements ({} bytes)", list.len(), restored);

    let elements: Vec<UnpackedElement> = list
        .iter()
        .enumerate()
        .map(|(i, el)| UnpackedElement::from_bytes(i, el))
        .collect();

    let json = serde_json::to_string_pretty(&elements)
        .with_context(|| "Failed to serialize restored elements")?;

    if let Some(output_path) = output {
        fs::write(output_path, json)
            .with_context(|| format!("Failed to write output file: {}", output_path))?;
        info!("Restored elements written to: {}", output_path);
    } else {
        println!("{}", json);
    }

    Ok(())
}
