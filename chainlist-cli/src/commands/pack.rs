use anyhow::{bail, Context, Result};
use chainlist_core::{List, ListConfig};
use serde_json::Value;
use std::fs;
use tracing::info;

use super::read_input;
use crate::SortOrder;

/// Pack options beyond input and output paths
#[derive(Debug, Clone, Default)]
pub struct PackOptions {
    /// Input is a JSON array of strings instead of one element per line
    pub json: bool,
    /// Sort elements byte-wise before dumping
    pub sort: Option<SortOrder>,
    /// Dump at most this many bytes of every element
    pub fixed_width: Option<usize>,
    /// JSON file holding a `ListConfig`
    pub config: Option<String>,
}

pub fn execute(input: &str, output: &str, options: &PackOptions) -> Result<()> {
    info!("Packing elements from {} to {}", input, output);

    let data = read_input(input)?;
    let elements = if options.json {
        parse_json(&data)?
    } else {
        parse_lines(&data)
    };
    info!("Found {} elements to pack", elements.len());

    let config = load_config(options.config.as_deref())?;
    let mut list: List<Vec<u8>> = List::with_config(config);
    list.append_all(elements)
        .with_context(|| "Failed to load elements")?;

    if let Some(order) = options.sort {
        list.set_comparator(|a, b| a.cmp(b));
        list.sort(order.into())
            .with_context(|| "Failed to sort elements")?;
        info!("Sorted {} elements ({:?})", list.len(), order);
    }

    match options.fixed_width {
        Some(0) => bail!("--fixed-width must be at least 1"),
        Some(width) => list.set_meter(move |el| el.len().min(width)),
        None => list.set_meter(|el| el.len()),
    }

    let dump = list
        .dump_to_bytes()
        .with_context(|| "Failed to encode dump")?;
    fs::write(output, &dump)
        .with_context(|| format!("Failed to write output file: {}", output))?;

    info!(
        "Successfully packed {} elements ({} bytes total)",
        list.len(),
        dump.len()
    );

    Ok(())
}

/// Load a list configuration, falling back to the defaults
pub fn load_config(path: Option<&str>) -> Result<ListConfig> {
    let Some(path) = path else {
        return Ok(ListConfig::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse config file: {}", path))
}

fn parse_lines(data: &[u8]) -> Vec<Vec<u8>> {
    if data.is_empty() {
        return Vec::new();
    }
    // A final newline does not start another element
    let body = data.strip_suffix(b"\n").unwrap_or(data);
    body.split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line).to_vec())
        .collect()
}

fn parse_json(data: &[u8]) -> Result<Vec<Vec<u8>>> {
    let values: Vec<Value> =
        serde_json::from_slice(data).with_context(|| "Failed to parse JSON input")?;

    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| match value {
            Value::String(s) => Ok(s.into_bytes()),
            other => serde_json::to_vec(&other)
                .with_context(|| format!("Failed to serialize element {}", i)),
        })
        .collect()
}
