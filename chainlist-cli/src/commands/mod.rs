//! Subcommand implementations

pub mod inspect;
pub mod pack;
pub mod unpack;

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read};

/// Read a whole input file, or stdin when `input` is `-`
pub(crate) fn read_input(input: &str) -> Result<Vec<u8>> {
    if input == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .with_context(|| "Failed to read stdin")?;
        Ok(buf)
    } else {
        fs::read(input).with_context(|| format!("Failed to read input file: {}", input))
    }
}
