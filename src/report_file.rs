//src/report_file.rs

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::error::Result;

/// Reads a whole Kraken2 report into memory, decompressing `.gz` files.
pub fn read_report_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let f = File::open(path)?;

    let is_gz = path
        .extension()
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let mut reader: Box<dyn Read> = if is_gz {
        Box::new(MultiGzDecoder::new(BufReader::new(f)))
    } else {
        Box::new(BufReader::new(f))
    };

    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    log::debug!("Read {} bytes from {}", text.len(), path.display());
    Ok(text)
}
