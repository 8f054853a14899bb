//! Byte-text coercion and stream spooling helpers.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// Spool chunk size: 1 MiB.
const CHUNK_SIZE: usize = 1 << 20;

/// Decode raw bytes as text, trying UTF-8 first and falling back to
/// Latin-1 (which never fails).
pub fn coerce_text(data: &[u8]) -> String {
    match std::str::from_utf8(data) {
        Ok(text) => text.to_string(),
        Err(_) => data.iter().map(|&byte| byte as char).collect(),
    }
}

/// Copy a readable stream to `dst_path` in chunks, returning the number
/// of bytes written.
pub fn save_to_file<R: Read>(reader: &mut R, dst_path: &Path) -> Result<u64> {
    let mut dst = File::create(dst_path)
        .with_context(|| format!("failed to create {}", dst_path.display()))?;
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut size: u64 = 0;

    loop {
        let read = reader
            .read(&mut buffer)
            .with_context(|| format!("failed to read stream for {}", dst_path.display()))?;
        if read == 0 {
            break;
        }
        dst.write_all(&buffer[..read])
            .with_context(|| format!("failed to write {}", dst_path.display()))?;
        size += read as u64;
    }
    Ok(size)
}
