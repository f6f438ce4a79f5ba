//! Splits an address list into rule-sized chunks.

use crate::{Error, Result};

/// Default number of source ranges per firewall rule.
pub const DEFAULT_MAX_PER_RULE: usize = 250;

/// A contiguous slice of the address list backing one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// 1-based position of this chunk
    pub index: usize,
    pub addresses: &'a [String],
}

impl Chunk<'_> {
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

/// Number of chunks needed to hold `len` entries, `max_size` at a time.
pub fn chunk_count(len: usize, max_size: usize) -> Result<usize> {
    if max_size == 0 {
        return Err(Error::InvalidChunkSize(max_size));
    }
    let mut divide = len / max_size;
    if len % max_size > 0 {
        divide += 1;
    }
    Ok(divide)
}

/// Split `addresses` into chunks of at most `max_size` entries, in order.
///
/// Chunk `i` (0-based) covers `[i * max_size, min((i + 1) * max_size, len))`.
/// An empty list yields no chunks.
pub fn partition(addresses: &[String], max_size: usize) -> Result<Vec<Chunk<'_>>> {
    let count = chunk_count(addresses.len(), max_size)?;
    let mut chunks = Vec::with_capacity(count);

    for i in 0..count {
        let start = i * max_size;
        let end = ((i + 1) * max_size).min(addresses.len());
        chunks.push(Chunk {
            index: i + 1,
            addresses: &addresses[start..end],
        });
    }

    log::debug!(
        "Partitioned {} addresses into {} chunks of up to {}",
        addresses.len(),
        chunks.len(),
        max_size
    );

    Ok(chunks)
}
