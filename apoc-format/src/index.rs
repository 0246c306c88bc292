//! Object address table
//!
//! Each table entry is the absolute address of an object record in the
//! loaded game image. Converting to file offsets needs the table's own file
//! offset: the table is assumed to sit at `LOAD_ADDRESS + table_offset`, and
//! no object may live before it.

use std::io::{self, Read, Seek};

use crate::reader::ObjectReader;
use crate::{DecodeError, INDEX_ENTRY_SIZE, LOAD_ADDRESS};

/// File offsets of a contiguous run of objects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectIndex {
    first: usize,
    offsets: Vec<u64>,
}

impl ObjectIndex {
    /// Read the address table entries for objects `first..=last`
    ///
    /// Fails on the first entry that is missing or points before the table;
    /// nothing after it is read.
    pub fn read<R: Read + Seek>(
        reader: &mut ObjectReader<R>,
        table_offset: u64,
        first: usize,
        last: usize,
    ) -> Result<Self, DecodeError> {
        let seek_failed = |source: io::Error| DecodeError::IndexSeek {
            offset: table_offset,
            source,
        };
        let start = (first as u64)
            .checked_mul(INDEX_ENTRY_SIZE)
            .and_then(|entries| table_offset.checked_add(entries))
            .ok_or_else(|| {
                seek_failed(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "table position out of range",
                ))
            })?;
        reader.seek_to(start).map_err(seek_failed)?;

        let mut offsets = Vec::with_capacity((last + 1).saturating_sub(first));
        for object in first..=last {
            let address = reader.read_i32().map_err(|e| {
                if e.kind() == io::ErrorKind::UnexpectedEof {
                    DecodeError::TruncatedIndex { object }
                } else {
                    DecodeError::Io(e)
                }
            })?;

            let offset = resolve_address(table_offset, address)
                .ok_or(DecodeError::BadAddress { object, address })?;

            tracing::debug!(
                "Object {} has address {:#x}, file position {} ({:#x})",
                object,
                address,
                offset,
                offset
            );
            offsets.push(offset);
        }

        Ok(Self { first, offsets })
    }

    /// File offset of `object`, if it is covered by this index
    pub fn offset(&self, object: usize) -> Option<u64> {
        object
            .checked_sub(self.first)
            .and_then(|i| self.offsets.get(i))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// `(object, file offset)` pairs in object order
    pub fn iter(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.offsets
            .iter()
            .enumerate()
            .map(move |(i, &offset)| (self.first + i, offset))
    }
}

/// Convert a stored address to a file offset
///
/// Returns `None` if the address lies before the table at `table_offset`.
pub fn resolve_address(table_offset: u64, address: i32) -> Option<u64> {
    let table_address = LOAD_ADDRESS.checked_add(table_offset)?;
    let address = u64::try_from(address).ok()?;
    let past_table = address.checked_sub(table_address)?;
    table_offset.checked_add(past_table)
}
