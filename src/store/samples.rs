//! On-disk sample store access.
//!
//! A sample store is a 64-byte header followed by a flat table of
//! `(u64 key, u64 value)` pairs, both little-endian. The key is an
//! address bucket, the value its cumulated hit count. The whole table
//! is loaded on open; stores hold per-run sample counts, not
//! web-scale data, so an in-memory map is the right tradeoff.

use super::header::{StoreHeader, HEADER_SIZE};
use crate::utils::error::StoreError;
use log::debug;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

/// Size of one `(key, value)` table record in bytes
const RECORD_SIZE: usize = 16;

/// An open sample store
///
/// Read-only stores are traversal sources; writable stores accept
/// accumulating inserts and are flushed back to disk by [`close`].
///
/// [`close`]: SampleStore::close
#[derive(Debug)]
pub struct SampleStore {
    path: PathBuf,
    /// Header bytes retained verbatim, reserved region included
    raw_header: [u8; HEADER_SIZE],
    header: StoreHeader,
    table: BTreeMap<u64, u64>,
    writable: bool,
}

impl SampleStore {
    /// Open an existing store read-only
    pub fn open(path: impl AsRef<Path>) -> Result<SampleStore, StoreError> {
        Self::load(path.as_ref(), false)
    }

    /// Open an existing store for accumulation
    pub fn open_rw(path: impl AsRef<Path>) -> Result<SampleStore, StoreError> {
        Self::load(path.as_ref(), true)
    }

    /// Create a fresh, empty store with the given header
    ///
    /// The header is written out immediately; the table is flushed by
    /// [`close`](SampleStore::close).
    pub fn create(path: impl AsRef<Path>, header: StoreHeader) -> Result<SampleStore, StoreError> {
        let path = path.as_ref();
        let raw_header = header.to_bytes();

        let mut file = File::create(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        file.write_all(&raw_header).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(SampleStore {
            path: path.to_path_buf(),
            raw_header,
            header,
            table: BTreeMap::new(),
            writable: true,
        })
    }

    /// Read only the header of a store, without loading its table
    pub fn read_header(path: impl AsRef<Path>) -> Result<StoreHeader, StoreError> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut raw = [0u8; HEADER_SIZE];
        read_exact_or_truncated(&mut file, &mut raw, path)?;

        StoreHeader::parse(&raw, path)
    }

    fn load(path: &Path, writable: bool) -> Result<SampleStore, StoreError> {
        let mut file = File::open(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut raw_header = [0u8; HEADER_SIZE];
        read_exact_or_truncated(&mut file, &mut raw_header, path)?;
        let header = StoreHeader::parse(&raw_header, path)?;

        let mut body = Vec::new();
        file.read_to_end(&mut body).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if body.len() % RECORD_SIZE != 0 {
            return Err(StoreError::Truncated(path.to_path_buf()));
        }

        let mut table = BTreeMap::new();
        for record in body.chunks_exact(RECORD_SIZE) {
            let key = u64::from_le_bytes(record[0..8].try_into().unwrap());
            let value = u64::from_le_bytes(record[8..16].try_into().unwrap());
            *table.entry(key).or_insert(0) += value;
        }

        debug!("opened {} ({} keys)", path.display(), table.len());

        Ok(SampleStore {
            path: path.to_path_buf(),
            raw_header,
            header,
            table,
            writable,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &StoreHeader {
        &self.header
    }

    /// Number of distinct keys in the table
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Current hit count for a key, `None` if absent
    pub fn value(&self, key: u64) -> Option<u64> {
        self.table.get(&key).copied()
    }

    /// Accumulating insert: absent keys are inserted with `value`,
    /// present keys are replaced with the sum of old and new value.
    pub fn insert(&mut self, key: u64, value: u64) {
        debug_assert!(self.writable, "insert into read-only store");
        *self.table.entry(key).or_insert(0) += value;
    }

    /// Visit every stored key in `[low, high]`
    ///
    /// Visit order across keys is unspecified and must not be relied
    /// upon.
    pub fn traverse<F>(&self, low: u64, high: u64, mut visit: F)
    where
        F: FnMut(u64, u64),
    {
        for (&key, &value) in self.table.range(low..=high) {
            visit(key, value);
        }
    }

    /// Close the store, flushing a writable table back to disk
    ///
    /// The retained header bytes are written back verbatim, so a store
    /// seeded from another file keeps that file's header byte-for-byte.
    pub fn close(self) -> Result<(), StoreError> {
        if !self.writable {
            return Ok(());
        }

        let file = File::create(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| StoreError::Io { path, source }
        };

        writer
            .write_all(&self.raw_header)
            .map_err(io_err(&self.path))?;

        for (&key, &value) in &self.table {
            writer.write_all(&key.to_le_bytes()).map_err(io_err(&self.path))?;
            writer
                .write_all(&value.to_le_bytes())
                .map_err(io_err(&self.path))?;
        }

        writer.flush().map_err(io_err(&self.path))?;

        debug!("flushed {} ({} keys)", self.path.display(), self.table.len());

        Ok(())
    }
}

/// Read a full buffer, mapping a short read to `Truncated`
fn read_exact_or_truncated(
    file: &mut File,
    buf: &mut [u8],
    path: &Path,
) -> Result<(), StoreError> {
    file.read_exact(buf).map_err(|source| {
        if source.kind() == ErrorKind::UnexpectedEof {
            StoreError::Truncated(path.to_path_buf())
        } else {
            StoreError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}
