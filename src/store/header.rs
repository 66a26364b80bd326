//! Fixed-size sample store header.
//!
//! The first 64 bytes of every sample store describe the sampling
//! configuration that produced it. Two stores may only be merged when
//! their identity fields agree exactly; the informational fields
//! (cpu speed, creation time) carry no identity and are ignored by the
//! coherence check.

use crate::utils::error::StoreError;
use std::path::Path;

/// Header size in bytes, fixed for format version 1
pub const HEADER_SIZE: usize = 64;

/// Magic bytes at offset 0 of every sample store
pub const MAGIC: [u8; 4] = *b"SMPS";

/// Current store format version
pub const FORMAT_VERSION: u32 = 1;

/// Typed view of a sample store header
///
/// All integers are little-endian on disk. Offsets:
/// magic 0..4, version 4..8, event_id 8..12, event_count 12..16,
/// unit_mask 16..20, is_kernel 20..24, separation_mode 24..28,
/// cpu_count 28..32, cpu_speed_khz 32..36, mtime 36..44,
/// reserved 44..64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreHeader {
    pub version: u32,
    pub event_id: u32,
    pub event_count: u32,
    pub unit_mask: u32,
    pub is_kernel: u32,
    pub separation_mode: u32,
    pub cpu_count: u32,
    /// Informational, not part of the merge identity
    pub cpu_speed_khz: u32,
    /// Informational, not part of the merge identity
    pub mtime: u64,
}

impl StoreHeader {
    /// Parse a raw header block, rejecting foreign or newer files
    pub fn parse(raw: &[u8; HEADER_SIZE], path: &Path) -> Result<StoreHeader, StoreError> {
        if raw[0..4] != MAGIC {
            return Err(StoreError::BadMagic(path.to_path_buf()));
        }

        let version = u32_at(raw, 4);
        if version != FORMAT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                path: path.to_path_buf(),
                version,
            });
        }

        Ok(StoreHeader {
            version,
            event_id: u32_at(raw, 8),
            event_count: u32_at(raw, 12),
            unit_mask: u32_at(raw, 16),
            is_kernel: u32_at(raw, 20),
            separation_mode: u32_at(raw, 24),
            cpu_count: u32_at(raw, 28),
            cpu_speed_khz: u32_at(raw, 32),
            mtime: u64_at(raw, 36),
        })
    }

    /// Serialize to the on-disk layout, reserved bytes zeroed
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut raw = [0u8; HEADER_SIZE];
        raw[0..4].copy_from_slice(&MAGIC);
        raw[4..8].copy_from_slice(&self.version.to_le_bytes());
        raw[8..12].copy_from_slice(&self.event_id.to_le_bytes());
        raw[12..16].copy_from_slice(&self.event_count.to_le_bytes());
        raw[16..20].copy_from_slice(&self.unit_mask.to_le_bytes());
        raw[20..24].copy_from_slice(&self.is_kernel.to_le_bytes());
        raw[24..28].copy_from_slice(&self.separation_mode.to_le_bytes());
        raw[28..32].copy_from_slice(&self.cpu_count.to_le_bytes());
        raw[32..36].copy_from_slice(&self.cpu_speed_khz.to_le_bytes());
        raw[36..44].copy_from_slice(&self.mtime.to_le_bytes());
        raw
    }

    /// Names of the identity fields on which `self` and `other` disagree
    ///
    /// Empty means the two headers describe the same logical run.
    /// Informational fields never appear here.
    pub fn identity_mismatches(&self, other: &StoreHeader) -> Vec<&'static str> {
        let mut fields = Vec::new();

        if self.event_id != other.event_id {
            fields.push("event_id");
        }
        if self.event_count != other.event_count {
            fields.push("event_count");
        }
        if self.unit_mask != other.unit_mask {
            fields.push("unit_mask");
        }
        if self.is_kernel != other.is_kernel {
            fields.push("is_kernel");
        }
        if self.separation_mode != other.separation_mode {
            fields.push("separation_mode");
        }
        if self.cpu_count != other.cpu_count {
            fields.push("cpu_count");
        }

        fields
    }
}

fn u32_at(raw: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(raw[offset..offset + 4].try_into().unwrap())
}

fn u64_at(raw: &[u8], offset: usize) -> u64 {
    u64::from_le_bytes(raw[offset..offset + 8].try_into().unwrap())
}
