//! Address decomposition for set-indexed caches.
//!
//! This module splits a 32-bit byte address into the fields a cache level uses
//! to locate a line. It provides the following:
//! 1. **Bit Widths:** Offset and set-index widths derived from the line size and set count.
//! 2. **Field Extraction:** Tag and set index for any address.
//! 3. **Total Shifts:** Shifts saturate, so widths summing to 32 bits never overflow.

/// Bit layout of an address as seen by one cache level.
///
/// Built from the level's line size and set count, both of which are powers
/// of two once the configuration has been validated. Block offset bits are
/// discarded; only the tag and set index are ever consulted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct AddressLayout {
    offset_bits: u32,
    set_bits: u32,
}

impl AddressLayout {
    /// Creates a layout for a cache with the given geometry.
    ///
    /// # Arguments
    ///
    /// * `line_size` - Line size in bytes (power of two).
    /// * `set_count` - Number of sets (power of two).
    ///
    /// # Returns
    ///
    /// The address layout with `log2(line_size)` offset bits and
    /// `log2(set_count)` set-index bits.
    pub const fn new(line_size: u32, set_count: u32) -> Self {
        Self {
            offset_bits: line_size.trailing_zeros(),
            set_bits: set_count.trailing_zeros(),
        }
    }

    /// Number of block-offset bits.
    #[inline(always)]
    pub const fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Number of set-index bits.
    #[inline(always)]
    pub const fn set_bits(&self) -> u32 {
        self.set_bits
    }

    /// Extracts the tag (the bits above offset and set index).
    #[inline(always)]
    pub const fn tag(&self, addr: u32) -> u32 {
        match addr.checked_shr(self.offset_bits + self.set_bits) {
            Some(tag) => tag,
            None => 0,
        }
    }

    /// Extracts the set index.
    #[inline(always)]
    pub const fn set(&self, addr: u32) -> u32 {
        let shifted = match addr.checked_shr(self.offset_bits) {
            Some(v) => v,
            None => 0,
        };
        shifted & self.set_mask()
    }

    /// Splits an address into `(tag, set)`.
    #[inline(always)]
    pub const fn decompose(&self, addr: u32) -> (u32, u32) {
        (self.tag(addr), self.set(addr))
    }

    const fn set_mask(&self) -> u32 {
        match 1u32.checked_shl(self.set_bits) {
            Some(v) => v - 1,
            None => u32::MAX,
        }
    }
}
