//! Lane arithmetic for aligned 32-bit words.
//!
//! A word loaded from the restricted region is viewed as four byte lanes in
//! little-endian order: lane 0 is the least-significant byte and lives at the
//! lowest address.

/// Bytes per aligned word.
pub const WORD_BYTES: usize = 4;

/// Mask selecting the byte offset of an address within its word.
pub const OFFSET_MASK: usize = WORD_BYTES - 1;

const LOW_BITS: u32 = 0x0101_0101;
const HIGH_BITS: u32 = 0x8080_8080;

/// Byte offset of `addr` inside its containing word.
#[inline]
#[must_use]
pub const fn word_offset(addr: usize) -> usize {
    addr & OFFSET_MASK
}

/// Address of the word containing `addr`.
#[inline]
#[must_use]
pub const fn align_down(addr: usize) -> usize {
    addr & !OFFSET_MASK
}

#[inline]
#[must_use]
pub const fn is_word_aligned(addr: usize) -> bool {
    word_offset(addr) == 0
}

/// Shifts `word` right so the lane at byte `offset` becomes lane 0.
#[inline]
#[must_use]
pub const fn shift_to_lane(word: u32, offset: usize) -> u32 {
    word >> ((offset as u32) * 8)
}

/// Returns true iff at least one byte lane of `word` is zero.
///
/// `(w - 0x01010101) & !w & 0x80808080` sets the high bit of a lane only when
/// that lane borrowed through zero, so it is nonzero exactly when a zero lane
/// exists.
#[inline]
#[must_use]
pub const fn has_zero_byte(word: u32) -> bool {
    word.wrapping_sub(LOW_BITS) & !word & HIGH_BITS != 0
}

/// Index of the lowest zero lane of `word`, found by shifting each lane down
/// and masking it.
#[inline]
#[must_use]
pub const fn first_zero_lane(word: u32) -> Option<usize> {
    let mut lane = 0;
    let mut w = word;
    while lane < WORD_BYTES {
        if w & 0xff == 0 {
            return Some(lane);
        }
        w >>= 8;
        lane += 1;
    }
    None
}
