//! The restricted-region read capability.
//!
//! Flash on the target can only be read with aligned 32-bit loads; a byte or
//! half-word load faults. [`RegionRead::load_word`] is that single permitted
//! access. Everything else here (byte, half-word, misaligned word) is derived
//! from it by loading the containing word and shifting the requested lanes
//! down.

use core::cell::Cell;

use crate::word::{WORD_BYTES, align_down, is_word_aligned, shift_to_lane, word_offset};

/// Read access to a region that only supports aligned word loads.
///
/// Implementors provide [`load_word`](RegionRead::load_word). The provided
/// methods must not be changed in meaning by overrides: a backend may replace
/// [`read_byte`](RegionRead::read_byte) with a faster instruction sequence,
/// but it must return the same value.
pub trait RegionRead {
    /// Loads the word at `aligned`, whose low two bits are clear.
    ///
    /// Lane 0 of the result (its least-significant byte) is the byte at
    /// `aligned`.
    fn load_word(&self, aligned: usize) -> u32;

    /// Reads the byte at any address in the region.
    #[inline]
    fn read_byte(&self, addr: usize) -> u8 {
        shift_to_lane(self.load_word(align_down(addr)), word_offset(addr)) as u8
    }

    /// Reads the little-endian half-word at any address in the region.
    ///
    /// At offset 3 the half-word straddles two words and both are loaded.
    #[inline]
    fn read_half(&self, addr: usize) -> u16 {
        let aligned = align_down(addr);
        let offset = word_offset(addr);
        let word = self.load_word(aligned);
        if offset < WORD_BYTES - 1 {
            shift_to_lane(word, offset) as u16
        } else {
            let next = self.load_word(aligned + WORD_BYTES);
            (shift_to_lane(word, offset) | (next << 8)) as u16
        }
    }

    /// Reads the little-endian 32-bit value at any address in the region.
    #[inline]
    fn read_dword(&self, addr: usize) -> u32 {
        if is_word_aligned(addr) {
            return self.load_word(addr);
        }
        let aligned = align_down(addr);
        let shift = (word_offset(addr) as u32) * 8;
        let low = self.load_word(aligned);
        let high = self.load_word(aligned + WORD_BYTES);
        (low >> shift) | (high << (32 - shift))
    }

    #[inline]
    fn read_f32(&self, addr: usize) -> f32 {
        f32::from_bits(self.read_dword(addr))
    }
}

impl<R: RegionRead + ?Sized> RegionRead for &R {
    #[inline]
    fn load_word(&self, aligned: usize) -> u32 {
        (**self).load_word(aligned)
    }

    #[inline]
    fn read_byte(&self, addr: usize) -> u8 {
        (**self).read_byte(addr)
    }

    #[inline]
    fn read_half(&self, addr: usize) -> u16 {
        (**self).read_half(addr)
    }
}

/// Packs `bytes` into little-endian words, four lanes per word.
///
/// Lanes past the end of `bytes` are left as they are in `words`.
///
/// # Panics
///
/// Panics if `words` cannot hold `bytes`.
pub fn pack_words(bytes: &[u8], words: &mut [u32]) {
    assert!(
        words.len() * WORD_BYTES >= bytes.len(),
        "pack_words: {} words cannot hold {} bytes",
        words.len(),
        bytes.len()
    );
    for (word, chunk) in words.iter_mut().zip(bytes.chunks(WORD_BYTES)) {
        let mut lanes = word.to_le_bytes();
        lanes[..chunk.len()].copy_from_slice(chunk);
        *word = u32::from_le_bytes(lanes);
    }
}

/// An in-memory image of the restricted region.
///
/// Loads behave like the hardware: a misaligned load or a load outside the
/// image panics instead of returning data. Every load is counted, which lets
/// tests tell the word paths from the byte paths.
#[derive(Debug)]
pub struct RegionImage<W> {
    base: usize,
    words: W,
    loads: Cell<usize>,
}

/// Filler written around data placed with [`RegionImage::from_bytes`].
pub const IMAGE_FILL: u8 = 0xa5;

impl<W: AsRef<[u32]>> RegionImage<W> {
    /// Wraps `words` as the region content starting at `base`.
    ///
    /// # Panics
    ///
    /// Panics if `base` is not word aligned.
    pub fn new(base: usize, words: W) -> Self {
        assert!(
            is_word_aligned(base),
            "region image base {base:#x} is not word aligned"
        );
        Self {
            base,
            words,
            loads: Cell::new(0),
        }
    }

    #[must_use]
    pub fn base(&self) -> usize {
        self.base
    }

    /// One past the last mapped address.
    #[must_use]
    pub fn end(&self) -> usize {
        self.base + self.words.as_ref().len() * WORD_BYTES
    }

    /// Number of word loads performed so far.
    #[must_use]
    pub fn loads(&self) -> usize {
        self.loads.get()
    }

    pub fn reset_loads(&self) {
        self.loads.set(0);
    }

    #[must_use]
    pub fn words(&self) -> &[u32] {
        self.words.as_ref()
    }
}

#[cfg(feature = "alloc")]
impl RegionImage<alloc::vec::Vec<u32>> {
    /// Builds an image at `base` holding `bytes` starting `offset` bytes in.
    ///
    /// The data therefore lives at `base + offset`. Bytes before it and after
    /// it up to the next word boundary hold [`IMAGE_FILL`].
    pub fn from_bytes(base: usize, offset: usize, bytes: &[u8]) -> Self {
        let total = offset + bytes.len();
        let mut words = alloc::vec![u32::from_le_bytes([IMAGE_FILL; WORD_BYTES]); total.div_ceil(WORD_BYTES)];
        let mut staged = alloc::vec![IMAGE_FILL; words.len() * WORD_BYTES];
        staged[offset..total].copy_from_slice(bytes);
        pack_words(&staged, &mut words);
        Self::new(base, words)
    }
}

impl<W: AsRef<[u32]>> RegionRead for RegionImage<W> {
    fn load_word(&self, aligned: usize) -> u32 {
        assert!(
            is_word_aligned(aligned),
            "unaligned load at {aligned:#x} from restricted region"
        );
        let words = self.words.as_ref();
        let index = aligned
            .checked_sub(self.base)
            .map(|delta| delta / WORD_BYTES)
            .filter(|&index| index < words.len());
        match index {
            Some(index) => {
                self.loads.set(self.loads.get() + 1);
                words[index]
            }
            None => panic!(
                "load at {aligned:#x} outside region image {:#x}..{:#x}",
                self.base,
                self.end()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ESP8266_REGION_BASE;

    const BASE: usize = ESP8266_REGION_BASE;

    fn image(bytes: &[u8]) -> RegionImage<Vec<u32>> {
        RegionImage::from_bytes(BASE, 0, bytes)
    }

    #[test]
    fn read_byte_every_offset() {
        let flash = image(b"ABCDEFGH");
        for (i, &expected) in b"ABCDEFGH".iter().enumerate() {
            assert_eq!(flash.read_byte(BASE + i), expected, "offset {i}");
        }
        // One aligned load per byte, never a byte load.
        assert_eq!(flash.loads(), 8);
    }

    #[test]
    fn read_half_within_word() {
        let flash = image(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]);
        assert_eq!(flash.read_half(BASE), 0x0201);
        assert_eq!(flash.read_half(BASE + 1), 0x0302);
        assert_eq!(flash.read_half(BASE + 2), 0x0403);
        assert_eq!(flash.read_half(BASE + 4), 0x0605);
    }

    #[test]
    fn read_half_straddling_words() {
        let flash = image(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]);
        flash.reset_loads();
        assert_eq!(flash.read_half(BASE + 3), 0x0504);
        assert_eq!(flash.loads(), 2);
    }

    #[test]
    fn read_dword_aligned_and_misaligned() {
        let flash = image(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]);
        assert_eq!(flash.read_dword(BASE), 0x0403_0201);
        for offset in 1..4 {
            let expected = u32::from_le_bytes([
                offset as u8 + 1,
                offset as u8 + 2,
                offset as u8 + 3,
                offset as u8 + 4,
            ]);
            assert_eq!(flash.read_dword(BASE + offset), expected, "offset {offset}");
        }
    }

    #[test]
    fn read_f32_reinterprets_bits() {
        let flash = image(&1.5f32.to_le_bytes());
        assert_eq!(flash.read_f32(BASE), 1.5);
    }

    #[test]
    fn from_bytes_places_data_after_offset() {
        let flash = RegionImage::from_bytes(BASE, 3, b"Sun");
        assert_eq!(flash.words().len(), 2);
        assert_eq!(flash.read_byte(BASE), IMAGE_FILL);
        assert_eq!(flash.read_byte(BASE + 3), b'S');
        assert_eq!(flash.read_byte(BASE + 5), b'n');
        assert_eq!(flash.read_byte(BASE + 6), IMAGE_FILL);
        assert_eq!(flash.end(), BASE + 8);
    }

    #[test]
    #[should_panic(expected = "unaligned load")]
    fn misaligned_word_load_faults() {
        let flash = image(b"abcd");
        let _ = flash.load_word(BASE + 1);
    }

    #[test]
    #[should_panic(expected = "outside region image")]
    fn load_past_end_faults() {
        let flash = image(b"abcd");
        let _ = flash.load_word(BASE + 4);
    }

    #[test]
    #[should_panic(expected = "outside region image")]
    fn load_below_base_faults() {
        let flash = image(b"abcd");
        let _ = flash.load_word(BASE - 4);
    }

    #[test]
    fn reference_forwarding_keeps_counts() {
        let flash = image(b"abcd");
        let by_ref = &flash;
        assert_eq!(by_ref.read_byte(BASE + 2), b'c');
        assert_eq!(flash.loads(), 1);
    }

    #[test]
    fn pack_words_leaves_tail_lanes() {
        let mut words = [0xffff_ffffu32; 2];
        pack_words(&[1, 2, 3, 4, 5], &mut words);
        assert_eq!(words[0], 0x0403_0201);
        assert_eq!(words[1], 0xffff_ff05);
    }
}
