//! Memory operations with a region source: memcpy_P, memcmp_P, memccpy_P,
//! memmem_P, memchr_P.
//!
//! Lengths are clamped to the RAM slice the same way the RAM-native routines
//! in this workspace clamp to `min(n, len)`.

use crate::region::RegionRead;
use crate::word::{WORD_BYTES, is_word_aligned};

/// Copies `n` bytes from the region at `src` into `dest`.
///
/// Equivalent to `memcpy_P`. When `dest` and `src` both start on a word
/// boundary the bulk of the copy moves whole words; the remaining tail (and
/// any misaligned copy) goes byte by byte.
///
/// Returns the number of bytes copied, `min(n, dest.len())`.
pub fn memcpy_p<R: RegionRead + ?Sized>(
    region: &R,
    dest: &mut [u8],
    src: usize,
    n: usize,
) -> usize {
    let count = n.min(dest.len());
    let mut done = 0usize;

    if is_word_aligned(src | dest.as_ptr() as usize) {
        for chunk in dest[..count].chunks_exact_mut(WORD_BYTES) {
            chunk.copy_from_slice(&region.load_word(src + done).to_le_bytes());
            done += WORD_BYTES;
        }
    }

    for (i, byte) in dest[done..count].iter_mut().enumerate() {
        *byte = region.read_byte(src + done + i);
    }
    count
}

/// Compares the first `n` bytes of `buf` with the region at `src`.
///
/// Equivalent to `memcmp_P`. Returns `buf[i] - region[i]` for the first
/// differing index, or 0 when all compared bytes match.
pub fn memcmp_p<R: RegionRead + ?Sized>(region: &R, buf: &[u8], src: usize, n: usize) -> i32 {
    let count = n.min(buf.len());
    for (i, &a) in buf[..count].iter().enumerate() {
        let b = region.read_byte(src + i);
        if a != b {
            return i32::from(a) - i32::from(b);
        }
    }
    0
}

/// Copies bytes from the region at `src` into `dest` until `c` has been
/// copied or `n` bytes were written.
///
/// Equivalent to `memccpy_P`. Returns the index in `dest` just past the copied
/// `c`, or `None` when `c` did not occur within the copied bytes.
pub fn memccpy_p<R: RegionRead + ?Sized>(
    region: &R,
    dest: &mut [u8],
    src: usize,
    c: u8,
    n: usize,
) -> Option<usize> {
    let count = n.min(dest.len());
    for (i, slot) in dest[..count].iter_mut().enumerate() {
        let ch = region.read_byte(src + i);
        *slot = ch;
        if ch == c {
            return Some(i + 1);
        }
    }
    None
}

/// Finds the first occurrence of the `needle_len`-byte region pattern at
/// `needle` inside `haystack`.
///
/// Equivalent to `memmem_P`. Candidates are found by matching the first
/// pattern byte, then verified byte by byte. An empty pattern matches at 0;
/// a pattern longer than the haystack never matches.
pub fn memmem_p<R: RegionRead + ?Sized>(
    region: &R,
    haystack: &[u8],
    needle: usize,
    needle_len: usize,
) -> Option<usize> {
    if needle_len == 0 {
        return Some(0);
    }
    if needle_len > haystack.len() {
        return None;
    }

    let first = region.read_byte(needle);
    let last_start = haystack.len() - needle_len;
    (0..=last_start).find(|&start| {
        haystack[start] == first
            && (1..needle_len).all(|i| region.read_byte(needle + i) == haystack[start + i])
    })
}

/// Scans the first `len` bytes of the region at `src` for `c`.
///
/// Equivalent to `memchr_P`. Returns the region address of the match.
pub fn memchr_p<R: RegionRead + ?Sized>(
    region: &R,
    src: usize,
    c: u8,
    len: usize,
) -> Option<usize> {
    (src..src + len).find(|&addr| region.read_byte(addr) == c)
}
