//! String operations with a region operand: strnlen_P, strstr_P, strncpy_P,
//! strncat_P, strncmp_P, strncasecmp_P and their unbounded forms.
//!
//! Region strings are NUL-terminated and are only ever read through
//! [`RegionRead`]. RAM strings are byte slices; a RAM slice without a NUL is
//! treated as terminated at its end.

use crate::layout::SIZE_IRRELEVANT;
use crate::region::RegionRead;
use crate::word::{WORD_BYTES, first_zero_lane, has_zero_byte, is_word_aligned};

#[inline]
fn ram_byte(s: &[u8], i: usize) -> u8 {
    s.get(i).copied().unwrap_or(0)
}

#[inline]
fn ram_strlen(s: &[u8]) -> usize {
    s.iter().position(|&b| b == 0).unwrap_or(s.len())
}

/// Returns the length of the region string at `src`, capped at `max`.
///
/// Equivalent to `strnlen_P`. The misaligned head is scanned byte by byte,
/// the aligned interior one word at a time (all four lanes tested per load),
/// and the short tail byte by byte again.
pub fn strnlen_p<R: RegionRead + ?Sized>(region: &R, src: usize, max: usize) -> usize {
    let mut cp = src;
    let mut remaining = max;

    while remaining > 0 && !is_word_aligned(cp) {
        if region.read_byte(cp) == 0 {
            return cp - src;
        }
        remaining -= 1;
        cp += 1;
    }

    while remaining >= WORD_BYTES {
        if let Some(lane) = first_zero_lane(region.load_word(cp)) {
            return cp + lane - src;
        }
        remaining -= WORD_BYTES;
        cp += WORD_BYTES;
    }

    while remaining > 0 {
        if region.read_byte(cp) == 0 {
            return cp - src;
        }
        remaining -= 1;
        cp += 1;
    }
    cp - src
}

/// Returns the length of the region string at `src`.
pub fn strlen_p<R: RegionRead + ?Sized>(region: &R, src: usize) -> usize {
    strnlen_p(region, src, SIZE_IRRELEVANT)
}

/// Locates the first occurrence of the region string `needle` in the RAM
/// string `haystack`.
///
/// Equivalent to `strstr_P`. Every haystack position is tried in turn and
/// compared one needle byte at a time. An empty needle matches at 0, also
/// for an empty haystack.
pub fn strstr_p<R: RegionRead + ?Sized>(region: &R, haystack: &[u8], needle: usize) -> Option<usize> {
    if ram_byte(haystack, 0) == 0 {
        return (region.read_byte(needle) == 0).then_some(0);
    }

    let mut start = 0usize;
    while ram_byte(haystack, start) != 0 {
        let mut i = 0usize;
        loop {
            let n = region.read_byte(needle + i);
            if n == 0 {
                return Some(start);
            }
            if n != ram_byte(haystack, start + i) {
                break;
            }
            i += 1;
        }
        start += 1;
    }
    None
}

/// Copies the region string at `src` into `dest`, writing at most `size`
/// bytes.
///
/// Equivalent to `strncpy_P`. Copying stops after the terminator. Unless
/// `size` is [`SIZE_IRRELEVANT`], the rest of the first `size` bytes of
/// `dest` is then zero-filled; with [`SIZE_IRRELEVANT`] bytes after the
/// terminator are left untouched.
///
/// When `dest` and `src` are both word aligned, whole words are copied while
/// none of their lanes is zero; the word holding the terminator is finished
/// byte by byte.
///
/// Returns the number of bytes written, clamped to `dest.len()`.
pub fn strncpy_p<R: RegionRead + ?Sized>(
    region: &R,
    dest: &mut [u8],
    src: usize,
    size: usize,
) -> usize {
    let pad = size != SIZE_IRRELEVANT;
    let mut remaining = size.min(dest.len());
    let mut read = src;
    let mut write = 0usize;

    if is_word_aligned(src | dest.as_ptr() as usize) {
        while remaining >= WORD_BYTES {
            let word = region.load_word(read);
            if has_zero_byte(word) {
                break;
            }
            dest[write..write + WORD_BYTES].copy_from_slice(&word.to_le_bytes());
            read += WORD_BYTES;
            write += WORD_BYTES;
            remaining -= WORD_BYTES;
        }
    }

    let mut ch = u8::MAX;
    while remaining > 0 && ch != 0 {
        ch = region.read_byte(read);
        dest[write] = ch;
        read += 1;
        write += 1;
        remaining -= 1;
    }

    if pad {
        dest[write..write + remaining].fill(0);
        write += remaining;
    }
    write
}

/// Copies the region string at `src`, terminator included, into `dest`.
///
/// # Panics
///
/// Panics if `dest` is too small to hold the string plus NUL.
pub fn strcpy_p<R: RegionRead + ?Sized>(region: &R, dest: &mut [u8], src: usize) -> usize {
    let len = strlen_p(region, src);
    assert!(
        dest.len() > len,
        "strcpy_P: destination buffer too small ({} bytes for {} byte string + NUL)",
        dest.len(),
        len
    );
    strncpy_p(region, dest, src, SIZE_IRRELEVANT)
}

/// Appends at most `size` bytes of the region string at `src` to the
/// NUL-terminated string in `dest`.
///
/// Equivalent to `strncat_P`. The result is always NUL-terminated.
///
/// Returns the length of the resulting string (not counting the NUL).
///
/// # Panics
///
/// Panics if `dest` is too small.
pub fn strncat_p<R: RegionRead + ?Sized>(
    region: &R,
    dest: &mut [u8],
    src: usize,
    size: usize,
) -> usize {
    let mut write = ram_strlen(dest);
    let appended = strnlen_p(region, src, size);
    assert!(
        dest.len() > write + appended,
        "strncat_P: destination buffer too small ({} bytes for {} byte result + NUL)",
        dest.len(),
        write + appended
    );

    let mut read = src;
    let mut remaining = size;
    let mut ch = u8::MAX;
    while remaining > 0 && ch != 0 {
        ch = region.read_byte(read);
        dest[write] = ch;
        read += 1;
        write += 1;
        remaining -= 1;
    }

    if ch == 0 {
        write - 1
    } else {
        dest[write] = 0;
        write
    }
}

/// Appends the whole region string at `src` to the string in `dest`.
pub fn strcat_p<R: RegionRead + ?Sized>(region: &R, dest: &mut [u8], src: usize) -> usize {
    strncat_p(region, dest, src, SIZE_IRRELEVANT)
}

fn compare_bounded<R: RegionRead + ?Sized>(
    region: &R,
    s1: &[u8],
    src: usize,
    size: usize,
    fold: fn(u8) -> u8,
) -> i32 {
    for i in 0..size {
        let a = fold(ram_byte(s1, i));
        let b = fold(region.read_byte(src + i));
        let diff = i32::from(a) - i32::from(b);
        if diff != 0 || b == 0 {
            return diff;
        }
    }
    0
}

fn identity(b: u8) -> u8 {
    b
}

/// Compares at most `size` bytes of the RAM string `s1` with the region
/// string at `src`.
///
/// Equivalent to `strncmp_P`. Returns the difference of the first differing
/// byte pair, or 0 when the strings match up to `size` bytes or end together.
pub fn strncmp_p<R: RegionRead + ?Sized>(region: &R, s1: &[u8], src: usize, size: usize) -> i32 {
    compare_bounded(region, s1, src, size, identity)
}

/// Case-insensitive (ASCII) form of [`strncmp_p`].
pub fn strncasecmp_p<R: RegionRead + ?Sized>(
    region: &R,
    s1: &[u8],
    src: usize,
    size: usize,
) -> i32 {
    compare_bounded(region, s1, src, size, |b| b.to_ascii_lowercase())
}

pub fn strcmp_p<R: RegionRead + ?Sized>(region: &R, s1: &[u8], src: usize) -> i32 {
    strncmp_p(region, s1, src, SIZE_IRRELEVANT)
}

pub fn strcasecmp_p<R: RegionRead + ?Sized>(region: &R, s1: &[u8], src: usize) -> i32 {
    strncasecmp_p(region, s1, src, SIZE_IRRELEVANT)
}
