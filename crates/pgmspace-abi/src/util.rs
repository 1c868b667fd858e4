//! Shared internal utilities for ABI adapters.

use core::ffi::c_char;

/// Scan a C string with an optional hard bound.
///
/// Returns `(len, terminated)`: `len` stops at the first NUL or at the bound,
/// `terminated` tells whether the NUL was seen.
///
/// # Safety
///
/// `ptr` must be valid to read up to the discovered length (and bound when given).
pub unsafe fn scan_c_string(ptr: *const c_char, bound: Option<usize>) -> (usize, bool) {
    let limit = bound.unwrap_or(usize::MAX);
    let mut i = 0usize;
    while i < limit {
        // SAFETY: caller provides validity up to the terminator or the bound.
        if unsafe { *ptr.add(i) } == 0 {
            return (i, true);
        }
        i += 1;
    }
    (limit, false)
}

/// The RAM string at `ptr` with its terminator, capped at `bound` bytes.
///
/// # Safety
///
/// Same contract as [`scan_c_string`]; the returned slice must not outlive
/// the C buffer.
pub unsafe fn c_str_bytes<'a>(ptr: *const c_char, bound: Option<usize>) -> &'a [u8] {
    let (len, terminated) = unsafe { scan_c_string(ptr, bound) };
    let span = if terminated { len + 1 } else { len };
    // SAFETY: `span` bytes were just read through `ptr`.
    unsafe { core::slice::from_raw_parts(ptr.cast::<u8>(), span) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_stops_at_nul_or_bound() {
        let s = b"abc\0def";
        let p = s.as_ptr().cast::<c_char>();
        assert_eq!(unsafe { scan_c_string(p, None) }, (3, true));
        assert_eq!(unsafe { scan_c_string(p, Some(2)) }, (2, false));
        assert_eq!(unsafe { scan_c_string(p, Some(3)) }, (3, false));
        assert_eq!(unsafe { scan_c_string(p, Some(4)) }, (3, true));
    }

    #[test]
    fn c_str_bytes_keeps_terminator() {
        let s = b"hi\0";
        let p = s.as_ptr().cast::<c_char>();
        assert_eq!(unsafe { c_str_bytes(p, None) }, b"hi\0");
        assert_eq!(unsafe { c_str_bytes(p, Some(1)) }, b"h");
    }
}
