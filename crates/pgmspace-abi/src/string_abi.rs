//! ABI layer for the `<pgmspace.h>` string and memory functions.
//!
//! Each function is an `extern "C"` entry point that:
//! 1. Returns the null/zero sentinel for null operands and zero lengths
//! 2. Wraps the flash operand in a [`FlashBus`] and the RAM operands in slices
//! 3. Delegates to the `pgmspace-core` routine and maps its result back to a
//!    pointer or integer
//!
//! Flash operands are plain addresses here; they are never dereferenced
//! except through the bus.

use core::ffi::{c_char, c_int, c_void};
use core::ptr;

use pgmspace_core::{SIZE_IRRELEVANT, string};

use crate::bus::FlashBus;
use crate::util::{c_str_bytes, scan_c_string};

#[inline]
fn addr<T>(p: *const T) -> usize {
    p as usize
}

// ---------------------------------------------------------------------------
// Lengths and search
// ---------------------------------------------------------------------------

abi_fn! {
    /// `strnlen_P`: length of the flash string at `s`, capped at `size`.
    fn strnlen_P(s: *const c_char, size: usize) -> usize {
        if s.is_null() || size == 0 {
            return 0;
        }
        string::strnlen_p(&FlashBus::new(), addr(s), size)
    }
}

abi_fn! {
    fn strlen_P(s: *const c_char) -> usize {
        if s.is_null() {
            return 0;
        }
        string::strlen_p(&FlashBus::new(), addr(s))
    }
}

abi_fn! {
    /// `strstr_P`: first occurrence of the flash string `needle` in the RAM
    /// string `haystack`.
    fn strstr_P(haystack: *const c_char, needle: *const c_char) -> *mut c_char {
        if haystack.is_null() || needle.is_null() {
            return ptr::null_mut();
        }
        let hay = c_str_bytes(haystack, None);
        match string::strstr_p(&FlashBus::new(), hay, addr(needle)) {
            Some(at) => haystack.add(at).cast_mut(),
            None => ptr::null_mut(),
        }
    }
}

abi_fn! {
    /// `memmem_P`: first occurrence of the `find_size`-byte flash pattern in
    /// the RAM buffer `buf`.
    fn memmem_P(buf: *const c_void, buf_size: usize, find: *const c_void, find_size: usize) -> *mut c_void {
        if buf.is_null() {
            return ptr::null_mut();
        }
        if find_size == 0 {
            return buf.cast_mut();
        }
        if find.is_null() {
            return ptr::null_mut();
        }
        let haystack = core::slice::from_raw_parts(buf.cast::<u8>(), buf_size);
        match string::memmem_p(&FlashBus::new(), haystack, addr(find), find_size) {
            Some(at) => buf.cast::<u8>().add(at).cast_mut().cast(),
            None => ptr::null_mut(),
        }
    }
}

abi_fn! {
    /// `memchr_P`: flash address of the first `c` in `length` bytes at `src`.
    fn memchr_P(src: *const c_void, c: c_int, length: usize) -> *mut c_void {
        if src.is_null() || length == 0 {
            return ptr::null_mut();
        }
        match string::memchr_p(&FlashBus::new(), addr(src), c as u8, length) {
            Some(found) => src.cast::<u8>().add(found - addr(src)).cast_mut().cast(),
            None => ptr::null_mut(),
        }
    }
}

// ---------------------------------------------------------------------------
// Copies
// ---------------------------------------------------------------------------

abi_fn! {
    /// `memcpy_P`: copies `count` bytes from flash into RAM. Returns `dest`.
    fn memcpy_P(dest: *mut c_void, src: *const c_void, count: usize) -> *mut c_void {
        if dest.is_null() || src.is_null() || count == 0 {
            return dest;
        }
        let out = core::slice::from_raw_parts_mut(dest.cast::<u8>(), count);
        string::memcpy_p(&FlashBus::new(), out, addr(src), count);
        dest
    }
}

abi_fn! {
    /// `memccpy_P`: copies until `c` (compared as a byte) has been copied or
    /// `count` bytes were written. Returns the byte after the copied `c`, or
    /// null.
    fn memccpy_P(dest: *mut c_void, src: *const c_void, c: c_int, count: usize) -> *mut c_void {
        if dest.is_null() || src.is_null() || count == 0 {
            return ptr::null_mut();
        }
        let out = core::slice::from_raw_parts_mut(dest.cast::<u8>(), count);
        match string::memccpy_p(&FlashBus::new(), out, addr(src), c as u8, count) {
            Some(after) => dest.cast::<u8>().add(after).cast(),
            None => ptr::null_mut(),
        }
    }
}

abi_fn! {
    /// `strncpy_P`: copies at most `size` bytes of the flash string, padding
    /// with NUL unless `size` is `SIZE_IRRELEVANT`. Returns `dest`.
    fn strncpy_P(dest: *mut c_char, src: *const c_char, size: usize) -> *mut c_char {
        if dest.is_null() || src.is_null() || size == 0 {
            return dest;
        }
        let bus = FlashBus::new();
        let span = if size == SIZE_IRRELEVANT {
            string::strlen_p(&bus, addr(src)) + 1
        } else {
            size
        };
        let out = core::slice::from_raw_parts_mut(dest.cast::<u8>(), span);
        string::strncpy_p(&bus, out, addr(src), size);
        dest
    }
}

abi_fn! {
    fn strcpy_P(dest: *mut c_char, src: *const c_char) -> *mut c_char {
        strncpy_P(dest, src, SIZE_IRRELEVANT)
    }
}

abi_fn! {
    /// `strncat_P`: appends at most `size` bytes of the flash string to the
    /// RAM string `dest`, always terminating. Returns `dest`.
    fn strncat_P(dest: *mut c_char, src: *const c_char, size: usize) -> *mut c_char {
        if dest.is_null() || src.is_null() || size == 0 {
            return dest;
        }
        let bus = FlashBus::new();
        let (existing, _) = scan_c_string(dest, None);
        let appended = string::strnlen_p(&bus, addr(src), size);
        let out = core::slice::from_raw_parts_mut(dest.cast::<u8>(), existing + appended + 1);
        string::strncat_p(&bus, out, addr(src), size);
        dest
    }
}

abi_fn! {
    fn strcat_P(dest: *mut c_char, src: *const c_char) -> *mut c_char {
        strncat_P(dest, src, SIZE_IRRELEVANT)
    }
}

// ---------------------------------------------------------------------------
// Comparisons
// ---------------------------------------------------------------------------

abi_fn! {
    /// `memcmp_P`: compares `size` bytes of RAM at `buf` with flash at `src`.
    fn memcmp_P(buf: *const c_void, src: *const c_void, size: usize) -> c_int {
        if buf.is_null() || src.is_null() || size == 0 {
            return 0;
        }
        let ram = core::slice::from_raw_parts(buf.cast::<u8>(), size);
        string::memcmp_p(&FlashBus::new(), ram, addr(src), size)
    }
}

abi_fn! {
    /// `strncmp_P`: compares at most `size` bytes of the RAM string `s1`
    /// with the flash string `s2`.
    fn strncmp_P(s1: *const c_char, s2: *const c_char, size: usize) -> c_int {
        if s1.is_null() || s2.is_null() || size == 0 {
            return 0;
        }
        let ram = c_str_bytes(s1, Some(size));
        string::strncmp_p(&FlashBus::new(), ram, addr(s2), size)
    }
}

abi_fn! {
    fn strcmp_P(s1: *const c_char, s2: *const c_char) -> c_int {
        strncmp_P(s1, s2, SIZE_IRRELEVANT)
    }
}

abi_fn! {
    /// `strncasecmp_P`: ASCII case-insensitive [`strncmp_P`].
    fn strncasecmp_P(s1: *const c_char, s2: *const c_char, size: usize) -> c_int {
        if s1.is_null() || s2.is_null() || size == 0 {
            return 0;
        }
        let ram = c_str_bytes(s1, Some(size));
        string::strncasecmp_p(&FlashBus::new(), ram, addr(s2), size)
    }
}

abi_fn! {
    fn strcasecmp_P(s1: *const c_char, s2: *const c_char) -> c_int {
        strncasecmp_P(s1, s2, SIZE_IRRELEVANT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Host stand-in for a flash table: word aligned and padded to whole words.
    #[repr(C, align(4))]
    struct Flash<const N: usize>([u8; N]);

    impl<const N: usize> Flash<N> {
        fn at(&self, offset: usize) -> *const c_char {
            self.0[offset..].as_ptr().cast()
        }
    }

    fn flash_str<const N: usize>(offset: usize, s: &[u8]) -> Flash<N> {
        let mut f = Flash([0u8; N]);
        f.0[offset..offset + s.len()].copy_from_slice(s);
        f
    }

    #[test]
    fn null_and_zero_length_sentinels() {
        let mut buf = [0u8; 4];
        let d = buf.as_mut_ptr();
        unsafe {
            assert_eq!(strnlen_P(ptr::null(), 5), 0);
            assert_eq!(strlen_P(ptr::null()), 0);
            assert!(strstr_P(ptr::null(), ptr::null()).is_null());
            assert!(memchr_P(ptr::null(), 0, 4).is_null());
            assert_eq!(memcpy_P(d.cast(), ptr::null(), 4), d.cast());
            assert!(memccpy_P(d.cast(), ptr::null(), 0, 4).is_null());
            assert_eq!(strncpy_P(d.cast(), ptr::null(), 4), d.cast());
            assert_eq!(memcmp_P(buf.as_ptr().cast(), ptr::null(), 4), 0);
            assert_eq!(strncmp_P(buf.as_ptr().cast(), ptr::null(), 4), 0);
        }
    }

    #[test]
    fn strnlen_and_strlen() {
        let f = flash_str::<16>(1, b"hello\0");
        unsafe {
            assert_eq!(strlen_P(f.at(1)), 5);
            assert_eq!(strnlen_P(f.at(1), 3), 3);
            assert_eq!(strnlen_P(f.at(1), 0), 0);
        }
    }

    #[test]
    fn strncpy_pads_and_sentinel_skips_padding() {
        let f = flash_str::<8>(0, b"abcd\0");
        let mut dest = [0xeeu8; 8];
        unsafe {
            strncpy_P(dest.as_mut_ptr().cast(), f.at(0), 8);
        }
        assert_eq!(&dest, b"abcd\0\0\0\0");

        let mut dest = [0xeeu8; 8];
        unsafe {
            strcpy_P(dest.as_mut_ptr().cast(), f.at(0));
        }
        assert_eq!(&dest, b"abcd\0\xee\xee\xee");
    }

    #[test]
    fn strncat_appends_and_terminates() {
        let f = flash_str::<8>(2, b"world\0");
        let mut dest = [0xeeu8; 16];
        dest[..7].copy_from_slice(b"hello, ");
        dest[7] = 0;
        unsafe {
            strncat_P(dest.as_mut_ptr().cast(), f.at(2), 3);
        }
        assert_eq!(&dest[..11], b"hello, wor\0");
        assert_eq!(dest[11], 0xee);
        unsafe {
            strcat_P(dest.as_mut_ptr().cast(), f.at(2));
        }
        assert_eq!(&dest[..16], b"hello, worworld\0");
    }

    #[test]
    fn memccpy_returns_pointer_after_match() {
        let f = flash_str::<12>(1, b"key=value");
        let mut dest = [0u8; 9];
        let d = dest.as_mut_ptr();
        let got = unsafe { memccpy_P(d.cast(), f.at(1).cast(), b'=' as c_int, 9) };
        assert_eq!(got, unsafe { d.add(4) }.cast());
        assert_eq!(&dest[..4], b"key=");
    }

    #[test]
    fn memchr_returns_flash_address() {
        let f = flash_str::<8>(3, b"abc");
        let got = unsafe { memchr_P(f.at(3).cast(), b'c' as c_int, 3) };
        assert_eq!(got as usize, f.at(5) as usize);
    }

    #[test]
    fn search_and_compare() {
        let needle = flash_str::<8>(1, b"lo w\0");
        let hay = b"hello world\0";
        unsafe {
            let at = strstr_P(hay.as_ptr().cast(), needle.at(1));
            assert_eq!(at as usize, hay.as_ptr() as usize + 3);
            let at = memmem_P(hay.as_ptr().cast(), 11, needle.at(1).cast(), 4);
            assert_eq!(at as usize, hay.as_ptr() as usize + 3);
            assert_eq!(memmem_P(hay.as_ptr().cast(), 11, needle.at(1).cast(), 0), hay.as_ptr().cast_mut().cast());
        }

        let word = flash_str::<8>(0, b"Hello\0");
        unsafe {
            assert_eq!(strcmp_P(b"Hello\0".as_ptr().cast(), word.at(0)), 0);
            assert_eq!(strcasecmp_P(b"hELLO\0".as_ptr().cast(), word.at(0)), 0);
            assert!(strcmp_P(b"Help\0".as_ptr().cast(), word.at(0)) > 0);
            assert_eq!(strncmp_P(b"Help\0".as_ptr().cast(), word.at(0), 3), 0);
            assert_eq!(memcmp_P(b"Hello".as_ptr().cast(), word.at(0).cast(), 5), 0);
        }
    }
}
