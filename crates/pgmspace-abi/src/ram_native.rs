//! The platform's RAM-only copy routines the dispatch wrappers fall back to.
//!
//! On firmware (and whenever this crate exports the standard names itself)
//! the RAM path is the toolchain's `__fast_strcpy` / `__fast_strncpy`; calling
//! the C library's `strcpy` there would re-enter our own export. Host builds
//! without exported symbols use the host C library.

use core::ffi::c_char;

pub type StrcpyFn = unsafe extern "C" fn(*mut c_char, *const c_char) -> *mut c_char;
pub type StrncpyFn = unsafe extern "C" fn(*mut c_char, *const c_char, usize) -> *mut c_char;

#[cfg(any(feature = "export-symbols", target_os = "none"))]
mod imp {
    use core::ffi::c_char;

    unsafe extern "C" {
        pub fn __fast_strcpy(dest: *mut c_char, src: *const c_char) -> *mut c_char;
        pub fn __fast_strncpy(dest: *mut c_char, src: *const c_char, n: usize) -> *mut c_char;
    }

    pub const STRCPY: super::StrcpyFn = __fast_strcpy;
    pub const STRNCPY: super::StrncpyFn = __fast_strncpy;
}

#[cfg(not(any(feature = "export-symbols", target_os = "none")))]
mod imp {
    pub const STRCPY: super::StrcpyFn = libc::strcpy;
    pub const STRNCPY: super::StrncpyFn = libc::strncpy;
}

pub use imp::{STRCPY, STRNCPY};
