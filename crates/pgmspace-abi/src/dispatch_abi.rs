//! Address-space dispatch for the standard copy routines.
//!
//! The compiler lowers `printf("literal")` and friends into `strcpy` calls, so
//! a flash-resident literal can reach `strcpy` with no `_P` in sight. The
//! exported `strcpy`, `strncpy` and `memmove_P` therefore classify their
//! source pointer against the active [`RegionLayout`] and route:
//!
//! | source | `strcpy` | `strncpy` | `memmove_P` |
//! |---|---|---|---|
//! | region | `strcpy_P` | `strncpy_P` | `memcpy_P` |
//! | RAM | `__fast_strcpy` | `__fast_strncpy` | overlap-safe `memmove` |
//!
//! The `route_*` functions take the layout and the RAM routine as arguments;
//! the exports bind them to [`config::region_layout`] and the platform
//! routines.

use core::ffi::{c_char, c_void};

use pgmspace_core::{AddressSpace, RegionLayout};

use crate::config;
pub use crate::ram_native::{StrcpyFn, StrncpyFn};
use crate::ram_native::{STRCPY, STRNCPY};
use crate::string_abi::{memcpy_P, strcpy_P, strncpy_P};

/// Routes a `strcpy` by the address space of `src`.
///
/// # Safety
///
/// The `strcpy` contract for whichever routine is chosen.
pub unsafe fn route_strcpy(
    layout: RegionLayout,
    ram: StrcpyFn,
    dest: *mut c_char,
    src: *const c_char,
) -> *mut c_char {
    match layout.classify(src as usize) {
        AddressSpace::Region => unsafe { strcpy_P(dest, src) },
        AddressSpace::Ram => unsafe { ram(dest, src) },
    }
}

/// Routes a `strncpy` by the address space of `src`.
///
/// # Safety
///
/// The `strncpy` contract for whichever routine is chosen.
pub unsafe fn route_strncpy(
    layout: RegionLayout,
    ram: StrncpyFn,
    dest: *mut c_char,
    src: *const c_char,
    n: usize,
) -> *mut c_char {
    match layout.classify(src as usize) {
        AddressSpace::Region => unsafe { strncpy_P(dest, src, n) },
        AddressSpace::Ram => unsafe { ram(dest, src, n) },
    }
}

/// Routes a `memmove` whose source may be in the region.
///
/// Region sources cannot overlap RAM destinations, so they take the plain
/// flash copy; RAM sources keep `memmove` overlap semantics.
///
/// # Safety
///
/// `dest` must be writable and `src` readable for `n` bytes.
pub unsafe fn route_memmove(
    layout: RegionLayout,
    dest: *mut c_void,
    src: *const c_void,
    n: usize,
) -> *mut c_void {
    if n == 0 {
        return dest;
    }
    match layout.classify(src as usize) {
        AddressSpace::Region => unsafe { memcpy_P(dest, src, n) },
        AddressSpace::Ram => {
            unsafe { core::ptr::copy(src.cast::<u8>(), dest.cast::<u8>(), n) };
            dest
        }
    }
}

abi_fn! {
    /// `strcpy` that also accepts flash-resident sources.
    fn strcpy(dest: *mut c_char, src: *const c_char) -> *mut c_char {
        route_strcpy(config::region_layout(), STRCPY, dest, src)
    }
}

abi_fn! {
    /// `strncpy` that also accepts flash-resident sources.
    fn strncpy(dest: *mut c_char, src: *const c_char, n: usize) -> *mut c_char {
        route_strncpy(config::region_layout(), STRNCPY, dest, src, n)
    }
}

abi_fn! {
    fn memmove_P(dest: *mut c_void, src: *const c_void, n: usize) -> *mut c_void {
        route_memmove(config::region_layout(), dest, src, n)
    }
}
