//! ABI layer for the `<pgmspace.h>` formatted-output functions.
//!
//! The platform's `vprintf` family already reads its format string through
//! the flash-aware string routines, so the `_P` forms only repackage their
//! variadic arguments and forward. Requires nightly `c_variadic`.

use core::ffi::{VaList, c_char, c_int};

unsafe extern "C" {
    fn vprintf(format: *const c_char, ap: VaList) -> c_int;
    fn vsprintf(s: *mut c_char, format: *const c_char, ap: VaList) -> c_int;
    fn vsnprintf(s: *mut c_char, n: usize, format: *const c_char, ap: VaList) -> c_int;
}

/// `printf_P`: `printf` with a flash-resident format.
#[cfg_attr(feature = "export-symbols", unsafe(no_mangle))]
pub unsafe extern "C" fn printf_P(format: *const c_char, mut args: ...) -> c_int {
    if format.is_null() {
        return -1;
    }
    unsafe { vprintf(format, args.as_va_list()) }
}

/// `sprintf_P`: `sprintf` with a flash-resident format.
#[cfg_attr(feature = "export-symbols", unsafe(no_mangle))]
pub unsafe extern "C" fn sprintf_P(s: *mut c_char, format: *const c_char, mut args: ...) -> c_int {
    if s.is_null() || format.is_null() {
        return -1;
    }
    unsafe { vsprintf(s, format, args.as_va_list()) }
}

/// `snprintf_P`: `snprintf` with a flash-resident format.
#[cfg_attr(feature = "export-symbols", unsafe(no_mangle))]
pub unsafe extern "C" fn snprintf_P(
    s: *mut c_char,
    n: usize,
    format: *const c_char,
    mut args: ...
) -> c_int {
    if format.is_null() {
        return -1;
    }
    unsafe { vsnprintf(s, n, format, args.as_va_list()) }
}

/// `vsnprintf_P`: `vsnprintf` with a flash-resident format.
#[cfg_attr(feature = "export-symbols", unsafe(no_mangle))]
pub unsafe extern "C" fn vsnprintf_P(
    s: *mut c_char,
    n: usize,
    format: *const c_char,
    ap: VaList,
) -> c_int {
    if format.is_null() {
        return -1;
    }
    unsafe { vsnprintf(s, n, format, ap) }
}
