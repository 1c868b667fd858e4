#![cfg_attr(not(test), no_std)]
#![cfg_attr(feature = "stdio", feature(c_variadic))]
#![cfg_attr(
    all(target_arch = "xtensa", not(feature = "byte-access")),
    feature(asm_experimental_arch)
)]
// The exported names are fixed by <pgmspace.h> (memcpy_P, strncpy_P, ...).
#![allow(non_snake_case)]
// All extern "C" exports accept raw pointers from C callers and document the
// shared contract at module level; per-function safety docs would repeat it.
#![allow(clippy::missing_safety_doc)]
//! # pgmspace-abi
//!
//! ABI-compatible `extern "C"` boundary for `<pgmspace.h>`.
//!
//! Each `_P` entry point turns its raw pointers into a [`FlashBus`] (for the
//! flash operand) and RAM slices, then delegates to the safe routines in
//! `pgmspace-core`. The standard-named copy entry points (`strcpy`,
//! `strncpy`, `memmove_P`) classify their source pointer against the active
//! [`RegionLayout`](pgmspace_core::RegionLayout) and route to either the
//! flash-aware routine or the platform's RAM-native one.
//!
//! # Architecture
//!
//! ```text
//! C caller -> dispatch wrapper -> classifier -> _P entry (this crate) -> core impl -> return
//!                                          \-> RAM-native platform routine
//! ```
//!
//! Symbols are unmangled only with the `export-symbols` feature.

#[macro_use]
mod macros;

pub mod bus;
pub mod config;
pub mod dispatch_abi;
pub mod pgmspace_abi;
mod ram_native;
#[cfg(feature = "stdio")]
pub mod stdio_abi;
pub mod string_abi;
pub mod util;

pub use bus::FlashBus;
