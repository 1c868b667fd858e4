//! # pgmspace-core
//!
//! Safe Rust implementations of the `<pgmspace.h>` string and memory routines.
//!
//! On the ESP8266 constant data lives in flash mapped at `0x4000_0000`, and the
//! CPU can only perform aligned 32-bit loads from that window. Every routine in
//! this crate reads its flash ("region") operand through the [`RegionRead`]
//! capability, which exposes exactly that one load, and extracts bytes and
//! half-words by shifting lanes out of the loaded word. RAM operands are plain
//! slices. No `unsafe` code is permitted at the crate level; the raw-pointer
//! boundary lives in `pgmspace-abi`.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod layout;
pub mod reference;
pub mod region;
pub mod string;
pub mod word;

pub use layout::{AddressSpace, ESP8266_REGION_BASE, LayoutError, RegionLayout, SIZE_IRRELEVANT};
pub use region::{RegionImage, RegionRead};
