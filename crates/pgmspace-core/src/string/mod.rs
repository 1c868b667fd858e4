//! Region-aware string and memory operations.
//!
//! Implements the `_P` half of `<pgmspace.h>`: each function reads its region
//! operand through [`RegionRead`](crate::RegionRead) and works against RAM
//! operands given as slices. RAM strings are NUL-terminated byte slices; a
//! slice that ends without a NUL is treated as terminated at its end.

pub mod mem;
pub mod str;

pub use mem::{memccpy_p, memchr_p, memcmp_p, memcpy_p, memmem_p};
pub use str::{
    strcasecmp_p, strcat_p, strcmp_p, strcpy_p, strlen_p, strncasecmp_p, strncat_p, strncmp_p,
    strncpy_p, strnlen_p, strstr_p,
};
