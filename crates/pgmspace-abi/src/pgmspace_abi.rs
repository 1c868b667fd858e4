//! `pgm_read_*` accessors.
//!
//! `<pgmspace.h>` defines these as inline macros; the functions here give C
//! callers (and FFI users) the same reads through the word-only bus.

use core::ffi::c_void;

use pgmspace_core::RegionRead;

use crate::bus::FlashBus;

abi_fn! {
    /// Byte at `addr`.
    fn pgm_read_byte(addr: *const c_void) -> u8 {
        FlashBus::new().read_byte(addr as usize)
    }
}

abi_fn! {
    /// Little-endian 16-bit value at `addr`, any alignment.
    fn pgm_read_word(addr: *const c_void) -> u16 {
        FlashBus::new().read_half(addr as usize)
    }
}

abi_fn! {
    /// Little-endian 32-bit value at `addr`, any alignment.
    fn pgm_read_dword(addr: *const c_void) -> u32 {
        FlashBus::new().read_dword(addr as usize)
    }
}

abi_fn! {
    fn pgm_read_float(addr: *const c_void) -> f32 {
        FlashBus::new().read_f32(addr as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(C, align(4))]
    struct Table([u8; 12]);

    #[test]
    fn reads_scalar_values_at_any_offset() {
        let mut table = Table([0; 12]);
        table.0[1..5].copy_from_slice(&1.5f32.to_le_bytes());
        table.0[7..9].copy_from_slice(&0xbeefu16.to_le_bytes());
        table.0[9] = 0x7f;
        let p = table.0.as_ptr();
        unsafe {
            assert_eq!(pgm_read_float(p.add(1).cast()), 1.5);
            assert_eq!(pgm_read_dword(p.add(1).cast()), 1.5f32.to_bits());
            assert_eq!(pgm_read_word(p.add(7).cast()), 0xbeef);
            assert_eq!(pgm_read_byte(p.add(9).cast()), 0x7f);
        }
    }
}
