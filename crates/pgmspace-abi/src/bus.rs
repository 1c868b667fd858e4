//! Hardware backend for [`RegionRead`]: reads flash through the memory bus.
//!
//! The mapped flash window only answers aligned 32-bit loads. Every load goes
//! through `read_volatile` on a `*const u32` so the compiler can never narrow
//! it into a byte or half-word access. On Xtensa the sub-word reads use the
//! same five-instruction sequence `<pgmspace.h>` inlines for `pgm_read_byte`.
//!
//! With the `byte-access` feature (targets whose flash window tolerates
//! narrow loads, and host test builds that want plain memory semantics) the
//! sub-word reads are ordinary volatile byte loads.

use pgmspace_core::RegionRead;

/// Zero-sized handle to the memory-mapped region.
#[derive(Debug, Clone, Copy)]
pub struct FlashBus {
    _private: (),
}

impl FlashBus {
    /// # Safety
    ///
    /// Every address later passed to this bus (and, for word loads, the
    /// whole containing word) must be mapped and readable for as long as the
    /// bus is used. Callers in this crate build one per C call, covering the
    /// pointer operands of that call.
    #[inline]
    #[must_use]
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl RegionRead for FlashBus {
    #[inline]
    fn load_word(&self, aligned: usize) -> u32 {
        debug_assert!(aligned % 4 == 0, "unaligned flash load at {aligned:#x}");
        // SAFETY: `FlashBus::new` contract; `aligned` is word aligned.
        unsafe { core::ptr::read_volatile(aligned as *const u32) }
    }

    #[cfg(all(target_arch = "xtensa", not(feature = "byte-access")))]
    #[inline]
    fn read_byte(&self, addr: usize) -> u8 {
        let value: u32;
        // SAFETY: `FlashBus::new` contract. The load is the containing
        // aligned word; SAR is scratch in the Xtensa call ABI.
        unsafe {
            core::arch::asm!(
                "extui {off}, {addr}, 0, 2",
                "sub {addr}, {addr}, {off}",
                "l32i.n {val}, {addr}, 0",
                "slli {off}, {off}, 3",
                "ssr {off}",
                "srl {val}, {val}",
                addr = inout(reg) addr => _,
                off = out(reg) _,
                val = out(reg) value,
                options(pure, readonly, nostack),
            );
        }
        value as u8
    }

    #[cfg(all(target_arch = "xtensa", not(feature = "byte-access")))]
    #[inline]
    fn read_half(&self, addr: usize) -> u16 {
        if addr & 3 == 3 {
            // Straddles two words; the shift sequence only covers one.
            return u16::from(self.read_byte(addr)) | (u16::from(self.read_byte(addr + 1)) << 8);
        }
        let value: u32;
        // SAFETY: as in `read_byte`.
        unsafe {
            core::arch::asm!(
                "extui {off}, {addr}, 0, 2",
                "sub {addr}, {addr}, {off}",
                "l32i.n {val}, {addr}, 0",
                "slli {off}, {off}, 3",
                "ssr {off}",
                "srl {val}, {val}",
                addr = inout(reg) addr => _,
                off = out(reg) _,
                val = out(reg) value,
                options(pure, readonly, nostack),
            );
        }
        value as u16
    }

    #[cfg(feature = "byte-access")]
    #[inline]
    fn read_byte(&self, addr: usize) -> u8 {
        // SAFETY: `FlashBus::new` contract; narrow loads are permitted here.
        unsafe { core::ptr::read_volatile(addr as *const u8) }
    }

    #[cfg(feature = "byte-access")]
    #[inline]
    fn read_half(&self, addr: usize) -> u16 {
        u16::from(self.read_byte(addr)) | (u16::from(self.read_byte(addr + 1)) << 8)
    }
}
