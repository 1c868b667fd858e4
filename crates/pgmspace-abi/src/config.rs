//! Active region layout.
//!
//! The default base is baked in at build time from `PGMSPACE_REGION_BASE`
//! (see `build.rs`). Firmware or tests may replace it at runtime; the value is
//! held in an atomic so the dispatch wrappers read it with a single load.

use core::sync::atomic::{AtomicUsize, Ordering};

use pgmspace_core::RegionLayout;

include!(concat!(env!("OUT_DIR"), "/region_base.rs"));

// Always holds a word-aligned base; `set_region_layout` only accepts a
// validated `RegionLayout`.
static REGION_BASE: AtomicUsize = AtomicUsize::new(DEFAULT_REGION_BASE);

/// The layout this crate was built with.
#[must_use]
pub const fn default_region_layout() -> RegionLayout {
    RegionLayout::new(DEFAULT_REGION_BASE)
}

/// The layout the dispatch wrappers classify against.
#[must_use]
pub fn region_layout() -> RegionLayout {
    RegionLayout::new(REGION_BASE.load(Ordering::Relaxed))
}

/// Replaces the active layout and returns the previous one.
pub fn set_region_layout(layout: RegionLayout) -> RegionLayout {
    RegionLayout::new(REGION_BASE.swap(layout.base(), Ordering::Relaxed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_build_time_base() {
        assert_eq!(default_region_layout().base(), DEFAULT_REGION_BASE);
        assert_eq!(DEFAULT_REGION_BASE % 4, 0);
    }

    #[test]
    fn set_returns_previous_and_restores() {
        let custom = RegionLayout::new(0x2000_0000);
        let previous = set_region_layout(custom);
        assert_eq!(region_layout(), custom);
        assert_eq!(set_region_layout(previous), custom);
        assert_eq!(region_layout(), previous);
    }
}
