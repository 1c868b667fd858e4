//! Address-space layout and the RAM/region classifier.
//!
//! The platform maps flash at a fixed base address. Every pointer at or above
//! that base must be read through [`RegionRead`](crate::RegionRead); anything
//! below it is ordinary byte-addressable RAM. The base is platform
//! configuration, so it is carried in a [`RegionLayout`] value instead of being
//! spelled out at each call site.

use core::num::ParseIntError;

use crate::word::is_word_aligned;

/// Start of the flash-mapped window on the ESP8266.
pub const ESP8266_REGION_BASE: usize = 0x4000_0000;

/// Size argument meaning "copy to the terminator and do not pad".
pub const SIZE_IRRELEVANT: usize = usize::MAX;

/// Which access strategy a pointer requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressSpace {
    /// Ordinary byte-addressable memory.
    Ram,
    /// Flash-mapped memory, aligned word loads only.
    Region,
}

/// Errors raised while building or parsing a [`RegionLayout`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("region base {base:#x} is not word aligned")]
    MisalignedBase { base: usize },
    #[error("region base is not a number: {0}")]
    Unparseable(#[from] ParseIntError),
    #[error("region base is empty")]
    Empty,
    #[error("region base has too many digits")]
    TooLong,
}

/// Placement of the restricted region in the address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionLayout {
    base: usize,
}

impl RegionLayout {
    /// The ESP8266 flash window.
    pub const ESP8266: Self = Self::new(ESP8266_REGION_BASE);

    /// Creates a layout whose region starts at `base`.
    ///
    /// # Panics
    ///
    /// Panics if `base` is not word aligned (at compile time when used in a
    /// `const`).
    #[must_use]
    pub const fn new(base: usize) -> Self {
        assert!(is_word_aligned(base), "region base must be word aligned");
        Self { base }
    }

    /// Fallible form of [`RegionLayout::new`].
    pub const fn try_new(base: usize) -> Result<Self, LayoutError> {
        if is_word_aligned(base) {
            Ok(Self { base })
        } else {
            Err(LayoutError::MisalignedBase { base })
        }
    }

    /// First address of the restricted region.
    #[inline]
    #[must_use]
    pub const fn base(self) -> usize {
        self.base
    }

    /// Classifies `addr`: at or above the base is region, below is RAM.
    #[inline]
    #[must_use]
    pub const fn classify(self, addr: usize) -> AddressSpace {
        if addr >= self.base {
            AddressSpace::Region
        } else {
            AddressSpace::Ram
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_region(self, addr: usize) -> bool {
        matches!(self.classify(addr), AddressSpace::Region)
    }

    /// Parses a layout from configuration text.
    ///
    /// Accepts a platform name (`esp8266`, case-insensitive), a hex base
    /// (`0x4000_0000`), or a decimal base. Underscores are ignored.
    pub fn parse(raw: &str) -> Result<Self, LayoutError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LayoutError::Empty);
        }
        if trimmed.eq_ignore_ascii_case("esp8266") || trimmed.eq_ignore_ascii_case("default") {
            return Ok(Self::ESP8266);
        }

        let mut digits = [0u8; 32];
        let mut len = 0usize;
        let (body, radix) = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => (hex, 16),
            None => (trimmed, 10),
        };
        for byte in body.bytes().filter(|&b| b != b'_') {
            if len == digits.len() {
                return Err(LayoutError::TooLong);
            }
            digits[len] = byte;
            len += 1;
        }
        let text = core::str::from_utf8(&digits[..len]).map_err(|_| LayoutError::Empty)?;
        if text.is_empty() {
            return Err(LayoutError::Empty);
        }
        let base = usize::from_str_radix(text, radix)?;
        Self::try_new(base)
    }
}

impl Default for RegionLayout {
    fn default() -> Self {
        Self::ESP8266
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_threshold_is_inclusive() {
        let layout = RegionLayout::ESP8266;
        assert_eq!(layout.classify(0x3fff_ffff), AddressSpace::Ram);
        assert_eq!(layout.classify(0x4000_0000), AddressSpace::Region);
        assert_eq!(layout.classify(0x4020_1234), AddressSpace::Region);
        assert!(!layout.is_region(0x3ffe_8000));
    }

    #[test]
    fn retargeted_layout_moves_threshold() {
        let layout = RegionLayout::new(0x1000);
        assert!(layout.is_region(0x1000));
        assert!(!layout.is_region(0x0ffc));
        assert_eq!(layout.base(), 0x1000);
    }

    #[test]
    fn try_new_rejects_misaligned_base() {
        assert_eq!(
            RegionLayout::try_new(0x4000_0002),
            Err(LayoutError::MisalignedBase { base: 0x4000_0002 })
        );
        assert!(RegionLayout::try_new(0x4000_0004).is_ok());
    }

    #[test]
    #[should_panic(expected = "word aligned")]
    fn new_panics_on_misaligned_base() {
        let _ = RegionLayout::new(3);
    }

    #[test]
    fn parse_accepts_names_hex_and_decimal() {
        assert_eq!(RegionLayout::parse("esp8266"), Ok(RegionLayout::ESP8266));
        assert_eq!(RegionLayout::parse("ESP8266"), Ok(RegionLayout::ESP8266));
        assert_eq!(RegionLayout::parse(" 0x4000_0000 "), Ok(RegionLayout::ESP8266));
        assert_eq!(RegionLayout::parse("0X10"), Ok(RegionLayout::new(0x10)));
        assert_eq!(RegionLayout::parse("4096"), Ok(RegionLayout::new(4096)));
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(RegionLayout::parse(""), Err(LayoutError::Empty));
        assert!(matches!(
            RegionLayout::parse("flash"),
            Err(LayoutError::Unparseable(_))
        ));
        assert_eq!(
            RegionLayout::parse("0x4000_0001"),
            Err(LayoutError::MisalignedBase { base: 0x4000_0001 })
        );
    }

    #[test]
    fn error_messages_name_the_problem() {
        let err = RegionLayout::parse("0x6").unwrap_err();
        assert_eq!(err.to_string(), "region base 0x6 is not word aligned");
    }
}
