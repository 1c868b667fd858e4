//! Byte-at-a-time reference implementations.
//!
//! These read the region exclusively through [`RegionRead::read_byte`] and
//! carry no alignment logic at all. They define the expected results for the
//! word-parallel routines in [`crate::string`], which must agree with them for
//! every alignment and length.

use crate::layout::SIZE_IRRELEVANT;
use crate::region::RegionRead;

/// Reference `strnlen_P`.
pub fn strnlen<R: RegionRead + ?Sized>(region: &R, src: usize, max: usize) -> usize {
    let mut len = 0;
    while len < max && region.read_byte(src + len) != 0 {
        len += 1;
    }
    len
}

/// Reference `memcpy_P`; returns the number of bytes copied.
pub fn memcpy<R: RegionRead + ?Sized>(region: &R, dest: &mut [u8], src: usize, n: usize) -> usize {
    let count = n.min(dest.len());
    for (i, byte) in dest[..count].iter_mut().enumerate() {
        *byte = region.read_byte(src + i);
    }
    count
}

/// Reference `strncpy_P`; returns the number of bytes written.
pub fn strncpy<R: RegionRead + ?Sized>(
    region: &R,
    dest: &mut [u8],
    src: usize,
    size: usize,
) -> usize {
    let limit = size.min(dest.len());
    let mut written = 0;
    while written < limit {
        let ch = region.read_byte(src + written);
        dest[written] = ch;
        written += 1;
        if ch == 0 {
            break;
        }
    }
    if size != SIZE_IRRELEVANT {
        dest[written..limit].fill(0);
        written = limit;
    }
    written
}

/// Reference `memmem_P`: tries every window of `haystack` in order.
pub fn memmem<R: RegionRead + ?Sized>(
    region: &R,
    haystack: &[u8],
    needle: usize,
    needle_len: usize,
) -> Option<usize> {
    if needle_len > haystack.len() {
        return None;
    }
    (0..=haystack.len() - needle_len).find(|&start| {
        haystack[start..start + needle_len]
            .iter()
            .enumerate()
            .all(|(i, &b)| region.read_byte(needle + i) == b)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ESP8266_REGION_BASE;
    use crate::region::RegionImage;

    const BASE: usize = ESP8266_REGION_BASE;

    #[test]
    fn oracle_never_loads_more_than_one_word_per_byte() {
        let flash = RegionImage::from_bytes(BASE, 1, b"abcdef\0");
        assert_eq!(strnlen(&flash, BASE + 1, 100), 6);
        assert_eq!(flash.loads(), 7);
    }

    #[test]
    fn oracle_strncpy_pads_only_with_known_size() {
        let flash = RegionImage::from_bytes(BASE, 0, b"ab\0");
        let mut dest = [9u8; 5];
        assert_eq!(strncpy(&flash, &mut dest, BASE, SIZE_IRRELEVANT), 3);
        assert_eq!(dest, [b'a', b'b', 0, 9, 9]);
        let mut dest = [9u8; 5];
        assert_eq!(strncpy(&flash, &mut dest, BASE, 4), 4);
        assert_eq!(dest, [b'a', b'b', 0, 0, 9]);
    }

    #[test]
    fn oracle_memmem_empty_needle() {
        let flash = RegionImage::from_bytes(BASE, 0, b"x");
        assert_eq!(memmem(&flash, b"", BASE, 0), Some(0));
        assert_eq!(memmem(&flash, b"abc", BASE, 0), Some(0));
        assert_eq!(memmem(&flash, b"abx", BASE, 1), Some(2));
    }

    #[test]
    fn oracle_memcpy() {
        let flash = RegionImage::from_bytes(BASE, 2, b"xyz");
        let mut dest = [0u8; 3];
        assert_eq!(memcpy(&flash, &mut dest, BASE + 2, 3), 3);
        assert_eq!(&dest, b"xyz");
    }
}
