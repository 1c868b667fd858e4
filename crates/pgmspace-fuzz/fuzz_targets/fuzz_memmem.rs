#![no_main]
use libfuzzer_sys::fuzz_target;
use pgmspace_core::string::{memchr_p, memmem_p};
use pgmspace_core::{ESP8266_REGION_BASE, RegionImage, reference};

const BASE: usize = ESP8266_REGION_BASE;

// Layout: [offset, needle_len, needle..., haystack...]
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let offset = usize::from(data[0] & 3);
    let rest = &data[2..];
    let needle_len = usize::from(data[1] & 15).min(rest.len());
    let (needle, haystack) = rest.split_at(needle_len);

    let flash = RegionImage::from_bytes(BASE, offset, needle);
    let at = BASE + offset;
    assert_eq!(
        memmem_p(&flash, haystack, at, needle_len),
        reference::memmem(&flash, haystack, at, needle_len)
    );

    if let Some(&c) = haystack.first() {
        let expected = needle.iter().position(|&b| b == c).map(|i| at + i);
        assert_eq!(memchr_p(&flash, at, c, needle_len), expected);
    }
});
