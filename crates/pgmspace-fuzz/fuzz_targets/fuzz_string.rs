#![no_main]
use libfuzzer_sys::fuzz_target;
use pgmspace_core::string::{memcpy_p, strncpy_p, strnlen_p};
use pgmspace_core::{ESP8266_REGION_BASE, RegionImage, SIZE_IRRELEVANT, reference};

const BASE: usize = ESP8266_REGION_BASE;

#[repr(C, align(4))]
struct Scratch([u8; 320]);

// Layout: [src_offset, dest_offset, size, payload...]
fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }
    let src_offset = usize::from(data[0] & 3);
    let dest_offset = usize::from(data[1] & 3);
    let payload = &data[3..data.len().min(3 + 256)];

    // Always terminate so the unbounded walks stay inside the image.
    let mut stored = payload.to_vec();
    stored.push(0);
    let flash = RegionImage::from_bytes(BASE, src_offset, &stored);
    let src = BASE + src_offset;

    let size = if data[2] == 0xff { SIZE_IRRELEVANT } else { usize::from(data[2]) };
    assert_eq!(strnlen_p(&flash, src, size), reference::strnlen(&flash, src, size));

    let n = usize::from(data[2]).min(stored.len());
    let mut fast = Scratch([0xee; 320]);
    let mut slow = Scratch([0xee; 320]);
    memcpy_p(&flash, &mut fast.0[dest_offset..dest_offset + n], src, n);
    reference::memcpy(&flash, &mut slow.0[dest_offset..dest_offset + n], src, n);
    assert_eq!(fast.0, slow.0);

    let window = if size == SIZE_IRRELEVANT { stored.len() } else { size };
    let mut fast = Scratch([0xee; 320]);
    let mut slow = Scratch([0xee; 320]);
    let a = strncpy_p(&flash, &mut fast.0[dest_offset..dest_offset + window], src, size);
    let b = reference::strncpy(&flash, &mut slow.0[dest_offset..dest_offset + window], src, size);
    assert_eq!(a, b);
    assert_eq!(fast.0, slow.0);
});
