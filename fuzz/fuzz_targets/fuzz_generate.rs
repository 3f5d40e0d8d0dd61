#![no_main]

use libfuzzer_sys::fuzz_target;
use pixelsynth_backend_midi::{generate_midi, RgbaImage};
use pixelsynth_spec::Settings;

// Layout: [width, height, settings JSON length (u16 BE), settings JSON..., pixels...]
fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let width = (data[0] % 32) as u32 + 1;
    let height = (data[1] % 32) as u32 + 1;
    let json_len = u16::from_be_bytes([data[2], data[3]]) as usize;
    let rest = &data[4..];
    if rest.len() < json_len {
        return;
    }
    let (json, pixels) = rest.split_at(json_len);

    let Ok(mut settings) = serde_json::from_slice::<Settings>(json) else {
        return;
    };
    // Keep the grid small enough for the fuzzer to stay fast.
    settings.resolution_x = settings.resolution_x.min(256);
    settings.resolution_y = settings.resolution_y.min(128);

    let mut buffer = vec![0u8; (width * height * 4) as usize];
    for (dst, src) in buffer.iter_mut().zip(pixels.iter().cycle()) {
        *dst = *src;
    }
    let Ok(image) = RgbaImage::new(width, height, buffer) else {
        return;
    };

    if let Ok(result) = generate_midi(&image, &settings) {
        assert_eq!(&result.data[0..4], b"MThd");
        assert!(result.data.ends_with(&[0x00, 0xFF, 0x2F, 0x00]));
        assert_eq!(result.hash.len(), 64);
    }
});
