#![no_main]

use libfuzzer_sys::fuzz_target;
use lynceus::stego::lsb;

// Extraction over whatever the decoder makes of arbitrary bytes must
// never panic, whatever the pixel layout.
fuzz_target!(|data: &[u8]| {
    if let Ok(img) = image::load_from_memory(data) {
        let _ = lsb::reveal(&img);
    }
});
