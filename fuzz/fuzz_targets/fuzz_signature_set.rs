#![no_main]

use libfuzzer_sys::fuzz_target;
use lynceus::SignatureSet;

// Signature files come from operators, not uploads, but parsing one must
// still be panic-free on arbitrary bytes.
fuzz_target!(|data: &[u8]| {
    if let Ok(set) = SignatureSet::from_json_slice(data) {
        let _ = set.scan(data);
    }
});
