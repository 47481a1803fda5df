#![no_main]

use libfuzzer_sys::fuzz_target;
use lynceus::Inspector;
use std::sync::LazyLock;

static INSPECTOR: LazyLock<Inspector> = LazyLock::new(Inspector::with_defaults);

// The verdict must be deterministic and a rejection reason always present.
fuzz_target!(|data: &[u8]| {
    let first = INSPECTOR.inspect(data, None);
    let second = INSPECTOR.inspect(data, None);
    assert_eq!(first, second);
    assert!(!first.reason.is_empty());
});
