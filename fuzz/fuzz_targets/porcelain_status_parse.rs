#![no_main]

use libfuzzer_sys::fuzz_target;
use recap_report::parse_porcelain_status;

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    if let Some(status) = parse_porcelain_status(&raw) {
        assert!(raw.starts_with("## "));
        if status.ahead > 0 {
            assert!(raw.contains("ahead "));
        }
    }
});
