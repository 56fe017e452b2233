#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 8192 { return; }
    // Raw bytes and their text form must both parse without panicking
    let _ = areaquery::query::parse_filter_list(data);
    if let Ok(s) = std::str::from_utf8(data) {
        let parsed = areaquery::query::parse_filter_list(s);
        let _ = areaquery::query::parse_filter_list(parsed);
    }
});
