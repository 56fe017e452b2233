#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 8192 { return; }
    if let Ok(v) = serde_json::from_slice::<serde_json::Value>(data) {
        for ring in areaquery::geometry::extract_rings(&v) {
            let _ = areaquery::query::compile_query_single(&ring, "amenity", "cafe", 25);
        }
    }
});
