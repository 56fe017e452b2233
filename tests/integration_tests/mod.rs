
#[path = "mod_lib.rs"]
mod lib_tests;

/// Serializes tests that read or replace the process-wide current sample.
pub static SAMPLE_LOCK: parking_lot::Mutex<()> = parking_lot::Mutex::new(());
