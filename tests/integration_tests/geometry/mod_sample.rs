use areaquery::errors::AreaQueryError;
use areaquery::geometry::first_ring;
use areaquery::sample;
use serde_json::json;

use crate::integration_tests::SAMPLE_LOCK;

#[test]
fn sample_starts_with_demo_polygon_and_can_be_replaced() {
    let _guard = SAMPLE_LOCK.lock();
    sample::reset_sample();
    let ring = sample::with_sample(first_ring).unwrap();
    assert_eq!(ring.len(), 4);
    assert!(!ring.is_closed());

    let saved = sample::set_sample(&[
        json!({"lat": 1.0, "lng": 2.0}),
        json!({"latitude": "3", "longitude": "4"}),
        json!({"lat": 5.0}),
    ])
    .unwrap();
    assert_eq!(saved, 2);
    let stored = sample::current_sample();
    assert_eq!(stored[0]["id"], json!(null));
    assert_eq!(stored[0]["geometry"]["0"].as_array().map(Vec::len), Some(2));
    assert_eq!(sample::with_sample(first_ring).map(|r| r.len()), Some(2));

    let err = sample::set_sample(&[json!({"lat": 1.0})]).unwrap_err();
    assert!(matches!(err, AreaQueryError::InvalidGeometry(_)));
    // A rejected update leaves the previous sample in place.
    assert_eq!(sample::with_sample(first_ring).map(|r| r.len()), Some(2));

    sample::reset_sample();
    assert_eq!(sample::current_sample(), sample::default_sample());
}
