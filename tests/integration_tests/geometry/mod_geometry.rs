use areaquery::geometry::{extract_rings, first_ring, ring_from_points};
use areaquery::types::Coordinate;
use serde_json::json;

#[test]
fn mapping_and_list_geometries_both_extract() {
    let payload = json!([
        {"id": 1, "geometry": {"a": [{"lat": 1, "lng": 2}, {"lat": 3, "lng": 4}], "b": [{"latitude": 5, "longitude": 6}]}},
        {"id": 2, "geometry": [{"Lat": 7, "Lon": 8}]},
    ]);
    let rings = extract_rings(&payload);
    assert_eq!(rings.len(), 3);
    assert_eq!(rings[0].points(), &[Coordinate::new(1.0, 2.0), Coordinate::new(3.0, 4.0)]);
    assert_eq!(rings[1].points(), &[Coordinate::new(5.0, 6.0)]);
    assert_eq!(rings[2].points(), &[Coordinate::new(7.0, 8.0)]);
}

#[test]
fn partial_points_are_skipped_and_empty_rings_dropped() {
    let payload = json!([
        {"geometry": {"0": [{"lat": 1, "lng": 2}, {"lat": 9}, {"lng": 9}, {"lat": 3, "lng": 4}]}},
        {"geometry": {"0": [{"lat": 1}, {"lng": 2}]}},
        {"geometry": null},
        "not an entry",
        {"id": 3},
    ]);
    let rings = extract_rings(&payload);
    assert_eq!(rings.len(), 1);
    assert_eq!(rings[0].len(), 2);
}

#[test]
fn legacy_field_and_numeric_strings() {
    let payload = json!([{"latlngs": [{"lat": "52.5", "lng": "-1.9"}, {"lat": "nan", "lng": 1}]}]);
    let ring = first_ring(&payload).unwrap();
    assert_eq!(ring.points(), &[Coordinate::new(52.5, -1.9)]);
}

#[test]
fn non_list_payload_yields_nothing() {
    assert!(extract_rings(&json!({"geometry": []})).is_empty());
    assert!(first_ring(&json!(null)).is_none());
}

#[test]
fn ring_from_bare_points() {
    let pts = vec![json!({"lat": 1.5, "lon": 2.5}), json!({"x": 1})];
    assert_eq!(ring_from_points(&pts).map(|r| r.len()), Some(1));
    assert!(ring_from_points(&[json!({"x": 1})]).is_none());
}
