use areaquery::errors::AreaQueryError;
use areaquery::query::{FilterTag, QueryKind, compile_query, compile_query_single, poly_string};
use areaquery::types::Ring;

fn square() -> Ring {
    Ring::from(vec![(52.0, -1.0), (52.0, -2.0), (53.0, -2.0), (53.0, -1.0)])
}

#[test]
fn single_filter_uses_equality_on_all_three_kinds() {
    let q = compile_query_single(&square(), "amenity", "cafe", 25).unwrap();
    assert_eq!(q.kind(), QueryKind::Equality);
    let text = q.as_str();
    let poly = r#"(poly:"52 -1 52 -2 53 -2 53 -1 52 -1")"#;
    assert!(text.starts_with("[out:json][timeout:25];"));
    assert!(text.contains(&format!(r#"node["amenity"="cafe"]{poly};"#)));
    assert!(text.contains(&format!(r#"way["amenity"="cafe"]{poly};"#)));
    assert!(text.contains(&format!(r#"relation["amenity"="cafe"]{poly};"#)));
    assert!(text.trim_end().ends_with("out center;"));
}

#[test]
fn several_filters_merge_into_one_alternation() {
    let filters = vec![FilterTag::new("amenity", "cafe"), FilterTag::new("amenity", "bar")];
    let q = compile_query(&square(), &filters, 10).unwrap();
    assert_eq!(q.kind(), QueryKind::Alternation);
    assert_eq!(q.values(), &["cafe".to_string(), "bar".to_string()]);
    assert_eq!(q.as_str().matches(r#"["amenity"~"^(cafe|bar)$"]"#).count(), 3);
    assert!(!q.as_str().contains(r#"["amenity"="cafe"]"#));
    assert_eq!(q.timeout_secs(), 10);
}

#[test]
fn bare_tags_take_the_default_key() {
    let tag = FilterTag::parse("cafe", "amenity").unwrap();
    assert_eq!(tag, FilterTag::new("amenity", "cafe"));
    let tag: FilterTag = "shop=bakery=fresh".parse().unwrap();
    assert_eq!(tag.key, "shop");
    assert_eq!(tag.value, "bakery=fresh");
}

#[test]
fn invalid_inputs_are_rejected() {
    let err = compile_query_single(&Ring::default(), "amenity", "cafe", 25).unwrap_err();
    assert!(matches!(err, AreaQueryError::InvalidGeometry(_)));
    assert!(err.is_client_error());

    let err = compile_query(&square(), &[], 25).unwrap_err();
    assert!(matches!(err, AreaQueryError::InvalidFilterSet(_)));

    let mixed = vec![FilterTag::new("amenity", "cafe"), FilterTag::new("shop", "bakery")];
    let err = compile_query(&square(), &mixed, 25).unwrap_err();
    assert!(matches!(err, AreaQueryError::InvalidFilterSet(_)));
}

#[test]
fn blank_keys_and_values_never_reach_the_query_text() {
    for (key, value) in [("amenity", ""), ("", "cafe"), ("amenity", "  ")] {
        let err = compile_query_single(&square(), key, value, 25).unwrap_err();
        assert!(matches!(err, AreaQueryError::InvalidFilterSet(_)), "{key:?}={value:?}");
    }
    let filters = vec![FilterTag::new("amenity", "cafe"), FilterTag::new("amenity", "")];
    assert!(matches!(compile_query(&square(), &filters, 25), Err(AreaQueryError::InvalidFilterSet(_))));
}

#[test]
fn closed_ring_keeps_its_point_count() {
    let closed = Ring::from(vec![(1.0, 1.0), (1.0, 2.0), (2.0, 2.0), (1.0, 1.0)]);
    assert!(closed.is_closed());
    assert_eq!(poly_string(&closed).split(' ').count(), 8);
    let open = Ring::from(vec![(1.0, 1.0), (1.0, 2.0), (2.0, 2.0)]);
    assert_eq!(poly_string(&open), "1 1 1 2 2 2 1 1");
}

#[test]
fn ring_closure_compares_coordinates_exactly() {
    let lat = 52.4866351_f64;
    let nudged = f64::from_bits(lat.to_bits() + 1);
    assert_ne!(lat, nudged);
    let ring = Ring::from(vec![(lat, -1.9), (52.49, -1.91), (52.50, -1.92), (nudged, -1.9)]);
    assert!(!ring.is_closed());
    let closed = ring.closed();
    assert_eq!(closed.len(), 5);
    assert_eq!(closed.points().last(), closed.points().first());
    assert!(poly_string(&ring).ends_with(&format!("{nudged} -1.9 {lat} -1.9")));
}
