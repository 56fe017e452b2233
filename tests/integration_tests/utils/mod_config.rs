use areaquery::config::{find_config_paths, load_config, read_config_file};
use areaquery::errors::AreaQueryError;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn cli_config_path_comes_first() {
    let f = NamedTempFile::new().unwrap();
    let paths = find_config_paths(Some(f.path()));
    assert_eq!(paths.first().map(|p| p.as_path()), Some(f.path()));
    assert!(paths.iter().any(|p| p.ends_with("areaquery.toml")));
}

#[test]
fn values_from_the_cli_file_win() {
    let mut f = NamedTempFile::new().unwrap();
    writeln!(f, "timeout_secs = 40\ndefault_category = \"pharmacy\"\noverpass_url = \"http://127.0.0.1:9/api\"").unwrap();
    let cfg = load_config(Some(f.path()));
    assert_eq!(cfg.timeout_secs, 40);
    assert_eq!(cfg.default_category, "pharmacy");
    assert_eq!(cfg.overpass_url, "http://127.0.0.1:9/api");
}

#[test]
fn malformed_file_is_a_config_error() {
    let mut f = NamedTempFile::new().unwrap();
    writeln!(f, "timeout_secs = \"soon\"").unwrap();
    let err = read_config_file(f.path()).unwrap_err();
    assert!(matches!(err, AreaQueryError::Config(_)));
    // load_config skips it rather than failing
    let cfg = load_config(Some(f.path()));
    assert!(cfg.timeout_secs > 0);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_config_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, AreaQueryError::Io(_)));
}
