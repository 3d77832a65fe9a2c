// Tests for configuration loading

use layerwatch_core::config::{ConfigError, MapDescriptor, WatchConfig};
use std::io::Write;

fn write_config(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layerwatch.json");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    (dir, path)
}

#[test]
fn test_load_minimal_config_applies_defaults() {
    let (_dir, path) = write_config(
        r#"{
            "maps": [
                { "id": "abc123", "name": "Metro Expropriations" }
            ]
        }"#,
    );

    let config = WatchConfig::load(&path).unwrap();
    assert_eq!(config.timeout_secs, 15);
    assert!(config.base_url.contains("{mapId}"));
    assert!(config.portal.is_none());
    assert_eq!(config.maps.len(), 1);
    assert!(!config.maps[0].is_portal);
}

#[test]
fn test_load_full_descriptor() {
    let (_dir, path) = write_config(
        r#"{
            "timeout_secs": 30,
            "maps": [
                {
                    "id": "portal-map",
                    "name": "Internal Works",
                    "url": "https://portal.example.com/items/portal-map/data",
                    "is_portal": true
                }
            ],
            "portal": {
                "secured_host": "portal.example.com",
                "token_url": "https://portal.example.com/sharing/rest/generateToken",
                "username": "svc-monitor",
                "password": "s3cret",
                "referer": "https://portal.example.com"
            }
        }"#,
    );

    let config = WatchConfig::load(&path).unwrap();
    assert_eq!(config.timeout_secs, 30);
    assert!(config.maps[0].is_portal);

    let portal = config.portal.unwrap();
    assert_eq!(portal.secured_host, "portal.example.com");
    assert_eq!(portal.credentials.username, "svc-monitor");
    assert_eq!(portal.credentials.expiration_minutes, 60);
}

#[test]
fn test_empty_maps_rejected() {
    let (_dir, path) = write_config(r#"{ "maps": [] }"#);
    let err = WatchConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::NoMaps));
}

#[test]
fn test_malformed_config_rejected() {
    let (_dir, path) = write_config("not json at all");
    let err = WatchConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = WatchConfig::load(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_resolve_map_url_template_substitution() {
    let (_dir, path) = write_config(
        r#"{
            "base_url": "https://maps.example.com/items/{mapId}/data",
            "maps": [ { "id": "abc", "name": "A" } ]
        }"#,
    );

    let config = WatchConfig::load(&path).unwrap();
    assert_eq!(
        config.resolve_map_url(&config.maps[0]),
        "https://maps.example.com/items/abc/data"
    );
}

#[test]
fn test_resolve_map_url_explicit_url_wins() {
    let config_maps = MapDescriptor {
        id: "abc".to_string(),
        name: "A".to_string(),
        url: Some("https://portal.example.com/custom".to_string()),
        is_portal: true,
    };
    let (_dir, path) = write_config(
        r#"{ "maps": [ { "id": "placeholder", "name": "P" } ] }"#,
    );
    let config = WatchConfig::load(&path).unwrap();

    assert_eq!(
        config.resolve_map_url(&config_maps),
        "https://portal.example.com/custom"
    );
}

#[test]
fn test_vector_tile_url_derivation() {
    let (_dir, path) = write_config(
        r#"{
            "tile_service_base": "https://tiles.example.com/tiles/org1/arcgis/rest/services",
            "maps": [ { "id": "abc", "name": "A" } ]
        }"#,
    );

    let config = WatchConfig::load(&path).unwrap();
    assert_eq!(
        config.vector_tile_url("CityTiles"),
        "https://tiles.example.com/tiles/org1/arcgis/rest/services/CityTiles/VectorTileServer"
    );
}
