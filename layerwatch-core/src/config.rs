use layerwatch_probe::PortalCredentials;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

fn default_base_url() -> String {
    "https://www.arcgis.com/sharing/rest/content/items/{mapId}/data".to_string()
}

fn default_tile_service_base() -> String {
    "https://tiles.arcgis.com/tiles/PcGFyTym9yKZBRgz/arcgis/rest/services".to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no maps configured")]
    NoMaps,
}

/// One configured map. The minimal form is `{ "id": ..., "name": ... }`;
/// portal-secured maps supply their own `url` and set `is_portal`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Marks the map as portal-secured; a run warns when this is set but no
    /// `portal` section is configured.
    #[serde(default)]
    pub is_portal: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
    /// Host (or parent domain) whose URLs need a token attached.
    pub secured_host: String,
    #[serde(flatten)]
    pub credentials: PortalCredentials,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    /// Map document URL template; `{mapId}` is replaced per map.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base path for the conventional vector tile service URL, used when a
    /// vector tile layer carries no explicit `styleUrl`.
    #[serde(default = "default_tile_service_base")]
    pub tile_service_base: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maps are checked in this order.
    pub maps: Vec<MapDescriptor>,

    #[serde(default)]
    pub portal: Option<PortalConfig>,
}

impl WatchConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: WatchConfig = serde_json::from_str(&content)?;
        if config.maps.is_empty() {
            return Err(ConfigError::NoMaps);
        }
        config.apply_env_overrides();
        Ok(config)
    }

    /// Portal credentials may come from the environment instead of the
    /// config file, so secrets never have to live on disk.
    fn apply_env_overrides(&mut self) {
        if let Some(portal) = &mut self.portal {
            if let Ok(username) = std::env::var("LAYERWATCH_PORTAL_USER") {
                portal.credentials.username = username;
            }
            if let Ok(password) = std::env::var("LAYERWATCH_PORTAL_PASSWORD") {
                portal.credentials.password = password;
            }
        }
    }

    pub fn resolve_map_url(&self, descriptor: &MapDescriptor) -> String {
        match &descriptor.url {
            Some(url) => url.clone(),
            None => self.base_url.replace("{mapId}", &descriptor.id),
        }
    }

    pub fn vector_tile_url(&self, title: &str) -> String {
        format!("{}/{}/VectorTileServer", self.tile_service_base, title)
    }
}
