use crate::config::{MapDescriptor, WatchConfig};
use crate::layer::parse_layer_collection;
use crate::sink::{LineTag, ReportSink};
use crate::walker::Walker;
use indicatif::{ProgressBar, ProgressStyle};
use layerwatch_probe::{Prober, TokenProvider};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("no maps configured")]
    NoMaps,

    #[error("unknown map id: {0}")]
    UnknownMap(String),
}

/// Aggregate outcome for a single map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapCheckReport {
    pub map_id: String,
    pub map_title: String,
    pub all_layers_ok: bool,
    /// Labels of every failing probeable layer, depth-first pre-order.
    /// Empty when the map document itself was unreachable.
    pub problematic_layers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub all_maps_ok: bool,
    pub reports: Vec<MapCheckReport>,
}

impl RunSummary {
    pub fn from_reports(reports: Vec<MapCheckReport>) -> Self {
        Self {
            all_maps_ok: reports.iter().all(|report| report.all_layers_ok),
            reports,
        }
    }

    pub fn failing(&self) -> impl Iterator<Item = &MapCheckReport> {
        self.reports.iter().filter(|report| !report.all_layers_ok)
    }
}

/// Options for configuring a check run.
pub struct CheckOptions {
    pub config: WatchConfig,
    /// Restrict the run to a single configured map id.
    pub only_map: Option<String>,
    pub show_progress_bars: bool,
}

/// Callback for reporting run progress between maps.
pub type CheckProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Build a prober from the configuration, wiring in the portal token
/// provider when one is configured.
pub fn build_prober(config: &WatchConfig) -> Prober {
    let prober = Prober::with_timeout(config.timeout_secs);
    match &config.portal {
        Some(portal) => prober.with_token_provider(
            Arc::new(TokenProvider::new(portal.credentials.clone())),
            portal.secured_host.clone(),
        ),
        None => prober,
    }
}

/// Check every configured map in configuration order, one probe at a time.
pub async fn execute_check(
    options: CheckOptions,
    progress_callback: Option<CheckProgressCallback>,
    sink: &mut dyn ReportSink,
) -> Result<RunSummary, CheckError> {
    let CheckOptions {
        config,
        only_map,
        show_progress_bars,
    } = options;

    let maps: Vec<MapDescriptor> = match &only_map {
        Some(id) => {
            let descriptor = config
                .maps
                .iter()
                .find(|map| &map.id == id)
                .cloned()
                .ok_or_else(|| CheckError::UnknownMap(id.clone()))?;
            vec![descriptor]
        }
        None => config.maps.clone(),
    };

    if maps.is_empty() {
        return Err(CheckError::NoMaps);
    }

    let prober = build_prober(&config);

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.set_message("Starting check...");
        Some(pb)
    } else {
        None
    };

    let mut reports = Vec::new();
    for (idx, descriptor) in maps.iter().enumerate() {
        if let Some(ref callback) = progress_callback {
            callback(format!(
                "Checking map {}/{}: {}",
                idx + 1,
                maps.len(),
                descriptor.name
            ));
        }
        if let Some(ref pb) = progress_bar {
            pb.set_message(format!(
                "Checking map {}/{}: {}",
                idx + 1,
                maps.len(),
                descriptor.name
            ));
            pb.tick();
        }

        info!("Checking map '{}' ({})", descriptor.name, descriptor.id);
        let report = check_map(&prober, &config, descriptor, sink).await;
        sink.emit(&"=".repeat(50), LineTag::Separator);
        reports.push(report);
    }

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    Ok(RunSummary::from_reports(reports))
}

/// Check a single map: fetch its document, then walk the basemap and
/// operational layer trees. A document fetch failure short-circuits layer
/// enumeration and marks the whole map failed.
pub async fn check_map(
    prober: &Prober,
    config: &WatchConfig,
    descriptor: &MapDescriptor,
    sink: &mut dyn ReportSink,
) -> MapCheckReport {
    if descriptor.is_portal && config.portal.is_none() {
        warn!(
            "Map '{}' is marked portal-secured but no portal is configured",
            descriptor.id
        );
        sink.emit(
            &format!(
                "Warning: map '{}' is marked portal-secured but no portal credentials are configured. Probes will be sent without a token.",
                descriptor.name
            ),
            LineTag::Warning,
        );
    }

    let map_url = config.resolve_map_url(descriptor);
    sink.emit(
        &format!("Fetching map document: {}", map_url),
        LineTag::Url,
    );

    let outcome = prober.probe(&map_url).await;
    if !outcome.accessible {
        let error = outcome
            .error
            .unwrap_or_else(|| "unknown error".to_string());
        warn!(
            "Failed to fetch map document for '{}': {}",
            descriptor.id, error
        );
        sink.emit(
            &format!(
                "Failed to fetch web map data for map ID {}. Error: {}",
                descriptor.id, error
            ),
            LineTag::Error,
        );
        return MapCheckReport {
            map_id: descriptor.id.clone(),
            map_title: descriptor.name.clone(),
            all_layers_ok: false,
            problematic_layers: Vec::new(),
            fetch_error: Some(error),
        };
    }

    let document = outcome.payload.unwrap_or(Value::Null);
    let map_title = if descriptor.name.is_empty() {
        document
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("Unnamed Map")
            .to_string()
    } else {
        descriptor.name.clone()
    };
    sink.emit(&format!("Map Title: {}", map_title), LineTag::MapTitle);

    let walker = Walker::new(prober, config);
    let mut all_layers_ok = true;
    let mut problematic = Vec::new();

    sink.emit("Checking Basemaps:", LineTag::Basemap);
    let basemaps = parse_layer_collection(document.pointer("/baseMap/baseMapLayers"));
    for node in &basemaps {
        if !walker.check_layer(node, 1, sink, &mut problematic).await {
            all_layers_ok = false;
        }
    }

    sink.emit("Checking Operational Layers:", LineTag::Layer);
    let operational = parse_layer_collection(document.get("operationalLayers"));
    for node in &operational {
        if !walker.check_layer(node, 1, sink, &mut problematic).await {
            all_layers_ok = false;
        }
    }

    MapCheckReport {
        map_id: descriptor.id.clone(),
        map_title,
        all_layers_ok,
        problematic_layers: problematic,
        fetch_error: None,
    }
}
