use crate::config::WatchConfig;
use crate::layer::LayerNode;
use crate::sink::{LineTag, ReportSink};
use futures::FutureExt;
use futures::future::BoxFuture;
use layerwatch_probe::Prober;
use tracing::{debug, warn};

/// Depth-first, pre-order accessibility check over one layer subtree.
///
/// A subtree passes when every probeable descendant is accessible; layers
/// without anything to probe are neutral and never fail their parent.
/// Failing leaf labels are appended to the caller's `problematic` list in
/// visit order, so reports are deterministic for a given document.
pub struct Walker<'a> {
    prober: &'a Prober,
    config: &'a WatchConfig,
}

impl<'a> Walker<'a> {
    pub fn new(prober: &'a Prober, config: &'a WatchConfig) -> Self {
        Self { prober, config }
    }

    pub fn check_layer<'b>(
        &'b self,
        node: &'b LayerNode,
        depth: usize,
        sink: &'b mut dyn ReportSink,
        problematic: &'b mut Vec<String>,
    ) -> BoxFuture<'b, bool> {
        async move {
            let indent = "  ".repeat(depth);
            match node {
                LayerNode::Group { label, children } => {
                    debug!("Entering group '{}' ({} children)", label, children.len());
                    sink.emit(&format!("{}Group: '{}'", indent, label), LineTag::Group);

                    let mut all_children_ok = true;
                    for child in children {
                        if !self.check_layer(child, depth + 1, sink, problematic).await {
                            all_children_ok = false;
                        }
                    }
                    // The group itself has no URL to fail; only its failing
                    // descendants get listed.
                    all_children_ok
                }
                LayerNode::VectorTile { label, style_url } => {
                    let url = match style_url {
                        Some(style_url) => style_url.clone(),
                        None => self.config.vector_tile_url(label),
                    };
                    sink.emit(
                        &format!("{}Checking VectorTileLayer: '{}'", indent, label),
                        LineTag::VectorTile,
                    );
                    self.probe_and_record(label, &url, &indent, sink, problematic)
                        .await
                }
                LayerNode::Leaf { label, url } => {
                    sink.emit(
                        &format!("{}Checking Layer: '{}'", indent, label),
                        LineTag::Layer,
                    );
                    self.probe_and_record(label, url, &indent, sink, problematic)
                        .await
                }
                LayerNode::Bare { label } => {
                    warn!("Layer '{}' has no URL to check", label);
                    sink.emit(
                        &format!(
                            "{}Layer: '{}' - No URL found. Unable to check accessibility.",
                            indent, label
                        ),
                        LineTag::Warning,
                    );
                    true
                }
            }
        }
        .boxed()
    }

    async fn probe_and_record(
        &self,
        label: &str,
        url: &str,
        indent: &str,
        sink: &mut dyn ReportSink,
        problematic: &mut Vec<String>,
    ) -> bool {
        let outcome = self.prober.probe(url).await;
        if outcome.accessible {
            sink.emit(&format!("{}  - Status: Accessible", indent), LineTag::Success);
            true
        } else {
            let error = outcome.error.unwrap_or_else(|| "unknown error".to_string());
            sink.emit(
                &format!("{}  - Status: Not accessible", indent),
                LineTag::Error,
            );
            sink.emit(&format!("{}  - Error: {}", indent, error), LineTag::Error);
            problematic.push(label.to_string());
            false
        }
    }
}
