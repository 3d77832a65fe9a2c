use serde::Deserialize;
use serde_json::Value;

pub const VECTOR_TILE_TYPE: &str = "VectorTileLayer";

/// Raw layer fields as they appear in a web map document. Everything is
/// optional; classification into a [`LayerNode`] happens once, up front.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawLayer {
    pub title: Option<String>,
    pub id: Option<Value>,
    pub url: Option<String>,
    pub style_url: Option<String>,
    pub layer_type: Option<String>,
    pub layers: Option<Vec<Value>>,
    pub layer_groups: Option<Vec<Value>>,
}

impl RawLayer {
    fn label(&self) -> String {
        if let Some(title) = &self.title
            && !title.is_empty()
        {
            return title.clone();
        }
        match &self.id {
            Some(Value::String(id)) => format!("id: {}", id),
            Some(id) => format!("id: {}", id),
            None => "Unnamed Layer".to_string(),
        }
    }
}

/// A node of the layer tree, classified by what (if anything) can be probed.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerNode {
    /// Has sub-layers; aggregates its children and is never probed itself.
    Group {
        label: String,
        children: Vec<LayerNode>,
    },
    /// Vector tile layer; probed via `styleUrl` or a conventional tile
    /// service URL derived from the label.
    VectorTile {
        label: String,
        style_url: Option<String>,
    },
    /// Ordinary probeable leaf.
    Leaf { label: String, url: String },
    /// Nothing to probe; neutral for aggregation.
    Bare { label: String },
}

impl LayerNode {
    pub fn from_value(value: &Value) -> Self {
        let raw: RawLayer = serde_json::from_value(value.clone()).unwrap_or_default();

        if raw.layer_type.as_deref() == Some(VECTOR_TILE_TYPE) {
            let label = match &raw.title {
                Some(title) if !title.is_empty() => title.clone(),
                _ => "Unnamed VectorTileLayer".to_string(),
            };
            return LayerNode::VectorTile {
                label,
                style_url: raw.style_url,
            };
        }

        if raw.layers.is_some() || raw.layer_groups.is_some() {
            // `layerGroups` is a legacy synonym for `layers`; both feed one
            // ordered child sequence.
            let children = raw
                .layers
                .iter()
                .flatten()
                .chain(raw.layer_groups.iter().flatten())
                .map(LayerNode::from_value)
                .collect();
            return LayerNode::Group {
                label: raw.label(),
                children,
            };
        }

        let label = raw.label();
        match raw.url.clone().or_else(|| raw.style_url.clone()) {
            Some(url) => LayerNode::Leaf { label, url },
            None => LayerNode::Bare { label },
        }
    }

    pub fn label(&self) -> &str {
        match self {
            LayerNode::Group { label, .. }
            | LayerNode::VectorTile { label, .. }
            | LayerNode::Leaf { label, .. }
            | LayerNode::Bare { label } => label,
        }
    }
}

/// Parse an optional array of layer definitions; anything absent or
/// non-array counts as empty.
pub fn parse_layer_collection(value: Option<&Value>) -> Vec<LayerNode> {
    value
        .and_then(Value::as_array)
        .map(|layers| layers.iter().map(LayerNode::from_value).collect())
        .unwrap_or_default()
}
