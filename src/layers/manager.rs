use crate::{
    core::{
        constants::{BLANK_BACKGROUND, LIST_SEPARATOR},
        view_params::format_js_number,
    },
    layers::base::LayerDescriptor,
};

/// Opacity given to every ordinary layer in the portal link
pub const DEFAULT_LAYER_OPACITY: f64 = 1.0;

/// Layers of the 3D map translated into the 2D portal's terms
#[derive(Debug, Clone, PartialEq)]
pub struct PortalLayers {
    /// Portal layer ids, top-most first
    pub layer_ids: Vec<String>,
    /// One opacity per entry of `layer_ids`
    pub opacities: Vec<f64>,
    /// Portal id of the active baselayer, or `"blank"`
    pub background: String,
}

impl PortalLayers {
    /// Selects the displayed layers that have a portal id.
    ///
    /// The host keeps layers bottom-to-top while the portal lists them
    /// top-to-bottom, so the selection is reversed. When several baselayers
    /// are displayed the top-most one wins.
    pub fn select(layers: &[LayerDescriptor]) -> Self {
        let mut layer_ids = Vec::new();
        let mut background = None;

        for layer in layers.iter().rev() {
            let lux_id = match layer.lux_id() {
                Some(lux_id) if layer.is_displayed() => lux_id,
                _ => {
                    if layer.properties.is_3d_layer && layer.is_displayed() {
                        log::trace!("Layer '{}' has no 2D counterpart", layer.name);
                    }
                    continue;
                }
            };

            if layer.properties.is_baselayer {
                background.get_or_insert_with(|| lux_id.to_string());
            } else {
                layer_ids.push(lux_id.to_string());
            }
        }

        let opacities = vec![DEFAULT_LAYER_OPACITY; layer_ids.len()];
        Self {
            layer_ids,
            opacities,
            background: background.unwrap_or_else(|| BLANK_BACKGROUND.to_string()),
        }
    }

    /// `layers` query value, ids joined by `-`
    pub fn layers_param(&self) -> String {
        self.layer_ids.join(LIST_SEPARATOR)
    }

    /// `opacities` query value, numbers joined by `-`
    pub fn opacities_param(&self) -> String {
        self.opacities
            .iter()
            .map(|opacity| format_js_number(*opacity))
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR)
    }

    pub fn is_empty(&self) -> bool {
        self.layer_ids.is_empty()
    }
}

impl Default for PortalLayers {
    fn default() -> Self {
        Self::select(&[])
    }
}
