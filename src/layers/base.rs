use serde::{Deserialize, Serialize};

/// Custom properties a layer carries for the portals
///
/// Every field is optional in the host configuration; absence is an
/// explicit branch rather than a dynamic lookup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerProperties {
    /// Identifier of the matching layer in the 2D geoportal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lux_id: Option<String>,
    /// Background layer, mutually exclusive with other baselayers
    #[serde(default, rename = "isBaselayer")]
    pub is_baselayer: bool,
    /// Layer only exists in the 3D viewer (terrain, meshes, point clouds)
    #[serde(default, rename = "is3DLayer")]
    pub is_3d_layer: bool,
}

/// A layer of the live 3D map, as seen by the actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDescriptor {
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub loading: bool,
    #[serde(default)]
    pub properties: LayerProperties,
}

impl LayerDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: false,
            loading: false,
            properties: LayerProperties::default(),
        }
    }

    pub fn with_lux_id(mut self, lux_id: impl Into<String>) -> Self {
        self.properties.lux_id = Some(lux_id.into());
        self
    }

    pub fn active(mut self) -> Self {
        self.active = true;
        self
    }

    pub fn loading(mut self) -> Self {
        self.loading = true;
        self
    }

    pub fn baselayer(mut self) -> Self {
        self.properties.is_baselayer = true;
        self
    }

    pub fn lux_id(&self) -> Option<&str> {
        self.properties.lux_id.as_deref()
    }

    /// Shown (or about to be shown) in the viewer
    pub fn is_displayed(&self) -> bool {
        self.active || self.loading
    }

    /// Has a 2D counterpart and is currently displayed
    pub fn is_portal_layer(&self) -> bool {
        self.lux_id().is_some() && self.is_displayed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_deserialization() {
        let layer: LayerDescriptor = serde_json::from_str(
            r#"{"name":"ortho","active":true,"properties":{"luxId":"orthogr_2019","isBaselayer":true}}"#,
        )
        .unwrap();

        assert_eq!(layer.name, "ortho");
        assert!(layer.active);
        assert!(!layer.loading);
        assert_eq!(layer.lux_id(), Some("orthogr_2019"));
        assert!(layer.properties.is_baselayer);
        assert!(!layer.properties.is_3d_layer);
    }

    #[test]
    fn test_missing_properties_default() {
        let layer: LayerDescriptor = serde_json::from_str(r#"{"name":"mesh"}"#).unwrap();
        assert_eq!(layer.properties, LayerProperties::default());
        assert!(!layer.is_portal_layer());
    }

    #[test]
    fn test_portal_layer_requires_id_and_display() {
        assert!(LayerDescriptor::new("a").with_lux_id("12").active().is_portal_layer());
        assert!(LayerDescriptor::new("b").with_lux_id("12").loading().is_portal_layer());
        assert!(!LayerDescriptor::new("c").with_lux_id("12").is_portal_layer());
        assert!(!LayerDescriptor::new("d").active().is_portal_layer());
    }
}
