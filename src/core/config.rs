//! Plugin configuration and calibration presets
//!
//! `PluginConfig` is what the host hands over at initialization. The
//! calibration presets follow the portal revisions: each one bundles the zoom
//! table with its matching policy and the print scale table with its
//! resolution method.

use crate::{
    core::{
        constants::DEFAULT_TARGET,
        quantize::{ScaleQuantizer, ZoomCalibration},
    },
    Result,
};
use serde::{Deserialize, Serialize};

/// Initialization options; a missing URL disables the matching action
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginConfig {
    /// Base URL of the 2D geoportal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_to_2d_geoportal: Option<String>,
    /// Browsing context for the 2D geoportal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<String>,
    /// Base URL of the print-ordering portal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_to_print_portal: Option<String>,
    /// Browsing context for the print portal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_tab_id: Option<String>,
    #[serde(default, skip_serializing_if = "CalibrationProfile::is_default")]
    pub calibration: CalibrationProfile,
}

impl PluginConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialization without the default values
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn geoportal_url(&self) -> Option<&str> {
        non_empty(&self.path_to_2d_geoportal)
    }

    pub fn print_portal_url(&self) -> Option<&str> {
        non_empty(&self.path_to_print_portal)
    }

    pub fn geoportal_target(&self) -> &str {
        non_empty(&self.tab_id).unwrap_or(DEFAULT_TARGET)
    }

    pub fn print_target(&self) -> &str {
        non_empty(&self.print_tab_id).unwrap_or(DEFAULT_TARGET)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.trim().is_empty())
}

/// Calibration presets for the known portal revisions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CalibrationProfile {
    /// Threshold zoom lookup, latitude-corrected 1-2.5-5 print scales
    Current,
    /// Nearest-altitude zoom lookup, DPI-based linear print scales
    Legacy,
    Custom(CalibrationOptions),
}

impl CalibrationProfile {
    pub fn resolve(&self) -> CalibrationOptions {
        match self {
            Self::Current => CalibrationOptions {
                zoom: ZoomCalibration::current(),
                scale: ScaleQuantizer::current(),
            },
            Self::Legacy => CalibrationOptions {
                zoom: ZoomCalibration::legacy(),
                scale: ScaleQuantizer::legacy(),
            },
            Self::Custom(options) => options.clone(),
        }
    }

    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self::Current
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationOptions {
    pub zoom: ZoomCalibration,
    pub scale: ScaleQuantizer,
}

impl Default for CalibrationOptions {
    fn default() -> Self {
        CalibrationProfile::default().resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::quantize::{ScaleMethod, ZoomPolicy};

    #[test]
    fn test_calibration_presets() {
        let current = CalibrationProfile::Current.resolve();
        let legacy = CalibrationProfile::Legacy.resolve();

        assert_eq!(current.zoom.policy, ZoomPolicy::StrictlyExceeds);
        assert_eq!(legacy.zoom.policy, ZoomPolicy::Nearest);
        assert!(matches!(
            current.scale.method,
            ScaleMethod::LatitudeCorrected { .. }
        ));
        assert!(matches!(legacy.scale.method, ScaleMethod::Dpi { .. }));
        assert!(legacy.scale.table.scales().len() > current.scale.table.scales().len());
        assert_eq!(CalibrationOptions::default(), current);
    }

    #[test]
    fn test_config_from_json() {
        let config = PluginConfig::from_json(
            r#"{"pathTo2dGeoportal":"https://map.geoportail.lu/","tabId":"geoportal"}"#,
        )
        .unwrap();

        assert_eq!(config.geoportal_url(), Some("https://map.geoportail.lu/"));
        assert_eq!(config.geoportal_target(), "geoportal");
        assert_eq!(config.print_portal_url(), None);
        assert_eq!(config.print_target(), "_blank");
        assert_eq!(config.calibration, CalibrationProfile::Current);
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let config = PluginConfig {
            path_to_2d_geoportal: Some("  ".to_string()),
            tab_id: Some(String::new()),
            ..PluginConfig::default()
        };
        assert_eq!(config.geoportal_url(), None);
        assert_eq!(config.geoportal_target(), "_blank");
    }

    #[test]
    fn test_custom_calibration_from_json() {
        let config = PluginConfig::from_json(
            r#"{"calibration": {"custom": {
                "zoom": {"table": {"9": 2000.0, "10": 1000.0}, "policy": "nearest"},
                "scale": {"table": [1000, 5000],
                          "method": {"type": "dpi", "dpi": 96.0}}
            }}}"#,
        )
        .unwrap();

        let options = config.calibration.resolve();
        assert_eq!(options.zoom.zoom_for(1_100.0), 10);
        let scale = options.scale.scale_for(10.0, None);
        assert!(options.scale.table.contains(scale));
    }

    #[test]
    fn test_invalid_custom_tables_are_rejected() {
        let empty_scales = r#"{"calibration": {"custom": {
            "zoom": {"table": {"9": 2000.0, "10": 1000.0}, "policy": "nearest"},
            "scale": {"table": [], "method": {"type": "dpi", "dpi": 96.0}}
        }}}"#;
        assert!(matches!(
            PluginConfig::from_json(empty_scales),
            Err(crate::Error::Serialization(_))
        ));

        let rising_altitudes = r#"{"calibration": {"custom": {
            "zoom": {"table": {"9": 100.0, "10": 5000.0}, "policy": "strictlyExceeds"},
            "scale": {"table": [1000, 5000], "method": {"type": "dpi", "dpi": 96.0}}
        }}}"#;
        assert!(PluginConfig::from_json(rising_altitudes).is_err());

        let unsorted_scales = r#"{"calibration": {"custom": {
            "zoom": {"table": {"9": 2000.0}, "policy": "nearest"},
            "scale": {"table": [5000, 1000], "method": {"type": "dpi", "dpi": 96.0}}
        }}}"#;
        assert!(PluginConfig::from_json(unsorted_scales).is_err());
    }

    #[test]
    fn test_to_json_skips_defaults() {
        assert_eq!(
            PluginConfig::default().to_json().unwrap(),
            serde_json::json!({})
        );

        let config = PluginConfig {
            path_to_print_portal: Some("https://shop.example/print".to_string()),
            calibration: CalibrationProfile::Legacy,
            ..PluginConfig::default()
        };
        assert_eq!(
            config.to_json().unwrap(),
            serde_json::json!({
                "pathToPrintPortal": "https://shop.example/print",
                "calibration": "legacy"
            })
        );
    }
}
