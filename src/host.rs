//! Host application state as handed to the actions
//!
//! `AppState` mirrors the JSON the 3D viewer returns for its current state.
//! `StaticHost` serves a fixed snapshot, which is all a headless run or a
//! test needs.

use crate::{
    core::{geo::LonLat, viewpoint::Viewpoint},
    layers::base::LayerDescriptor,
    traits::{HostApplication, ResolutionProvider},
    Result,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

fn default_locale() -> String {
    "en".to_string()
}

/// Snapshot of the host application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub active_viewpoint: Option<Viewpoint>,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub layers: Vec<LayerDescriptor>,
    /// Meters per pixel at the centre of the view, when the host reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<f64>,
}

impl AppState {
    pub fn new(viewpoint: Viewpoint) -> Self {
        Self {
            active_viewpoint: Some(viewpoint),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_layers(mut self, layers: Vec<LayerDescriptor>) -> Self {
        self.layers = layers;
        self
    }

    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = Some(resolution);
        self
    }

    /// The active viewpoint, or an empty one when the viewer reports none
    pub fn viewpoint(&self) -> Viewpoint {
        self.active_viewpoint.clone().unwrap_or_default()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            active_viewpoint: None,
            locale: default_locale(),
            layers: Vec::new(),
            resolution: None,
        }
    }
}

/// A host that always reports the same state
#[derive(Debug, Clone, Default)]
pub struct StaticHost {
    state: AppState,
}

impl StaticHost {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn snapshot(&self) -> &AppState {
        &self.state
    }
}

#[async_trait]
impl HostApplication for StaticHost {
    async fn state(&self) -> Result<AppState> {
        Ok(self.state.clone())
    }
}

impl ResolutionProvider for StaticHost {
    fn resolution_at(&self, _position: LonLat) -> Option<f64> {
        self.state.resolution
    }
}

/// The same resolution everywhere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedResolution(pub f64);

impl ResolutionProvider for FixedResolution {
    fn resolution_at(&self, _position: LonLat) -> Option<f64> {
        Some(self.0)
    }
}

/// Ground resolution seen by a perspective camera looking straight down
///
/// `fov_y` is the vertical field of view in radians, `viewport_height` the
/// canvas height in pixels and `altitude` the camera height above ground.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraResolution {
    pub fov_y: f64,
    pub viewport_height: f64,
    pub altitude: f64,
}

impl CameraResolution {
    pub fn new(fov_y: f64, viewport_height: f64, altitude: f64) -> Self {
        Self {
            fov_y,
            viewport_height,
            altitude,
        }
    }

    /// Meters covered by one pixel at the centre of the view
    pub fn meters_per_pixel(&self) -> Option<f64> {
        if self.viewport_height <= 0.0 || !(self.fov_y > 0.0 && self.fov_y < std::f64::consts::PI)
        {
            return None;
        }
        let visible_height = 2.0 * self.altitude.abs() * (self.fov_y / 2.0).tan();
        let resolution = visible_height / self.viewport_height;
        resolution.is_finite().then_some(resolution)
    }
}

impl ResolutionProvider for CameraResolution {
    fn resolution_at(&self, _position: LonLat) -> Option<f64> {
        self.meters_per_pixel()
    }
}
