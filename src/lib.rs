//! # geoportal-link
//!
//! Bridges a 3D map viewer and its companion 2D portals.
//!
//! The crate maps the current 3D camera viewpoint (longitude, latitude,
//! altitude, heading) onto the parameters of an equivalent 2D map view:
//! projected coordinates, a discrete zoom level, rotation, a standard print
//! scale and the list of active portal layers. Toolbar actions built on top
//! of it turn those parameters into portal URLs and hand them to a
//! link-opening collaborator.

pub mod core;
pub mod host;
pub mod layers;
pub mod plugins;
pub mod traits;

#[cfg(feature = "wasm")]
pub mod browser;

pub mod prelude;

pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{CalibrationOptions, CalibrationProfile, PluginConfig},
    crs::{Crs, Proj4Projection, ProjDefinition},
    geo::{LonLat, Point},
    quantize::{ScaleMethod, ScaleQuantizer, ZoomCalibration, ZoomPolicy},
    view_params::{PrintParameters, ViewParameters},
    viewpoint::Viewpoint,
};

pub use host::{AppState, CameraResolution, FixedResolution, StaticHost};

pub use layers::{
    base::{LayerDescriptor, LayerProperties},
    manager::PortalLayers,
};

pub use plugins::{
    back2d::Back2dAction, base::PortalAction, print::PrintAction, GeoportalPlugin,
};

pub use traits::{HostApplication, LinkOpener, Projection, ResolutionProvider};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Projection error: {0}")]
    Projection(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Link error: {0}")]
    Link(String),
}
