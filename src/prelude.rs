//! Prelude module for common geoportal-link types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use geoportal_link::prelude::*;`

pub use crate::core::{
    config::{CalibrationOptions, CalibrationProfile, PluginConfig},
    crs::{Crs, Proj4Projection, ProjDefinition},
    geo::{LonLat, Point},
    quantize::{ScaleMethod, ScaleQuantizer, ScaleTable, ZoomCalibration, ZoomPolicy, ZoomTable},
    view_params::{PrintParameters, ViewParameters},
    viewpoint::{Cartographic, Viewpoint},
};

pub use crate::layers::{
    base::{LayerDescriptor, LayerProperties},
    manager::PortalLayers,
};

pub use crate::host::{AppState, CameraResolution, FixedResolution, StaticHost};

pub use crate::plugins::{
    back2d::Back2dAction,
    base::{ActionDescriptor, PortalAction},
    print::PrintAction,
    GeoportalPlugin,
};

pub use crate::traits::{HostApplication, LinkOpener, Projection, ResolutionProvider};

#[cfg(feature = "wasm")]
pub use crate::browser::AnchorLinkOpener;

pub use crate::{Error, Result};

pub use std::sync::Arc;
