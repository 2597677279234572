//! Narrow interfaces to the collaborators the actions depend on
//!
//! The host application, the projection service, the resolution source and
//! the link opener are all external. Actions only ever see them through
//! these traits, which keeps the viewpoint mapping testable without a
//! running 3D viewer.

use crate::{
    core::{
        crs::Crs,
        geo::{LonLat, Point},
    },
    host::AppState,
    Result,
};
use async_trait::async_trait;

/// Trait for coordinate transformation between reference systems
pub trait Projection: Send + Sync {
    /// Transform a point from `source` to `target`
    fn transform(&self, source: &Crs, target: &Crs, point: Point) -> Result<Point>;
}

/// Read access to the live state of the 3D host application
///
/// Fetching the state is the single suspension point of every action.
#[async_trait]
pub trait HostApplication: Send + Sync {
    /// Snapshot of the active viewpoint, UI locale and layer collection
    async fn state(&self) -> Result<AppState>;
}

/// Map resolution in meters per pixel at a geographic position
pub trait ResolutionProvider: Send + Sync {
    /// `None` when the viewer cannot pick the ground at `position`
    fn resolution_at(&self, position: LonLat) -> Option<f64>;
}

/// Opens a URL in a named browsing context
pub trait LinkOpener: Send + Sync {
    fn open(&self, href: &str, target: &str) -> Result<()>;
}
