use crate::{
    core::{crs::Proj4Projection, quantize::ZoomCalibration, view_params::ViewParameters},
    host::AppState,
    plugins::base::{ActionDescriptor, PortalAction},
    traits::Projection,
    Result,
};
use async_trait::async_trait;
use std::sync::Arc;

pub const BACK_2D: ActionDescriptor = ActionDescriptor {
    id: "back-2D",
    name: "2D",
    title: "back2d.title",
    icon: "$vcs2d",
};

/// Jumps from the 3D camera to the same place in the 2D geoportal
pub struct Back2dAction {
    base_url: String,
    target: String,
    calibration: ZoomCalibration,
    projection: Arc<dyn Projection>,
}

impl Back2dAction {
    pub fn new(base_url: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            target: target.into(),
            calibration: ZoomCalibration::default(),
            projection: Arc::new(Proj4Projection),
        }
    }

    pub fn with_calibration(mut self, calibration: ZoomCalibration) -> Self {
        self.calibration = calibration;
        self
    }

    pub fn with_projection(mut self, projection: Arc<dyn Projection>) -> Self {
        self.projection = projection;
        self
    }

    pub fn view_parameters(&self, state: &AppState) -> Result<Option<ViewParameters>> {
        let viewpoint = match &state.active_viewpoint {
            Some(viewpoint) => viewpoint,
            None => return Ok(None),
        };
        ViewParameters::assemble(
            viewpoint,
            &state.layers,
            &state.locale,
            self.projection.as_ref(),
            &self.calibration,
        )
    }
}

#[async_trait]
impl PortalAction for Back2dAction {
    fn descriptor(&self) -> &ActionDescriptor {
        &BACK_2D
    }

    fn target(&self) -> &str {
        &self.target
    }

    fn link_for(&self, state: &AppState) -> Result<Option<String>> {
        Ok(self
            .view_parameters(state)?
            .map(|params| params.to_url(&self.base_url)))
    }
}
