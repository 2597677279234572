use crate::{
    core::{
        crs::{Crs, Proj4Projection},
        quantize::ScaleQuantizer,
        view_params::PrintParameters,
    },
    host::AppState,
    plugins::base::{ActionDescriptor, PortalAction},
    traits::{Projection, ResolutionProvider},
    Result,
};
use async_trait::async_trait;
use std::sync::Arc;

pub const PRINT: ActionDescriptor = ActionDescriptor {
    id: "print",
    name: "Print",
    title: "print.title",
    icon: "$vcsPrint",
};

/// Opens the print-ordering portal on the area under the camera
pub struct PrintAction {
    base_url: String,
    target: String,
    grid: Crs,
    quantizer: ScaleQuantizer,
    projection: Arc<dyn Projection>,
    resolution: Arc<dyn ResolutionProvider>,
}

impl PrintAction {
    /// Print action on the LUREF grid (EPSG:2169)
    pub fn new(
        base_url: impl Into<String>,
        target: impl Into<String>,
        resolution: Arc<dyn ResolutionProvider>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            target: target.into(),
            grid: Crs::luref(),
            quantizer: ScaleQuantizer::default(),
            projection: Arc::new(Proj4Projection),
            resolution,
        }
    }

    pub fn with_quantizer(mut self, quantizer: ScaleQuantizer) -> Self {
        self.quantizer = quantizer;
        self
    }

    pub fn with_grid(mut self, grid: Crs) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_projection(mut self, projection: Arc<dyn Projection>) -> Self {
        self.projection = projection;
        self
    }

    pub fn print_parameters(&self, state: &AppState) -> Result<Option<PrintParameters>> {
        let viewpoint = match &state.active_viewpoint {
            Some(viewpoint) => viewpoint,
            None => return Ok(None),
        };
        PrintParameters::assemble(
            viewpoint,
            &self.grid,
            self.projection.as_ref(),
            self.resolution.as_ref(),
            &self.quantizer,
        )
    }
}

#[async_trait]
impl PortalAction for PrintAction {
    fn descriptor(&self) -> &ActionDescriptor {
        &PRINT
    }

    fn target(&self) -> &str {
        &self.target
    }

    fn link_for(&self, state: &AppState) -> Result<Option<String>> {
        Ok(self
            .print_parameters(state)?
            .map(|params| params.to_url(&self.base_url)))
    }
}
