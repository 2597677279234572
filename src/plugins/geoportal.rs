//! The plugin as registered with the host: metadata plus the toolbar actions
//! its configuration enables.

use crate::{
    core::config::PluginConfig,
    plugins::{back2d::Back2dAction, base::PortalAction, print::PrintAction},
    traits::{HostApplication, LinkOpener, ResolutionProvider},
    Result,
};
use std::sync::Arc;

pub struct GeoportalPlugin {
    config: PluginConfig,
    actions: Vec<Box<dyn PortalAction>>,
}

impl GeoportalPlugin {
    /// Registers one action per configured portal URL
    pub fn initialize(config: PluginConfig, resolution: Arc<dyn ResolutionProvider>) -> Self {
        let calibration = config.calibration.resolve();
        let mut actions: Vec<Box<dyn PortalAction>> = Vec::new();

        if let Some(url) = config.geoportal_url() {
            actions.push(Box::new(
                Back2dAction::new(url, config.geoportal_target())
                    .with_calibration(calibration.zoom.clone()),
            ));
        }

        if let Some(url) = config.print_portal_url() {
            actions.push(Box::new(
                PrintAction::new(url, config.print_target(), resolution)
                    .with_quantizer(calibration.scale),
            ));
        }

        if actions.is_empty() {
            log::warn!("{}: no portal URL configured, no action registered", Self::name());
        }

        Self { config, actions }
    }

    pub fn name() -> &'static str {
        env!("CARGO_PKG_NAME")
    }

    pub fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// All default values of the configuration
    pub fn default_options() -> PluginConfig {
        PluginConfig::default()
    }

    /// The plugin's serialization, excluding default values
    pub fn to_json(&self) -> Result<serde_json::Value> {
        self.config.to_json()
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn actions(&self) -> &[Box<dyn PortalAction>] {
        &self.actions
    }

    pub fn action(&self, id: &str) -> Option<&dyn PortalAction> {
        self.actions
            .iter()
            .find(|action| action.id() == id)
            .map(|action| action.as_ref())
    }

    /// Triggers the action with the given id; `None` if it is not registered
    /// or had nothing to open
    pub async fn trigger(
        &self,
        id: &str,
        host: &dyn HostApplication,
        opener: &dyn LinkOpener,
    ) -> Result<Option<String>> {
        match self.action(id) {
            Some(action) => action.trigger(host, opener).await,
            None => Ok(None),
        }
    }

    /// [`trigger`](Self::trigger) for hosts without an async runtime.
    ///
    /// Must not be called from within a tokio runtime.
    #[cfg(feature = "tokio-runtime")]
    pub fn trigger_blocking(
        &self,
        id: &str,
        host: &dyn HostApplication,
        opener: &dyn LinkOpener,
    ) -> Result<Option<String>> {
        let runtime = tokio::runtime::Builder::new_current_thread().build()?;
        runtime.block_on(self.trigger(id, host, opener))
    }
}
