use crate::{
    host::AppState,
    traits::{HostApplication, LinkOpener},
    Result,
};
use async_trait::async_trait;

/// How an action presents itself in the host toolbar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDescriptor {
    /// Toolbar entry id
    pub id: &'static str,
    /// Short label
    pub name: &'static str,
    /// i18n key of the tooltip
    pub title: &'static str,
    pub icon: &'static str,
}

/// A toolbar action that opens a portal at the current viewpoint
#[async_trait]
pub trait PortalAction: Send + Sync {
    fn descriptor(&self) -> &ActionDescriptor;

    /// Named browsing context the link opens in
    fn target(&self) -> &str;

    /// Portal URL for a host snapshot; `None` outside a 3D view
    fn link_for(&self, state: &AppState) -> Result<Option<String>>;

    fn id(&self) -> &str {
        self.descriptor().id
    }

    /// Runs the action: fetch the host state, build the link, open it.
    ///
    /// Returns the opened URL, or `None` when there was nothing to open.
    async fn trigger(
        &self,
        host: &dyn HostApplication,
        opener: &dyn LinkOpener,
    ) -> Result<Option<String>> {
        let state = host.state().await?;
        let href = match self.link_for(&state)? {
            Some(href) => href,
            None => return Ok(None),
        };

        log::debug!("{}: opening {} in '{}'", self.id(), href, self.target());
        opener.open(&href, self.target())?;
        Ok(Some(href))
    }
}
