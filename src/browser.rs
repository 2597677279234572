//! Link opener for the browser build

use crate::{traits::LinkOpener, Error, Result};
use wasm_bindgen::JsCast;
use web_sys::HtmlAnchorElement;

/// Opens links by clicking a detached `<a>` element, so named targets
/// reuse an already open portal tab.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorLinkOpener;

impl LinkOpener for AnchorLinkOpener {
    fn open(&self, href: &str, target: &str) -> Result<()> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| Error::Link("no document available".to_string()))?;

        let anchor = document
            .create_element("a")
            .map_err(|err| Error::Link(format!("{:?}", err)))?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(|_| Error::Link("created element is not an anchor".to_string()))?;

        anchor.set_href(href);
        anchor.set_target(target);
        anchor.click();
        Ok(())
    }
}
