//! Hands an exported image to the browser as a download.
use gloo::file::{Blob, ObjectUrl};
use gloo::timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::HtmlAnchorElement;

use crate::error::{EditorError, Result};
use crate::session::ExportedImage;

const REVOKE_DELAY_MS: u32 = 1_000;

pub fn offer_download(image: &ExportedImage) -> Result<()> {
    let blob = Blob::new_with_options(image.png.as_slice(), Some("image/png"));
    let url = ObjectUrl::from(blob);

    let document = gloo_utils::document();
    let anchor = document
        .create_element("a")
        .map_err(|e| EditorError::Export(format!("cannot create link: {:?}", e)))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| EditorError::Export("unexpected link element".to_string()))?;
    anchor.set_href(&url);
    anchor.set_download(&image.file_name);
    anchor.click();

    // The URL must outlive the click until the download has started
    Timeout::new(REVOKE_DELAY_MS, move || drop(url)).forget();
    log::debug!("offered {} for download", image.file_name);
    Ok(())
}
