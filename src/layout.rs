//! Layout-ready signal for the canvas container.
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, ResizeObserver, ResizeObserverEntry};

use crate::error::{EditorError, Result};
use crate::types::ViewportHint;

/// Current size of an element's box
pub fn measure(element: &Element) -> ViewportHint {
    let rect = element.get_bounding_client_rect();
    ViewportHint::new(rect.width(), rect.height())
}

/// Calls back with the element's size whenever it changes, starting with
/// its first layout. Disconnects when dropped.
pub struct LayoutObserver {
    observer: ResizeObserver,
    _callback: Closure<dyn FnMut(js_sys::Array)>,
}

impl LayoutObserver {
    pub fn observe(element: &Element, mut on_layout: impl FnMut(ViewportHint) + 'static) -> Result<Self> {
        let callback = Closure::wrap(Box::new(move |entries: js_sys::Array| {
            let Some(entry) = entries.get(0).dyn_into::<ResizeObserverEntry>().ok() else {
                return;
            };
            let rect = entry.content_rect();
            on_layout(ViewportHint::new(rect.width(), rect.height()));
        }) as Box<dyn FnMut(js_sys::Array)>);

        let observer = ResizeObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|e| EditorError::Environment(format!("ResizeObserver unavailable: {:?}", e)))?;
        observer.observe(element);

        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for LayoutObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
