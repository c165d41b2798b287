//! Alerts and toasts on the host page.

use crate::envelope::TOAST_DURATION;
use dropnkeep_core::Notifier;
use gloo_timers::future::TimeoutFuture;
use log::warn;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, Window};

const TOAST_ID: &str = "dropnkeep-toast";
const TOAST_CLASS: &str = "dropnkeep-toast";
const TOAST_VISIBLE_CLASS: &str = "visible";
const TOAST_SHOW_DELAY_MS: u32 = 10;
const TOAST_FADE_MS: u32 = 300;

/// Delivers notices through `window.alert` and a single toast element.
pub struct WebNotifier {
    window: Window,
    document: Document,
}

impl WebNotifier {
    pub fn current() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window available"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        Ok(Self { window, document })
    }

    fn show_toast(&self, message: &str) -> Result<(), JsValue> {
        if let Some(existing) = self.document.get_element_by_id(TOAST_ID) {
            existing.remove();
        }
        let Some(body) = self.document.body() else {
            return Err(JsValue::from_str("document has no body"));
        };

        let toast = self.document.create_element("div")?;
        toast.set_id(TOAST_ID);
        toast.set_class_name(TOAST_CLASS);
        toast.set_text_content(Some(message));
        body.append_child(&toast)?;

        wasm_bindgen_futures::spawn_local(run_toast(toast));
        Ok(())
    }
}

async fn run_toast(toast: Element) {
    let hold_ms = u32::try_from(TOAST_DURATION.as_millis()).unwrap_or(u32::MAX);

    TimeoutFuture::new(TOAST_SHOW_DELAY_MS).await;
    if let Err(err) = toast.class_list().add_1(TOAST_VISIBLE_CLASS) {
        warn!("event=notice module=web status=error channel=toast step=show error={err:?}");
    }
    TimeoutFuture::new(hold_ms.saturating_sub(TOAST_SHOW_DELAY_MS)).await;
    if let Err(err) = toast.class_list().remove_1(TOAST_VISIBLE_CLASS) {
        warn!("event=notice module=web status=error channel=toast step=hide error={err:?}");
    }
    TimeoutFuture::new(TOAST_FADE_MS).await;
    toast.remove();
}

impl Notifier for WebNotifier {
    fn alert(&self, message: &str) {
        if self.window.alert_with_message(message).is_err() {
            warn!("event=notice module=web status=error channel=alert");
        }
    }

    fn toast(&self, message: &str) {
        if let Err(err) = self.show_toast(message) {
            warn!("event=notice module=web status=error channel=toast error={err:?}");
        }
    }
}
