//! `ForeignDocument` over the live page.
//!
//! # Invariants
//! - Every lookup goes through `Selector::to_css`, so only the restricted
//!   selector subset ever reaches `querySelector`.
//! - Element handles are plain `web_sys::Element` clones and are dropped
//!   with the attempt that found them.

use dropnkeep_core::{DocumentError, DocumentResult, ForeignDocument, Selector};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, EventInit, HtmlDocument, HtmlElement};

/// The page the content script runs in.
pub struct WebDocument {
    document: Document,
}

impl WebDocument {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Document of the current window.
    pub fn current() -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        Ok(Self::new(document))
    }

    fn html_document(&self) -> Option<&HtmlDocument> {
        self.document.dyn_ref::<HtmlDocument>()
    }

    fn exec(&self, operation: &'static str, command: &str) -> DocumentResult<bool> {
        let Some(html) = self.html_document() else {
            return Ok(false);
        };
        html.exec_command(command)
            .map_err(|err| js_error(operation, &err))
    }
}

fn as_html<'a>(operation: &'static str, element: &'a Element) -> DocumentResult<&'a HtmlElement> {
    element
        .dyn_ref::<HtmlElement>()
        .ok_or_else(|| DocumentError::new(operation, "element is not an HTML element"))
}

fn js_error(operation: &'static str, value: &JsValue) -> DocumentError {
    let message = value
        .dyn_ref::<js_sys::Error>()
        .map(|err| String::from(err.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"));
    DocumentError::new(operation, message)
}

impl ForeignDocument for WebDocument {
    type Element = Element;

    fn query_first(&self, selector: &Selector) -> DocumentResult<Option<Element>> {
        self.document
            .query_selector(&selector.to_css())
            .map_err(|err| js_error("query", &err))
    }

    fn query_all_within(&self, scope: &Element, selector: &Selector) -> DocumentResult<Vec<Element>> {
        let nodes = scope
            .query_selector_all(&selector.to_css())
            .map_err(|err| js_error("query", &err))?;
        Ok((0..nodes.length())
            .filter_map(|index| nodes.get(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect())
    }

    fn body(&self) -> DocumentResult<Element> {
        self.document
            .body()
            .map(Element::from)
            .ok_or_else(|| DocumentError::new("body", "document has no body"))
    }

    fn is_rendered(&self, element: &Element) -> bool {
        element
            .dyn_ref::<HtmlElement>()
            .is_some_and(|html| html.offset_parent().is_some())
    }

    fn click(&self, element: &Element) -> DocumentResult<()> {
        as_html("click", element)?.click();
        Ok(())
    }

    fn focus(&self, element: &Element) -> DocumentResult<()> {
        as_html("focus", element)?
            .focus()
            .map_err(|err| js_error("focus", &err))
    }

    fn clear_editable(&self, element: &Element) -> DocumentResult<()> {
        // Editing commands act on the focused region, so the caller focuses first.
        let selected = self.exec("clear", "selectAll")?;
        let deleted = selected && self.exec("clear", "delete")?;
        if !deleted {
            as_html("clear", element)?.set_inner_text("");
        }
        Ok(())
    }

    fn insert_text(&self, _element: &Element, text: &str) -> DocumentResult<bool> {
        let Some(html) = self.html_document() else {
            return Ok(false);
        };
        let supported = html
            .query_command_supported("insertText")
            .map_err(|err| js_error("insert_text", &err))?;
        if !supported {
            return Ok(false);
        }
        html.exec_command_with_show_ui_and_value("insertText", false, text)
            .map_err(|err| js_error("insert_text", &err))
    }

    fn replace_text(&self, element: &Element, text: &str) -> DocumentResult<()> {
        as_html("replace_text", element)?.set_inner_text(text);
        Ok(())
    }

    fn notify_input(&self, element: &Element) -> DocumentResult<()> {
        let init = EventInit::new();
        init.set_bubbles(true);
        let event = Event::new_with_event_init_dict("input", &init)
            .map_err(|err| js_error("notify_input", &err))?;
        element
            .dispatch_event(&event)
            .map(|_| ())
            .map_err(|err| js_error("notify_input", &err))
    }
}
