//! Simulated foreign document shared by integration tests.

#![allow(dead_code)]

use dropnkeep_core::{DocumentError, DocumentResult, ElementAttributes, ForeignDocument, Selector};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

pub const BODY: usize = 0;

#[derive(Debug, Clone)]
struct FakeNode {
    tag: String,
    attrs: BTreeMap<String, String>,
    parent: Option<usize>,
    attached: bool,
    rendered: bool,
    text: String,
    reveals: Vec<usize>,
    clicks: u32,
    focuses: u32,
    input_events: u32,
}

impl ElementAttributes for FakeNode {
    fn tag_name(&self) -> &str {
        &self.tag
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

/// In-memory element tree with the discovery/mutation contract of a page.
pub struct FakeDocument {
    nodes: RefCell<Vec<FakeNode>>,
    supports_insert_text: bool,
    failing_operation: Cell<Option<&'static str>>,
    queries: Cell<u32>,
}

impl FakeDocument {
    pub fn new() -> Self {
        Self::with_insert_text(true)
    }

    pub fn with_insert_text(supports_insert_text: bool) -> Self {
        let body = FakeNode {
            tag: "body".to_string(),
            attrs: BTreeMap::new(),
            parent: None,
            attached: true,
            rendered: true,
            text: String::new(),
            reveals: Vec::new(),
            clicks: 0,
            focuses: 0,
            input_events: 0,
        };
        Self {
            nodes: RefCell::new(vec![body]),
            supports_insert_text,
            failing_operation: Cell::new(None),
            queries: Cell::new(0),
        }
    }

    /// Adds a rendered, attached element.
    pub fn add(&self, parent: usize, tag: &str, attrs: &[(&str, &str)]) -> usize {
        self.push(parent, tag, attrs, true)
    }

    /// Adds an element that is not in the page until revealed.
    pub fn add_detached(&self, parent: usize, tag: &str, attrs: &[(&str, &str)]) -> usize {
        self.push(parent, tag, attrs, false)
    }

    /// Clicking `trigger` attaches `target`.
    pub fn reveal_on_click(&self, trigger: usize, target: usize) {
        self.nodes.borrow_mut()[trigger].reveals.push(target);
    }

    pub fn set_rendered(&self, node: usize, rendered: bool) {
        self.nodes.borrow_mut()[node].rendered = rendered;
    }

    pub fn set_text(&self, node: usize, text: &str) {
        self.nodes.borrow_mut()[node].text = text.to_string();
    }

    /// Makes every later call of `operation` fail.
    pub fn fail_on(&self, operation: &'static str) {
        self.failing_operation.set(Some(operation));
    }

    pub fn text(&self, node: usize) -> String {
        self.nodes.borrow()[node].text.clone()
    }

    pub fn clicks(&self, node: usize) -> u32 {
        self.nodes.borrow()[node].clicks
    }

    pub fn focuses(&self, node: usize) -> u32 {
        self.nodes.borrow()[node].focuses
    }

    pub fn input_events(&self, node: usize) -> u32 {
        self.nodes.borrow()[node].input_events
    }

    pub fn query_count(&self) -> u32 {
        self.queries.get()
    }

    fn push(&self, parent: usize, tag: &str, attrs: &[(&str, &str)], attached: bool) -> usize {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(FakeNode {
            tag: tag.to_string(),
            attrs: attrs
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            parent: Some(parent),
            attached,
            rendered: true,
            text: String::new(),
            reveals: Vec::new(),
            clicks: 0,
            focuses: 0,
            input_events: 0,
        });
        nodes.len() - 1
    }

    fn guard(&self, operation: &'static str) -> DocumentResult<()> {
        if self.failing_operation.get() == Some(operation) {
            return Err(DocumentError::new(operation, "simulated fault"));
        }
        Ok(())
    }

    fn in_page(nodes: &[FakeNode], index: usize) -> bool {
        let mut cursor = Some(index);
        while let Some(current) = cursor {
            if !nodes[current].attached {
                return false;
            }
            cursor = nodes[current].parent;
        }
        true
    }

    fn descends_from(nodes: &[FakeNode], index: usize, scope: usize) -> bool {
        let mut cursor = nodes[index].parent;
        while let Some(current) = cursor {
            if current == scope {
                return true;
            }
            cursor = nodes[current].parent;
        }
        false
    }

    fn edit(&self, node: usize, operation: &'static str, f: impl FnOnce(&mut FakeNode)) -> DocumentResult<()> {
        self.guard(operation)?;
        let mut nodes = self.nodes.borrow_mut();
        if !Self::in_page(&nodes, node) {
            return Err(DocumentError::new(operation, "element is detached"));
        }
        f(&mut nodes[node]);
        Ok(())
    }
}

impl ForeignDocument for FakeDocument {
    type Element = usize;

    fn query_first(&self, selector: &Selector) -> DocumentResult<Option<usize>> {
        self.guard("query")?;
        self.queries.set(self.queries.get() + 1);
        let nodes = self.nodes.borrow();
        Ok((1..nodes.len()).find(|&index| {
            Self::in_page(&nodes, index) && selector.matches(&nodes[index])
        }))
    }

    fn query_all_within(&self, scope: &usize, selector: &Selector) -> DocumentResult<Vec<usize>> {
        self.guard("query")?;
        self.queries.set(self.queries.get() + 1);
        let nodes = self.nodes.borrow();
        Ok((1..nodes.len())
            .filter(|&index| {
                Self::in_page(&nodes, index)
                    && Self::descends_from(&nodes, index, *scope)
                    && selector.matches(&nodes[index])
            })
            .collect())
    }

    fn body(&self) -> DocumentResult<usize> {
        self.guard("body")?;
        Ok(BODY)
    }

    fn is_rendered(&self, element: &usize) -> bool {
        let nodes = self.nodes.borrow();
        Self::in_page(&nodes, *element) && nodes[*element].rendered
    }

    fn click(&self, element: &usize) -> DocumentResult<()> {
        let mut revealed = Vec::new();
        self.edit(*element, "click", |node| {
            node.clicks += 1;
            revealed = node.reveals.clone();
        })?;
        let mut nodes = self.nodes.borrow_mut();
        for target in revealed {
            nodes[target].attached = true;
        }
        Ok(())
    }

    fn focus(&self, element: &usize) -> DocumentResult<()> {
        self.edit(*element, "focus", |node| node.focuses += 1)
    }

    fn clear_editable(&self, element: &usize) -> DocumentResult<()> {
        self.edit(*element, "clear", |node| node.text.clear())
    }

    fn insert_text(&self, element: &usize, text: &str) -> DocumentResult<bool> {
        if !self.supports_insert_text {
            return Ok(false);
        }
        self.edit(*element, "insert_text", |node| node.text.push_str(text))?;
        Ok(true)
    }

    fn replace_text(&self, element: &usize, text: &str) -> DocumentResult<()> {
        self.edit(*element, "replace_text", |node| node.text = text.to_string())
    }

    fn notify_input(&self, element: &usize) -> DocumentResult<()> {
        self.edit(*element, "notify_input", |node| node.input_events += 1)
    }
}

/// Standard composer: entry point that reveals a dialog with title and
/// body textboxes and a close button. Returns `(doc, entry, title, body, close)`.
pub fn keep_like_document() -> (FakeDocument, usize, usize, usize, usize) {
    let doc = FakeDocument::new();
    let entry = doc.add(BODY, "div", &[("aria-label", "Take a note…"), ("role", "button")]);
    let dialog = doc.add_detached(BODY, "div", &[("role", "dialog")]);
    let title = doc.add(
        dialog,
        "div",
        &[("contenteditable", "true"), ("role", "textbox")],
    );
    let body = doc.add(
        dialog,
        "div",
        &[("contenteditable", "true"), ("role", "textbox")],
    );
    let close = doc.add(dialog, "div", &[("aria-label", "Close"), ("role", "button")]);
    doc.reveal_on_click(entry, dialog);
    (doc, entry, title, body, close)
}
