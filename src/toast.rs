use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement};

use crate::config::SiteConfig;

const TOAST_CLASS: &str = "site-toast";
const VISIBLE_CLASS: &str = "show";

const TOAST_CSS: &str = r#"
    .site-toast {
        position: fixed;
        left: 50%;
        bottom: 24px;
        transform: translate(-50%, 12px);
        max-width: calc(100% - 32px);
        padding: 12px 20px;
        border-radius: 12px;
        background: rgba(26, 26, 26, 0.95);
        color: #fff;
        font: 500 15px/1.4 -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
        box-shadow: 0 8px 24px rgba(0, 0, 0, 0.3);
        opacity: 0;
        pointer-events: none;
        transition: opacity 0.25s ease, transform 0.25s ease;
        z-index: 9999;
    }
    .site-toast.show {
        opacity: 1;
        transform: translate(-50%, 0);
    }
"#;

/// Anything that can put a short message in front of the user.
pub trait Notify {
    fn notify(&self, message: &str);
}

/// Rendering side of the toast.
pub trait ToastSurface {
    /// Inserts the stylesheet once; later calls do nothing.
    fn ensure_styles(&self);
    /// Writes `message` and restarts the fade-in.
    fn show(&self, message: &str);
    fn hide(&self);
}

/// Delayed callbacks. Dropping the handle cancels the callback.
pub trait Timers {
    type Handle;

    fn after(&self, millis: u32, callback: Box<dyn FnOnce()>) -> Self::Handle;
}

/// Owns the toast surface and the single pending hide.
pub struct Notifier<S, T: Timers> {
    surface: Rc<S>,
    timers: T,
    duration_ms: u32,
    pending_hide: RefCell<Option<T::Handle>>,
}

impl<S, T> Notifier<S, T>
where
    S: ToastSurface + 'static,
    T: Timers,
{
    pub fn new(surface: S, timers: T, duration_ms: u32) -> Self {
        Self {
            surface: Rc::new(surface),
            timers,
            duration_ms,
            pending_hide: RefCell::new(None),
        }
    }
}

impl<S, T> Notify for Notifier<S, T>
where
    S: ToastSurface + 'static,
    T: Timers,
{
    fn notify(&self, message: &str) {
        debug!("Toast: {}", message);
        self.surface.ensure_styles();
        self.surface.show(message);

        let surface = Rc::clone(&self.surface);
        let handle = self
            .timers
            .after(self.duration_ms, Box::new(move || surface.hide()));
        // Dropping the previous handle cancels its hide.
        drop(self.pending_hide.replace(Some(handle)));
    }
}

pub struct GlooTimers;

impl Timers for GlooTimers {
    type Handle = Timeout;

    fn after(&self, millis: u32, callback: Box<dyn FnOnce()>) -> Timeout {
        Timeout::new(millis, callback)
    }
}

/// Document operations the toast needs. Find-or-create decisions stay in
/// [`ToastElement`]; hosts only perform them.
pub trait ToastHost {
    type Node;

    fn has_element(&self, id: &str) -> bool;
    fn insert_style(&self, id: &str, css: &str) -> Result<(), JsValue>;
    fn create_container(&self, id: &str) -> Result<Self::Node, JsValue>;
    fn set_text(&self, node: &Self::Node, text: &str);
    fn set_visible(&self, node: &Self::Node, visible: bool) -> Result<(), JsValue>;
    fn flush_layout(&self, node: &Self::Node);
}

/// The toast singleton: one stylesheet, one lazily created container.
pub struct ToastElement<H: ToastHost> {
    host: H,
    toast_id: String,
    style_id: String,
    node: RefCell<Option<H::Node>>,
}

impl<H: ToastHost> ToastElement<H> {
    pub fn new(host: H, config: &SiteConfig) -> Self {
        Self {
            host,
            toast_id: config.toast_id.clone(),
            style_id: config.toast_style_id.clone(),
            node: RefCell::new(None),
        }
    }

    fn ensure_node(&self) -> bool {
        if self.node.borrow().is_some() {
            return true;
        }
        match self.host.create_container(&self.toast_id) {
            Ok(node) => {
                *self.node.borrow_mut() = Some(node);
                true
            }
            Err(e) => {
                warn!("Could not create toast element: {:?}", e);
                false
            }
        }
    }

    fn set_visible(&self, node: &H::Node, visible: bool) {
        if let Err(e) = self.host.set_visible(node, visible) {
            warn!("Could not toggle toast visibility: {:?}", e);
        }
    }
}

impl<H: ToastHost> ToastSurface for ToastElement<H> {
    fn ensure_styles(&self) {
        if self.host.has_element(&self.style_id) {
            return;
        }
        if let Err(e) = self.host.insert_style(&self.style_id, TOAST_CSS) {
            warn!("Could not inject toast styles: {:?}", e);
        }
    }

    fn show(&self, message: &str) {
        if !self.ensure_node() {
            return;
        }
        let node = self.node.borrow();
        let Some(node) = node.as_ref() else { return };

        self.host.set_text(node, message);
        self.set_visible(node, false);
        // Reading layout flushes the removal so adding the class starts a new transition.
        self.host.flush_layout(node);
        self.set_visible(node, true);
    }

    fn hide(&self) {
        if let Some(node) = self.node.borrow().as_ref() {
            self.set_visible(node, false);
        }
    }
}

/// Appends to the live document: `<style>` in `<head>`, a fixed `<div>` in `<body>`.
pub struct DomToastHost {
    document: Document,
}

impl DomToastHost {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl ToastHost for DomToastHost {
    type Node = HtmlElement;

    fn has_element(&self, id: &str) -> bool {
        self.document.get_element_by_id(id).is_some()
    }

    fn insert_style(&self, id: &str, css: &str) -> Result<(), JsValue> {
        let head = self
            .document
            .head()
            .ok_or_else(|| JsValue::from_str("document has no head"))?;
        let style = self.document.create_element("style")?;
        style.set_id(id);
        style.set_text_content(Some(css));
        head.append_child(&style)?;
        Ok(())
    }

    fn create_container(&self, id: &str) -> Result<HtmlElement, JsValue> {
        let body = self
            .document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;
        let node: HtmlElement = self.document.create_element("div")?.dyn_into()?;
        node.set_id(id);
        node.set_class_name(TOAST_CLASS);
        node.set_attribute("role", "status")?;
        node.set_attribute("aria-live", "polite")?;
        body.append_child(&node)?;
        Ok(node)
    }

    fn set_text(&self, node: &HtmlElement, text: &str) {
        node.set_text_content(Some(text));
    }

    fn set_visible(&self, node: &HtmlElement, visible: bool) -> Result<(), JsValue> {
        let classes = node.class_list();
        if visible {
            classes.add_1(VISIBLE_CLASS)
        } else {
            classes.remove_1(VISIBLE_CLASS)
        }
    }

    fn flush_layout(&self, node: &HtmlElement) {
        let _ = node.offset_width();
    }
}
