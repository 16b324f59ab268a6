use std::borrow::Cow;
use std::rc::Rc;

use log::{debug, info};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, Node, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
    Window,
};

use crate::config::SiteConfig;
use crate::error::SetupError;
use crate::toast::Notify;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollMode {
    Smooth,
    Instant,
}

/// What a click on an in-page link asks for.
#[derive(Debug, PartialEq, Eq)]
pub enum AnchorAction<'a> {
    /// Leave the browser alone (`href` missing, empty or a bare `#`).
    Ignore,
    Jump(&'a str),
}

pub fn resolve_href(href: Option<&str>) -> AnchorAction<'_> {
    match href.and_then(|h| h.strip_prefix('#')) {
        None | Some("") => AnchorAction::Ignore,
        Some(fragment) => AnchorAction::Jump(fragment),
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    Scrolled { id: String, mode: ScrollMode },
    Missing,
}

impl ClickOutcome {
    pub fn prevents_default(&self) -> bool {
        !matches!(self, ClickOutcome::Ignored)
    }
}

pub trait AnchorPage {
    fn has_section(&self, id: &str) -> bool;
    fn prefers_reduced_motion(&self) -> bool;
    fn scroll_to(&self, id: &str, mode: ScrollMode);
}

fn find_section<'a, P: AnchorPage>(page: &P, fragment: &'a str) -> Option<Cow<'a, str>> {
    if page.has_section(fragment) {
        return Some(Cow::Borrowed(fragment));
    }
    match urlencoding::decode(fragment) {
        Ok(decoded) if decoded != fragment && page.has_section(&decoded) => {
            Some(Cow::Owned(decoded.into_owned()))
        }
        _ => None,
    }
}

pub fn handle_click<P, N>(page: &P, notifier: &N, missing_message: &str, href: Option<&str>) -> ClickOutcome
where
    P: AnchorPage,
    N: Notify + ?Sized,
{
    let fragment = match resolve_href(href) {
        AnchorAction::Ignore => return ClickOutcome::Ignored,
        AnchorAction::Jump(fragment) => fragment,
    };

    match find_section(page, fragment) {
        Some(id) => {
            // Users can flip the preference mid-session, so ask every time.
            let mode = if page.prefers_reduced_motion() {
                ScrollMode::Instant
            } else {
                ScrollMode::Smooth
            };
            page.scroll_to(&id, mode);
            ClickOutcome::Scrolled { id: id.into_owned(), mode }
        }
        None => {
            debug!("No section with id '{}'", fragment);
            notifier.notify(missing_message);
            ClickOutcome::Missing
        }
    }
}

pub struct DomAnchorPage {
    window: Window,
    document: Document,
    reduced_motion_query: String,
}

impl DomAnchorPage {
    pub fn new(window: Window, document: Document, config: &SiteConfig) -> Self {
        Self {
            window,
            document,
            reduced_motion_query: config.reduced_motion_query.clone(),
        }
    }
}

impl AnchorPage for DomAnchorPage {
    fn has_section(&self, id: &str) -> bool {
        self.document.get_element_by_id(id).is_some()
    }

    fn prefers_reduced_motion(&self) -> bool {
        matches!(
            self.window.match_media(&self.reduced_motion_query),
            Ok(Some(list)) if list.matches()
        )
    }

    fn scroll_to(&self, id: &str, mode: ScrollMode) {
        let Some(target) = self.document.get_element_by_id(id) else {
            return;
        };
        let behavior = match mode {
            ScrollMode::Smooth => ScrollBehavior::Smooth,
            ScrollMode::Instant => ScrollBehavior::Auto,
        };
        let mut options = ScrollIntoViewOptions::new();
        options.behavior(behavior);
        options.block(ScrollLogicalPosition::Start);
        target.scroll_into_view_with_scroll_into_view_options(&options);
    }
}

fn event_element(event: &Event) -> Option<Element> {
    let node: Node = event.target()?.dyn_into().ok()?;
    match node.dyn_into::<Element>() {
        Ok(element) => Some(element),
        Err(node) => node.parent_element(),
    }
}

/// Delegated click listener for every `#fragment` link in the document.
pub fn install<N>(window: &Window, document: &Document, config: &SiteConfig, notifier: Rc<N>) -> Result<(), SetupError>
where
    N: Notify + 'static,
{
    let page = DomAnchorPage::new(window.clone(), document.clone(), config);
    let selector = config.anchor_selector.clone();
    let missing_message = config.messages.missing_section.clone();

    let on_click = Closure::<dyn Fn(Event)>::new(move |event: Event| {
        let Some(anchor) = event_element(&event).and_then(|el| el.closest(&selector).ok().flatten()) else {
            return;
        };
        let href = anchor.get_attribute("href");
        let outcome = handle_click(&page, notifier.as_ref(), &missing_message, href.as_deref());
        if outcome.prevents_default() {
            event.prevent_default();
        }
    });

    document.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    // Lives as long as the page.
    on_click.forget();

    info!("Anchor navigation installed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::HashSet;

    use super::*;
    use crate::toast::testing::RecordingNotifier;

    const MISSING: &str = "Disponible en futuras actualizaciones";

    #[derive(Default)]
    struct FakePage {
        sections: HashSet<String>,
        reduced_motion: Cell<bool>,
        preference_reads: Cell<usize>,
        scrolls: RefCell<Vec<(String, ScrollMode)>>,
    }

    impl FakePage {
        fn with_sections(ids: &[&str]) -> Self {
            Self {
                sections: ids.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            }
        }
    }

    impl AnchorPage for FakePage {
        fn has_section(&self, id: &str) -> bool {
            self.sections.contains(id)
        }

        fn prefers_reduced_motion(&self) -> bool {
            self.preference_reads.set(self.preference_reads.get() + 1);
            self.reduced_motion.get()
        }

        fn scroll_to(&self, id: &str, mode: ScrollMode) {
            self.scrolls.borrow_mut().push((id.to_string(), mode));
        }
    }

    #[test]
    fn resolve_href_ignores_empty_targets() {
        assert_eq!(resolve_href(None), AnchorAction::Ignore);
        assert_eq!(resolve_href(Some("")), AnchorAction::Ignore);
        assert_eq!(resolve_href(Some("#")), AnchorAction::Ignore);
        assert_eq!(resolve_href(Some("/pricing")), AnchorAction::Ignore);
        assert_eq!(resolve_href(Some("#servicios")), AnchorAction::Jump("servicios"));
    }

    #[test]
    fn existing_section_scrolls_smoothly() {
        let page = FakePage::with_sections(&["servicios"]);
        let notifier = RecordingNotifier::default();

        let outcome = handle_click(&page, &notifier, MISSING, Some("#servicios"));

        assert!(outcome.prevents_default());
        assert_eq!(
            *page.scrolls.borrow(),
            vec![("servicios".to_string(), ScrollMode::Smooth)]
        );
        assert!(notifier.messages.borrow().is_empty());
    }

    #[test]
    fn reduced_motion_is_read_on_every_click() {
        let page = FakePage::with_sections(&["contacto"]);
        let notifier = RecordingNotifier::default();

        page.reduced_motion.set(true);
        handle_click(&page, &notifier, MISSING, Some("#contacto"));
        page.reduced_motion.set(false);
        handle_click(&page, &notifier, MISSING, Some("#contacto"));

        assert_eq!(page.preference_reads.get(), 2);
        assert_eq!(
            *page.scrolls.borrow(),
            vec![
                ("contacto".to_string(), ScrollMode::Instant),
                ("contacto".to_string(), ScrollMode::Smooth),
            ]
        );
    }

    #[test]
    fn missing_section_shows_toast_and_prevents_default() {
        let page = FakePage::with_sections(&["servicios"]);
        let notifier = RecordingNotifier::default();

        let outcome = handle_click(&page, &notifier, MISSING, Some("#blog"));

        assert_eq!(outcome, ClickOutcome::Missing);
        assert!(outcome.prevents_default());
        assert!(page.scrolls.borrow().is_empty());
        assert_eq!(*notifier.messages.borrow(), vec![MISSING.to_string()]);
    }

    #[test]
    fn bare_hash_and_missing_href_do_nothing() {
        let page = FakePage::with_sections(&["servicios"]);
        let notifier = RecordingNotifier::default();

        for href in [Some("#"), Some(""), None] {
            let outcome = handle_click(&page, &notifier, MISSING, href);
            assert_eq!(outcome, ClickOutcome::Ignored);
            assert!(!outcome.prevents_default());
        }
        assert!(page.scrolls.borrow().is_empty());
        assert!(notifier.messages.borrow().is_empty());
        assert_eq!(page.preference_reads.get(), 0);
    }

    #[test]
    fn percent_encoded_fragment_falls_back_to_decoded_id() {
        let page = FakePage::with_sections(&["diseño"]);
        let notifier = RecordingNotifier::default();

        let outcome = handle_click(&page, &notifier, MISSING, Some("#dise%C3%B1o"));

        assert_eq!(
            outcome,
            ClickOutcome::Scrolled {
                id: "diseño".to_string(),
                mode: ScrollMode::Smooth
            }
        );
    }
}
