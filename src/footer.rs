use chrono::Datelike;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use web_sys::{Document, Element};

// ASCII word boundaries: "2024年" and "2024ñ" still count as a standalone year.
static YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?-u:\b)[0-9]{4}(?-u:\b)").expect("year pattern is valid"));

/// Replaces the first standalone 4-digit number in `html` with `year`.
/// Returns `None` when there is nothing to replace.
pub fn patch_year(html: &str, year: i32) -> Option<String> {
    let found = YEAR.find(html)?;
    let mut patched = String::with_capacity(html.len());
    patched.push_str(&html[..found.start()]);
    patched.push_str(&year.to_string());
    patched.push_str(&html[found.end()..]);
    Some(patched)
}

pub trait FooterSlot {
    fn read(&self) -> Option<String>;
    fn write(&self, html: &str);
}

pub fn refresh_year<F: FooterSlot>(slot: &F, year: i32) {
    let Some(html) = slot.read() else {
        debug!("No footer paragraph, skipping year refresh");
        return;
    };
    if let Some(patched) = patch_year(&html, year) {
        slot.write(&patched);
    }
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// First paragraph matched by the footer selector, or nothing.
pub struct DomFooter {
    paragraph: Option<Element>,
}

impl DomFooter {
    pub fn find(document: &Document, selector: &str) -> Self {
        Self {
            paragraph: document.query_selector(selector).ok().flatten(),
        }
    }
}

impl FooterSlot for DomFooter {
    fn read(&self) -> Option<String> {
        self.paragraph.as_ref().map(|p| p.inner_html())
    }

    fn write(&self, html: &str) {
        if let Some(p) = &self.paragraph {
            p.set_inner_html(html);
        }
    }
}
