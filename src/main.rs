use std::rc::Rc;

use log::{error, info};
use web_sys::window;

mod anchors;
mod config;
mod contact;
mod error;
mod footer;
mod toast;

use config::SiteConfig;
use error::SetupError;
use footer::DomFooter;
use toast::{DomToastHost, GlooTimers, Notifier, ToastElement};

fn start() -> Result<(), SetupError> {
    let window = window().ok_or(SetupError::NoWindow)?;
    let document = window.document().ok_or(SetupError::NoDocument)?;
    if document.body().is_none() {
        return Err(SetupError::NoBody);
    }
    if document.head().is_none() {
        return Err(SetupError::NoHead);
    }

    let config = SiteConfig::default();
    let notifier = Rc::new(Notifier::new(
        ToastElement::new(DomToastHost::new(document.clone()), &config),
        GlooTimers,
        config.toast_duration_ms,
    ));

    anchors::install(&window, &document, &config, Rc::clone(&notifier))?;
    footer::refresh_year(&DomFooter::find(&document, &config.footer_selector), footer::current_year());
    contact::install(&document, &config, notifier)?;
    Ok(())
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    if let Err(e) = console_log::init_with_level(config::log_level()) {
        gloo_console::error!(format!("error initializing log: {}", e));
    }

    info!("Starting site interactions");
    if let Err(e) = start() {
        error!("Page enhancements disabled: {}", e);
    }
}
