use std::fmt;
use std::rc::Rc;

use log::{debug, info, warn};
use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, FormData, HtmlFormElement, HtmlInputElement};

use crate::config::{FieldNames, Messages, SiteConfig};
use crate::error::SetupError;
use crate::toast::Notify;

/// Raw values as read from the form, before trimming.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContactFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub service: Option<String>,
    pub channel: Option<String>,
    pub message: Option<String>,
    pub consent: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContactPayload {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "servicio")]
    pub service: String,
    #[serde(rename = "canal")]
    pub channel: String,
    #[serde(rename = "mensaje")]
    pub message: String,
    pub consent: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("missing required fields: {}", .0.join(", "))]
pub struct MissingFields(pub Vec<String>);

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl ContactFields {
    /// Missing fields are reported under their configured names.
    pub fn validate(&self, names: &FieldNames) -> Result<ContactPayload, MissingFields> {
        let email = trimmed(&self.email);
        let service = trimmed(&self.service);
        let channel = trimmed(&self.channel);
        let message = trimmed(&self.message);

        let mut missing = Vec::new();
        let checks = [
            (email.is_none(), &names.email),
            (service.is_none(), &names.service),
            (channel.is_none(), &names.channel),
            (message.is_none(), &names.message),
            (!self.consent, &names.consent),
        ];
        for (absent, name) in checks {
            if absent {
                missing.push(name.clone());
            }
        }

        match (email, service, channel, message) {
            (Some(email), Some(service), Some(channel), Some(message)) if missing.is_empty() => {
                Ok(ContactPayload {
                    name: trimmed(&self.name).unwrap_or_default(),
                    email,
                    service,
                    channel,
                    message,
                    consent: true,
                })
            }
            _ => Err(MissingFields(missing)),
        }
    }
}

pub trait ContactForm {
    fn read(&self) -> ContactFields;
    fn reset(&self);
}

/// Where accepted submissions go. Today that is the console; a real
/// delivery backend plugs in here.
pub trait PayloadSink {
    fn dispatch(&self, payload: &ContactPayload);
}

#[derive(Debug, PartialEq)]
pub enum SubmitOutcome {
    Rejected(MissingFields),
    Sent(ContactPayload),
}

impl fmt::Display for SubmitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitOutcome::Rejected(missing) => write!(f, "rejected ({})", missing),
            SubmitOutcome::Sent(_) => write!(f, "sent"),
        }
    }
}

pub fn handle_submit<F, N, S>(
    form: &F,
    notifier: &N,
    sink: &S,
    names: &FieldNames,
    messages: &Messages,
) -> SubmitOutcome
where
    F: ContactForm,
    N: Notify + ?Sized,
    S: PayloadSink,
{
    match form.read().validate(names) {
        Ok(payload) => {
            sink.dispatch(&payload);
            notifier.notify(&messages.form_sent);
            form.reset();
            SubmitOutcome::Sent(payload)
        }
        Err(missing) => {
            debug!("Contact form {}", missing);
            notifier.notify(&messages.incomplete_form);
            SubmitOutcome::Rejected(missing)
        }
    }
}

pub struct ConsoleSink;

impl PayloadSink for ConsoleSink {
    fn dispatch(&self, payload: &ContactPayload) {
        match serde_wasm_bindgen::to_value(payload) {
            Ok(value) => gloo_console::log!("Contact payload", value),
            Err(e) => {
                warn!("Could not convert payload to a JS object: {}", e);
                let json = serde_json::to_string(payload).unwrap_or_else(|_| format!("{:?}", payload));
                gloo_console::log!("Contact payload", json);
            }
        }
    }
}

pub struct DomContactForm {
    form: HtmlFormElement,
    document: Document,
    fields: FieldNames,
}

impl DomContactForm {
    pub fn new(form: HtmlFormElement, document: Document, config: &SiteConfig) -> Self {
        Self {
            form,
            document,
            fields: config.fields.clone(),
        }
    }

    fn consent_given(&self) -> bool {
        self.document
            .get_element_by_id(&self.fields.consent)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|checkbox| checkbox.checked())
            .unwrap_or(false)
    }
}

impl ContactForm for DomContactForm {
    /// Reads through `FormData`, so a radio group with nothing checked (or a
    /// disabled control) comes back as `None` rather than its first `value`.
    fn read(&self) -> ContactFields {
        let data = match FormData::new_with_form(&self.form) {
            Ok(data) => data,
            Err(e) => {
                warn!("Could not read contact form: {:?}", e);
                return ContactFields::default();
            }
        };
        let value = |name: &str| data.get(name).as_string();

        ContactFields {
            name: value(&self.fields.name),
            email: value(&self.fields.email),
            service: value(&self.fields.service),
            channel: value(&self.fields.channel),
            message: value(&self.fields.message),
            consent: self.consent_given(),
        }
    }

    fn reset(&self) {
        self.form.reset();
    }
}

/// Intercepts submit on the contact form. Pages without the form are skipped.
pub fn install<N>(document: &Document, config: &SiteConfig, notifier: Rc<N>) -> Result<(), SetupError>
where
    N: Notify + 'static,
{
    let Some(element) = document.get_element_by_id(&config.contact_form_id) else {
        info!("No #{} on this page, contact handler not installed", config.contact_form_id);
        return Ok(());
    };
    let form: HtmlFormElement = match element.dyn_into() {
        Ok(form) => form,
        Err(_) => {
            warn!("#{} is not a <form>, contact handler not installed", config.contact_form_id);
            return Ok(());
        }
    };

    let contact = DomContactForm::new(form.clone(), document.clone(), config);
    let names = config.fields.clone();
    let messages = config.messages.clone();

    let on_submit = Closure::<dyn Fn(Event)>::new(move |event: Event| {
        event.prevent_default();
        let outcome = handle_submit(&contact, notifier.as_ref(), &ConsoleSink, &names, &messages);
        info!("Contact form {}", outcome);
    });

    form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
    on_submit.forget();

    info!("Contact form handler installed");
    Ok(())
}
