use log::Level;

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Verbose console output while developing locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

/// Ids, selectors and copy the page markup is expected to provide.
#[derive(Clone, Debug, PartialEq)]
pub struct SiteConfig {
    pub anchor_selector: String,
    pub reduced_motion_query: String,
    pub footer_selector: String,
    pub contact_form_id: String,
    pub fields: FieldNames,
    pub toast_id: String,
    pub toast_style_id: String,
    pub toast_duration_ms: u32,
    pub messages: Messages,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldNames {
    pub name: String,
    pub email: String,
    pub service: String,
    pub channel: String,
    pub message: String,
    /// Id of the consent checkbox; also its label in validation errors.
    pub consent: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Messages {
    pub missing_section: String,
    pub incomplete_form: String,
    pub form_sent: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            anchor_selector: "a[href^=\"#\"]".to_string(),
            reduced_motion_query: "(prefers-reduced-motion: reduce)".to_string(),
            footer_selector: "footer p".to_string(),
            contact_form_id: "contactForm".to_string(),
            fields: FieldNames::default(),
            toast_id: "toast".to_string(),
            toast_style_id: "toast-style".to_string(),
            toast_duration_ms: 1800,
            messages: Messages::default(),
        }
    }
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            name: "nombre".to_string(),
            email: "email".to_string(),
            service: "servicio".to_string(),
            channel: "canal".to_string(),
            message: "mensaje".to_string(),
            consent: "consent".to_string(),
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            missing_section: "Disponible en futuras actualizaciones".to_string(),
            incomplete_form: "Completa los campos obligatorios.".to_string(),
            form_sent: "¡Gracias! Te contactaremos pronto.".to_string(),
        }
    }
}
