#![forbid(unsafe_code)]

//! Certificate debugging panel.
//!
//! Certificate errors carry the certificate's subject, issuer, validity and
//! PEM chain. Clicking the error code toggles a panel listing them. Field
//! titles are fixed English and are not localized.

use warnpage_core::{ConfigError, LoadTimeData, keys};

/// One row of the debugging panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebuggingField {
    pub title: &'static str,
    pub value: String,
    /// Render the value in a preformatted block.
    pub preformatted: bool,
}

const FIELDS: [(&str, &str, bool); 5] = [
    ("Subject", keys::SUBJECT, false),
    ("Issuer", keys::ISSUER, false),
    ("Expires on", keys::EXPIRATION_DATE, false),
    ("Current date", keys::CURRENT_DATE, false),
    ("PEM encoded chain", keys::PEM, true),
];

/// Contents and open state of the debugging panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebuggingInfo {
    fields: Vec<DebuggingField>,
    expanded: bool,
}

impl DebuggingInfo {
    /// Read the certificate fields. Every field is required.
    pub fn from_config(data: &LoadTimeData) -> Result<Self, ConfigError> {
        let fields = FIELDS
            .iter()
            .map(|&(title, key, preformatted)| {
                Ok(DebuggingField {
                    title,
                    value: data.get_string(key)?.to_string(),
                    preformatted,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(Self {
            fields,
            expanded: false,
        })
    }

    #[must_use]
    pub fn fields(&self) -> &[DebuggingField] {
        &self.fields
    }

    #[must_use]
    pub const fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Flip the panel; returns whether it is now expanded.
    pub fn toggle(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }
}
