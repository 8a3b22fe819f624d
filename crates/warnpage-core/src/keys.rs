#![forbid(unsafe_code)]

//! Well-known configuration keys.
//!
//! Names of the load-time data entries read by variant selection and the
//! details panels. Values are case-sensitive.

pub const TYPE: &str = "type";
pub const OVERRIDABLE: &str = "overridable";
pub const BAD_CLOCK: &str = "bad_clock";
pub const BILLING: &str = "billing";
pub const HIDE_PRIMARY_BUTTON: &str = "hide_primary_button";
pub const SHOW_RECURRENT_ERROR_PARAGRAPH: &str = "show_recurrent_error_paragraph";
pub const ERROR_CODE: &str = "errorCode";

// Optional switches; absent means the element is not rendered.
pub const DISPLAY_CHECKBOX: &str = "displaycheckbox";
pub const BOX_CHECKED: &str = "boxchecked";
pub const DISPLAY_ENHANCED_PROTECTION: &str = "displayEnhancedProtectionMessage";

// Localized labels for the details toggle.
pub const OPEN_DETAILS: &str = "openDetails";
pub const CLOSE_DETAILS: &str = "closeDetails";
pub const PROCEED_BUTTON_TEXT: &str = "proceedButtonText";

// Certificate debugging fields.
pub const SUBJECT: &str = "subject";
pub const ISSUER: &str = "issuer";
pub const EXPIRATION_DATE: &str = "expirationDate";
pub const CURRENT_DATE: &str = "currentDate";
pub const PEM: &str = "pem";
