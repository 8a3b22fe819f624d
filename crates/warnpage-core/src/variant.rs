#![forbid(unsafe_code)]

//! Variant selection: which interstitial to show and which affordances it has.
//!
//! [`Variant::select`] is a pure function of the configuration store. It
//! reads the `type` key once, parses it into an [`InterstitialKind`], and
//! derives every visibility flag from that kind plus a few boolean
//! switches. The result is immutable for the life of the page.
//!
//! # Invariants
//!
//! 1. Same dictionary, same variant: no hidden state is consulted.
//! 2. `bad_clock` is only read for [`InterstitialKind::Ssl`]; `billing` only
//!    for [`InterstitialKind::SafeBrowsing`]. For other kinds they are
//!    `false` and the keys may be absent.
//! 3. An unknown `type` is [`ConfigError::UnsupportedKind`]; there is no
//!    fallback kind.
//!
//! # Affordance table
//!
//! | Affordance        | Visible when                                           |
//! |-------------------|--------------------------------------------------------|
//! | Primary button    | not `hide_primary_button`                              |
//! | Proceed button    | lookalike, insecure-form, HTTPS-only, overridable billing |
//! | Proceed link      | overridable and not billing                            |
//! | Don't-proceed link| lookalike                                              |
//! | Details button    | not captive portal/billing/lookalike/insecure-form/HTTPS-only |
//! | Error code        | certificate-style kinds with an `errorCode`            |
//! | Diagnostic link   | unsafe-site, not billing                               |
//! | Report-error link | unsafe-site, not billing                               |
//! | Learn-more link   | not captive portal/billing/lookalike                   |
//! | Whitepaper link   | reporting checkbox shown                               |

use crate::affordance::Affordance;
use crate::command::Command;
use crate::keys;
use crate::kind::InterstitialKind;
use crate::load_time_data::{ConfigError, LoadTimeData};

/// Theme colour used by the plain unsafe-site page.
pub const SAFE_BROWSING_THEME_COLOR: &str = "rgb(217, 48, 37)";

/// Top-level style class applied to the page body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyClass {
    Ssl,
    BadClock,
    CaptivePortal,
    SafeBrowsingBilling,
    LookalikeUrl,
    InsecureForm,
    HttpsOnly,
    SafeBrowsing,
}

impl BodyClass {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ssl => "ssl",
            Self::BadClock => "bad-clock",
            Self::CaptivePortal => "captive-portal",
            Self::SafeBrowsingBilling => "safe-browsing-billing",
            Self::LookalikeUrl => "lookalike-url",
            Self::InsecureForm => "insecure-form",
            Self::HttpsOnly => "https-only",
            Self::SafeBrowsing => "safe-browsing",
        }
    }
}

/// The selected interstitial variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    kind: InterstitialKind,
    overridable: bool,
    bad_clock: bool,
    billing: bool,
    hide_primary_button: bool,
    show_recurrent_error: bool,
    error_code: Option<String>,
    reporting_checkbox: Option<bool>,
    enhanced_protection: bool,
}

impl Variant {
    /// Derive the variant from the configuration store.
    pub fn select(data: &LoadTimeData) -> Result<Self, ConfigError> {
        let kind: InterstitialKind = data.get_string(keys::TYPE)?.parse()?;

        let overridable = data.get_boolean(keys::OVERRIDABLE)?;
        let hide_primary_button = data.get_boolean(keys::HIDE_PRIMARY_BUTTON)?;
        let show_recurrent_error = data.get_boolean(keys::SHOW_RECURRENT_ERROR_PARAGRAPH)?;
        let bad_clock = match kind {
            InterstitialKind::Ssl => data.get_boolean(keys::BAD_CLOCK)?,
            _ => false,
        };
        let billing = match kind {
            InterstitialKind::SafeBrowsing => data.get_boolean(keys::BILLING)?,
            _ => false,
        };

        let error_code = if kind.is_ssl_like() && data.value_exists(keys::ERROR_CODE) {
            Some(data.get_string(keys::ERROR_CODE)?.to_string())
        } else {
            None
        };
        let reporting_checkbox = if optional_flag(data, keys::DISPLAY_CHECKBOX)? {
            Some(optional_flag(data, keys::BOX_CHECKED)?)
        } else {
            None
        };
        let enhanced_protection = optional_flag(data, keys::DISPLAY_ENHANCED_PROTECTION)?;

        let variant = Self {
            kind,
            overridable,
            bad_clock,
            billing,
            hide_primary_button,
            show_recurrent_error,
            error_code,
            reporting_checkbox,
            enhanced_protection,
        };
        crate::info!(
            kind = %variant.kind,
            overridable,
            bad_clock,
            billing,
            hide_primary_button,
            "interstitial variant selected"
        );
        Ok(variant)
    }

    #[must_use]
    pub const fn kind(&self) -> InterstitialKind {
        self.kind
    }

    /// Whether the user may bypass the warning.
    #[must_use]
    pub const fn is_overridable(&self) -> bool {
        self.overridable
    }

    /// Clock-skew sub-variant of the certificate error.
    #[must_use]
    pub const fn is_bad_clock(&self) -> bool {
        self.bad_clock
    }

    /// Billing sub-variant of the unsafe-site page.
    #[must_use]
    pub const fn is_billing(&self) -> bool {
        self.billing
    }

    #[must_use]
    pub const fn hides_primary_button(&self) -> bool {
        self.hide_primary_button
    }

    /// The error code to show next to the explanation, if any.
    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref()
    }

    #[must_use]
    pub const fn body_class(&self) -> BodyClass {
        match self.kind {
            InterstitialKind::Ssl
            | InterstitialKind::OriginPolicy
            | InterstitialKind::BlockedInterception => {
                if self.bad_clock {
                    BodyClass::BadClock
                } else {
                    BodyClass::Ssl
                }
            }
            InterstitialKind::CaptivePortal => BodyClass::CaptivePortal,
            InterstitialKind::SafeBrowsing if self.billing => BodyClass::SafeBrowsingBilling,
            InterstitialKind::SafeBrowsing => BodyClass::SafeBrowsing,
            InterstitialKind::Lookalike => BodyClass::LookalikeUrl,
            InterstitialKind::InsecureForm => BodyClass::InsecureForm,
            InterstitialKind::HttpsOnly => BodyClass::HttpsOnly,
        }
    }

    /// Theme colour override, only for the plain unsafe-site page.
    #[must_use]
    pub const fn theme_color(&self) -> Option<&'static str> {
        match self.body_class() {
            BodyClass::SafeBrowsing => Some(SAFE_BROWSING_THEME_COLOR),
            _ => None,
        }
    }

    /// Command sent by the primary button, or `None` when it is hidden.
    #[must_use]
    pub const fn primary_command(&self) -> Option<Command> {
        if self.hide_primary_button {
            return None;
        }
        Some(match self.kind {
            InterstitialKind::CaptivePortal => Command::OpenLogin,
            InterstitialKind::Ssl if self.bad_clock => Command::OpenDateSettings,
            InterstitialKind::Ssl if self.overridable => Command::NotProceed,
            InterstitialKind::Ssl => Command::Reload,
            InterstitialKind::SafeBrowsing
            | InterstitialKind::OriginPolicy
            | InterstitialKind::BlockedInterception
            | InterstitialKind::Lookalike
            | InterstitialKind::InsecureForm
            | InterstitialKind::HttpsOnly => Command::NotProceed,
        })
    }

    /// Whether the dedicated proceed button is shown.
    #[must_use]
    pub const fn shows_proceed_button(&self) -> bool {
        matches!(
            self.kind,
            InterstitialKind::Lookalike | InterstitialKind::InsecureForm | InterstitialKind::HttpsOnly
        ) || (self.overridable && self.billing)
    }

    /// Whether the proceed link in the details panel is active.
    #[must_use]
    pub const fn shows_proceed_link(&self) -> bool {
        self.overridable && !self.billing
    }

    /// Whether the closing paragraph (which hosts the proceed link) is shown.
    #[must_use]
    pub const fn shows_final_paragraph(&self) -> bool {
        self.overridable || matches!(self.kind, InterstitialKind::Ssl)
    }

    /// Whether the "this error keeps happening" paragraph is shown.
    #[must_use]
    pub const fn shows_recurrent_error_paragraph(&self) -> bool {
        matches!(self.kind, InterstitialKind::Ssl) && self.show_recurrent_error
    }

    #[must_use]
    pub const fn shows_details_button(&self) -> bool {
        !(self.billing
            || matches!(
                self.kind,
                InterstitialKind::CaptivePortal
                    | InterstitialKind::Lookalike
                    | InterstitialKind::InsecureForm
                    | InterstitialKind::HttpsOnly
            ))
    }

    /// Whether the certificate debugging panel can be opened.
    #[must_use]
    pub const fn has_debugging_info(&self) -> bool {
        matches!(self.kind, InterstitialKind::Ssl)
    }

    /// Initial state of the extended-reporting checkbox, `None` when hidden.
    #[must_use]
    pub const fn reporting_checkbox(&self) -> Option<bool> {
        self.reporting_checkbox
    }

    #[must_use]
    pub const fn shows_enhanced_protection(&self) -> bool {
        self.enhanced_protection
    }

    /// Whether `affordance` is rendered and clickable.
    #[must_use]
    pub fn is_visible(&self, affordance: Affordance) -> bool {
        match affordance {
            Affordance::PrimaryButton => !self.hide_primary_button,
            Affordance::ProceedButton => self.shows_proceed_button(),
            Affordance::ProceedLink => self.shows_proceed_link(),
            Affordance::DontProceedLink => matches!(self.kind, InterstitialKind::Lookalike),
            Affordance::DetailsButton => self.shows_details_button(),
            Affordance::DiagnosticLink | Affordance::ReportErrorLink => {
                matches!(self.kind, InterstitialKind::SafeBrowsing) && !self.billing
            }
            Affordance::LearnMoreLink => {
                !(self.billing
                    || matches!(
                        self.kind,
                        InterstitialKind::CaptivePortal | InterstitialKind::Lookalike
                    ))
            }
            Affordance::WhitepaperLink => self.reporting_checkbox.is_some(),
            Affordance::ReportingPrivacyLink => self.reporting_checkbox.is_some(),
            Affordance::EnhancedProtectionLink => self.enhanced_protection,
            Affordance::ErrorCode => self.error_code.is_some(),
        }
    }

    /// Command a click on `affordance` sends, ignoring visibility.
    ///
    /// The details button and the error code toggle page state instead of
    /// sending a command directly.
    #[must_use]
    pub const fn command_for(&self, affordance: Affordance) -> Option<Command> {
        match affordance {
            Affordance::PrimaryButton => self.primary_command(),
            Affordance::ProceedButton | Affordance::ProceedLink => Some(Command::Proceed),
            Affordance::DontProceedLink => Some(Command::NotProceed),
            Affordance::DiagnosticLink => Some(Command::OpenDiagnostic),
            Affordance::LearnMoreLink => Some(Command::OpenHelpCenter),
            Affordance::ReportErrorLink => Some(Command::ReportPhishingError),
            Affordance::ReportingPrivacyLink => Some(Command::OpenReportingPrivacy),
            Affordance::WhitepaperLink => Some(Command::OpenWhitepaper),
            Affordance::EnhancedProtectionLink => Some(Command::OpenEnhancedProtectionSettings),
            Affordance::DetailsButton | Affordance::ErrorCode => None,
        }
    }
}

/// Read an optional boolean switch: absent means `false`, wrong type is an error.
fn optional_flag(data: &LoadTimeData, key: &str) -> Result<bool, ConfigError> {
    if data.value_exists(key) {
        data.get_boolean(key)
    } else {
        Ok(false)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_time_data::{Dictionary, Value};
    use proptest::prelude::*;

    fn config(kind: &str, extra: &[(&str, Value)]) -> LoadTimeData {
        let mut data: Dictionary = [
            (keys::TYPE, Value::from(kind)),
            (keys::OVERRIDABLE, false.into()),
            (keys::HIDE_PRIMARY_BUTTON, false.into()),
            (keys::SHOW_RECURRENT_ERROR_PARAGRAPH, false.into()),
            (keys::BAD_CLOCK, false.into()),
            (keys::BILLING, false.into()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        for (k, v) in extra {
            data.insert((*k).to_string(), v.clone());
        }
        LoadTimeData::with_data(data)
    }

    fn select(kind: &str, extra: &[(&str, Value)]) -> Variant {
        Variant::select(&config(kind, extra)).unwrap()
    }

    #[test]
    fn ssl_bad_clock() {
        let v = select("SSL", &[(keys::BAD_CLOCK, true.into())]);
        assert_eq!(v.kind(), InterstitialKind::Ssl);
        assert!(v.is_bad_clock());
        assert!(!v.is_billing());
        assert_eq!(v.body_class(), BodyClass::BadClock);
        assert_eq!(v.primary_command(), Some(Command::OpenDateSettings));
    }

    #[test]
    fn safebrowsing_billing() {
        let v = select(
            "SAFEBROWSING",
            &[(keys::BILLING, true.into()), (keys::OVERRIDABLE, true.into())],
        );
        assert_eq!(v.kind(), InterstitialKind::SafeBrowsing);
        assert!(v.is_billing());
        assert!(!v.is_bad_clock());
        assert_eq!(v.body_class(), BodyClass::SafeBrowsingBilling);
        assert!(v.shows_proceed_button());
        assert!(!v.shows_proceed_link());
        assert!(!v.shows_details_button());
        assert_eq!(v.theme_color(), None);
    }

    #[test]
    fn plain_safebrowsing_overrides_theme_color() {
        let v = select("SAFEBROWSING", &[]);
        assert_eq!(v.body_class(), BodyClass::SafeBrowsing);
        assert_eq!(v.theme_color(), Some(SAFE_BROWSING_THEME_COLOR));
        assert!(v.shows_details_button());
        assert!(!v.shows_final_paragraph());
    }

    #[test]
    fn unknown_type_fails() {
        let err = Variant::select(&config("MALWARE", &[])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnsupportedKind {
                value: "MALWARE".into()
            }
        );
    }

    #[test]
    fn unset_store_fails() {
        assert_eq!(
            Variant::select(&LoadTimeData::new()),
            Err(ConfigError::Uninitialized)
        );
    }

    #[test]
    fn missing_required_switch_fails() {
        let data: Dictionary = [(keys::TYPE.to_string(), Value::from("LOOKALIKE"))]
            .into_iter()
            .collect();
        assert!(matches!(
            Variant::select(&LoadTimeData::with_data(data)),
            Err(ConfigError::MissingKey { .. })
        ));
    }

    #[test]
    fn bad_clock_and_billing_ignored_for_other_kinds() {
        let data: Dictionary = [
            (keys::TYPE, Value::from("CAPTIVE_PORTAL")),
            (keys::OVERRIDABLE, false.into()),
            (keys::HIDE_PRIMARY_BUTTON, false.into()),
            (keys::SHOW_RECURRENT_ERROR_PARAGRAPH, true.into()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        let v = Variant::select(&LoadTimeData::with_data(data)).unwrap();
        assert!(!v.is_bad_clock());
        assert!(!v.is_billing());
        assert!(!v.shows_recurrent_error_paragraph());
        assert_eq!(v.primary_command(), Some(Command::OpenLogin));
        assert!(!v.shows_details_button());
    }

    #[test]
    fn ssl_primary_command_matrix() {
        let reload = select("SSL", &[]);
        assert_eq!(reload.primary_command(), Some(Command::Reload));

        let back = select("SSL", &[(keys::OVERRIDABLE, true.into())]);
        assert_eq!(back.primary_command(), Some(Command::NotProceed));
        assert!(back.shows_proceed_link());
    }

    #[test]
    fn hidden_primary_button_has_no_command() {
        let v = select("SSL", &[(keys::HIDE_PRIMARY_BUTTON, true.into())]);
        assert_eq!(v.primary_command(), None);
        assert!(!v.is_visible(Affordance::PrimaryButton));
    }

    #[test]
    fn lookalike_affordances() {
        let v = select("LOOKALIKE", &[]);
        assert_eq!(v.body_class(), BodyClass::LookalikeUrl);
        assert!(v.is_visible(Affordance::ProceedButton));
        assert!(v.is_visible(Affordance::DontProceedLink));
        assert!(!v.is_visible(Affordance::DetailsButton));
        assert_eq!(v.command_for(Affordance::DontProceedLink), Some(Command::NotProceed));
    }

    #[test]
    fn error_code_only_for_ssl_like_kinds() {
        let ssl = select("SSL", &[(keys::ERROR_CODE, "NET::ERR_CERT_DATE_INVALID".into())]);
        assert_eq!(ssl.error_code(), Some("NET::ERR_CERT_DATE_INVALID"));
        assert!(ssl.is_visible(Affordance::ErrorCode));

        let origin = select("ORIGIN_POLICY", &[(keys::ERROR_CODE, "E".into())]);
        assert_eq!(origin.body_class(), BodyClass::Ssl);
        assert_eq!(origin.error_code(), Some("E"));
        assert!(!origin.has_debugging_info());

        let sb = select("SAFEBROWSING", &[(keys::ERROR_CODE, "E".into())]);
        assert_eq!(sb.error_code(), None);
    }

    #[test]
    fn recurrent_error_paragraph_only_for_ssl() {
        let on = select("SSL", &[(keys::SHOW_RECURRENT_ERROR_PARAGRAPH, true.into())]);
        assert!(on.shows_recurrent_error_paragraph());
        let off = select(
            "BLOCKED_INTERCEPTION",
            &[(keys::SHOW_RECURRENT_ERROR_PARAGRAPH, true.into())],
        );
        assert!(!off.shows_recurrent_error_paragraph());
    }

    #[test]
    fn optional_switches() {
        let v = select(
            "SAFEBROWSING",
            &[
                (keys::DISPLAY_CHECKBOX, true.into()),
                (keys::BOX_CHECKED, true.into()),
                (keys::DISPLAY_ENHANCED_PROTECTION, true.into()),
            ],
        );
        assert_eq!(v.reporting_checkbox(), Some(true));
        assert!(v.is_visible(Affordance::ReportingPrivacyLink));
        assert!(v.is_visible(Affordance::EnhancedProtectionLink));

        let plain = select("SAFEBROWSING", &[]);
        assert_eq!(plain.reporting_checkbox(), None);
        assert!(!plain.shows_enhanced_protection());
    }

    #[test]
    fn optional_switch_with_wrong_type_fails() {
        let err = Variant::select(&config("SSL", &[(keys::DISPLAY_CHECKBOX, "yes".into())]));
        assert!(matches!(err, Err(ConfigError::TypeMismatch { .. })));
    }

    #[test]
    fn selection_is_deterministic() {
        let data = config(
            "SSL",
            &[(keys::OVERRIDABLE, true.into()), (keys::ERROR_CODE, "E".into())],
        );
        let first = Variant::select(&data).unwrap();
        for _ in 0..8 {
            assert_eq!(Variant::select(&data).unwrap(), first);
        }
    }

    #[test]
    fn every_kind_has_a_primary_command() {
        for kind in InterstitialKind::ALL {
            let v = select(kind.as_str(), &[]);
            assert!(v.primary_command().is_some(), "{kind}");
        }
    }

    #[test]
    fn help_links_follow_the_kind() {
        let sb = select("SAFEBROWSING", &[]);
        assert!(sb.is_visible(Affordance::DiagnosticLink));
        assert!(sb.is_visible(Affordance::ReportErrorLink));
        assert!(sb.is_visible(Affordance::LearnMoreLink));
        assert!(!sb.is_visible(Affordance::WhitepaperLink));

        let billing = select("SAFEBROWSING", &[(keys::BILLING, true.into())]);
        assert!(!billing.is_visible(Affordance::DiagnosticLink));
        assert!(!billing.is_visible(Affordance::LearnMoreLink));

        let ssl = select("SSL", &[]);
        assert!(!ssl.is_visible(Affordance::DiagnosticLink));
        assert!(!ssl.is_visible(Affordance::ReportErrorLink));
        assert!(ssl.is_visible(Affordance::LearnMoreLink));

        for kind in ["CAPTIVE_PORTAL", "LOOKALIKE"] {
            let v = select(kind, &[]);
            assert!(!v.is_visible(Affordance::LearnMoreLink), "{kind}");
            assert!(!v.is_visible(Affordance::ReportErrorLink), "{kind}");
        }

        let reporting = select("SSL", &[(keys::DISPLAY_CHECKBOX, true.into())]);
        assert!(reporting.is_visible(Affordance::WhitepaperLink));
    }

    proptest! {
        #[test]
        fn selection_depends_only_on_the_dictionary(
            index in 0..InterstitialKind::ALL.len(),
            switches in prop::array::uniform8(any::<bool>()),
        ) {
            let kind = InterstitialKind::ALL[index];
            let [overridable, hide, recurrent, bad_clock, billing, checkbox, checked, enhanced] =
                switches;
            let data = config(
                kind.as_str(),
                &[
                    (keys::OVERRIDABLE, overridable.into()),
                    (keys::HIDE_PRIMARY_BUTTON, hide.into()),
                    (keys::SHOW_RECURRENT_ERROR_PARAGRAPH, recurrent.into()),
                    (keys::BAD_CLOCK, bad_clock.into()),
                    (keys::BILLING, billing.into()),
                    (keys::DISPLAY_CHECKBOX, checkbox.into()),
                    (keys::BOX_CHECKED, checked.into()),
                    (keys::DISPLAY_ENHANCED_PROTECTION, enhanced.into()),
                ],
            );

            let first = Variant::select(&data).unwrap();
            prop_assert_eq!(&Variant::select(&data).unwrap(), &first);
            prop_assert_eq!(first.kind(), kind);
            prop_assert_eq!(first.is_bad_clock(), bad_clock && kind == InterstitialKind::Ssl);
            prop_assert_eq!(
                first.is_billing(),
                billing && kind == InterstitialKind::SafeBrowsing
            );
            prop_assert_eq!(first.reporting_checkbox(), checkbox.then_some(checked));
            prop_assert_eq!(first.primary_command().is_none(), hide);
        }
    }
}
