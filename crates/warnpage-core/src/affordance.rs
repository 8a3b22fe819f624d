#![forbid(unsafe_code)]

//! Interactive elements of the warning page.

/// A clickable element the render layer may show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Affordance {
    PrimaryButton,
    /// Dedicated proceed button (lookalike, insecure-form, HTTPS-only, billing).
    ProceedButton,
    /// "Proceed (unsafe)" link inside the details panel.
    ProceedLink,
    /// "Did you mean ..." link on lookalike pages.
    DontProceedLink,
    DetailsButton,
    DiagnosticLink,
    LearnMoreLink,
    ReportErrorLink,
    ReportingPrivacyLink,
    WhitepaperLink,
    EnhancedProtectionLink,
    /// The error code; on certificate errors it toggles the debugging panel.
    ErrorCode,
}

impl Affordance {
    pub const ALL: [Affordance; 12] = [
        Self::PrimaryButton,
        Self::ProceedButton,
        Self::ProceedLink,
        Self::DontProceedLink,
        Self::DetailsButton,
        Self::DiagnosticLink,
        Self::LearnMoreLink,
        Self::ReportErrorLink,
        Self::ReportingPrivacyLink,
        Self::WhitepaperLink,
        Self::EnhancedProtectionLink,
        Self::ErrorCode,
    ];

    /// DOM element id.
    #[must_use]
    pub const fn element_id(self) -> &'static str {
        match self {
            Self::PrimaryButton => "primary-button",
            Self::ProceedButton => "proceed-button",
            Self::ProceedLink => "proceed-link",
            Self::DontProceedLink => "dont-proceed-link",
            Self::DetailsButton => "details-button",
            Self::DiagnosticLink => "diagnostic-link",
            Self::LearnMoreLink => "learn-more-link",
            Self::ReportErrorLink => "report-error-link",
            Self::ReportingPrivacyLink => "privacy-link",
            Self::WhitepaperLink => "whitepaper-link",
            Self::EnhancedProtectionLink => "enhanced-protection-link",
            Self::ErrorCode => "error-code",
        }
    }

    /// Look up an affordance by DOM element id.
    #[must_use]
    pub fn from_element_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.element_id() == id)
    }
}
