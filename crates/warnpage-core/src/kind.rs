#![forbid(unsafe_code)]

//! Interstitial kinds.
//!
//! The host names the kind through the `type` configuration key. Parsing is
//! strict: an unrecognized string is [`ConfigError::UnsupportedKind`].

use std::fmt;
use std::str::FromStr;

use crate::load_time_data::ConfigError;

/// The category of warning being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterstitialKind {
    /// Certificate / TLS error.
    Ssl,
    /// Site flagged as unsafe (malware, phishing, billing).
    SafeBrowsing,
    /// Network requires a captive-portal login.
    CaptivePortal,
    /// Domain looks like a well-known domain.
    Lookalike,
    /// Origin policy could not be applied.
    OriginPolicy,
    /// Connection is being intercepted by software on the machine.
    BlockedInterception,
    /// Form on a secure page submits over an insecure connection.
    InsecureForm,
    /// Forced-HTTPS upgrade failed.
    HttpsOnly,
}

impl InterstitialKind {
    /// All kinds.
    pub const ALL: [InterstitialKind; 8] = [
        Self::Ssl,
        Self::SafeBrowsing,
        Self::CaptivePortal,
        Self::Lookalike,
        Self::OriginPolicy,
        Self::BlockedInterception,
        Self::InsecureForm,
        Self::HttpsOnly,
    ];

    /// The `type` string the host uses for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ssl => "SSL",
            Self::SafeBrowsing => "SAFEBROWSING",
            Self::CaptivePortal => "CAPTIVE_PORTAL",
            Self::Lookalike => "LOOKALIKE",
            Self::OriginPolicy => "ORIGIN_POLICY",
            Self::BlockedInterception => "BLOCKED_INTERCEPTION",
            Self::InsecureForm => "INSECURE_FORM",
            Self::HttpsOnly => "HTTPS_ONLY",
        }
    }

    /// Kinds rendered with the certificate-error layout.
    #[must_use]
    pub const fn is_ssl_like(self) -> bool {
        matches!(
            self,
            Self::Ssl | Self::OriginPolicy | Self::BlockedInterception
        )
    }
}

impl FromStr for InterstitialKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                crate::error!(value = s, "unsupported interstitial type");
                ConfigError::UnsupportedKind {
                    value: s.to_string(),
                }
            })
    }
}

impl fmt::Display for InterstitialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
