#![forbid(unsafe_code)]

//! Text handling for the warning interstitial.
//!
//! Localized strings carry positional placeholders (`$1`..`$9`) and escaped
//! dollar signs (`$$`). This crate resolves them either into a flat string
//! ([`format`]) or into ordered [`Piece`]s ([`format_pieces`]) for callers
//! that need to wrap the substituted spans, e.g. to hyperlink them.
//!
//! # Example
//! ```
//! use warnpage_text::{format, format_pieces};
//!
//! let text = format("Proceed to $1 (unsafe)", &["example.com"]).unwrap();
//! assert_eq!(text, "Proceed to example.com (unsafe)");
//!
//! let pieces = format_pieces("Costs $$5 at $1", &["example.com"]).unwrap();
//! assert_eq!(pieces.len(), 2);
//! assert_eq!(pieces[0].text, "Costs $5 at ");
//! assert!(pieces[1].is_substitution());
//! ```

pub mod substitute;

pub use substitute::{MAX_PLACEHOLDER, Piece, TemplateError, format, format_pieces};
