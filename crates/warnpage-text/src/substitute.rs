#![forbid(unsafe_code)]

//! Positional placeholder substitution.
//!
//! Templates are localized strings that may contain:
//!
//! | Syntax      | Meaning                                   |
//! |-------------|-------------------------------------------|
//! | `$1`..`$9`  | Replaced by the 1-based argument          |
//! | `$$`        | A literal `$`                             |
//! | anything    | Passed through unchanged                  |
//!
//! # Invariants
//!
//! 1. Every unescaped `$` is followed by a digit `1`..`9`; anything else,
//!    including a `$` at the end of the template, is a [`TemplateError`].
//! 2. [`format`] and [`format_pieces`] share one scanner, so they make the
//!    same substitution decisions: concatenating the pieces' text always
//!    equals the formatted string.
//! 3. An empty argument substitutes as empty text, not as an error.
//!
//! # Failure Modes
//!
//! | Condition                      | Behavior                               |
//! |--------------------------------|----------------------------------------|
//! | `$0`, `$x`, trailing `$`       | `TemplateError::UnescapedDollar`       |
//! | `$n` with fewer than n args    | `TemplateError::MissingArgument`       |

use std::fmt;

/// Highest placeholder index a template may reference.
pub const MAX_PLACEHOLDER: u8 = 9;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while substituting a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A `$` not followed by `$` or a digit `1`..`9`.
    UnescapedDollar {
        /// Byte offset of the offending `$`.
        position: usize,
    },
    /// A placeholder referenced an argument that was not supplied.
    MissingArgument {
        /// The 1-based placeholder index.
        index: u8,
        /// Byte offset of the placeholder.
        position: usize,
    },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnescapedDollar { position } => {
                write!(f, "unescaped '$' at position {position} in localized string")
            }
            Self::MissingArgument { index, position } => {
                write!(
                    f,
                    "placeholder ${index} at position {position} has no matching argument"
                )
            }
        }
    }
}

impl std::error::Error for TemplateError {}

// ---------------------------------------------------------------------------
// Pieces
// ---------------------------------------------------------------------------

/// One ordered fragment of a substituted template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// Resolved text of this fragment (`$$` already collapsed to `$`).
    pub text: String,
    /// The 1-based argument index when this piece came from a placeholder.
    pub arg: Option<u8>,
}

impl Piece {
    fn literal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            arg: None,
        }
    }

    /// Whether this piece is the value of a placeholder.
    #[must_use]
    pub const fn is_substitution(&self) -> bool {
        self.arg.is_some()
    }
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Literal(&'a str),
    Dollar,
    Arg { index: u8, position: usize },
}

/// Split a template into literal runs, escaped dollars and placeholders.
fn scan(template: &str) -> Result<Vec<Token<'_>>, TemplateError> {
    let bytes = template.as_bytes();
    let mut tokens = Vec::new();
    let mut run_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }
        if run_start < i {
            tokens.push(Token::Literal(&template[run_start..i]));
        }
        match bytes.get(i + 1) {
            Some(b'$') => tokens.push(Token::Dollar),
            Some(&d @ b'1'..=b'9') => tokens.push(Token::Arg {
                index: d - b'0',
                position: i,
            }),
            _ => {
                tracing::warn!(position = i, "unescaped '$' in localized string");
                return Err(TemplateError::UnescapedDollar { position: i });
            }
        }
        i += 2;
        run_start = i;
    }
    if run_start < bytes.len() {
        tokens.push(Token::Literal(&template[run_start..]));
    }
    Ok(tokens)
}

fn resolve<S: AsRef<str>>(args: &[S], index: u8, position: usize) -> Result<&str, TemplateError> {
    args.get(usize::from(index) - 1)
        .map(AsRef::as_ref)
        .ok_or_else(|| {
            tracing::warn!(index, position, "placeholder without argument");
            TemplateError::MissingArgument { index, position }
        })
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Substitute `args` into `template` and return the flattened string.
///
/// `$n` is replaced by `args[n - 1]` and `$$` by a single `$`.
///
/// ```
/// use warnpage_text::format;
///
/// assert_eq!(format("$$", &[] as &[&str]).unwrap(), "$");
/// assert!(format("$0", &[] as &[&str]).is_err());
/// ```
pub fn format<S: AsRef<str>>(template: &str, args: &[S]) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    for token in scan(template)? {
        match token {
            Token::Literal(text) => out.push_str(text),
            Token::Dollar => out.push('$'),
            Token::Arg { index, position } => out.push_str(resolve(args, index, position)?),
        }
    }
    Ok(out)
}

/// Substitute `args` into `template`, keeping substituted spans separate.
///
/// Adjacent literal text (including collapsed `$$`) is merged into one
/// piece; every placeholder yields its own piece. A template without
/// placeholders yields exactly one literal piece, even when empty.
pub fn format_pieces<S: AsRef<str>>(
    template: &str,
    args: &[S],
) -> Result<Vec<Piece>, TemplateError> {
    let mut pieces: Vec<Piece> = Vec::new();
    let mut literal = String::new();

    for token in scan(template)? {
        match token {
            Token::Literal(text) => literal.push_str(text),
            Token::Dollar => literal.push('$'),
            Token::Arg { index, position } => {
                let value = resolve(args, index, position)?;
                if !literal.is_empty() {
                    pieces.push(Piece::literal(std::mem::take(&mut literal)));
                }
                pieces.push(Piece {
                    text: value.to_string(),
                    arg: Some(index),
                });
            }
        }
    }
    if !literal.is_empty() || pieces.is_empty() {
        pieces.push(Piece::literal(literal));
    }
    Ok(pieces)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
