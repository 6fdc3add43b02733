//! The result envelope of one parse.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Error categories seen during one parse. Bits combine freely.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ParseErrors: u8 {
        /// An option needing a value had none, or a mandatory field was never given.
        const MISSING_VALUE = 1;
        /// A value failed coercion, or a token matched nothing.
        const WRONG_VALUE = 1 << 1;
        /// A non-empty array ended up with no elements.
        const EMPTY_ARRAY = 1 << 2;
    }
}

/// Outcome of parsing one token list.
///
/// `success` is `true` iff `errors` is empty, or help was printed; in help
/// mode `value` is the record's default.
///
/// # Examples
///
/// ```
/// use argbind_parser::{ParseErrors, ParseOutcome};
///
/// let outcome = ParseOutcome::finished(5, ParseErrors::WRONG_VALUE);
/// assert!(!outcome.success);
/// assert!(outcome.has(ParseErrors::WRONG_VALUE));
/// assert!(!outcome.has(ParseErrors::MISSING_VALUE));
///
/// let help = ParseOutcome::help(0);
/// assert!(help.success && help.printed_help);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseOutcome<T> {
    pub success: bool,
    pub printed_help: bool,
    pub errors: ParseErrors,
    pub value: T,
}

impl<T> ParseOutcome<T> {
    /// Outcome of a parse that ran over the whole input.
    pub fn finished(value: T, errors: ParseErrors) -> Self {
        Self {
            success: errors.is_empty(),
            printed_help: false,
            errors,
            value,
        }
    }

    /// Outcome of a parse that stopped at a help token.
    pub fn help(value: T) -> Self {
        Self {
            success: true,
            printed_help: true,
            errors: ParseErrors::empty(),
            value,
        }
    }

    /// Returns `true` if every bit of `errors` was recorded.
    pub fn has(&self, errors: ParseErrors) -> bool {
        self.errors.contains(errors)
    }

    /// Maps the parsed value, keeping the status.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseOutcome<U> {
        ParseOutcome {
            success: self.success,
            printed_help: self.printed_help,
            errors: self.errors,
            value: f(self.value),
        }
    }
}
