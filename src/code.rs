//! Short code generation
//!
//! Codes are drawn uniformly, character by character, from the 62-character
//! alphanumeric alphabet (`A-Z`, `a-z`, `0-9`). Generation does not check the
//! store: uniqueness is the caller's job (see `handler::create_link`).

use rand::{distr::Alphanumeric, Rng};

/// Length of codes produced when the caller does not supply one.
pub const DEFAULT_LENGTH: usize = 6;

/// Generates a random alphanumeric code of `length` characters.
///
/// # Example
///
/// ```
/// # use shortlink::code::{generate, DEFAULT_LENGTH};
/// let code = generate(DEFAULT_LENGTH);
/// assert_eq!(code.len(), 6);
/// ```
pub fn generate(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
