//! Refresh token secret generation.

use rand::Rng;
use rand::distributions::Alphanumeric;

/// Length of a refresh token secret in characters.
pub const SECRET_LENGTH: usize = 60;

/// Generates a random alphanumeric refresh token secret.
///
/// 60 characters over a 62-symbol alphabet carry roughly 357 bits of
/// entropy from the thread-local CSPRNG.
pub fn generate_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SECRET_LENGTH)
        .map(char::from)
        .collect()
}
