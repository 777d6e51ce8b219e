//! Attendance code generation. Pure draws; uniqueness against live codes
//! is the store's job.

use rand::Rng;

/// Codes are fixed-length so the UI can render input boxes per character.
pub const CODE_LENGTH: usize = 8;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Draws a fresh 8-character upper-case alphanumeric code.
pub fn generate() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}
