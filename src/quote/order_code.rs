//! Human-readable quote numbers.
//!
//! `ORC-<unix millis>-<9 base-36 chars>`. Uniqueness is best effort
//! (timestamp plus randomness, no central counter), so the code is a display
//! label; `quote_orders.id` stays the primary key.

use chrono::{DateTime, Utc};
use rand::Rng;

pub const PREFIX: &str = "ORC";
pub const SUFFIX_LEN: usize = 9;

const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub fn generate(now: DateTime<Utc>) -> String {
    generate_with(&mut rand::rng(), now)
}

pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> String {
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
        .collect();
    format!("{PREFIX}-{}-{suffix}", now.timestamp_millis())
}
