// Identity hand-off from whatever authenticated the connection.
//
// The relay does not authenticate anyone. It receives an optional display
// name from the transport layer and asks the provider to turn it into the
// identity string used in presence notices and history attribution.

use rand::Rng;

const GUEST_PREFIX: &str = "User_";
const GUEST_SUFFIX_LEN: usize = 5;
const GUEST_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Longest identity accepted from a client, in characters.
pub const MAX_IDENTITY_CHARS: usize = 64;

pub trait IdentityProvider: Send + Sync {
    fn identify(&self, requested: Option<&str>) -> String;
}

/// Accepts any non-blank requested name and falls back to a random guest
/// name such as `User_k3x9a`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuestIdentityProvider;

impl IdentityProvider for GuestIdentityProvider {
    fn identify(&self, requested: Option<&str>) -> String {
        requested
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| name.chars().take(MAX_IDENTITY_CHARS).collect())
            .unwrap_or_else(guest_name)
    }
}

pub fn guest_name() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..GUEST_SUFFIX_LEN)
        .map(|_| GUEST_ALPHABET[rng.gen_range(0..GUEST_ALPHABET.len())] as char)
        .collect();
    format!("{GUEST_PREFIX}{suffix}")
}
