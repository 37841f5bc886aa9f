//! Throwaway sign-up identities and label suggestions

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::model::Provider;

pub const PASSWORD_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*";
pub const PASSWORD_LENGTH: usize = 20;
pub const EMAIL_PREFIXES: [&str; 5] = ["dev.ai", "lab.test", "project.x", "api.farmer", "user.temp"];
pub const EMAIL_DOMAIN: &str = "gmail.com";
/// Alias numbers are drawn from `0..EMAIL_NUMBER_BOUND`
pub const EMAIL_NUMBER_BOUND: u32 = 99_999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentitySuggestion {
    pub email: String,
    pub password: String,
}

/// Fresh suggestion from the thread-local RNG
pub fn generate() -> IdentitySuggestion {
    generate_with(&mut rand::thread_rng())
}

/// Deterministic suggestion for a given seed
pub fn generate_seeded(seed: u64) -> IdentitySuggestion {
    generate_with(&mut StdRng::seed_from_u64(seed))
}

pub fn generate_with<R: Rng>(rng: &mut R) -> IdentitySuggestion {
    let alphabet = PASSWORD_ALPHABET.as_bytes();
    let password: String = (0..PASSWORD_LENGTH)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect();

    let number = rng.gen_range(0..EMAIL_NUMBER_BOUND);
    let prefix = EMAIL_PREFIXES[rng.gen_range(0..EMAIL_PREFIXES.len())];

    IdentitySuggestion {
        email: format!("{}+{}@{}", prefix, number, EMAIL_DOMAIN),
        password,
    }
}

/// Default label for a key being added, e.g. `Gemini Account #417`
pub fn suggest_label(provider: Provider) -> String {
    let n: u32 = rand::thread_rng().gen_range(0..1000);
    format!("{} Account #{}", provider, n)
}
