//! Payload generation
//!
//! Client sessions ask a `PayloadSource` for the body of every Submit. The
//! default source produces short code names such as `brave-falcon-k3x9`.

use bytes::Bytes;
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Supplies request payloads
pub trait PayloadSource {
    fn next_payload(&mut self) -> Bytes;
}

impl<F> PayloadSource for F
where
    F: FnMut() -> Bytes,
{
    fn next_payload(&mut self) -> Bytes {
        self()
    }
}

const ADJECTIVES: &[&str] = &[
    "amber", "brave", "calm", "daring", "eager", "fancy", "gentle", "happy", "icy", "jolly",
    "keen", "lucky", "mellow", "nimble", "odd", "proud", "quiet", "rapid", "shy", "tidy",
];

const NOUNS: &[&str] = &[
    "badger", "comet", "falcon", "glacier", "harbor", "island", "jaguar", "kestrel", "lantern",
    "meadow", "nebula", "otter", "pepper", "quartz", "raven", "saturn", "tundra", "walrus",
];

/// Random `adjective-noun-xxxx` code names
pub struct RandomWords {
    rng: StdRng,
    token_len: usize,
}

impl RandomWords {
    /// Seeded from OS entropy
    pub fn new(token_len: usize) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            token_len,
        }
    }

    /// Deterministic sequence for a given seed
    pub fn seeded(seed: u64, token_len: usize) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            token_len,
        }
    }

    /// Generate one code name
    pub fn generate(&mut self) -> String {
        let adjective = ADJECTIVES.choose(&mut self.rng).copied().unwrap_or("plain");
        let noun = NOUNS.choose(&mut self.rng).copied().unwrap_or("word");

        let mut name = format!("{}-{}", adjective, noun);
        if self.token_len > 0 {
            let token: String = (&mut self.rng)
                .sample_iter(Alphanumeric)
                .take(self.token_len)
                .map(|b| char::from(b).to_ascii_lowercase())
                .collect();
            name.push('-');
            name.push_str(&token);
        }
        name
    }
}

impl Default for RandomWords {
    fn default() -> Self {
        Self::new(4)
    }
}

impl PayloadSource for RandomWords {
    fn next_payload(&mut self) -> Bytes {
        Bytes::from(self.generate())
    }
}
