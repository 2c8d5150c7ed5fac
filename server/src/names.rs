//! Random display names for connecting clients.

#[cfg(test)]
#[path = "names_test.rs"]
mod names_test;

use frames::RESERVED_NAME;
use rand::Rng;

const ADJECTIVES: &[&str] = &[
    "Amber", "Brave", "Calm", "Clever", "Daring", "Eager", "Gentle", "Jolly", "Lucky", "Mellow",
    "Nimble", "Quiet", "Rapid", "Rusty", "Swift", "Witty",
];

const ANIMALS: &[&str] = &[
    "Badger", "Crane", "Falcon", "Ferret", "Heron", "Lynx", "Marten", "Moose", "Otter", "Panda",
    "Puffin", "Raven", "Salmon", "Stoat", "Walrus", "Yak",
];

/// Random draws tried before falling back to a numeric suffix.
const MAX_ATTEMPTS: usize = 16;

/// Draw an `Adjective Animal` name.
#[must_use]
pub fn random_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let adjective = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
    let animal = ANIMALS[rng.random_range(0..ANIMALS.len())];
    format!("{adjective} {animal}")
}

/// Draw a name for which `taken` returns false. Never returns the reserved
/// client placeholder name.
pub fn unique_name<R, F>(rng: &mut R, taken: F) -> String
where
    R: Rng + ?Sized,
    F: Fn(&str) -> bool,
{
    let taken = |candidate: &str| candidate == RESERVED_NAME || taken(candidate);
    for _ in 0..MAX_ATTEMPTS {
        let candidate = random_name(rng);
        if !taken(&candidate) {
            return candidate;
        }
    }

    let base = random_name(rng);
    let mut suffix = 2_usize;
    loop {
        let candidate = format!("{base} {suffix}");
        if !taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}
