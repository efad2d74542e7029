use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub fn stable_hash_with(f: impl FnOnce(&mut DefaultHasher)) -> u64 {
    let mut hasher = DefaultHasher::new();
    f(&mut hasher);
    hasher.finish()
}

/// Derive a per-key seed so one partner's draws never depend on another's.
pub fn stable_hash_str(seed: u64, value: &str) -> u64 {
    stable_hash_with(|hasher| {
        seed.hash(hasher);
        value.hash(hasher);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_hash_identically() {
        assert_eq!(stable_hash_str(7, "5551234567"), stable_hash_str(7, "5551234567"));
        assert_ne!(stable_hash_str(7, "5551234567"), stable_hash_str(8, "5551234567"));
    }
}
