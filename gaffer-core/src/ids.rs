//! Id minting for players, seasons, notes, and transfer snapshots.

use chrono::Utc;
use rand::Rng;
use rand::distributions::Alphanumeric;

const SUFFIX_LEN: usize = 6;

/// Mint a fresh opaque id: epoch milliseconds plus a random alphanumeric
/// suffix. The suffix disambiguates ids minted within the same millisecond,
/// so no central counter is needed.
#[must_use]
pub fn generate() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("{millis}-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_are_unique() {
        let ids: HashSet<String> = (0..200).map(|_| generate()).collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn generated_ids_carry_a_suffix() {
        let id = generate();
        let (millis, suffix) = id.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), SUFFIX_LEN);
    }
}
