//! Word hashing used for lock sharding.

/// Computes a 64-bit hash of `word` using BLAKE3, truncated from 256 bits.
///
/// The value only selects a lock shard, so truncation collisions merely put two
/// words behind the same lock.
#[inline]
pub fn hash_word(word: &str) -> u64 {
    let hash = blake3::hash(word.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

/// Maps `word` onto one of `shard_count` shards.
#[inline]
pub fn shard_for(word: &str, shard_count: usize) -> usize {
    debug_assert!(shard_count > 0);
    (hash_word(word) % shard_count as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_word_is_deterministic() {
        assert_eq!(hash_word("книга"), hash_word("книга"));
        assert_ne!(hash_word("книга"), hash_word("журнал"));
    }

    #[test]
    fn test_shard_for_stays_in_range() {
        for word in ["книга", "журнал", "река", "море", ""] {
            assert!(shard_for(word, 16) < 16);
        }
        assert_eq!(shard_for("книга", 1), 0);
    }
}
