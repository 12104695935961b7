//! TSID Generator
//!
//! Time-sorted identifiers rendered as 13-character Crockford Base32 strings.
//! Used as the `_id` of every aggregate so documents sort by creation time.

use std::sync::atomic::{AtomicU16, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Crockford Base32 alphabet (excludes I, L, O, U)
const ALPHABET: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

static COUNTER: AtomicU16 = AtomicU16::new(0);

pub struct TsidGenerator;

impl TsidGenerator {
    /// Generate a new TSID, e.g. "0HZXEQ5Y8JY5Z".
    ///
    /// Layout (64 bits): 42-bit millisecond timestamp, 10-bit random
    /// component, 12-bit per-millisecond counter.
    pub fn generate() -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before unix epoch")
            .as_millis() as u64;

        let counter = COUNTER.fetch_add(1, Ordering::SeqCst) as u64;
        let random = (rand::random::<u16>() as u64) & 0x3FF;

        let tsid = ((millis & 0x3FF_FFFF_FFFF) << 22) | (random << 12) | (counter & 0xFFF);

        encode_crockford(tsid)
    }
}

fn encode_crockford(mut value: u64) -> String {
    let mut out = [b'0'; 13];
    for slot in out.iter_mut().rev() {
        *slot = ALPHABET[(value & 0x1F) as usize];
        value >>= 5;
    }
    String::from_utf8(out.to_vec()).expect("alphabet is ASCII")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_13_chars() {
        assert_eq!(TsidGenerator::generate().len(), 13);
    }

    #[test]
    fn generates_unique_ids() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(TsidGenerator::generate()), "duplicate TSID");
        }
    }

    #[test]
    fn ids_sort_by_time() {
        let first = TsidGenerator::generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = TsidGenerator::generate();
        assert!(first < second);
    }
}
