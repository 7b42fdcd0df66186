use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Produces non-cryptographic, monotonically increasing identifiers used
/// by the database manager to name newly materialised logical databases.
pub trait UuidGenerator: Send + Sync {
    fn generate_time_counter(&self) -> String;
}

/// A time+counter based generator. Each id mixes the current wall-clock
/// time with an atomic counter so ids stay unique and ordered even when
/// generated faster than the clock's resolution.
pub struct TimeCounterGenerator {
    counter: AtomicU64,
}

impl TimeCounterGenerator {
    pub fn new() -> TimeCounterGenerator {
        TimeCounterGenerator {
            counter: AtomicU64::new(0),
        }
    }
}

impl Default for TimeCounterGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl UuidGenerator for TimeCounterGenerator {
    /// Formats a 36-char dashed hex string of the form
    /// `XXXXXXXX-XXXX-2XXX-0XXX-XXXXXXXXXXXX` — version 2, variant 0.
    fn generate_time_counter(&self) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64;

        let low = nanos & 0xFFFF_FFFF;
        let mid = (nanos >> 32) & 0xFFFF;
        let high = (nanos >> 48) & 0xFFF;

        let counter = self.counter.fetch_add(1, Ordering::SeqCst);
        let low_counter = counter & 0xFFFF_FFFF_FFFF;
        let high_counter = (counter >> 48) & 0xFFF;

        format!(
            "{:08x}-{:04x}-2{:03x}-0{:03x}-{:012x}",
            low, mid, high, high_counter, low_counter
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_version_2_variant_0_format() {
        let gen = TimeCounterGenerator::new();
        let id = gen.generate_time_counter();
        assert_eq!(id.len(), 36);
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 5);
        assert_eq!(parts[0].len(), 8);
        assert_eq!(parts[1].len(), 4);
        assert_eq!(parts[2].len(), 4);
        assert!(parts[2].starts_with('2'));
        assert_eq!(parts[3].len(), 4);
        assert!(parts[3].starts_with('0'));
        assert_eq!(parts[4].len(), 12);
    }

    #[test]
    fn counter_increases_monotonically() {
        let gen = TimeCounterGenerator::new();
        let a = gen.generate_time_counter();
        let b = gen.generate_time_counter();
        assert_ne!(a, b);
    }
}
