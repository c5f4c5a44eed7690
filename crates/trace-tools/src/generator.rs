use std::fmt::Display;

use rand::Rng;

use crate::{
    error::ConfigError,
    generic::{AccessEvent, Operation},
};

/// Address stride of the sequential pattern in bytes (one cache line)
pub const SEQUENTIAL_STRIDE: u32 = 64;

/// The address stream type as requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamType {
    Random,
    Stream,
    Mix,
}

impl StreamType {
    /// Parses a stream type identifier.
    ///
    /// Accepts the full names as well as their first letter. Any other value
    /// falls back to [`StreamType::Random`].
    pub fn parse_lenient(value: &str) -> Self {
        match value {
            "r" | "random" => StreamType::Random,
            "s" | "stream" => StreamType::Stream,
            "m" | "mix" => StreamType::Mix,
            other => {
                log::warn!("Unknown stream type `{other}`, falling back to `random`");
                StreamType::Random
            }
        }
    }

    /// The canonical name used in trace file names
    pub fn name(&self) -> &'static str {
        match self {
            StreamType::Random => "random",
            StreamType::Stream => "stream",
            StreamType::Mix => "mix",
        }
    }
}

impl Display for StreamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The policy used to pick the address of each generated event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressPattern {
    /// Every address is drawn uniformly from `[0, 2^32)`.
    Random,

    /// Reads and writes each advance their own cursor by [`SEQUENTIAL_STRIDE`].
    Sequential,
}

impl TryFrom<StreamType> for AddressPattern {
    type Error = ConfigError;

    fn try_from(value: StreamType) -> Result<Self, Self::Error> {
        match value {
            StreamType::Random => Ok(AddressPattern::Random),
            StreamType::Stream => Ok(AddressPattern::Sequential),
            StreamType::Mix => Err(ConfigError::UnsupportedPattern(value.name().into())),
        }
    }
}

/// Converts a reads-per-write ratio into the probability of a single event being a read.
pub fn read_probability(ratio: f64) -> f64 {
    ratio / (ratio + 1.0)
}

/// A stateful producer of [`AccessEvent`]s.
///
/// The generator owns its random number generator, so a seeded `rng` yields
/// a reproducible event sequence. The sequence only ends when the next
/// timestamp would overflow the 64-bit clock.
pub struct StreamGenerator<R: Rng> {
    pattern: AddressPattern,
    interarrival: u64,
    read_probability: f64,
    last_clk: u64,
    last_rd_addr: u32,
    last_wr_addr: u32,
    rng: R,
}

impl<R: Rng> StreamGenerator<R> {
    /// Creates a new generator.
    ///
    /// `interarrival` is the number of cycles the clock advances per event and
    /// `ratio` the number of reads per one write. Both address cursors are seeded
    /// from `rng` regardless of `pattern`.
    ///
    /// # Errors
    ///
    /// Fails with a [`ConfigError`] if `interarrival` is zero or `ratio` is negative
    /// or not finite.
    pub fn new(
        pattern: AddressPattern,
        interarrival: u64,
        ratio: f64,
        mut rng: R,
    ) -> Result<Self, ConfigError> {
        if interarrival == 0 {
            return Err(ConfigError::InvalidInterarrival(interarrival));
        }
        if !ratio.is_finite() || ratio < 0.0 {
            return Err(ConfigError::InvalidRatio(ratio));
        }

        let last_rd_addr = rng.random::<u32>();
        let last_wr_addr = rng.random::<u32>();

        Ok(Self {
            pattern,
            interarrival,
            read_probability: read_probability(ratio),
            last_clk: 0,
            last_rd_addr,
            last_wr_addr,
            rng,
        })
    }

    pub fn pattern(&self) -> AddressPattern {
        self.pattern
    }

    pub fn read_probability(&self) -> f64 {
        self.read_probability
    }

    fn next_operation(&mut self) -> Operation {
        if self.rng.random::<f64>() > self.read_probability {
            Operation::Write
        } else {
            Operation::Read
        }
    }

    fn next_address(&mut self, operation: Operation) -> u32 {
        match self.pattern {
            AddressPattern::Random => self.rng.random::<u32>(),
            AddressPattern::Sequential => {
                let cursor = match operation {
                    Operation::Read => &mut self.last_rd_addr,
                    Operation::Write => &mut self.last_wr_addr,
                };
                *cursor = cursor.wrapping_add(SEQUENTIAL_STRIDE);
                *cursor
            }
        }
    }

    /// Produces the next event and advances the clock by the inter-arrival time.
    ///
    /// Returns `None` once the clock can not advance without overflowing `u64`;
    /// the generator state is left untouched in that case.
    pub fn next_event(&mut self) -> Option<AccessEvent> {
        let clk = self.last_clk.checked_add(self.interarrival)?;
        let operation = self.next_operation();
        let address = self.next_address(operation);
        self.last_clk = clk;

        Some(AccessEvent::new(operation, address, clk))
    }
}

impl<R: Rng> Iterator for StreamGenerator<R> {
    type Item = AccessEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event()
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Error, anyhow};
    use rand_xoshiro::{Xoshiro256PlusPlus, rand_core::SeedableRng};

    use crate::{error::ConfigError, generic::Operation};

    use super::{AddressPattern, SEQUENTIAL_STRIDE, StreamGenerator, StreamType, read_probability};

    fn generator(
        pattern: AddressPattern,
        interarrival: u64,
        ratio: f64,
    ) -> Result<StreamGenerator<Xoshiro256PlusPlus>, ConfigError> {
        StreamGenerator::new(
            pattern,
            interarrival,
            ratio,
            Xoshiro256PlusPlus::seed_from_u64(42),
        )
    }

    #[test]
    fn parse_stream_types() {
        assert_eq!(StreamType::parse_lenient("r"), StreamType::Random);
        assert_eq!(StreamType::parse_lenient("random"), StreamType::Random);
        assert_eq!(StreamType::parse_lenient("s"), StreamType::Stream);
        assert_eq!(StreamType::parse_lenient("stream"), StreamType::Stream);
        assert_eq!(StreamType::parse_lenient("m"), StreamType::Mix);
        assert_eq!(StreamType::parse_lenient("mix"), StreamType::Mix);
        assert_eq!(StreamType::parse_lenient("sequential"), StreamType::Random);
        assert_eq!(StreamType::parse_lenient(""), StreamType::Random);
    }

    #[test]
    fn mix_has_no_pattern() {
        assert_eq!(
            AddressPattern::try_from(StreamType::Mix),
            Err(ConfigError::UnsupportedPattern("mix".into()))
        );
        assert_eq!(
            AddressPattern::try_from(StreamType::Stream),
            Ok(AddressPattern::Sequential)
        );
    }

    #[test]
    fn ratio_to_probability() {
        assert!((read_probability(2.0) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(read_probability(1.0), 0.5);
        assert_eq!(read_probability(0.0), 0.0);
    }

    #[test]
    fn reject_invalid_parameters() {
        assert!(matches!(
            generator(AddressPattern::Random, 0, 2.0),
            Err(ConfigError::InvalidInterarrival(0))
        ));
        assert!(matches!(
            generator(AddressPattern::Random, 10, -1.0),
            Err(ConfigError::InvalidRatio(_))
        ));
        assert!(matches!(
            generator(AddressPattern::Random, 10, f64::NAN),
            Err(ConfigError::InvalidRatio(_))
        ));
        assert!(matches!(
            generator(AddressPattern::Random, 10, f64::INFINITY),
            Err(ConfigError::InvalidRatio(_))
        ));
    }

    #[test]
    fn timestamps_advance_by_interarrival() -> Result<(), Error> {
        for pattern in [AddressPattern::Random, AddressPattern::Sequential] {
            let events: Vec<_> = generator(pattern, 7, 2.0)?.take(500).collect();

            assert_eq!(events[0].timestamp(), 7);
            for pair in events.windows(2) {
                assert_eq!(pair[1].timestamp(), pair[0].timestamp() + 7);
            }
        }

        Ok(())
    }

    #[test]
    fn sequential_cursors_are_independent() -> Result<(), Error> {
        let events: Vec<_> = generator(AddressPattern::Sequential, 10, 1.0)?
            .take(1000)
            .collect();

        for operation in [Operation::Read, Operation::Write] {
            let addresses: Vec<u32> = events
                .iter()
                .filter(|event| event.operation() == operation)
                .map(|event| event.address())
                .collect();

            assert!(addresses.len() > 100);
            for pair in addresses.windows(2) {
                assert_eq!(pair[1], pair[0].wrapping_add(SEQUENTIAL_STRIDE));
            }
        }

        Ok(())
    }

    #[test]
    fn sequential_cursor_wraps_around() -> Result<(), Error> {
        let mut generator = generator(AddressPattern::Sequential, 1, 0.0)?;
        generator.last_wr_addr = u32::MAX - 31;

        let event = generator.next_event().ok_or_else(|| anyhow!("Clock exhausted"))?;
        assert_eq!(event.operation(), Operation::Write);
        assert_eq!(event.address(), 32);

        Ok(())
    }

    #[test]
    fn stop_before_clock_overflows() -> Result<(), Error> {
        let interarrival = u64::MAX / 2 + 1;
        let mut generator = generator(AddressPattern::Sequential, interarrival, 2.0)?;

        let first = generator.next_event().ok_or_else(|| anyhow!("Clock exhausted"))?;
        assert_eq!(first.timestamp(), interarrival);

        assert_eq!(generator.next_event(), None);
        assert_eq!(generator.next_event(), None);
        assert_eq!(generator.last_clk, interarrival);

        Ok(())
    }

    #[test]
    fn run_up_to_the_last_cycle() -> Result<(), Error> {
        let events: Vec<_> = generator(AddressPattern::Random, u64::MAX / 4, 2.0)?.collect();

        assert_eq!(events.len(), 4);
        assert_eq!(events[3].timestamp(), 4 * (u64::MAX / 4));

        Ok(())
    }

    #[test]
    fn zero_ratio_only_writes() -> Result<(), Error> {
        assert!(
            generator(AddressPattern::Random, 10, 0.0)?
                .take(10_000)
                .all(|event| event.operation() == Operation::Write)
        );

        Ok(())
    }

    #[test]
    fn read_share_follows_ratio() -> Result<(), Error> {
        let n = 30_000;
        let reads = generator(AddressPattern::Random, 10, 2.0)?
            .take(n)
            .filter(|event| event.operation().is_read())
            .count();

        let share = reads as f64 / n as f64;
        assert!((share - 2.0 / 3.0).abs() < 0.02, "read share was {share}");

        Ok(())
    }

    #[test]
    fn random_addresses_cover_the_range() -> Result<(), Error> {
        let n = 20_000;
        let mut buckets = [0usize; 16];
        for event in generator(AddressPattern::Random, 10, 2.0)?.take(n) {
            buckets[(event.address() >> 28) as usize] += 1;
        }

        let expected = n / buckets.len();
        for count in buckets {
            assert!(count.abs_diff(expected) < expected / 5, "bucket count {count}");
        }

        Ok(())
    }

    #[test]
    fn seeded_generators_are_reproducible() -> Result<(), Error> {
        let first: Vec<_> = generator(AddressPattern::Random, 10, 2.0)?.take(100).collect();
        let second: Vec<_> = generator(AddressPattern::Random, 10, 2.0)?.take(100).collect();
        assert_eq!(first, second);

        Ok(())
    }
}
