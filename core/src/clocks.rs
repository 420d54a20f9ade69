// Planboard
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Collection of clock implementations.

use time::OffsetDateTime;

/// Generic definition of a clock.
pub trait Clock {
    /// Returns the current UTC time.
    fn now_utc(&self) -> OffsetDateTime;
}

/// Clock implementation that uses the system clock.
#[derive(Clone, Default)]
pub struct SystemClock {}

impl Clock for SystemClock {
    fn now_utc(&self) -> OffsetDateTime {
        let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();

        // Timestamps stored in PostgreSQL have microsecond resolution.
        let nanos = nanos / 1000 * 1000;

        OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .expect("nanos must be in range because they come from the current timestamp")
    }
}

/// Test utilities.
#[cfg(any(test, feature = "testutils"))]
pub mod testutils {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    /// Converts `now` to microseconds since the epoch, panicking if it carries nanoseconds.
    fn to_micros(now: OffsetDateTime) -> u64 {
        let now_ns = now.unix_timestamp_nanos();
        assert!(now_ns % 1000 == 0, "Nanosecond precision not supported");
        u64::try_from(now_ns / 1000).unwrap()
    }

    /// A clock that returns a preconfigured instant and that can be modified at will.
    ///
    /// Only supports microsecond-level precision.
    pub struct SettableClock {
        /// Current fake time in microseconds.
        now_us: AtomicU64,
    }

    impl SettableClock {
        /// Creates a new clock that returns `now` until reconfigured with `set`.
        pub fn new(now: OffsetDateTime) -> Self {
            Self { now_us: AtomicU64::new(to_micros(now)) }
        }

        /// Sets the new value of `now` that the clock returns.
        pub fn set(&self, now: OffsetDateTime) {
            self.now_us.store(to_micros(now), Ordering::SeqCst);
        }

        /// Advances the current time by `delta`.
        pub fn advance(&self, delta: Duration) {
            let delta_ns = delta.as_nanos();
            assert!(delta_ns % 1000 == 0, "Nanosecond precision not supported");
            let delta_us = u64::try_from(delta_ns / 1000).unwrap();
            self.now_us.fetch_add(delta_us, Ordering::SeqCst);
        }
    }

    impl Clock for SettableClock {
        fn now_utc(&self) -> OffsetDateTime {
            let now_us = self.now_us.load(Ordering::SeqCst);
            OffsetDateTime::from_unix_timestamp_nanos(i128::from(now_us) * 1000).unwrap()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::sync::Arc;
        use time::macros::datetime;

        #[test]
        fn test_settableclock_set_and_advance() {
            let clock = SettableClock::new(datetime!(2024-03-05 08:30:00.123456 UTC));
            assert_eq!(datetime!(2024-03-05 08:30:00.123456 UTC), clock.now_utc());

            clock.advance(Duration::from_micros(543_210));
            assert_eq!(datetime!(2024-03-05 08:30:00.666666 UTC), clock.now_utc());

            clock.set(datetime!(2023-01-01 00:00:00 UTC));
            assert_eq!(datetime!(2023-01-01 00:00:00 UTC), clock.now_utc());
        }

        #[test]
        fn test_settableclock_shared_across_handles() {
            let clock = Arc::new(SettableClock::new(datetime!(2024-03-05 08:30:00 UTC)));
            let shared: Arc<dyn Clock + Send + Sync> = clock.clone();

            clock.advance(Duration::from_secs(90));
            assert_eq!(datetime!(2024-03-05 08:31:30 UTC), shared.now_utc());
        }

        #[test]
        #[should_panic(expected = "Nanosecond precision not supported")]
        fn test_settableclock_new_rejects_nanoseconds() {
            SettableClock::new(datetime!(2024-03-05 08:30:00.123456001 UTC));
        }

        #[test]
        #[should_panic(expected = "Nanosecond precision not supported")]
        fn test_settableclock_advance_rejects_nanoseconds() {
            SettableClock::new(datetime!(2024-03-05 08:30:00 UTC)).advance(Duration::from_nanos(1));
        }
    }
}
