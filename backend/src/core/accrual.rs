//! Accrual timing for the reward ledger
//!
//! All claim timing derives from one immutable epoch timestamp. Days are
//! fixed 86 400-second windows counted from the epoch; each day's allotment
//! unlocks at that day's release hour. This module is pure arithmetic: it
//! holds no ledger state and never fails, so batch queries and single-item
//! queries share it verbatim.

/// Seconds in one accrual day.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Seconds in one hour.
pub const SECONDS_PER_HOUR: u64 = 3_600;

/// Claim timing for one (schedule, principal) pair at a given instant
///
/// `Default` yields the all-zero record used for unregistered simulation
/// ids, so read-only queries stay total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClaimTiming {
    /// Whether a claim would mint at least one day's allotment right now
    pub can_claim_now: bool,
    /// Seconds until the next claimable boundary (0 when claimable now)
    pub seconds_until_next: u64,
    /// Day index that the next successful claim would cover up to
    pub next_claim_day: u64,
    /// Calendar day index of `now` (elapsed / 86 400)
    pub current_day: u64,
}

/// Derives day indices and claim boundaries from the ledger epoch
///
/// # Example
/// ```
/// use reward_ledger_core_rs::AccrualEngine;
///
/// let engine = AccrualEngine::new(1_000);
/// assert_eq!(engine.day_index(1_000 + 86_400), 1);
/// assert_eq!(engine.time_of_day(1_000 + 86_400 + 300), 300);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualEngine {
    /// Timestamp (seconds) from which day 0 is counted
    epoch_start: u64,
}

impl AccrualEngine {
    /// Create an engine counting days from `epoch_start`
    pub fn new(epoch_start: u64) -> Self {
        Self { epoch_start }
    }

    /// Get the epoch timestamp
    pub fn epoch_start(&self) -> u64 {
        self.epoch_start
    }

    /// Seconds elapsed since the epoch, clamped to zero for earlier `now`
    ///
    /// # Example
    /// ```
    /// use reward_ledger_core_rs::AccrualEngine;
    ///
    /// let engine = AccrualEngine::new(1_000);
    /// assert_eq!(engine.elapsed(900), 0);
    /// assert_eq!(engine.elapsed(1_500), 500);
    /// ```
    pub fn elapsed(&self, now: u64) -> u64 {
        now.saturating_sub(self.epoch_start)
    }

    /// Calendar day index of `now` (0-indexed)
    pub fn day_index(&self, now: u64) -> u64 {
        self.elapsed(now) / SECONDS_PER_DAY
    }

    /// Seconds into the current day
    pub fn time_of_day(&self, now: u64) -> u64 {
        self.elapsed(now) % SECONDS_PER_DAY
    }

    /// Highest day index whose release boundary has passed
    ///
    /// Before the release hour, the current day has not unlocked yet, so
    /// the claimable day is the previous one (clamped at day 0). The
    /// boundary itself counts as unlocked.
    ///
    /// # Example
    /// ```
    /// use reward_ledger_core_rs::AccrualEngine;
    ///
    /// let engine = AccrualEngine::new(0);
    /// // Day 1, one second before the 07:00 boundary: still day 0.
    /// assert_eq!(engine.claimable_day(86_400 + 25_199, 7), 0);
    /// // Exactly at the boundary: day 1 unlocks.
    /// assert_eq!(engine.claimable_day(86_400 + 25_200, 7), 1);
    /// ```
    ///
    /// # Panics
    /// Panics if `release_hour > 23`.
    pub fn claimable_day(&self, now: u64, release_hour: u8) -> u64 {
        assert!(release_hour <= 23, "release_hour must be at most 23");
        let day = self.day_index(now);
        if self.time_of_day(now) >= u64::from(release_hour) * SECONDS_PER_HOUR {
            day
        } else {
            day.saturating_sub(1)
        }
    }

    /// Number of whole-day allotments claimable right now
    ///
    /// # Example
    /// ```
    /// use reward_ledger_core_rs::AccrualEngine;
    ///
    /// let engine = AccrualEngine::new(1_000);
    /// // Three days elapsed, nothing claimed yet: three allotments pending.
    /// assert_eq!(engine.pending_days(1_000 + 3 * 86_400 + 25_200, 7, 0), 3);
    /// // Claimed up to day 3: nothing pending.
    /// assert_eq!(engine.pending_days(1_000 + 3 * 86_400 + 25_200, 7, 3), 0);
    /// ```
    pub fn pending_days(&self, now: u64, release_hour: u8, last_claimed_day: u64) -> u64 {
        self.claimable_day(now, release_hour)
            .saturating_sub(last_claimed_day)
    }

    /// Full claim timing record for one schedule and principal
    ///
    /// When a claim is possible, `seconds_until_next` is 0 and
    /// `next_claim_day` is the day the claim would cover up to. Otherwise
    /// `next_claim_day` is the following day and `seconds_until_next`
    /// counts down to its release boundary.
    ///
    /// # Example
    /// ```
    /// use reward_ledger_core_rs::AccrualEngine;
    ///
    /// let engine = AccrualEngine::new(1_000);
    /// let now = 1_000 + 86_400 + 27_000; // day 1, 07:30
    /// let timing = engine.claim_timing(now, 8, 0);
    /// assert!(!timing.can_claim_now);
    /// assert_eq!(timing.seconds_until_next, 1_800); // 08:00 boundary
    /// assert_eq!(timing.next_claim_day, 1);
    /// assert_eq!(timing.current_day, 1);
    /// ```
    pub fn claim_timing(&self, now: u64, release_hour: u8, last_claimed_day: u64) -> ClaimTiming {
        let claimable = self.claimable_day(now, release_hour);
        let pending = claimable.saturating_sub(last_claimed_day);

        if pending > 0 {
            return ClaimTiming {
                can_claim_now: true,
                seconds_until_next: 0,
                next_claim_day: claimable,
                current_day: self.day_index(now),
            };
        }

        let next_claim_day = claimable + 1;
        let boundary = self.epoch_start
            + next_claim_day * SECONDS_PER_DAY
            + u64::from(release_hour) * SECONDS_PER_HOUR;
        ClaimTiming {
            can_claim_now: false,
            seconds_until_next: boundary.saturating_sub(now),
            next_claim_day,
            current_day: self.day_index(now),
        }
    }
}
