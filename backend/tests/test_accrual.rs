//! Accrual Engine Tests - Day and Boundary Arithmetic
//!
//! Test suite for the pure accrual arithmetic shared by every query and
//! operation.
//!
//! Critical invariants tested:
//! - Day indices derive from elapsed seconds only; pre-epoch clamps to day 0
//! - A day unlocks exactly at its release boundary, never one second early
//! - Day 0 is never claimable (the fresh watermark already covers it)
//! - Timing records count down to the correct next boundary

use reward_ledger_core_rs::{AccrualEngine, ClaimTiming, SECONDS_PER_DAY, SECONDS_PER_HOUR};

const EPOCH: u64 = 1_000;

/// Timestamp `seconds` into day `days` relative to the test epoch
fn at(days: u64, seconds: u64) -> u64 {
    EPOCH + days * SECONDS_PER_DAY + seconds
}

// ============================================================================
// Day Decomposition
// ============================================================================

#[test]
fn test_day_index_and_time_of_day_decompose_elapsed() {
    let engine = AccrualEngine::new(EPOCH);

    assert_eq!(engine.day_index(at(0, 0)), 0);
    assert_eq!(engine.time_of_day(at(0, 0)), 0);

    assert_eq!(engine.day_index(at(2, 12_345)), 2);
    assert_eq!(engine.time_of_day(at(2, 12_345)), 12_345);

    // Last second of a day still belongs to that day
    assert_eq!(engine.day_index(at(2, SECONDS_PER_DAY - 1)), 2);
    assert_eq!(engine.time_of_day(at(2, SECONDS_PER_DAY - 1)), SECONDS_PER_DAY - 1);
}

#[test]
fn test_pre_epoch_timestamps_read_as_day_zero() {
    let engine = AccrualEngine::new(EPOCH);

    assert_eq!(engine.elapsed(0), 0);
    assert_eq!(engine.elapsed(999), 0);
    assert_eq!(engine.day_index(0), 0);
    assert_eq!(engine.time_of_day(500), 0);
    assert_eq!(engine.pending_days(0, 7, 0), 0);
}

#[test]
fn test_epoch_zero_engine() {
    let engine = AccrualEngine::new(0);

    assert_eq!(engine.epoch_start(), 0);
    assert_eq!(engine.day_index(SECONDS_PER_DAY), 1);
    assert_eq!(engine.claimable_day(SECONDS_PER_DAY + 7 * SECONDS_PER_HOUR, 7), 1);
}

// ============================================================================
// Release Boundary
// ============================================================================

#[test]
fn test_boundary_second_unlocks_the_day() {
    let engine = AccrualEngine::new(EPOCH);

    // One second before day 1's 07:00 boundary: day 1 still locked
    assert_eq!(engine.claimable_day(at(1, 25_199), 7), 0);
    assert_eq!(engine.pending_days(at(1, 25_199), 7, 0), 0);

    // Exactly at the boundary: day 1 unlocks
    assert_eq!(engine.claimable_day(at(1, 25_200), 7), 1);
    assert_eq!(engine.pending_days(at(1, 25_200), 7, 0), 1);
}

#[test]
fn test_midnight_release_unlocks_with_the_day_rollover() {
    let engine = AccrualEngine::new(EPOCH);

    assert_eq!(engine.claimable_day(at(0, SECONDS_PER_DAY - 1), 0), 0);
    assert_eq!(engine.claimable_day(at(1, 0), 0), 1);
    assert_eq!(engine.pending_days(at(1, 0), 0, 0), 1);
}

#[test]
fn test_latest_release_hour() {
    let engine = AccrualEngine::new(EPOCH);
    let release = 23 * SECONDS_PER_HOUR;

    assert_eq!(engine.claimable_day(at(1, release - 1), 23), 0);
    assert_eq!(engine.claimable_day(at(1, release), 23), 1);
}

#[test]
fn test_day_zero_is_never_claimable() {
    let engine = AccrualEngine::new(EPOCH);

    // Past every possible release hour on day 0, the claimable day is 0
    // and the fresh watermark (last_claimed_day = 0) already covers it.
    for hour in 0..=23u8 {
        let now = at(0, SECONDS_PER_DAY - 1);
        assert_eq!(engine.claimable_day(now, hour), 0, "hour {}", hour);
        assert_eq!(engine.pending_days(now, hour, 0), 0, "hour {}", hour);
    }
}

// ============================================================================
// Pending Days and Catch-Up
// ============================================================================

#[test]
fn test_pending_days_accumulate_across_skipped_days() {
    let engine = AccrualEngine::new(EPOCH);

    assert_eq!(engine.pending_days(at(1, 25_200), 7, 0), 1);
    assert_eq!(engine.pending_days(at(3, 25_200), 7, 0), 3);
    assert_eq!(engine.pending_days(at(10, 25_200), 7, 0), 10);
}

#[test]
fn test_watermark_consumes_pending_days() {
    let engine = AccrualEngine::new(EPOCH);
    let now = at(5, 25_200);

    assert_eq!(engine.pending_days(now, 7, 0), 5);
    assert_eq!(engine.pending_days(now, 7, 3), 2);
    assert_eq!(engine.pending_days(now, 7, 5), 0);
    // A watermark past the claimable day still reads as nothing pending
    assert_eq!(engine.pending_days(now, 7, 9), 0);
}

// ============================================================================
// Claim Timing
// ============================================================================

#[test]
fn test_timing_claimable_now() {
    let engine = AccrualEngine::new(EPOCH);
    let timing = engine.claim_timing(at(1, 25_200), 7, 0);

    assert!(timing.can_claim_now);
    assert_eq!(timing.seconds_until_next, 0);
    assert_eq!(timing.next_claim_day, 1);
    assert_eq!(timing.current_day, 1);
}

#[test]
fn test_timing_countdown_before_release_hour() {
    let engine = AccrualEngine::new(EPOCH);

    // Day 1 at 07:30 with an 08:00 release: 1800 seconds to go
    let timing = engine.claim_timing(at(1, 27_000), 8, 0);
    assert!(!timing.can_claim_now);
    assert_eq!(timing.seconds_until_next, 1_800);
    assert_eq!(timing.next_claim_day, 1);
    assert_eq!(timing.current_day, 1);
}

#[test]
fn test_timing_after_claiming_current_day() {
    let engine = AccrualEngine::new(EPOCH);

    // Claimed through day 1, still on day 1: next boundary is day 2's
    let timing = engine.claim_timing(at(1, 25_200), 7, 1);
    assert!(!timing.can_claim_now);
    assert_eq!(timing.next_claim_day, 2);
    assert_eq!(timing.seconds_until_next, SECONDS_PER_DAY);
}

#[test]
fn test_timing_on_day_zero_targets_day_one() {
    let engine = AccrualEngine::new(EPOCH);

    // Day 0 past the release hour: nothing claimable, next is day 1
    let timing = engine.claim_timing(at(0, 30_000), 7, 0);
    assert!(!timing.can_claim_now);
    assert_eq!(timing.next_claim_day, 1);
    assert_eq!(timing.seconds_until_next, SECONDS_PER_DAY + 25_200 - 30_000);
    assert_eq!(timing.current_day, 0);
}

#[test]
fn test_timing_before_epoch_measures_real_wait() {
    let engine = AccrualEngine::new(EPOCH);

    let timing = engine.claim_timing(400, 7, 0);
    assert!(!timing.can_claim_now);
    assert_eq!(timing.next_claim_day, 1);
    // Wait spans the gap to the epoch plus day 1 plus the release hour
    assert_eq!(timing.seconds_until_next, 600 + SECONDS_PER_DAY + 25_200);
}

#[test]
fn test_default_timing_record_is_all_zero() {
    let timing = ClaimTiming::default();

    assert!(!timing.can_claim_now);
    assert_eq!(timing.seconds_until_next, 0);
    assert_eq!(timing.next_claim_day, 0);
    assert_eq!(timing.current_day, 0);
}
