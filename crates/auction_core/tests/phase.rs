use auction_core::{phase_at, time_left, AuctionPhase, TimeLeft};
use pretty_assertions::assert_eq;

const T0: i64 = 1_700_000_000_000;
const T1: i64 = T0 + 3_600_000;

#[test]
fn countdown_breaks_difference_into_units() {
    // One hour, one minute and one second ahead.
    let left = time_left(T0, T0 + 3_661_000);
    assert_eq!(
        left,
        TimeLeft {
            days: 0,
            hours: 1,
            minutes: 1,
            seconds: 1,
        }
    );
}

#[test]
fn countdown_counts_days() {
    let left = time_left(T0, T0 + 2 * 86_400_000 + 3_000);
    assert_eq!(left.days, 2);
    assert_eq!(left.hours, 0);
    assert_eq!(left.seconds, 3);
}

#[test]
fn countdown_clamps_to_zero_once_passed() {
    assert!(time_left(T0, T0).is_zero());
    assert!(time_left(T0, T0 - 1).is_zero());
    assert!(time_left(T0, T0 - 86_400_000).is_zero());
}

#[test]
fn phase_follows_clock_against_window() {
    assert_eq!(phase_at(T0 - 1, T0, T1), AuctionPhase::NotStarted);
    assert_eq!(phase_at(T0, T0, T1), AuctionPhase::InProgress);
    assert_eq!(phase_at(T1 - 1, T0, T1), AuctionPhase::InProgress);
    assert_eq!(phase_at(T1, T0, T1), AuctionPhase::Ended);
    assert_eq!(phase_at(T1 + 86_400_000, T0, T1), AuctionPhase::Ended);
}
