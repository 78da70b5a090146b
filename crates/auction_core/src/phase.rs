/// How long before the start time the live stream is pre-connected, so the
/// first bid tick right at the opening is not missed.
pub const PRE_CONNECT_WINDOW_MS: i64 = 60_000;

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Lifecycle phase of an auction, always derived from the clock and the
/// item's start/end timestamps, never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuctionPhase {
    #[default]
    NotStarted,
    InProgress,
    Ended,
}

/// Derives the phase for `now_ms` against `[start_ms, end_ms)`.
///
/// NotStarted while now < start, InProgress while start <= now < end,
/// Ended once now >= end. Monotonic under a monotonic clock.
pub fn phase_at(now_ms: i64, start_ms: i64, end_ms: i64) -> AuctionPhase {
    if now_ms < start_ms {
        AuctionPhase::NotStarted
    } else if now_ms < end_ms {
        AuctionPhase::InProgress
    } else {
        AuctionPhase::Ended
    }
}

/// Remaining time until a target timestamp, broken into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeLeft {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimeLeft {
    pub fn is_zero(&self) -> bool {
        *self == TimeLeft::default()
    }
}

/// Countdown from `now_ms` to `target_ms`, clamped to zero once passed.
///
/// Each call derives from the supplied wall time, so a once-per-second
/// caller self-corrects against interval drift.
pub fn time_left(now_ms: i64, target_ms: i64) -> TimeLeft {
    let difference = target_ms - now_ms;
    if difference <= 0 {
        return TimeLeft::default();
    }
    TimeLeft {
        days: difference / MS_PER_DAY,
        hours: difference / MS_PER_HOUR % 24,
        minutes: difference / MS_PER_MINUTE % 60,
        seconds: difference / MS_PER_SECOND % 60,
    }
}
