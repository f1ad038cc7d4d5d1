use time::{Duration, OffsetDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CountdownState {
    Idle,
    Running { expiry: OffsetDateTime },
    Paused { remaining: Duration },
    Expired,
}

/// A countdown towards an armed expiry instant.
///
/// The owner drives it by calling [`Countdown::tick`] from its event loop;
/// `tick` reports expiry exactly once per arming. A paused countdown keeps its
/// remaining time frozen and never expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    state: CountdownState,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Countdown {
    pub fn new() -> Self {
        Self {
            state: CountdownState::Idle,
        }
    }

    /// Start (or restart) counting towards `expiry`.
    pub fn arm(&mut self, expiry: OffsetDateTime) {
        self.state = CountdownState::Running { expiry };
    }

    /// Freeze the countdown. Pausing an idle or expired countdown is a no-op.
    pub fn pause(&mut self, now: OffsetDateTime) {
        if let CountdownState::Running { expiry } = self.state {
            self.state = CountdownState::Paused {
                remaining: clamp_positive(expiry - now),
            };
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, CountdownState::Running { .. })
    }

    pub fn remaining(&self, now: OffsetDateTime) -> Duration {
        match self.state {
            CountdownState::Idle | CountdownState::Expired => Duration::ZERO,
            CountdownState::Running { expiry } => clamp_positive(expiry - now),
            CountdownState::Paused { remaining } => remaining,
        }
    }

    /// Remaining time as whole `(minutes, seconds)`. Partial seconds count as a
    /// full second so a freshly armed countdown shows its full length.
    pub fn remaining_parts(&self, now: OffsetDateTime) -> (u64, u64) {
        let remaining = self.remaining(now);
        let mut total = remaining.whole_seconds().max(0) as u64;
        if remaining.subsec_nanoseconds() > 0 {
            total += 1;
        }
        (total / 60, total % 60)
    }

    /// Returns `true` once when a running countdown reaches its expiry.
    pub fn tick(&mut self, now: OffsetDateTime) -> bool {
        match self.state {
            CountdownState::Running { expiry } if now >= expiry => {
                self.state = CountdownState::Expired;
                true
            }
            _ => false,
        }
    }
}

fn clamp_positive(duration: Duration) -> Duration {
    if duration.is_negative() {
        Duration::ZERO
    } else {
        duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn idle_countdown_never_fires() {
        let mut countdown = Countdown::new();
        assert!(!countdown.tick(datetime!(2024-03-01 10:00 UTC)));
        assert_eq!(
            countdown.remaining_parts(datetime!(2024-03-01 10:00 UTC)),
            (0, 0)
        );
    }

    #[test]
    fn fires_exactly_once_at_expiry() {
        let start = datetime!(2024-03-01 10:00 UTC);
        let mut countdown = Countdown::new();
        countdown.arm(start + Duration::minutes(25));

        assert!(!countdown.tick(start + Duration::minutes(24)));
        assert!(countdown.tick(start + Duration::minutes(25)));
        assert!(!countdown.tick(start + Duration::minutes(26)));
        assert!(!countdown.is_running());
    }

    #[test]
    fn remaining_parts_rounds_partial_seconds_up() {
        let start = datetime!(2024-03-01 10:00 UTC);
        let mut countdown = Countdown::new();
        countdown.arm(start + Duration::minutes(25));

        assert_eq!(countdown.remaining_parts(start), (25, 0));
        assert_eq!(
            countdown.remaining_parts(start + Duration::milliseconds(300)),
            (25, 0)
        );
        assert_eq!(
            countdown.remaining_parts(start + Duration::seconds(61)),
            (23, 59)
        );
    }

    #[test]
    fn paused_countdown_freezes_and_does_not_expire() {
        let start = datetime!(2024-03-01 10:00 UTC);
        let mut countdown = Countdown::new();
        countdown.arm(start + Duration::minutes(2));
        countdown.pause(start + Duration::seconds(30));

        let much_later = start + Duration::hours(1);
        assert!(!countdown.tick(much_later));
        assert_eq!(countdown.remaining(much_later), Duration::seconds(90));
    }

    #[test]
    fn rearming_after_expiry_fires_again() {
        let start = datetime!(2024-03-01 10:00 UTC);
        let mut countdown = Countdown::new();
        countdown.arm(start + Duration::seconds(5));
        assert!(countdown.tick(start + Duration::seconds(5)));

        countdown.arm(start + Duration::seconds(10));
        assert!(countdown.is_running());
        assert!(countdown.tick(start + Duration::seconds(10)));
    }
}
