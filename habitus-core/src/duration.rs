use time::{Duration, OffsetDateTime};

/// Minutes added or removed per focus adjustment.
pub const FOCUS_STEP_MINUTES: u32 = 5;
/// Minutes added or removed per rest adjustment.
pub const REST_STEP_MINUTES: u32 = 2;

pub fn add_seconds(base: OffsetDateTime, seconds: i64) -> OffsetDateTime {
    base + Duration::seconds(seconds)
}

/// Format a countdown as `MM:SS`. Values are expected to be truncated already.
pub fn format_countdown(minutes: u64, seconds: u64) -> String {
    format!("{:02}:{:02}", minutes, seconds)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationKind {
    Focus,
    Rest,
}

impl DurationKind {
    pub fn step(self) -> u32 {
        match self {
            DurationKind::Focus => FOCUS_STEP_MINUTES,
            DurationKind::Rest => REST_STEP_MINUTES,
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            DurationKind::Focus => "Focus time",
            DurationKind::Rest => "Rest",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Increase,
    Decrease,
}

/// Planned focus and rest lengths for a session, in minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DurationConfig {
    pub focus_minutes: u32,
    pub rest_minutes: u32,
}

impl DurationConfig {
    pub fn new(focus_minutes: u32, rest_minutes: u32) -> Self {
        Self {
            focus_minutes,
            rest_minutes,
        }
    }

    pub fn minutes(&self, kind: DurationKind) -> u32 {
        match kind {
            DurationKind::Focus => self.focus_minutes,
            DurationKind::Rest => self.rest_minutes,
        }
    }

    /// Move one step up or down. Decrements never go below zero.
    pub fn adjust(&mut self, kind: DurationKind, step: Step) {
        let slot = match kind {
            DurationKind::Focus => &mut self.focus_minutes,
            DurationKind::Rest => &mut self.rest_minutes,
        };
        *slot = match step {
            Step::Increase => slot.saturating_add(kind.step()),
            Step::Decrease => slot.saturating_sub(kind.step()),
        };
    }

    /// Both durations must be set before a focus interval may start.
    pub fn is_ready(&self) -> bool {
        self.focus_minutes > 0 && self.rest_minutes > 0
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Input text for a duration: the placeholder while unset, otherwise "N minutes".
    pub fn label(&self, kind: DurationKind) -> String {
        match self.minutes(kind) {
            0 => kind.placeholder().to_string(),
            n => format!("{} minutes", n),
        }
    }
}
