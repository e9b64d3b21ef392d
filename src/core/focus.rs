/// Bounds on a configurable session length, in minutes.
pub const MIN_MINUTES: u32 = 1;
pub const MAX_MINUTES: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl FocusMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Focus => "Focus Study",
            Self::ShortBreak => "Short Break",
            Self::LongBreak => "Long Break",
        }
    }

    pub fn default_minutes(&self) -> u32 {
        match self {
            Self::Focus => 25,
            Self::ShortBreak => 5,
            Self::LongBreak => 15,
        }
    }

    /// Mode suggested once this one completes.
    pub fn next_mode(&self) -> Self {
        match self {
            Self::Focus => Self::ShortBreak,
            Self::ShortBreak | Self::LongBreak => Self::Focus,
        }
    }

    pub fn completion_message(&self) -> &'static str {
        match self {
            Self::Focus => "Excellent focus session! Time for a well-deserved break.",
            Self::ShortBreak => "Break complete! Ready to focus again?",
            Self::LongBreak => "Feeling refreshed? Let's get back to learning!",
        }
    }
}

/// Countdown state for one timer session. Pure state: the caller drives
/// `tick()` once per second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusSession {
    pub mode: FocusMode,
    pub minutes: u32,
    pub remaining_secs: u32,
    pub running: bool,
}

impl FocusSession {
    pub fn new(mode: FocusMode) -> Self {
        let minutes = mode.default_minutes();
        Self {
            mode,
            minutes,
            remaining_secs: minutes * 60,
            running: false,
        }
    }

    /// Change the configured length, clamped to 1..=120 minutes. Resets the
    /// countdown.
    pub fn set_minutes(&mut self, minutes: u32) {
        self.minutes = minutes.clamp(MIN_MINUTES, MAX_MINUTES);
        self.remaining_secs = self.minutes * 60;
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn reset(&mut self) {
        self.remaining_secs = self.minutes * 60;
        self.running = false;
    }

    /// Advance one second. Returns true exactly when the countdown reaches
    /// zero on this tick; the session stops itself.
    pub fn tick(&mut self) -> bool {
        if !self.running || self.remaining_secs == 0 {
            return false;
        }
        self.remaining_secs -= 1;
        if self.remaining_secs == 0 {
            self.running = false;
            return true;
        }
        false
    }

    /// Elapsed share of the session, in percent.
    pub fn progress(&self) -> f64 {
        let total = self.minutes * 60;
        if total == 0 {
            return 0.0;
        }
        (total - self.remaining_secs) as f64 / total as f64 * 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.remaining_secs == 0
    }
}

/// "MM:SS" display for a second count.
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
