use serde::{Deserialize, Serialize};

/// Time primitives
///
/// Timestamps are supplied by the host (UI clock, replay file), never read
/// from the wall clock here, so everything downstream stays replayable.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Time(pub f64); // seconds

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub fn from_millis(ms: f64) -> Self {
        Time(ms / 1000.0)
    }

    pub fn as_millis(self) -> f64 {
        self.0 * 1000.0
    }

    /// Seconds elapsed since `earlier`, clamped at zero.
    pub fn elapsed_since(self, earlier: Time) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }

    pub fn after(self, seconds: f64) -> Self {
        Time(self.0 + seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::Time;

    #[test]
    fn millis_round_trip() {
        let t = Time::from_millis(250.0);
        assert_eq!(t, Time(0.25));
        assert_eq!(t.as_millis(), 250.0);
    }

    #[test]
    fn elapsed_never_negative() {
        assert_eq!(Time(1.0).elapsed_since(Time(3.0)), 0.0);
        assert_eq!(Time(3.0).elapsed_since(Time(1.0)), 2.0);
    }
}
