use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from parsing a timecode string
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimecodeError {
    /// The string does not have 3 or 4 colon-separated fields
    #[error("expected HH:MM:SS or HH:MM:SS:FF, got '{0}'")]
    BadShape(String),
    /// A field is not a valid integer
    #[error("non-numeric field '{0}'")]
    BadField(String),
    /// A field is outside its allowed range
    #[error("field out of range in '{0}' (hours 0-99, minutes/seconds 0-59)")]
    OutOfRange(String),
}

/// An edit timecode: hours, minutes, seconds, and an optional frame field.
///
/// Field order gives the derived ordering the correct lexicographic meaning;
/// a missing frame field sorts before any frame value at the same second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timecode {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    /// Frame number, present for HH:MM:SS:FF sources
    pub frames: Option<u32>,
}

impl Timecode {
    pub fn new(hours: u32, minutes: u32, seconds: u32, frames: Option<u32>) -> Self {
        Self {
            hours,
            minutes,
            seconds,
            frames,
        }
    }

    /// Subtract whole hours, saturating at zero
    pub fn sub_hours(&self, hours: u32) -> Self {
        Self {
            hours: self.hours.saturating_sub(hours),
            ..*self
        }
    }

    /// Render as `[HH:MM:SS]`, dropping any frame field
    pub fn bracketed(&self) -> String {
        format!("[{:02}:{:02}:{:02}]", self.hours, self.minutes, self.seconds)
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.frames {
            Some(frames) => write!(
                f,
                "{:02}:{:02}:{:02}:{:02}",
                self.hours, self.minutes, self.seconds, frames
            ),
            None => write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds),
        }
    }
}

impl FromStr for Timecode {
    type Err = TimecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 && parts.len() != 4 {
            return Err(TimecodeError::BadShape(s.to_string()));
        }

        let mut fields = [0u32; 4];
        for (i, part) in parts.iter().enumerate() {
            fields[i] = part
                .trim()
                .parse()
                .map_err(|_| TimecodeError::BadField(part.to_string()))?;
        }

        let (hours, minutes, seconds) = (fields[0], fields[1], fields[2]);
        if hours > 99 || minutes > 59 || seconds > 59 {
            return Err(TimecodeError::OutOfRange(s.to_string()));
        }

        let frames = if parts.len() == 4 { Some(fields[3]) } else { None };
        Ok(Self::new(hours, minutes, seconds, frames))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_four_field() {
        let tc: Timecode = "01:02:03:14".parse().unwrap();
        assert_eq!(tc, Timecode::new(1, 2, 3, Some(14)));
    }

    #[test]
    fn test_parse_three_field() {
        let tc: Timecode = "00:59:59".parse().unwrap();
        assert_eq!(tc, Timecode::new(0, 59, 59, None));
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        assert!(matches!(
            "01:02".parse::<Timecode>(),
            Err(TimecodeError::BadShape(_))
        ));
        assert!(matches!(
            "aa:bb:cc".parse::<Timecode>(),
            Err(TimecodeError::BadField(_))
        ));
        assert!(matches!(
            "01:60:00".parse::<Timecode>(),
            Err(TimecodeError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_ordering_is_monotonic() {
        let a: Timecode = "01:00:00:00".parse().unwrap();
        let b: Timecode = "01:00:00:12".parse().unwrap();
        let c: Timecode = "01:00:01:00".parse().unwrap();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_sub_hours_saturates() {
        let tc = Timecode::new(1, 0, 8, Some(15));
        assert_eq!(tc.sub_hours(1), Timecode::new(0, 0, 8, Some(15)));
        assert_eq!(Timecode::new(0, 30, 0, None).sub_hours(1).hours, 0);
    }

    #[test]
    fn test_bracketed_drops_frames() {
        let tc = Timecode::new(1, 23, 45, Some(12));
        assert_eq!(tc.bracketed(), "[01:23:45]");
    }
}
