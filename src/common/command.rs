//! EZO command definitions and wire framing.
//!
//! Commands are plain ASCII. On the wire a command is followed by exactly one
//! NUL byte and written in a single I2C transaction.

use core::fmt::{self, Write};

use arrayvec::{ArrayString, ArrayVec};

use super::types::Temperature;

/// Longest command accepted, excluding the NUL terminator.
pub const MAX_COMMAND_LEN: usize = 39;
/// Size of a framed command: the text plus the terminator.
pub const FRAME_CAPACITY: usize = MAX_COMMAND_LEN + 1;
/// Terminator appended to every command.
pub const NUL: u8 = 0x00;

/// Reasons a string cannot be sent as a command.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("command is empty")]
    Empty,

    /// The terminator is added by the framing; callers must not supply it.
    #[error("command contains a NUL byte at position {0}")]
    ContainsNul(usize),

    #[error("command contains non-ASCII byte {0:#04x}")]
    NonAscii(u8),

    #[error("command is {len} bytes long, at most {max} allowed")]
    TooLong { len: usize, max: usize },
}

/// Calibration points of the pH circuit (`Cal,<point>,<pH>`).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CalibrationPoint {
    /// Midpoint, usually pH 7.00. Must be calibrated first; it clears the others.
    Mid,
    /// Lowpoint, usually pH 4.00.
    Low,
    /// Highpoint, usually pH 10.00.
    High,
}

impl CalibrationPoint {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CalibrationPoint::Mid => "mid",
            CalibrationPoint::Low => "low",
            CalibrationPoint::High => "high",
        }
    }
}

/// How long the host waits between writing a command and reading its reply.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WaitPolicy {
    /// Readings and calibrations.
    Long,
    /// Everything else that replies.
    Short,
    /// The circuit goes to sleep and never replies.
    NoReply,
}

impl WaitPolicy {
    /// Picks the policy from the command prefix, ignoring ASCII case.
    pub fn for_command(text: &str) -> Self {
        if starts_with_ignore_case(text, "R") || starts_with_ignore_case(text, "CAL") {
            WaitPolicy::Long
        } else if starts_with_ignore_case(text, "SLEEP") {
            WaitPolicy::NoReply
        } else {
            WaitPolicy::Short
        }
    }
}

#[inline]
fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// A validated EZO command: non-empty ASCII without NUL, at most
/// [`MAX_COMMAND_LEN`] bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    text: ArrayString<MAX_COMMAND_LEN>,
}

impl Command {
    /// Validates an arbitrary command string, e.g. `"Cal,?"` or `"Slope,?"`.
    pub fn new(text: &str) -> Result<Self, CommandError> {
        Self::validate(text.as_bytes())?;
        let mut buf = ArrayString::new();
        buf.try_push_str(text).map_err(|_| CommandError::TooLong {
            len: text.len(),
            max: MAX_COMMAND_LEN,
        })?;
        Ok(Command { text: buf })
    }

    fn validate(bytes: &[u8]) -> Result<(), CommandError> {
        if bytes.is_empty() {
            return Err(CommandError::Empty);
        }
        if let Some(pos) = bytes.iter().position(|&b| b == NUL) {
            return Err(CommandError::ContainsNul(pos));
        }
        if let Some(&b) = bytes.iter().find(|b| !b.is_ascii()) {
            return Err(CommandError::NonAscii(b));
        }
        if bytes.len() > MAX_COMMAND_LEN {
            return Err(CommandError::TooLong {
                len: bytes.len(),
                max: MAX_COMMAND_LEN,
            });
        }
        Ok(())
    }

    fn from_fmt(args: fmt::Arguments<'_>) -> Result<Self, CommandError> {
        let mut buf = ArrayString::<MAX_COMMAND_LEN>::new();
        buf.write_fmt(args).map_err(|_| CommandError::TooLong {
            len: MAX_COMMAND_LEN + 1,
            max: MAX_COMMAND_LEN,
        })?;
        Self::new(&buf)
    }

    fn from_literal(text: &'static str) -> Self {
        let mut buf = ArrayString::new();
        buf.push_str(text);
        Command { text: buf }
    }

    /// Single reading (`R`).
    pub fn reading() -> Self {
        Self::from_literal("R")
    }

    /// Enter low-power sleep (`Sleep`). The circuit does not reply.
    pub fn sleep() -> Self {
        Self::from_literal("Sleep")
    }

    /// Device information (`i`).
    pub fn info() -> Self {
        Self::from_literal("i")
    }

    /// Voltage at Vcc and reason for the last restart (`Status`).
    pub fn status() -> Self {
        Self::from_literal("Status")
    }

    /// Delete all calibration data (`Cal,clear`).
    pub fn clear_calibration() -> Self {
        Self::from_literal("Cal,clear")
    }

    /// Temperature compensation (`T,<degrees>`), e.g. `T,23.125`.
    pub fn temperature_compensation(temperature: Temperature) -> Result<Self, CommandError> {
        Self::from_fmt(format_args!("T,{}", temperature))
    }

    /// Calibrate one point against a buffer of known pH, given in hundredths
    /// (`700` → `Cal,mid,7.00`).
    pub fn calibrate(point: CalibrationPoint, ph_hundredths: u16) -> Result<Self, CommandError> {
        Self::from_fmt(format_args!(
            "Cal,{},{}.{:02}",
            point.as_str(),
            ph_hundredths / 100,
            ph_hundredths % 100
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy::for_command(&self.text)
    }

    /// The exact bytes written to the bus: the command followed by one NUL.
    pub fn frame(&self) -> ArrayVec<u8, FRAME_CAPACITY> {
        let mut frame: ArrayVec<u8, FRAME_CAPACITY> = self.text.bytes().collect();
        frame.push(NUL);
        frame
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl TryFrom<&str> for Command {
    type Error = CommandError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn test_builtin_commands() {
        assert_eq!(Command::reading().as_str(), "R");
        assert_eq!(Command::sleep().as_str(), "Sleep");
        assert_eq!(Command::info().as_str(), "i");
        assert_eq!(Command::status().as_str(), "Status");
        assert_eq!(Command::clear_calibration().as_str(), "Cal,clear");
    }

    #[test]
    fn test_temperature_compensation_formatting() {
        let cmd = Command::temperature_compensation(Temperature::from_millidegrees(23125)).unwrap();
        assert_eq!(cmd.to_string(), "T,23.125");

        let cold = Command::temperature_compensation(Temperature::from_millidegrees(-1500)).unwrap();
        assert_eq!(cold.as_str(), "T,-1.500");
    }

    #[test]
    fn test_calibration_formatting() {
        assert_eq!(
            Command::calibrate(CalibrationPoint::Mid, 700).unwrap().as_str(),
            "Cal,mid,7.00"
        );
        assert_eq!(
            Command::calibrate(CalibrationPoint::Low, 401).unwrap().as_str(),
            "Cal,low,4.01"
        );
        assert_eq!(
            Command::calibrate(CalibrationPoint::High, 1000).unwrap().as_str(),
            "Cal,high,10.00"
        );
    }

    #[test]
    fn test_invalid_commands() {
        assert_eq!(Command::new(""), Err(CommandError::Empty));
        assert_eq!(Command::new("R\0"), Err(CommandError::ContainsNul(1)));
        assert_eq!(Command::new("T,25°"), Err(CommandError::NonAscii(0xC2)));

        let long = "X".repeat(MAX_COMMAND_LEN + 1);
        assert_eq!(
            Command::new(&long),
            Err(CommandError::TooLong { len: MAX_COMMAND_LEN + 1, max: MAX_COMMAND_LEN })
        );
        assert!(Command::new(&"X".repeat(MAX_COMMAND_LEN)).is_ok());
    }

    #[test]
    fn test_frame_appends_single_nul() {
        let cmd = Command::new("CAL,MID,7.00").unwrap();
        let frame = cmd.frame();
        assert_eq!(&frame[..], b"CAL,MID,7.00\0");
        assert_eq!(frame.iter().filter(|&&b| b == NUL).count(), 1);

        let max = Command::new(&"X".repeat(MAX_COMMAND_LEN)).unwrap();
        assert_eq!(max.frame().len(), FRAME_CAPACITY);
    }

    #[test]
    fn test_wait_policy_selection() {
        assert_eq!(WaitPolicy::for_command("R"), WaitPolicy::Long);
        assert_eq!(WaitPolicy::for_command("r"), WaitPolicy::Long);
        assert_eq!(WaitPolicy::for_command("RT,25.0"), WaitPolicy::Long);
        assert_eq!(WaitPolicy::for_command("CAL,MID,7.00"), WaitPolicy::Long);
        assert_eq!(WaitPolicy::for_command("cal,clear"), WaitPolicy::Long);
        assert_eq!(WaitPolicy::for_command("SLEEP"), WaitPolicy::NoReply);
        assert_eq!(WaitPolicy::for_command("Sleep"), WaitPolicy::NoReply);
        assert_eq!(WaitPolicy::for_command("T,25.0"), WaitPolicy::Short);
        assert_eq!(WaitPolicy::for_command("i"), WaitPolicy::Short);
        assert_eq!(WaitPolicy::for_command("Status"), WaitPolicy::Short);
        // "CA" is not a calibration prefix.
        assert_eq!(WaitPolicy::for_command("CA"), WaitPolicy::Short);
        assert_eq!(WaitPolicy::for_command("SLEE"), WaitPolicy::Short);
    }
}
