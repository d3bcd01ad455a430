//! Keyboard/manual override commands

use serde::{Deserialize, Serialize};

/// A control that bypasses the physical sensors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManualCommand {
    /// Count one step
    Step,
    /// Rotate heading counter-clockwise by one nudge
    TurnLeft,
    /// Rotate heading clockwise by one nudge
    TurnRight,
}

impl ManualCommand {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "w" | "W" | "ArrowUp" => Some(ManualCommand::Step),
            "a" | "A" | "ArrowLeft" => Some(ManualCommand::TurnLeft),
            "d" | "D" | "ArrowRight" => Some(ManualCommand::TurnRight),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(ManualCommand::from_key("w"), Some(ManualCommand::Step));
        assert_eq!(ManualCommand::from_key("ArrowUp"), Some(ManualCommand::Step));
        assert_eq!(ManualCommand::from_key("A"), Some(ManualCommand::TurnLeft));
        assert_eq!(
            ManualCommand::from_key("ArrowRight"),
            Some(ManualCommand::TurnRight)
        );
        assert_eq!(ManualCommand::from_key("s"), None);
        assert_eq!(ManualCommand::from_key(""), None);
    }
}
