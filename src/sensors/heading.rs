//! Heading derivation and cardinal bucketing

use serde::{Deserialize, Serialize};

use crate::normalize_heading;

/// How this platform reports orientation, resolved once per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadingSource {
    /// A true compass heading field (degrees clockwise from north)
    DirectHeading,
    /// Only a rotation angle about the vertical axis (counter-clockwise)
    RotationAngle,
    /// No orientation events at all
    Unavailable,
}

/// One raw orientation event
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrientationSample {
    pub compass_heading: Option<f32>,
    pub alpha: Option<f32>,
}

impl HeadingSource {
    /// Heading in [0, 360) carried by `sample`, if any.
    ///
    /// A compass-capable device that omits the compass field falls back to
    /// the rotation angle. Non-finite values count as absent.
    pub fn derive(self, sample: &OrientationSample) -> Option<f32> {
        let compass = sample.compass_heading.filter(|h| h.is_finite());
        let rotation = sample
            .alpha
            .filter(|a| a.is_finite())
            .map(|alpha| normalize_heading(360.0 - alpha));

        match self {
            HeadingSource::DirectHeading => compass.map(normalize_heading).or(rotation),
            HeadingSource::RotationAngle => rotation,
            HeadingSource::Unavailable => None,
        }
    }
}

/// Compass quadrant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinal {
    North,
    East,
    South,
    West,
}

/// Maze direction a cardinal maps onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridDirection {
    Up,
    Right,
    Down,
    Left,
}

impl Cardinal {
    /// Bucket any heading. North covers [315, 360) and [0, 45).
    pub fn from_heading(heading: f32) -> Self {
        if !heading.is_finite() {
            return Cardinal::North;
        }
        let h = normalize_heading(heading);
        if h < 45.0 || h >= 315.0 {
            Cardinal::North
        } else if h < 135.0 {
            Cardinal::East
        } else if h < 225.0 {
            Cardinal::South
        } else {
            Cardinal::West
        }
    }

    pub fn direction(self) -> GridDirection {
        match self {
            Cardinal::North => GridDirection::Up,
            Cardinal::East => GridDirection::Right,
            Cardinal::South => GridDirection::Down,
            Cardinal::West => GridDirection::Left,
        }
    }
}

impl GridDirection {
    /// Cell offset (col, row); rows grow downward
    pub fn delta(self) -> (i32, i32) {
        match self {
            GridDirection::Up => (0, -1),
            GridDirection::Right => (1, 0),
            GridDirection::Down => (0, 1),
            GridDirection::Left => (-1, 0),
        }
    }

    /// Heading that points this way
    pub fn heading(self) -> f32 {
        match self {
            GridDirection::Up => 0.0,
            GridDirection::Right => 90.0,
            GridDirection::Down => 180.0,
            GridDirection::Left => 270.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(Cardinal::from_heading(0.0), Cardinal::North);
        assert_eq!(Cardinal::from_heading(44.9), Cardinal::North);
        assert_eq!(Cardinal::from_heading(45.0), Cardinal::East);
        assert_eq!(Cardinal::from_heading(134.9), Cardinal::East);
        assert_eq!(Cardinal::from_heading(135.0), Cardinal::South);
        assert_eq!(Cardinal::from_heading(225.0), Cardinal::West);
        assert_eq!(Cardinal::from_heading(314.9), Cardinal::West);
        assert_eq!(Cardinal::from_heading(315.0), Cardinal::North);
        assert_eq!(Cardinal::from_heading(359.99), Cardinal::North);
        assert_eq!(Cardinal::from_heading(-30.0), Cardinal::North);
        assert_eq!(Cardinal::from_heading(f32::NAN), Cardinal::North);
    }

    #[test]
    fn test_direction_mapping() {
        assert_eq!(Cardinal::North.direction(), GridDirection::Up);
        assert_eq!(Cardinal::East.direction(), GridDirection::Right);
        assert_eq!(Cardinal::South.direction(), GridDirection::Down);
        assert_eq!(Cardinal::West.direction(), GridDirection::Left);
        assert_eq!(GridDirection::Up.delta(), (0, -1));
        for dir in [
            GridDirection::Up,
            GridDirection::Right,
            GridDirection::Down,
            GridDirection::Left,
        ] {
            assert_eq!(Cardinal::from_heading(dir.heading()).direction(), dir);
        }
    }

    #[test]
    fn test_direct_heading_used_verbatim() {
        let sample = OrientationSample {
            compass_heading: Some(123.0),
            alpha: Some(10.0),
        };
        assert_eq!(HeadingSource::DirectHeading.derive(&sample), Some(123.0));
        assert_eq!(HeadingSource::RotationAngle.derive(&sample), Some(350.0));
        assert_eq!(HeadingSource::Unavailable.derive(&sample), None);
    }

    #[test]
    fn test_rotation_angle_inverted() {
        let sample = OrientationSample {
            compass_heading: None,
            alpha: Some(90.0),
        };
        assert_eq!(HeadingSource::RotationAngle.derive(&sample), Some(270.0));
        // alpha 0 maps to north, not 360
        let sample = OrientationSample {
            compass_heading: None,
            alpha: Some(0.0),
        };
        assert_eq!(HeadingSource::RotationAngle.derive(&sample), Some(0.0));
        assert_eq!(HeadingSource::DirectHeading.derive(&sample), Some(0.0));
    }

    #[test]
    fn test_absent_fields_mean_no_update() {
        let empty = OrientationSample::default();
        assert_eq!(HeadingSource::DirectHeading.derive(&empty), None);
        assert_eq!(HeadingSource::RotationAngle.derive(&empty), None);

        let garbage = OrientationSample {
            compass_heading: Some(f32::NAN),
            alpha: Some(f32::INFINITY),
        };
        assert_eq!(HeadingSource::DirectHeading.derive(&garbage), None);
    }
}
