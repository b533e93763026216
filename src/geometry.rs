//! 2D geometry values logged as structs.
//!
//! These are encoding policies on top of [`LogValue::Struct`]: each type
//! flattens to its `f64` fields in schema order and tags itself with the
//! matching `struct:` name.

use crate::loggable::Loggable;
use crate::value::LogValue;

/// Schemas registered at the start of every session, in dependency order.
pub const BUILTIN_SCHEMAS: &[(&str, &str)] = &[
    ("Translation2d", "double x;double y"),
    ("Rotation2d", "double value"),
    ("Pose2d", "Translation2d translation;Rotation2d rotation"),
];

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Translation2d {
    pub x: f64,
    pub y: f64,
}

impl Translation2d {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation2d {
    pub radians: f64,
}

impl Rotation2d {
    pub const fn new(radians: f64) -> Self {
        Self { radians }
    }

    pub fn from_degrees(degrees: f64) -> Self {
        Self::new(degrees.to_radians())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose2d {
    pub translation: Translation2d,
    pub rotation: Rotation2d,
}

impl Pose2d {
    pub const fn new(x: f64, y: f64, heading: f64) -> Self {
        Self {
            translation: Translation2d::new(x, y),
            rotation: Rotation2d::new(heading),
        }
    }
}

impl Loggable for Translation2d {
    fn to_log_value(&self) -> LogValue {
        LogValue::Struct {
            schema: "Translation2d".to_string(),
            fields: vec![self.x, self.y],
        }
    }
}

impl Loggable for Rotation2d {
    fn to_log_value(&self) -> LogValue {
        LogValue::Struct {
            schema: "Rotation2d".to_string(),
            fields: vec![self.radians],
        }
    }
}

impl Loggable for Pose2d {
    fn to_log_value(&self) -> LogValue {
        LogValue::Struct {
            schema: "Pose2d".to_string(),
            fields: vec![self.translation.x, self.translation.y, self.rotation.radians],
        }
    }
}
