//! Motors, motor mounts and flight configurations.

use super::common::IgnitionEvent;
use md5::{Digest, Md5};

xml_enum! {
    /// Construction of a motor.
    #[derive(Default)]
    pub enum MotorType {
        /// Single use
        Single => "SINGLE",
        /// Reloadable casing
        Reload => "RELOAD",
        /// Hybrid
        Hybrid => "HYBRID",
        /// Not known
        #[default]
        Unknown => "UNKNOWN",
    }
}

/// A rocket motor with its thrust curve.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Motor {
    /// Manufacturer name
    pub manufacturer: String,
    /// Designation such as `D12`
    pub designation: String,
    /// Construction
    pub motor_type: MotorType,
    /// Diameter in meters
    pub diameter: f64,
    /// Length in meters
    pub length: f64,
    /// Standard ejection delays in seconds
    pub delays: Vec<f64>,
    /// Thrust curve as (time s, thrust N)
    pub thrust_curve: Vec<(f64, f64)>,
}

impl Motor {
    /// Creates a motor without a thrust curve.
    pub fn new(
        manufacturer: impl Into<String>,
        designation: impl Into<String>,
        motor_type: MotorType,
        diameter: f64,
        length: f64,
    ) -> Self {
        Self {
            manufacturer: manufacturer.into(),
            designation: designation.into(),
            motor_type,
            diameter,
            length,
            delays: Vec::new(),
            thrust_curve: Vec::new(),
        }
    }

    /// Adds a thrust curve.
    pub fn with_thrust_curve(mut self, curve: Vec<(f64, f64)>) -> Self {
        self.thrust_curve = curve;
        self
    }

    /// MD5 digest over the physical data of the motor.
    ///
    /// Two motors with the same digest behave identically in flight, whatever
    /// their names.
    pub fn digest(&self) -> String {
        let mut hasher = Md5::new();
        hasher.update(format!("{:.6}|{:.6}|", self.diameter, self.length).as_bytes());
        for (time, thrust) in &self.thrust_curve {
            hasher.update(format!("{:.6},{:.6};", time, thrust).as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }

    /// Total impulse in Ns, integrated with the trapezoid rule.
    pub fn total_impulse(&self) -> f64 {
        self.thrust_curve
            .windows(2)
            .map(|w| (w[1].0 - w[0].0) * (w[0].1 + w[1].1) / 2.0)
            .sum()
    }
}

/// Identifying data of a motor as recorded in a document.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorQuery {
    /// Construction, if recorded
    pub motor_type: Option<MotorType>,
    /// Manufacturer, if recorded
    pub manufacturer: Option<String>,
    /// Designation, if recorded
    pub designation: Option<String>,
    /// Diameter in meters, if recorded
    pub diameter: Option<f64>,
    /// Length in meters, if recorded
    pub length: Option<f64>,
    /// Content digest, if recorded and trusted
    pub digest: Option<String>,
}

/// A motor loaded in one flight configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MountedMotor {
    /// Resolved motor, or `None` when the motor could not be found
    pub motor: Option<Motor>,
    /// Ejection delay in seconds, `None` for a plugged motor
    pub delay: Option<f64>,
}

/// Motor mounting data of a body tube or inner tube.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorMount {
    /// True when the tube holds motors
    pub is_mount: bool,
    /// Motors by configuration id, in document order
    pub motors: Vec<(String, MountedMotor)>,
    /// Event that ignites the motors
    pub ignition_event: IgnitionEvent,
    /// Delay after the ignition event in seconds
    pub ignition_delay: f64,
    /// Length the motor protrudes aft of the tube in meters
    pub overhang: f64,
}

impl MotorMount {
    /// Sets or replaces the motor of a configuration.
    pub fn set_motor(&mut self, config_id: impl Into<String>, motor: MountedMotor) {
        let config_id = config_id.into();
        match self.motors.iter_mut().find(|(id, _)| *id == config_id) {
            Some((_, existing)) => *existing = motor,
            None => self.motors.push((config_id, motor)),
        }
    }

    /// Motor of a configuration.
    pub fn motor(&self, config_id: &str) -> Option<&MountedMotor> {
        self.motors
            .iter()
            .find(|(id, _)| id == config_id)
            .map(|(_, m)| m)
    }
}

/// A named flight configuration of the rocket.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorConfiguration {
    /// Configuration id referenced by motor mounts and simulations
    pub id: String,
    /// Optional display name
    pub name: Option<String>,
}
