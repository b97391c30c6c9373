//! Manufacturer component presets.

use super::common::XmlEnum;
use super::component::ComponentType;
use md5::{Digest, Md5};

xml_enum! {
    /// Kind of component a preset describes.
    pub enum PresetType {
        /// Body tube
        BodyTube => "BODY_TUBE",
        /// Nose cone
        NoseCone => "NOSE_CONE",
        /// Transition
        Transition => "TRANSITION",
        /// Tube coupler
        TubeCoupler => "TUBE_COUPLER",
        /// Bulkhead
        Bulkhead => "BULK_HEAD",
        /// Centering ring
        CenteringRing => "CENTERING_RING",
        /// Engine block
        EngineBlock => "ENGINE_BLOCK",
        /// Launch lug
        LaunchLug => "LAUNCH_LUG",
        /// Streamer
        Streamer => "STREAMER",
        /// Parachute
        Parachute => "PARACHUTE",
    }
}

impl PresetType {
    /// Component type a preset of this kind can be applied to.
    pub fn component_type(self) -> ComponentType {
        match self {
            PresetType::BodyTube => ComponentType::BodyTube,
            PresetType::NoseCone => ComponentType::NoseCone,
            PresetType::Transition => ComponentType::Transition,
            PresetType::TubeCoupler => ComponentType::TubeCoupler,
            PresetType::Bulkhead => ComponentType::Bulkhead,
            PresetType::CenteringRing => ComponentType::CenteringRing,
            PresetType::EngineBlock => ComponentType::EngineBlock,
            PresetType::LaunchLug => ComponentType::LaunchLug,
            PresetType::Streamer => ComponentType::Streamer,
            PresetType::Parachute => ComponentType::Parachute,
        }
    }
}

/// A catalog part: dimensions and mass of a purchasable component.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComponentPreset {
    /// Manufacturer name
    pub manufacturer: String,
    /// Manufacturer part number
    pub part_no: String,
    /// Free text description
    pub description: String,
    /// Kind of component
    pub preset_type: PresetType,
    /// Length in meters
    pub length: Option<f64>,
    /// Outer diameter in meters
    pub outer_diameter: Option<f64>,
    /// Inner diameter in meters
    pub inner_diameter: Option<f64>,
    /// Mass in kilograms
    pub mass: Option<f64>,
}

impl ComponentPreset {
    /// Creates a preset with no dimensions.
    pub fn new(
        manufacturer: impl Into<String>,
        part_no: impl Into<String>,
        preset_type: PresetType,
    ) -> Self {
        Self {
            manufacturer: manufacturer.into(),
            part_no: part_no.into(),
            description: String::new(),
            preset_type,
            length: None,
            outer_diameter: None,
            inner_diameter: None,
            mass: None,
        }
    }

    /// Sets the length.
    pub fn with_length(mut self, length: f64) -> Self {
        self.length = Some(length);
        self
    }

    /// Sets outer and inner diameter.
    pub fn with_diameters(mut self, outer: f64, inner: f64) -> Self {
        self.outer_diameter = Some(outer);
        self.inner_diameter = Some(inner);
        self
    }

    /// Sets the mass.
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }

    /// MD5 digest over the identity and physical data of the preset.
    pub fn digest(&self) -> String {
        let mut hasher = Md5::new();
        hasher.update(self.manufacturer.as_bytes());
        hasher.update(b"|");
        hasher.update(self.part_no.as_bytes());
        hasher.update(b"|");
        hasher.update(self.preset_type.name().as_bytes());
        for value in [self.length, self.outer_diameter, self.inner_diameter, self.mass] {
            match value {
                Some(v) => hasher.update(format!("|{:.6}", v).as_bytes()),
                None => hasher.update(b"|-"),
            }
        }
        format!("{:x}", hasher.finalize())
    }
}
