//! Design object types.
//!
//! This module contains the data structures an import produces:
//!
//! - [`RocketDocument`] - The imported document
//! - [`RocketComponent`] - A node of the component tree
//! - [`Simulation`] - A stored simulation with its flight data
//! - [`Motor`], [`MotorMount`] - Motors and where they are mounted
//! - [`Material`], [`ComponentPreset`] - Catalog values referenced by components
//!
//! Also provides common types:
//! - [`XmlEnum`] - Enumerations matched by normalized name
//! - [`Color`] and [`Coordinate`]

mod common;
mod component;
mod document;
mod material;
mod motor;
mod preset;
mod simulation;

// Re-export common types
pub use common::{
    normalize_enum_name, parse_bool, parse_double, parse_int, AngleMethod, AxialMethod,
    ClusterConfiguration, Color, Coordinate, CrossSection, DeployEvent, Finish, IgnitionEvent,
    LineStyle, MassComponentType, RadiusMethod, ReferenceType, SeparationEvent, Shape,
    TabRelativePosition, XmlEnum,
};

// Re-export component tree types
pub use component::{
    Ancestry, BodyTube, ComponentClass, ComponentIter, ComponentKind, ComponentType, External,
    FinSet, InnerTube, LaunchLug, MassComponent, MassObject, Override, Parachute, Position,
    RecoveryDevice, Ring, Rocket, RocketComponent, ShockCord, Shoulder, Stage, Streamer,
    Transition, TubeFinSet,
};

pub use document::{RocketDocument, StorageOptions};
pub use material::{Material, MaterialType};
pub use motor::{Motor, MotorConfiguration, MotorMount, MotorQuery, MotorType, MountedMotor};
pub use preset::{ComponentPreset, PresetType};
pub use simulation::{
    CustomExpression, DataTypeOrigin, FlightData, FlightDataBranch, FlightDataType, FlightEvent,
    FlightEventType, GeodeticMethod, Simulation, SimulationOptions, SimulationStatus,
};
