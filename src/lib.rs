//! Importer for OpenRocket and RockSim rocket design documents.
//!
//! This crate reads rocket designs stored as XML into a typed component
//! tree, together with the simulations recorded alongside them.
//!
//! # Features
//!
//! - **Two Dialects**: native versioned `openrocket` documents (`.ork`) and
//!   RockSim `.rkt` files, detected automatically.
//! - **Streaming Reader**: a single pass over the XML tokens, dispatched to
//!   per-element handlers.
//! - **Lenient**: unknown or invalid content becomes a [`Warning`] and the
//!   import carries on; only unreadable input is an [`Error`].
//! - **Serde Support**: optional serialization of the object model with the
//!   `serde` feature.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rocketdoc_rs::load_file;
//!
//! let loaded = load_file("design.ork").unwrap();
//! for component in loaded.document.rocket.iter() {
//!     println!("{}", component.name);
//! }
//! for warning in loaded.warnings.iter() {
//!     eprintln!("warning: {}", warning);
//! }
//! ```
//!
//! # Configuration
//!
//! Motors, materials and presets are resolved through collaborators that
//! a [`Loader`] hands to each import:
//!
//! ```rust,no_run
//! use rocketdoc_rs::catalog::MotorDatabase;
//! use rocketdoc_rs::Loader;
//!
//! let motors = MotorDatabase::new();
//! let loader = Loader::new().with_motor_finder(&motors);
//! let loaded = loader.load_file("design.rkt").unwrap();
//! println!("{} stage(s)", loaded.document.stage_count());
//! ```
//!
//! # Module Structure
//!
//! - [`objects`] - Component tree, simulations and the document
//! - [`loader`] - Format detection and import configuration
//! - [`native`] - Native dialect handlers
//! - [`rocksim`] - RockSim dialect handlers
//! - [`reader`] - Handler dispatch over the XML token stream
//! - [`catalog`] - Motor, material and preset lookup
//! - [`error`] and [`warning`] - Fatal errors and recoverable problems
//!
//! # Optional Features
//!
//! - `serde` - Enable serde serialization/deserialization support
//! - `cli` - Build the `rocket_import` and `scan_designs` tools

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[macro_use]
mod macros;

pub mod catalog;
pub mod context;
pub mod error;
pub mod loader;
pub mod native;
pub mod objects;
pub mod reader;
pub mod rocksim;
pub mod warning;

// Re-export commonly used types at the crate root
pub use context::LoadingContext;
pub use error::{Error, Result};
pub use loader::{load, load_file, Format, LoadedDocument, Loader};
pub use objects::{
    ComponentType, Material, Motor, RocketComponent, RocketDocument, Simulation, SimulationStatus,
};
pub use warning::{Warning, WarningSet};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
