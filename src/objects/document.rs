//! The imported document.

use super::component::{ComponentIter, ComponentType, RocketComponent};
use super::simulation::{FlightDataType, Simulation};

/// Settings recorded for how a document stores simulation data.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StorageOptions {
    /// Smallest time step between stored data points, rounded to 0.01 s.
    /// `None` when the document stores no flight data.
    pub simulation_time_skip: Option<f64>,
}

/// A rocket design with its stored simulations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RocketDocument {
    /// Root of the component tree
    pub rocket: RocketComponent,
    /// Stored simulations in document order
    pub simulations: Vec<Simulation>,
    /// Native format version as `major * 100 + minor`, 0 when not known
    pub file_version: i32,
    /// Version text as written in the document
    pub source_version: Option<String>,
    /// Program that wrote the document
    pub creator: Option<String>,
    /// Storage settings
    pub storage: StorageOptions,
}

impl Default for RocketDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl RocketDocument {
    /// Creates a document with an empty rocket.
    pub fn new() -> Self {
        Self {
            rocket: RocketComponent::new(ComponentType::Rocket),
            simulations: Vec::new(),
            file_version: 0,
            source_version: None,
            creator: None,
            storage: StorageOptions::default(),
        }
    }

    /// Stages of the rocket, top first.
    pub fn stages(&self) -> impl Iterator<Item = &RocketComponent> {
        self.rocket
            .children()
            .iter()
            .filter(|c| c.component_type() == ComponentType::Stage)
    }

    /// Number of stages.
    pub fn stage_count(&self) -> usize {
        self.stages().count()
    }

    /// Iterates every component of the design, depth first, starting at the rocket.
    pub fn iter_components(&self) -> ComponentIter<'_> {
        self.rocket.iter()
    }

    /// Number of components including the rocket itself.
    pub fn component_count(&self) -> usize {
        self.iter_components().count()
    }

    /// Derives [`StorageOptions::simulation_time_skip`] from the stored flight data.
    ///
    /// Only the first branch of each simulation is considered.
    pub fn update_time_skip(&mut self) {
        let mut skip: Option<f64> = None;
        for simulation in &self.simulations {
            let times = simulation
                .flight_data
                .as_ref()
                .and_then(|data| data.branches.first())
                .and_then(|branch| branch.get(FlightDataType::TIME));
            let Some(times) = times else {
                continue;
            };
            for pair in times.windows(2) {
                let step = pair[1] - pair[0];
                if skip.map_or(true, |s| step < s) {
                    skip = Some(step);
                }
            }
        }
        self.storage.simulation_time_skip = skip.map(|s| (s * 100.0).round() / 100.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{FlightData, FlightDataBranch};

    #[test]
    fn test_new_document() {
        let doc = RocketDocument::new();
        assert_eq!(doc.component_count(), 1);
        assert_eq!(doc.stage_count(), 0);
        assert_eq!(doc.rocket.name, "Rocket");
    }

    #[test]
    fn test_time_skip() {
        let mut branch = FlightDataBranch::new(
            "Sustainer",
            vec![FlightDataType::builtin("Time").unwrap()],
        );
        for t in [0.0, 0.05, 0.1, 0.2, 0.3] {
            branch.add_point(&[t]);
        }
        let mut doc = RocketDocument::new();
        doc.simulations.push(Simulation {
            flight_data: Some(FlightData {
                branches: vec![branch],
                ..FlightData::default()
            }),
            ..Simulation::default()
        });
        doc.update_time_skip();
        assert_eq!(doc.storage.simulation_time_skip, Some(0.05));

        let mut empty = RocketDocument::new();
        empty.update_time_skip();
        assert_eq!(empty.storage.simulation_time_skip, None);
    }
}
