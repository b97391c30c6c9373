//! Element names that create components.

use crate::objects::{ComponentType, RocketComponent};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Creates a component with default values.
pub type Constructor = fn() -> RocketComponent;

/// Immutable mapping from element name to component constructor.
#[derive(Debug, Clone, Default)]
pub struct ComponentFactory {
    constructors: HashMap<String, Constructor>,
}

impl ComponentFactory {
    /// Creates an empty factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the constructor for an element.
    pub fn with(mut self, element: &str, constructor: Constructor) -> Self {
        self.constructors.insert(element.to_string(), constructor);
        self
    }

    /// The component elements of the native dialect.
    pub fn native() -> Self {
        Self::new()
            .with("stage", || RocketComponent::new(ComponentType::Stage))
            .with("nosecone", || RocketComponent::new(ComponentType::NoseCone))
            .with("bodytube", || RocketComponent::new(ComponentType::BodyTube))
            .with("transition", || RocketComponent::new(ComponentType::Transition))
            .with("trapezoidfinset", || RocketComponent::new(ComponentType::TrapezoidFinSet))
            .with("ellipticalfinset", || RocketComponent::new(ComponentType::EllipticalFinSet))
            .with("freeformfinset", || RocketComponent::new(ComponentType::FreeformFinSet))
            .with("tubefinset", || RocketComponent::new(ComponentType::TubeFinSet))
            .with("launchlug", || RocketComponent::new(ComponentType::LaunchLug))
            .with("innertube", || RocketComponent::new(ComponentType::InnerTube))
            .with("tubecoupler", || RocketComponent::new(ComponentType::TubeCoupler))
            .with("engineblock", || RocketComponent::new(ComponentType::EngineBlock))
            .with("bulkhead", || RocketComponent::new(ComponentType::Bulkhead))
            .with("centeringring", || RocketComponent::new(ComponentType::CenteringRing))
            .with("masscomponent", || RocketComponent::new(ComponentType::MassComponent))
            .with("shockcord", || RocketComponent::new(ComponentType::ShockCord))
            .with("parachute", || RocketComponent::new(ComponentType::Parachute))
            .with("streamer", || RocketComponent::new(ComponentType::Streamer))
    }

    /// Native factory shared by all imports that do not supply their own.
    pub fn shared() -> &'static ComponentFactory {
        static SHARED: OnceLock<ComponentFactory> = OnceLock::new();
        SHARED.get_or_init(ComponentFactory::native)
    }

    /// Creates the component for an element, or `None` for unknown elements.
    pub fn create(&self, element: &str) -> Option<RocketComponent> {
        self.constructors.get(element).map(|constructor| constructor())
    }

    /// Returns true if the element creates a component.
    pub fn knows(&self, element: &str) -> bool {
        self.constructors.contains_key(element)
    }
}
