//! Field setters keyed by component family and element name.
//!
//! Entries are registered against a [`ComponentClass`]. [`SetterRegistryBuilder::build`]
//! flattens them into one table per concrete [`ComponentType`] by applying
//! the registrations of every class in its ancestry from the root down, so
//! the most specific registration of an element wins. A tombstone
//! registered with [`SetterRegistryBuilder::disable`] hides a setter that a
//! family registers for one of its members.

use super::config;
use super::setters::Setter;
use crate::objects::{ComponentClass, ComponentType};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

#[derive(Clone)]
enum Entry {
    Setter(Arc<dyn Setter>),
    Disabled,
}

/// Outcome of looking up an element for a component type.
pub enum Resolution<'r> {
    /// The setter for the element
    Found(&'r dyn Setter),
    /// The element is known to the family but not allowed for this type
    Disabled,
    /// No class in the ancestry knows the element
    Unknown,
}

/// Collects registrations before they are flattened.
#[derive(Default)]
pub struct SetterRegistryBuilder {
    entries: HashMap<ComponentClass, Vec<(String, Entry)>>,
}

impl SetterRegistryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a setter for an element on a class and all its subtypes.
    pub fn register(
        &mut self,
        class: ComponentClass,
        element: &str,
        setter: impl Setter + 'static,
    ) -> &mut Self {
        self.insert(class, element, Entry::Setter(Arc::new(setter)))
    }

    /// Forbids an element on a class and all its subtypes.
    pub fn disable(&mut self, class: ComponentClass, element: &str) -> &mut Self {
        self.insert(class, element, Entry::Disabled)
    }

    fn insert(&mut self, class: ComponentClass, element: &str, entry: Entry) -> &mut Self {
        let list = self.entries.entry(class).or_default();
        list.retain(|(e, _)| e != element);
        list.push((element.to_string(), entry));
        self
    }

    /// Flattens the registrations into a registry.
    pub fn build(&self) -> SetterRegistry {
        let mut tables = HashMap::new();
        for component_type in ComponentType::ALL {
            let mut chain: Vec<ComponentClass> = component_type.ancestry().collect();
            chain.reverse();

            let mut table: HashMap<String, Entry> = HashMap::new();
            for class in chain {
                for (element, entry) in self.entries.get(&class).into_iter().flatten() {
                    table.insert(element.clone(), entry.clone());
                }
            }
            tables.insert(component_type, table);
        }
        SetterRegistry { tables }
    }
}

/// Immutable lookup table of setters.
pub struct SetterRegistry {
    tables: HashMap<ComponentType, HashMap<String, Entry>>,
}

impl SetterRegistry {
    /// Starts an empty registry.
    pub fn builder() -> SetterRegistryBuilder {
        SetterRegistryBuilder::new()
    }

    /// The registrations of the native dialect.
    pub fn native() -> Self {
        let mut builder = SetterRegistryBuilder::new();
        config::register_native(&mut builder);
        builder.build()
    }

    /// Native registry shared by all imports that do not supply their own.
    pub fn shared() -> &'static SetterRegistry {
        static SHARED: OnceLock<SetterRegistry> = OnceLock::new();
        SHARED.get_or_init(SetterRegistry::native)
    }

    /// Looks an element up for a component type.
    pub fn resolve(&self, component_type: ComponentType, element: &str) -> Resolution<'_> {
        match self.tables.get(&component_type).and_then(|t| t.get(element)) {
            Some(Entry::Setter(setter)) => Resolution::Found(setter.as_ref()),
            Some(Entry::Disabled) => Resolution::Disabled,
            None => Resolution::Unknown,
        }
    }

    /// Number of elements a component type accepts.
    pub fn element_count(&self, component_type: ComponentType) -> usize {
        self.tables
            .get(&component_type)
            .map_or(0, |t| t.values().filter(|e| matches!(e, Entry::Setter(_))).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::LoadingContext;
    use crate::native::setters::{DoubleSetter, StringSetter};
    use crate::objects::RocketComponent;
    use crate::reader::Attributes;
    use crate::warning::WarningSet;

    fn apply(registry: &SetterRegistry, c: &mut RocketComponent, element: &str, value: &str) -> bool {
        let ctx = LoadingContext::new();
        let mut warnings = WarningSet::new();
        match registry.resolve(c.component_type(), element) {
            Resolution::Found(setter) => {
                setter.set(c, value, &Attributes::new(), &ctx, &mut warnings);
                true
            }
            _ => false,
        }
    }

    #[test]
    fn test_subtype_shadows_family() {
        let mut builder = SetterRegistry::builder();
        builder.register(
            ComponentClass::SymmetricComponent,
            "length",
            DoubleSetter::new(RocketComponent::body_length_mut),
        );
        builder.register(
            ComponentClass::NoseCone,
            "length",
            StringSetter::new(|c| Some(&mut c.comment)),
        );
        let registry = builder.build();

        let mut tube = RocketComponent::new(ComponentType::BodyTube);
        assert!(apply(&registry, &mut tube, "length", "0.5"));
        assert_eq!(tube.length(), Some(0.5));

        let mut nose = RocketComponent::new(ComponentType::NoseCone);
        assert!(apply(&registry, &mut nose, "length", "0.5"));
        assert_eq!(nose.comment, "0.5");
        assert_eq!(nose.length(), Some(0.1));
    }

    #[test]
    fn test_tombstone_applies_to_subtypes() {
        let mut builder = SetterRegistry::builder();
        builder.register(
            ComponentClass::RocketComponent,
            "comment",
            StringSetter::new(|c| Some(&mut c.comment)),
        );
        builder.disable(ComponentClass::RingComponent, "comment");
        let registry = builder.build();

        for t in [ComponentType::Bulkhead, ComponentType::InnerTube, ComponentType::TubeCoupler] {
            assert!(matches!(registry.resolve(t, "comment"), Resolution::Disabled));
        }
        assert!(matches!(
            registry.resolve(ComponentType::BodyTube, "comment"),
            Resolution::Found(_)
        ));
        assert!(matches!(
            registry.resolve(ComponentType::BodyTube, "bogus"),
            Resolution::Unknown
        ));
    }

    #[test]
    fn test_native_nose_cone_tombstones() {
        let registry = SetterRegistry::native();
        for element in [
            "foreradius",
            "foreshoulderradius",
            "foreshoulderlength",
            "foreshoulderthickness",
            "foreshouldercapped",
        ] {
            assert!(matches!(
                registry.resolve(ComponentType::NoseCone, element),
                Resolution::Disabled
            ));
            assert!(matches!(
                registry.resolve(ComponentType::Transition, element),
                Resolution::Found(_)
            ));
        }
    }

    #[test]
    fn test_native_registry_covers_every_type() {
        let registry = SetterRegistry::shared();
        for t in ComponentType::ALL {
            assert!(registry.element_count(t) > 0, "{} has no setters", t);
            assert!(matches!(registry.resolve(t, "name"), Resolution::Found(_)));
        }
    }
}
