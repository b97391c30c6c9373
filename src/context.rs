//! Per-import state shared by all handlers.

use crate::catalog::{MaterialCatalog, MotorFinder, NoMotors, PresetCatalog};
use crate::native::{ComponentFactory, SetterRegistry};
use crate::objects::RocketDocument;

/// State of one import.
///
/// Holds the declared format version, the collaborators handlers consult,
/// and the document under construction. Created for each import and
/// discarded afterwards; never share one between concurrent imports.
pub struct LoadingContext<'a> {
    file_version: i32,
    motor_finder: &'a dyn MotorFinder,
    materials: &'a MaterialCatalog,
    presets: &'a PresetCatalog,
    setters: &'a SetterRegistry,
    factory: &'a ComponentFactory,
    document: RocketDocument,
    design_loaded: bool,
}

impl Default for LoadingContext<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingContext<'static> {
    /// Creates a context using the shared default collaborators.
    pub fn new() -> Self {
        static NO_MOTORS: NoMotors = NoMotors;
        Self {
            file_version: 0,
            motor_finder: &NO_MOTORS,
            materials: MaterialCatalog::shared(),
            presets: PresetCatalog::shared(),
            setters: SetterRegistry::shared(),
            factory: ComponentFactory::shared(),
            document: RocketDocument::new(),
            design_loaded: false,
        }
    }
}

impl<'a> LoadingContext<'a> {
    /// Uses a motor finder.
    pub fn with_motor_finder(mut self, finder: &'a dyn MotorFinder) -> Self {
        self.motor_finder = finder;
        self
    }

    /// Uses a material catalog.
    pub fn with_materials(mut self, materials: &'a MaterialCatalog) -> Self {
        self.materials = materials;
        self
    }

    /// Uses a preset catalog.
    pub fn with_presets(mut self, presets: &'a PresetCatalog) -> Self {
        self.presets = presets;
        self
    }

    /// Uses a setter registry.
    pub fn with_setters(mut self, setters: &'a SetterRegistry) -> Self {
        self.setters = setters;
        self
    }

    /// Uses a component factory.
    pub fn with_factory(mut self, factory: &'a ComponentFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Declared format version, `major * 100 + minor`.
    pub fn file_version(&self) -> i32 {
        self.file_version
    }

    /// Records the declared format version.
    pub fn set_file_version(&mut self, version: i32) {
        self.file_version = version;
        self.document.file_version = version;
    }

    /// Motor finder.
    pub fn motor_finder(&self) -> &'a dyn MotorFinder {
        self.motor_finder
    }

    /// Material catalog.
    pub fn materials(&self) -> &'a MaterialCatalog {
        self.materials
    }

    /// Preset catalog.
    pub fn presets(&self) -> &'a PresetCatalog {
        self.presets
    }

    /// Setter registry.
    pub fn setters(&self) -> &'a SetterRegistry {
        self.setters
    }

    /// Component factory.
    pub fn factory(&self) -> &'a ComponentFactory {
        self.factory
    }

    /// The document under construction.
    pub fn document(&self) -> &RocketDocument {
        &self.document
    }

    /// The document under construction.
    pub fn document_mut(&mut self) -> &mut RocketDocument {
        &mut self.document
    }

    /// Marks that a rocket design has been read.
    pub fn mark_design_loaded(&mut self) {
        self.design_loaded = true;
    }

    /// Returns true once a rocket design has been read.
    pub fn design_loaded(&self) -> bool {
        self.design_loaded
    }

    /// Consumes the context, returning the document.
    pub fn into_document(self) -> RocketDocument {
        self.document
    }
}
