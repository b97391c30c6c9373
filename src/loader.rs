//! Front door: format detection and import configuration.
//!
//! ```rust,no_run
//! use rocketdoc_rs::loader::Loader;
//!
//! let loaded = Loader::new().load_file("design.ork").unwrap();
//! for warning in loaded.warnings.iter() {
//!     eprintln!("{}", warning);
//! }
//! println!("{} stage(s)", loaded.document.stage_count());
//! ```

use crate::catalog::{MaterialCatalog, MotorFinder, NoMotors, PresetCatalog};
use crate::context::LoadingContext;
use crate::error::{Error, Result};
use crate::native::{read_native, ComponentFactory, SetterRegistry};
use crate::objects::RocketDocument;
use crate::rocksim::read_rocksim;
use crate::warning::WarningSet;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Dialect of a design document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Format {
    /// Versioned `openrocket` documents
    Native,
    /// RockSim `RockSimDocument` files
    RockSim,
}

impl Format {
    /// Detects the dialect from the buffered start of the input without
    /// consuming it.
    pub fn detect<R: BufRead>(source: &mut R) -> Result<Option<Format>> {
        let prefix = String::from_utf8_lossy(source.fill_buf()?);
        let native = prefix.find("<openrocket");
        let rocksim = prefix.find("<RockSimDocument");
        Ok(match (native, rocksim) {
            (Some(n), Some(r)) if r < n => Some(Format::RockSim),
            (Some(_), _) => Some(Format::Native),
            (None, Some(_)) => Some(Format::RockSim),
            (None, None) => None,
        })
    }

    /// Guesses the dialect from a `.ork` or `.rkt` extension.
    pub fn from_extension(path: &Path) -> Option<Format> {
        let extension = path.extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("ork") {
            Some(Format::Native)
        } else if extension.eq_ignore_ascii_case("rkt") {
            Some(Format::RockSim)
        } else {
            None
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Native => f.write_str("native"),
            Format::RockSim => f.write_str("RockSim"),
        }
    }
}

/// An imported document and the problems met while reading it.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// The design and its simulations
    pub document: RocketDocument,
    /// Recoverable problems, in the order they were found
    pub warnings: WarningSet,
}

/// Import configuration.
///
/// Every call to [`Loader::load`] or [`Loader::load_file`] uses a fresh
/// context, so one loader can drive any number of imports, also from
/// several threads at once.
#[derive(Clone, Copy)]
pub struct Loader<'a> {
    format: Option<Format>,
    motor_finder: &'a dyn MotorFinder,
    materials: &'a MaterialCatalog,
    presets: &'a PresetCatalog,
    setters: &'a SetterRegistry,
    factory: &'a ComponentFactory,
}

impl Default for Loader<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader<'static> {
    /// Creates a loader that detects the format and uses the shared tables.
    pub fn new() -> Self {
        static NO_MOTORS: NoMotors = NoMotors;
        Self {
            format: None,
            motor_finder: &NO_MOTORS,
            materials: MaterialCatalog::shared(),
            presets: PresetCatalog::shared(),
            setters: SetterRegistry::shared(),
            factory: ComponentFactory::shared(),
        }
    }
}

impl<'a> Loader<'a> {
    /// Reads every input as the given dialect instead of detecting it.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Resolves motors through `finder`.
    pub fn with_motor_finder(mut self, finder: &'a dyn MotorFinder) -> Self {
        self.motor_finder = finder;
        self
    }

    /// Looks materials up in `materials`.
    pub fn with_materials(mut self, materials: &'a MaterialCatalog) -> Self {
        self.materials = materials;
        self
    }

    /// Looks component presets up in `presets`.
    pub fn with_presets(mut self, presets: &'a PresetCatalog) -> Self {
        self.presets = presets;
        self
    }

    /// Applies native parameters through `setters`.
    pub fn with_setters(mut self, setters: &'a SetterRegistry) -> Self {
        self.setters = setters;
        self
    }

    /// Creates native components through `factory`.
    pub fn with_factory(mut self, factory: &'a ComponentFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Imports a document from a reader, which is dropped on return.
    pub fn load<R: BufRead>(&self, mut source: R) -> Result<LoadedDocument> {
        let format = match self.format {
            Some(format) => format,
            None => Format::detect(&mut source)?.ok_or(Error::UnknownFormat)?,
        };
        self.load_as(source, format)
    }

    /// Imports a document file.
    ///
    /// When the content does not reveal the dialect the file extension
    /// decides.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<LoadedDocument> {
        let path = path.as_ref();
        let mut source = BufReader::new(File::open(path)?);
        let format = match self.format {
            Some(format) => format,
            None => Format::detect(&mut source)?
                .or_else(|| Format::from_extension(path))
                .ok_or(Error::UnknownFormat)?,
        };
        log::debug!("{}: {} document", path.display(), format);
        self.load_as(source, format)
    }

    fn load_as<R: BufRead>(&self, source: R, format: Format) -> Result<LoadedDocument> {
        log::info!("importing {} document", format);
        let mut ctx = LoadingContext::new()
            .with_motor_finder(self.motor_finder)
            .with_materials(self.materials)
            .with_presets(self.presets)
            .with_setters(self.setters)
            .with_factory(self.factory);
        let mut warnings = WarningSet::new();
        match format {
            Format::Native => read_native(source, &mut ctx, &mut warnings)?,
            Format::RockSim => read_rocksim(source, &mut ctx, &mut warnings)?,
        }
        log::info!("import finished with {} warning(s)", warnings.len());
        Ok(LoadedDocument {
            document: ctx.into_document(),
            warnings,
        })
    }
}

/// Imports a document from a reader with the default configuration.
pub fn load<R: BufRead>(source: R) -> Result<LoadedDocument> {
    Loader::new().load(source)
}

/// Imports a document file with the default configuration.
pub fn load_file(path: impl AsRef<Path>) -> Result<LoadedDocument> {
    Loader::new().load_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MotorDatabase;
    use crate::objects::{ComponentType, Motor, MotorType};
    use std::io::{Cursor, Write};

    const NATIVE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<openrocket version="1.5" creator="test">
  <rocket><subcomponents><stage><subcomponents>
    <bodytube><length>0.5</length>
      <motormount><motor configid="c1"><type>single</type><manufacturer>Estes</manufacturer>
        <designation>C6</designation><delay>5</delay></motor></motormount>
    </bodytube>
  </subcomponents></stage></subcomponents></rocket>
</openrocket>"#;

    const ROCKSIM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!-- exported -->
<RockSimDocument><FileVersion>4</FileVersion><DesignInformation><RocketDesign>
  <Stage3Parts><BodyTube><Len>500</Len></BodyTube></Stage3Parts>
</RocketDesign></DesignInformation></RockSimDocument>"#;

    #[test]
    fn test_detect_does_not_consume() {
        let mut source = Cursor::new(ROCKSIM.as_bytes());
        assert_eq!(Format::detect(&mut source).unwrap(), Some(Format::RockSim));
        assert_eq!(Format::detect(&mut source).unwrap(), Some(Format::RockSim));
        assert_eq!(
            Format::detect(&mut Cursor::new(NATIVE.as_bytes())).unwrap(),
            Some(Format::Native)
        );
        assert_eq!(Format::detect(&mut Cursor::new(&b"<rocketry/>"[..])).unwrap(), None);
    }

    #[test]
    fn test_both_dialects_load() {
        let native = load(Cursor::new(NATIVE)).unwrap();
        let rocksim = load(Cursor::new(ROCKSIM)).unwrap();
        assert!(rocksim.warnings.is_empty(), "{:?}", rocksim.warnings);
        for loaded in [&native, &rocksim] {
            let tubes = loaded.document.rocket.find_all(ComponentType::BodyTube);
            assert_eq!(tubes.len(), 1);
            assert!((tubes[0].length().unwrap() - 0.5).abs() < 1e-12);
        }
        // no motors known by default
        assert_eq!(native.warnings.len(), 1);
    }

    #[test]
    fn test_unknown_format() {
        assert!(matches!(load(Cursor::new("<rocketry/>")), Err(Error::UnknownFormat)));
        let forced = Loader::new().with_format(Format::RockSim).load(Cursor::new(NATIVE));
        assert!(matches!(forced, Err(Error::NoDesign)));
    }

    #[test]
    fn test_motor_finder_is_used() {
        let motors: MotorDatabase = [Motor::new(
            "Estes",
            "C6",
            MotorType::Single,
            0.018,
            0.070,
        )]
        .into_iter()
        .collect();
        let loader = Loader::new().with_motor_finder(&motors);
        let loaded = loader.load(Cursor::new(NATIVE)).unwrap();
        assert!(loaded.warnings.is_empty(), "{:?}", loaded.warnings);
        let tube = loaded.document.rocket.find_all(ComponentType::BodyTube)[0];
        let mounted = tube.motor_mount().and_then(|m| m.motor("c1")).unwrap();
        assert_eq!(mounted.motor.as_ref().map(|m| m.designation.as_str()), Some("C6"));
    }

    #[test]
    fn test_concurrent_imports() {
        let loader = Loader::new();
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let xml = if i % 2 == 0 { NATIVE } else { ROCKSIM };
                    scope.spawn(move || loader.load(Cursor::new(xml)).map(|l| l.document.stage_count()))
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap().unwrap(), 1);
            }
        });
    }

    #[test]
    fn test_load_file_uses_extension_hint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("design.rkt");
        let mut file = File::create(&path).unwrap();
        file.write_all(ROCKSIM.as_bytes()).unwrap();
        drop(file);
        let loaded = load_file(&path).unwrap();
        assert_eq!(loaded.document.stage_count(), 1);

        assert_eq!(Format::from_extension(Path::new("a.ORK")), Some(Format::Native));
        assert_eq!(Format::from_extension(Path::new("a.rkt")), Some(Format::RockSim));
        assert_eq!(Format::from_extension(Path::new("a.xml")), None);

        let empty = dir.path().join("empty.ork");
        File::create(&empty).unwrap();
        assert!(load_file(&empty).is_err());
        assert!(matches!(load_file(dir.path().join("missing.ork")), Err(Error::Io(_))));
    }
}
