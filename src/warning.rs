//! Recoverable problems found while importing a document.
//!
//! A [`WarningSet`] is created for each import and handed by mutable
//! reference to every handler and setter. It only ever grows.

use std::fmt;

/// A single recoverable problem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Warning {
    /// A value could not be interpreted and was ignored.
    InvalidParameter,
    /// An element is not a known parameter of the component it appeared in.
    UnknownParameter {
        /// Element name
        element: String,
        /// Human readable component type
        component: String,
    },
    /// An element is recognized for the component family but forbidden for this kind.
    ParameterNotAllowed {
        /// Element name
        element: String,
        /// Human readable component type
        component: String,
    },
    /// An element is not known at this position of the document.
    UnknownElement(String),
    /// A component cannot be attached to its parent.
    IncompatibleComponent {
        /// Human readable child component type
        child: String,
        /// Human readable parent component type
        parent: String,
    },
    /// An advisory note; nothing was dropped.
    Notice(String),
    /// Free-text description of data that was dropped.
    Message(String),
}

impl Warning {
    /// Creates a free-text warning describing dropped data.
    pub fn from_string(message: impl Into<String>) -> Self {
        Warning::Message(message.into())
    }

    /// Creates an advisory warning.
    pub fn notice(message: impl Into<String>) -> Self {
        Warning::Notice(message.into())
    }

    /// Returns true when the warning reflects data that did not make it into
    /// the imported design.
    pub fn is_data_loss(&self) -> bool {
        !matches!(self, Warning::Notice(_))
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::InvalidParameter => write!(f, "Invalid parameter encountered, ignoring."),
            Warning::UnknownParameter { element, component } => write!(
                f,
                "Unknown parameter type '{}' for {}, ignoring.",
                element, component
            ),
            Warning::ParameterNotAllowed { element, component } => write!(
                f,
                "Parameter '{}' is not valid for {}, ignoring.",
                element, component
            ),
            Warning::UnknownElement(element) => write!(f, "Unknown element {}, ignoring.", element),
            Warning::IncompatibleComponent { child, parent } => write!(
                f,
                "{} can not be attached to {}, ignoring component.",
                child, parent
            ),
            Warning::Notice(message) | Warning::Message(message) => f.write_str(message),
        }
    }
}

impl From<String> for Warning {
    fn from(message: String) -> Self {
        Warning::Message(message)
    }
}

impl From<&str> for Warning {
    fn from(message: &str) -> Self {
        Warning::Message(message.to_string())
    }
}

/// Ordered, append-only collection of warnings for one import.
///
/// Adding a warning that is already present leaves the set unchanged, so a
/// problem repeated throughout a document is reported once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WarningSet {
    warnings: Vec<Warning>,
}

impl WarningSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning.
    pub fn add(&mut self, warning: impl Into<Warning>) {
        let warning = warning.into();
        if self.warnings.contains(&warning) {
            return;
        }
        log::debug!("import warning: {}", warning);
        self.warnings.push(warning);
    }

    /// Number of distinct warnings.
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Iterates the warnings in the order they were first recorded.
    pub fn iter(&self) -> std::slice::Iter<'_, Warning> {
        self.warnings.iter()
    }

    /// Returns true if any recorded warning reflects dropped data.
    pub fn has_data_loss(&self) -> bool {
        self.warnings.iter().any(Warning::is_data_loss)
    }
}

impl<'a> IntoIterator for &'a WarningSet {
    type Item = &'a Warning;
    type IntoIter = std::slice::Iter<'a, Warning>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
