//! Streaming handler-dispatch engine.
//!
//! The engine reads XML tokens with `quick-xml` and hands every element to
//! an [`ElementHandler`]. Handlers decide, element by element, whether a
//! child element starts a new subtree with its own handler, is plain text
//! content of the current handler, or is skipped entirely.
//!
//! For every element the engine guarantees:
//!
//! 1. The owning handler's [`close_element`](ElementHandler::close_element)
//!    runs once per direct child element, in document order.
//! 2. A delegated handler's [`end_handler`](ElementHandler::end_handler) runs
//!    exactly once, after everything inside its element has closed. Its
//!    product is passed to the owner's `close_element` for that element.
//! 3. A skipped subtree is never shown to any handler.
//!
//! Only malformed markup is an error. Handlers report everything else to the
//! [`WarningSet`].
//!
//! # Example
//!
//! ```rust
//! use rocketdoc_rs::reader::{read_xml, Attributes, ElementHandler, Opened};
//! use rocketdoc_rs::{LoadingContext, WarningSet};
//! use std::io::Cursor;
//!
//! struct Names(Vec<String>);
//!
//! impl ElementHandler<()> for Names {
//!     fn open_element(
//!         &mut self,
//!         _element: &str,
//!         _attributes: &Attributes,
//!         _ctx: &mut LoadingContext<'_>,
//!         _warnings: &mut WarningSet,
//!     ) -> Opened<()> {
//!         Opened::This
//!     }
//!
//!     fn close_element(
//!         &mut self,
//!         element: &str,
//!         _attributes: &Attributes,
//!         content: &str,
//!         _child: Option<()>,
//!         _ctx: &mut LoadingContext<'_>,
//!         _warnings: &mut WarningSet,
//!     ) {
//!         if element == "name" {
//!             self.0.push(content.to_string());
//!         }
//!     }
//! }
//!
//! let mut names = Names(Vec::new());
//! let mut ctx = LoadingContext::new();
//! let mut warnings = WarningSet::new();
//! read_xml(
//!     Cursor::new("<list><name>a</name><name>b</name></list>"),
//!     &mut names,
//!     &mut ctx,
//!     &mut warnings,
//! )
//! .unwrap();
//! assert_eq!(names.0, vec!["a", "b"]);
//! ```

use crate::context::LoadingContext;
use crate::error::{Error, Result};
use crate::warning::WarningSet;
use quick_xml::events::BytesStart;
use quick_xml::events::Event as XmlEvent;
use quick_xml::Reader;
use std::io::BufRead;
use std::str;

// ============================================================================
// Attributes
// ============================================================================

/// Attributes of an element, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    /// Creates an empty attribute list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of an attribute.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns true if the attribute is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the element had no attributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the attributes as name/value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// ============================================================================
// Handler contract
// ============================================================================

/// What a handler wants done with a child element.
pub enum Opened<O> {
    /// A new handler owns the child element and everything inside it.
    Delegate(Box<dyn ElementHandler<O>>),
    /// The child element is text content of the current handler.
    This,
    /// The child element and everything inside it are ignored.
    Skip,
}

/// A handler for one XML subtree.
///
/// `O` is the product a handler hands to its owner when its subtree ends.
pub trait ElementHandler<O> {
    /// Called for each child element when it opens.
    fn open_element(
        &mut self,
        element: &str,
        attributes: &Attributes,
        ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) -> Opened<O>;

    /// Called for each child element when it closes, with its trimmed text
    /// and, for delegated children, the product of the child handler.
    fn close_element(
        &mut self,
        element: &str,
        attributes: &Attributes,
        content: &str,
        child: Option<O>,
        ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) {
        let _ = (element, attributes, content, child, ctx, warnings);
    }

    /// Called once when the element this handler was delegated for closes.
    fn end_handler(
        self: Box<Self>,
        element: &str,
        attributes: &Attributes,
        content: &str,
        ctx: &mut LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) -> Option<O> {
        let _ = (element, attributes, content, ctx, warnings);
        None
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Who owns an open element.
enum FrameKind<O> {
    Handler(Box<dyn ElementHandler<O>>),
    This,
    Skip,
}

/// One open element.
struct Frame<O> {
    element: String,
    attributes: Attributes,
    text: String,
    kind: FrameKind<O>,
}

/// Intermediate parsed event data (owned, to avoid borrow conflicts).
enum ParsedEvent {
    Start { name: String, attrs: Attributes },
    End { name: String },
    Empty { name: String, attrs: Attributes },
    Text { text: String },
    Eof,
}

/// The innermost handler that owns elements at the top of the stack.
fn owner<'s, O>(
    stack: &'s mut [Frame<O>],
    root: &'s mut (dyn ElementHandler<O> + 'static),
) -> &'s mut (dyn ElementHandler<O> + 'static) {
    for frame in stack.iter_mut().rev() {
        if let FrameKind::Handler(handler) = &mut frame.kind {
            return handler.as_mut();
        }
    }
    root
}

/// Drives a document through a root handler.
///
/// The root handler sees the document element as its only child. The source
/// is consumed and dropped on every return path.
pub fn read_xml<R, O, H>(
    source: R,
    root: &mut H,
    ctx: &mut LoadingContext<'_>,
    warnings: &mut WarningSet,
) -> Result<()>
where
    R: BufRead,
    O: 'static,
    H: ElementHandler<O> + 'static,
{
    let root: &mut (dyn ElementHandler<O> + 'static) = root;
    let mut reader = Reader::from_reader(source);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::with_capacity(4096);
    let mut stack: Vec<Frame<O>> = Vec::new();

    loop {
        buf.clear();

        let event = {
            match reader.read_event_into(&mut buf)? {
                XmlEvent::Start(ref e) => {
                    let name = element_name(e)?;
                    let attrs = extract_attrs(e)?;
                    ParsedEvent::Start { name, attrs }
                }
                XmlEvent::End(ref e) => {
                    let local_name = e.local_name();
                    let name = str::from_utf8(local_name.as_ref())?.to_string();
                    ParsedEvent::End { name }
                }
                XmlEvent::Empty(ref e) => {
                    let name = element_name(e)?;
                    let attrs = extract_attrs(e)?;
                    ParsedEvent::Empty { name, attrs }
                }
                XmlEvent::Text(ref e) => ParsedEvent::Text {
                    text: e.unescape()?.to_string(),
                },
                XmlEvent::CData(ref e) => ParsedEvent::Text {
                    text: str::from_utf8(e.as_ref())?.to_string(),
                },
                XmlEvent::Eof => ParsedEvent::Eof,
                _ => continue,
            }
        };

        match event {
            ParsedEvent::Start { name, attrs } => {
                open(&mut stack, root, name, attrs, ctx, warnings);
            }
            ParsedEvent::Empty { name, attrs } => {
                open(&mut stack, root, name, attrs, ctx, warnings);
                close(&mut stack, root, ctx, warnings)?;
            }
            ParsedEvent::End { name } => {
                if stack.last().map(|f| f.element.as_str()) != Some(name.as_str()) {
                    return Err(Error::Malformed(format!("unexpected closing tag </{}>", name)));
                }
                close(&mut stack, root, ctx, warnings)?;
            }
            ParsedEvent::Text { text } => {
                if let Some(frame) = stack.last_mut() {
                    if !matches!(frame.kind, FrameKind::Skip) {
                        frame.text.push_str(&text);
                    }
                }
            }
            ParsedEvent::Eof => {
                return match stack.last() {
                    Some(frame) => Err(Error::Malformed(format!(
                        "unexpected end of input inside <{}>",
                        frame.element
                    ))),
                    None => Ok(()),
                };
            }
        }
    }
}

fn open<O: 'static>(
    stack: &mut Vec<Frame<O>>,
    root: &mut (dyn ElementHandler<O> + 'static),
    element: String,
    attributes: Attributes,
    ctx: &mut LoadingContext<'_>,
    warnings: &mut WarningSet,
) {
    let skipping = stack
        .last()
        .is_some_and(|f| matches!(f.kind, FrameKind::Skip));

    let kind = if skipping {
        FrameKind::Skip
    } else {
        match owner(stack, root).open_element(&element, &attributes, ctx, warnings) {
            Opened::Delegate(handler) => FrameKind::Handler(handler),
            Opened::This => FrameKind::This,
            Opened::Skip => {
                log::debug!("skipping subtree <{}>", element);
                FrameKind::Skip
            }
        }
    };

    stack.push(Frame {
        element,
        attributes,
        text: String::new(),
        kind,
    });
}

fn close<O: 'static>(
    stack: &mut Vec<Frame<O>>,
    root: &mut (dyn ElementHandler<O> + 'static),
    ctx: &mut LoadingContext<'_>,
    warnings: &mut WarningSet,
) -> Result<()> {
    let frame = stack
        .pop()
        .ok_or_else(|| Error::Malformed("closing tag without an open element".to_string()))?;
    let content = frame.text.trim();

    let product = match frame.kind {
        FrameKind::Skip => return Ok(()),
        FrameKind::This => None,
        FrameKind::Handler(handler) => {
            handler.end_handler(&frame.element, &frame.attributes, content, ctx, warnings)
        }
    };

    owner(stack, root).close_element(
        &frame.element,
        &frame.attributes,
        content,
        product,
        ctx,
        warnings,
    );
    Ok(())
}

fn element_name(e: &BytesStart<'_>) -> Result<String> {
    let local_name = e.local_name();
    Ok(str::from_utf8(local_name.as_ref())?.to_string())
}

/// Extracts attributes from a BytesStart element as owned data.
fn extract_attrs(e: &BytesStart<'_>) -> Result<Attributes> {
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = str::from_utf8(attr.key.local_name().as_ref())?.to_string();
        let value = attr.unescape_value()?.to_string();
        attrs.push((key, value));
    }
    Ok(Attributes(attrs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Records every callback as a line of text.
    struct Recorder {
        name: String,
        log: std::rc::Rc<std::cell::RefCell<Vec<String>>>,
    }

    impl Recorder {
        fn new(name: &str, log: &std::rc::Rc<std::cell::RefCell<Vec<String>>>) -> Self {
            Self {
                name: name.to_string(),
                log: log.clone(),
            }
        }
    }

    impl ElementHandler<String> for Recorder {
        fn open_element(
            &mut self,
            element: &str,
            _attributes: &Attributes,
            _ctx: &mut LoadingContext<'_>,
            _warnings: &mut WarningSet,
        ) -> Opened<String> {
            self.log
                .borrow_mut()
                .push(format!("{} open {}", self.name, element));
            match element {
                "node" | "doc" => Opened::Delegate(Box::new(Recorder::new(element, &self.log))),
                "skip" => Opened::Skip,
                _ => Opened::This,
            }
        }

        fn close_element(
            &mut self,
            element: &str,
            _attributes: &Attributes,
            content: &str,
            child: Option<String>,
            _ctx: &mut LoadingContext<'_>,
            _warnings: &mut WarningSet,
        ) {
            self.log.borrow_mut().push(format!(
                "{} close {} '{}' {:?}",
                self.name, element, content, child
            ));
        }

        fn end_handler(
            self: Box<Self>,
            element: &str,
            attributes: &Attributes,
            _content: &str,
            _ctx: &mut LoadingContext<'_>,
            _warnings: &mut WarningSet,
        ) -> Option<String> {
            self.log
                .borrow_mut()
                .push(format!("{} end {}", self.name, element));
            attributes.get("id").map(str::to_string)
        }
    }

    fn run(xml: &str) -> (Result<()>, Vec<String>) {
        let log = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut root = Recorder::new("root", &log);
        let mut ctx = LoadingContext::new();
        let mut warnings = WarningSet::new();
        let result = read_xml(Cursor::new(xml.to_string()), &mut root, &mut ctx, &mut warnings);
        let lines = log.borrow().clone();
        (result, lines)
    }

    #[test]
    fn test_dispatch_order() {
        let (result, log) = run(
            r#"<doc><a>1</a><node id="n1"><b> two </b><skip><a>x</a></skip></node><c/></doc>"#,
        );
        result.unwrap();
        assert_eq!(
            log,
            vec![
                "root open doc",
                "doc open a",
                "doc close a '1' None",
                "doc open node",
                "node open b",
                "node close b 'two' None",
                "node open skip",
                "node end node",
                "doc close node '' Some(\"n1\")",
                "doc open c",
                "doc close c '' None",
                "doc end doc",
                "root close doc '' None",
            ]
        );
    }

    #[test]
    fn test_skipped_subtree_is_silent() {
        let (result, log) = run("<doc><skip><node id='x'><a>1</a></node></skip></doc>");
        result.unwrap();
        assert!(!log.iter().any(|l| l.contains("open a") || l.contains("end node")));
    }

    #[test]
    fn test_unclosed_element_is_fatal() {
        let (result, _) = run("<doc><node><a>1</a>");
        assert!(result.is_err());
    }

    #[test]
    fn test_mismatched_tags_are_fatal() {
        let (result, _) = run("<doc><a>1</b></doc>");
        assert!(result.is_err());
    }

    #[test]
    fn test_entities_are_unescaped() {
        let (result, log) = run("<doc><a>x &amp; y</a></doc>");
        result.unwrap();
        assert!(log.contains(&"doc close a 'x & y' None".to_string()));
    }

    #[test]
    fn test_attributes() {
        let attrs: Attributes = vec![("type", "absolute"), ("method", "top")]
            .into_iter()
            .collect();
        assert_eq!(attrs.get("method"), Some("top"));
        assert_eq!(attrs.get("missing"), None);
        assert_eq!(attrs.len(), 2);
    }
}
