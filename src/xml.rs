//! Generic XML tree parsing.
//!
//! Converts well-formed XML text into a format-agnostic key-value tree:
//! each element becomes a map from child tag name to either a single value
//! or, when a tag repeats, an ordered list of values. Attributes live under
//! `@`-prefixed keys so they can never collide with child elements, and the
//! text content of an element that also carries attributes or children is
//! stored under the reserved [`TEXT_KEY`]. An element with neither becomes
//! a plain text scalar.
//!
//! Every leaf in the tree is a string. There is no numeric or boolean
//! auto-parsing, so values like zero-padded identifiers pass through
//! untouched.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use thiserror::Error;

/// Reserved key for the text content of an element that also has
/// attributes or child elements.
pub const TEXT_KEY: &str = "#text";

/// Prefix under which element attributes are stored.
pub const ATTR_PREFIX: &str = "@";

/// Errors produced while building the generic tree.
#[derive(Debug, Error)]
pub enum XmlError {
    /// XML is not well formed: unmatched tags, invalid entities,
    /// malformed attributes.
    #[error("XML parse error: {0}")]
    Malformed(String),

    /// Element nesting exceeds [`ParseConfig::max_depth`].
    /// Guards against stack-shaped resource abuse from hostile documents.
    #[error("element nesting depth exceeds maximum of {0} levels")]
    MaxDepthExceeded(usize),

    /// The document contained no root element at all.
    #[error("document has no root element")]
    NoRoot,
}

/// Immutable parser configuration, passed explicitly to [`parse_document`].
///
/// There is no process-wide parser state; callers that want non-default
/// behavior construct their own value and pass it per call.
#[derive(Debug, Clone)]
pub struct ParseConfig {
    /// Trim leading/trailing whitespace from text content and attribute
    /// values.
    pub trim_text: bool,
    /// Maximum element nesting depth before parsing fails.
    pub max_depth: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            trim_text: true,
            max_depth: 64,
        }
    }
}

/// One node of the generic XML tree.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlValue {
    /// Text content of a leaf element (or an attribute value).
    Text(String),
    /// An element with attributes and/or child elements. Attribute keys
    /// carry the [`ATTR_PREFIX`]; mixed text content sits under [`TEXT_KEY`].
    Element(HashMap<String, XmlValue>),
    /// Values of a tag that appeared more than once under the same parent,
    /// in document order.
    List(Vec<XmlValue>),
}

impl XmlValue {
    /// Looks up a child element (or attribute key) by name.
    ///
    /// Returns `None` for text and list nodes — a list has no named
    /// children of its own.
    pub fn get(&self, key: &str) -> Option<&XmlValue> {
        match self {
            XmlValue::Element(fields) => fields.get(key),
            _ => None,
        }
    }

    /// Looks up an attribute value by its unprefixed name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            XmlValue::Element(fields) => fields
                .get(&format!("{ATTR_PREFIX}{name}"))
                .and_then(XmlValue::as_text),
            _ => None,
        }
    }

    /// Returns the string content if this node is a text scalar.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            XmlValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// An element being assembled while its subtree is still open.
struct Frame {
    tag: String,
    fields: HashMap<String, XmlValue>,
    text: String,
}

/// Parses XML text into a generic tree.
///
/// The returned value is an [`XmlValue::Element`] mapping the root tag name
/// to its subtree.
///
/// # Errors
///
/// Returns [`XmlError::Malformed`] for unmatched or unclosed tags, invalid
/// attributes, and unrecognized entities; [`XmlError::MaxDepthExceeded`]
/// when nesting passes `config.max_depth`; [`XmlError::NoRoot`] for a
/// document with no elements.
pub fn parse_document(xml: &str, config: &ParseConfig) -> Result<XmlValue, XmlError> {
    // XXE protection — quick-xml (0.37) never parses <!ENTITY> declarations
    // from DOCTYPE; only the 5 XML builtins resolve, anything else is an
    // unescape error surfaced as Malformed below.
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(config.trim_text);

    let mut root: HashMap<String, XmlValue> = HashMap::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if stack.len() >= config.max_depth {
                    return Err(XmlError::MaxDepthExceeded(config.max_depth));
                }
                stack.push(open_frame(&e, &reader, config)?);
            }
            Ok(Event::Empty(e)) => {
                let frame = open_frame(&e, &reader, config)?;
                let (tag, value) = seal(frame, config.trim_text);
                attach(&mut stack, &mut root, tag, value);
            }
            Ok(Event::Text(t)) => {
                let text = t
                    .unescape()
                    .map_err(|e| XmlError::Malformed(e.to_string()))?;
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&text);
                }
            }
            Ok(Event::CData(t)) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(t.as_ref()));
                }
            }
            Ok(Event::End(_)) => {
                // quick-xml rejects mismatched end tags before we get here,
                // so the stack top is always the element being closed.
                if let Some(frame) = stack.pop() {
                    let (tag, value) = seal(frame, config.trim_text);
                    attach(&mut stack, &mut root, tag, value);
                }
            }
            Ok(Event::Eof) => break,
            // Declarations, comments, processing instructions, doctype
            Ok(_) => {}
            Err(e) => return Err(XmlError::Malformed(e.to_string())),
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::Malformed(format!(
            "unclosed element <{}>",
            open.tag
        )));
    }
    if root.is_empty() {
        return Err(XmlError::NoRoot);
    }
    Ok(XmlValue::Element(root))
}

/// Starts a frame for an opening (or self-closing) tag, decoding its
/// attributes into `@`-prefixed fields.
fn open_frame(
    e: &BytesStart<'_>,
    reader: &Reader<&[u8]>,
    config: &ParseConfig,
) -> Result<Frame, XmlError> {
    let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut fields = HashMap::new();
    let decoder = reader.decoder();

    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|err| XmlError::Malformed(err.to_string()))?;
        let value = attr
            .decode_and_unescape_value(decoder)
            .map_err(|err| XmlError::Malformed(err.to_string()))?;
        let value = if config.trim_text {
            value.trim().to_string()
        } else {
            value.into_owned()
        };
        let key = format!(
            "{ATTR_PREFIX}{}",
            String::from_utf8_lossy(attr.key.as_ref())
        );
        fields.insert(key, XmlValue::Text(value));
    }

    Ok(Frame {
        tag,
        fields,
        text: String::new(),
    })
}

/// Finishes a frame into its final tree value.
///
/// An element with no attributes and no children collapses to a text
/// scalar; otherwise the accumulated text (if any) goes under [`TEXT_KEY`].
fn seal(frame: Frame, trim: bool) -> (String, XmlValue) {
    let Frame {
        tag,
        mut fields,
        text,
    } = frame;
    let text = if trim { text.trim().to_string() } else { text };

    let value = if fields.is_empty() {
        XmlValue::Text(text)
    } else {
        if !text.is_empty() {
            fields.insert(TEXT_KEY.to_string(), XmlValue::Text(text));
        }
        XmlValue::Element(fields)
    };
    (tag, value)
}

/// Inserts a sealed child into its parent frame, or into the document root
/// when no parent is open.
fn attach(
    stack: &mut [Frame],
    root: &mut HashMap<String, XmlValue>,
    tag: String,
    value: XmlValue,
) {
    let fields = match stack.last_mut() {
        Some(parent) => &mut parent.fields,
        None => root,
    };
    insert_child(fields, tag, value);
}

/// Inserts a child value, promoting repeated tags to an ordered list.
fn insert_child(fields: &mut HashMap<String, XmlValue>, name: String, value: XmlValue) {
    match fields.entry(name) {
        Entry::Vacant(slot) => {
            slot.insert(value);
        }
        Entry::Occupied(mut slot) => {
            let existing = slot.get_mut();
            if let XmlValue::List(items) = existing {
                items.push(value);
            } else {
                let first = std::mem::replace(existing, XmlValue::List(Vec::with_capacity(2)));
                if let XmlValue::List(items) = existing {
                    items.push(first);
                    items.push(value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> XmlValue {
        parse_document(xml, &ParseConfig::default()).unwrap()
    }

    #[test]
    fn test_leaf_element_is_text_scalar() {
        let doc = parse("<root><title>Hello</title></root>");
        let root = doc.get("root").unwrap();
        assert_eq!(root.get("title"), Some(&XmlValue::Text("Hello".into())));
    }

    #[test]
    fn test_repeated_tag_becomes_list() {
        let doc = parse("<root><item>a</item><item>b</item><item>c</item></root>");
        let items = doc.get("root").unwrap().get("item").unwrap();
        assert_eq!(
            items,
            &XmlValue::List(vec![
                XmlValue::Text("a".into()),
                XmlValue::Text("b".into()),
                XmlValue::Text("c".into()),
            ])
        );
    }

    #[test]
    fn test_single_tag_stays_scalar() {
        // A tag that appears once must NOT be wrapped in a list
        let doc = parse("<root><item>only</item></root>");
        let item = doc.get("root").unwrap().get("item").unwrap();
        assert_eq!(item, &XmlValue::Text("only".into()));
    }

    #[test]
    fn test_attributes_are_prefixed() {
        let doc = parse(r#"<root><link href="https://example.com" rel="alternate"/></root>"#);
        let link = doc.get("root").unwrap().get("link").unwrap();
        assert_eq!(link.attr("href"), Some("https://example.com"));
        assert_eq!(link.attr("rel"), Some("alternate"));
        // No child element leaked in
        assert_eq!(link.get("href"), None);
    }

    #[test]
    fn test_text_with_attributes_uses_reserved_key() {
        let doc = parse(r#"<root><guid isPermaLink="false">abc-123</guid></root>"#);
        let guid = doc.get("root").unwrap().get("guid").unwrap();
        assert_eq!(guid.attr("isPermaLink"), Some("false"));
        assert_eq!(guid.get(TEXT_KEY), Some(&XmlValue::Text("abc-123".into())));
    }

    #[test]
    fn test_cdata_is_text() {
        let doc =
            parse("<root><description><![CDATA[<p>Raw & unescaped</p>]]></description></root>");
        let desc = doc.get("root").unwrap().get("description").unwrap();
        assert_eq!(desc.as_text(), Some("<p>Raw & unescaped</p>"));
    }

    #[test]
    fn test_predefined_entities_unescaped() {
        let doc = parse("<root><t>a &amp; b &lt;ok&gt;</t></root>");
        let t = doc.get("root").unwrap().get("t").unwrap();
        assert_eq!(t.as_text(), Some("a & b <ok>"));
    }

    #[test]
    fn test_unknown_entity_is_malformed() {
        let err = parse_document("<root>&xxe;</root>", &ParseConfig::default()).unwrap_err();
        assert!(matches!(err, XmlError::Malformed(_)));
    }

    #[test]
    fn test_unclosed_tag_is_malformed() {
        let err = parse_document("<root><item>oops</root>", &ParseConfig::default()).unwrap_err();
        assert!(matches!(err, XmlError::Malformed(_)));
    }

    #[test]
    fn test_truncated_document_is_malformed() {
        let err = parse_document("<not valid xml", &ParseConfig::default()).unwrap_err();
        assert!(matches!(err, XmlError::Malformed(_)));
    }

    #[test]
    fn test_empty_document_has_no_root() {
        let err = parse_document("", &ParseConfig::default()).unwrap_err();
        assert!(matches!(err, XmlError::NoRoot));
    }

    #[test]
    fn test_depth_limit_enforced() {
        let config = ParseConfig {
            max_depth: 4,
            ..ParseConfig::default()
        };
        let deep = "<a><b><c><d><e>x</e></d></c></b></a>";
        let err = parse_document(deep, &config).unwrap_err();
        assert!(matches!(err, XmlError::MaxDepthExceeded(4)));

        // Same document parses with a roomier limit
        assert!(parse_document(deep, &ParseConfig::default()).is_ok());
    }

    #[test]
    fn test_trim_text_config() {
        let xml = "<root><t>  padded  </t></root>";
        let trimmed = parse_document(xml, &ParseConfig::default()).unwrap();
        assert_eq!(
            trimmed.get("root").unwrap().get("t").unwrap().as_text(),
            Some("padded")
        );
    }

    #[test]
    fn test_empty_element_is_empty_text() {
        let doc = parse("<root><t></t><u/></root>");
        let root = doc.get("root").unwrap();
        assert_eq!(root.get("t"), Some(&XmlValue::Text(String::new())));
        assert_eq!(root.get("u"), Some(&XmlValue::Text(String::new())));
    }

    #[test]
    fn test_numeric_looking_text_stays_verbatim() {
        // Zero-padded identifiers must not be corrupted by numeric parsing
        let doc = parse("<root><guid>007</guid><title>2024</title></root>");
        let root = doc.get("root").unwrap();
        assert_eq!(root.get("guid").unwrap().as_text(), Some("007"));
        assert_eq!(root.get("title").unwrap().as_text(), Some("2024"));
    }

    #[test]
    fn test_namespaced_tags_keep_qualified_name() {
        let doc = parse("<root><dc:creator>Jane</dc:creator></root>");
        let root = doc.get("root").unwrap();
        assert_eq!(root.get("dc:creator").unwrap().as_text(), Some("Jane"));
    }
}
