//! Generic XML → `serde_json::Value` tree used to read FedEx replies.
//!
//! ## Shape rules
//!
//! - Element local names become object keys; namespace prefixes
//!   (`v3:`, `soapenv:`) are dropped. Attributes are ignored.
//! - An element with child elements becomes an object. Any text mixed in
//!   alongside child elements is discarded.
//! - A leaf element becomes a string (empty string for `<Foo/>`).
//! - Repeated sibling elements collapse into an array, so a single
//!   `<Notifications>` is an object but two are an array of objects.
//!   Callers go through [`as_sequence`] rather than branching on shape.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::map::Entry;
use serde_json::{Map, Value};

use crate::error::LocatorError;

/// One open element while the reader walks the document.
struct Frame {
    name: String,
    children: Map<String, Value>,
    text: String,
}

impl Frame {
    fn new(name: String) -> Self {
        Self {
            name,
            children: Map::new(),
            text: String::new(),
        }
    }

    /// Adds a child, promoting the slot to an array on the second occurrence.
    fn insert(&mut self, name: String, value: Value) {
        match self.children.entry(name) {
            Entry::Occupied(mut slot) => match slot.get_mut() {
                Value::Array(items) => items.push(value),
                existing => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
            },
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
        }
    }

    fn finish(self) -> (String, Value) {
        let value = if self.children.is_empty() {
            Value::String(self.text)
        } else {
            Value::Object(self.children)
        };
        (self.name, value)
    }
}

/// Parse an XML document into a nested `Value`.
///
/// The returned value is an object whose single key is the document's root
/// element.
///
/// # Errors
///
/// Returns [`LocatorError::Xml`] if the reader rejects the document, or
/// [`LocatorError::MalformedReply`] if it ends with unclosed elements.
pub fn parse(xml: &str) -> Result<Value, LocatorError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack = vec![Frame::new(String::new())];

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                stack.push(Frame::new(name));
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if let Some(parent) = stack.last_mut() {
                    parent.insert(name, Value::String(String::new()));
                }
            }
            Event::Text(e) => {
                let text = e.unescape()?;
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&text);
                }
            }
            Event::CData(e) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::End(_) => {
                if stack.len() < 2 {
                    return Err(LocatorError::MalformedReply(
                        "closing tag without a matching opening tag".to_string(),
                    ));
                }
                if let Some(frame) = stack.pop() {
                    let (name, value) = frame.finish();
                    if let Some(parent) = stack.last_mut() {
                        parent.insert(name, value);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.len() != 1 {
        let open = stack.last().map_or("", |f| f.name.as_str());
        return Err(LocatorError::MalformedReply(format!(
            "document ended inside <{open}>"
        )));
    }

    let root = stack.pop().map(|f| f.children).unwrap_or_default();
    Ok(Value::Object(root))
}

/// Convert a carrier tag name to `snake_case`
/// (`HighestSeverity` → `highest_severity`, `URLCode` → `url_code`).
#[must_use]
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == ' ' {
            out.push('_');
            continue;
        }
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
        }
        out.push(c.to_ascii_lowercase());
    }

    out
}

/// Deep copy of `value` with every object key converted by [`to_snake_case`].
#[must_use]
pub fn snake_case_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (to_snake_case(k), snake_case_keys(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(snake_case_keys).collect()),
        other => other.clone(),
    }
}

/// Depth-first search for the first object entry named `key`.
///
/// Lets callers ignore SOAP `Envelope`/`Body` wrapping.
#[must_use]
pub fn find_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map
            .get(key)
            .or_else(|| map.values().find_map(|v| find_key(v, key))),
        Value::Array(items) => items.iter().find_map(|v| find_key(v, key)),
        _ => None,
    }
}

/// Coerce a repeated-element slot to a sequence.
///
/// Absent, `null`, or empty-leaf slots yield nothing; a single object yields
/// one element; an array is returned element by element.
#[must_use]
pub fn as_sequence(value: Option<&Value>) -> Vec<&Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(s)) if s.is_empty() => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(other) => vec![other],
    }
}
