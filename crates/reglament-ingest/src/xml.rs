//! Streaming helpers on top of `quick_xml::Reader`.
//!
//! Elements are matched on their local name only, so namespace prefixes such
//! as `tns:criterion` are ignored.

use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesRef, BytesStart, Event};

use crate::error::XmlError;

/// Create a reader that keeps text exactly as written.
pub fn text_reader<R: BufRead>(input: R) -> Reader<R> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(false);
    reader
}

/// Read the next event, attaching the byte position to syntax errors.
pub fn next_event<'b, R: BufRead>(
    reader: &mut Reader<R>,
    buf: &'b mut Vec<u8>,
) -> Result<Event<'b>, XmlError> {
    reader
        .read_event_into(buf)
        .map_err(|source| XmlError::Syntax {
            position: reader.error_position(),
            source,
        })
}

/// Local name of a tag as an owned string.
pub fn local_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).into_owned()
}

/// Value of the attribute with the given local name, with entities resolved.
///
/// `position` is reported when an attribute is malformed.
pub fn attribute_value(
    start: &BytesStart<'_>,
    name: &[u8],
    position: u64,
) -> Result<Option<String>, XmlError> {
    for attribute in start.attributes() {
        let attribute =
            attribute.map_err(|source| XmlError::Attribute { position, source })?;
        if attribute.key.local_name().as_ref() != name {
            continue;
        }
        let raw = String::from_utf8_lossy(&attribute.value).into_owned();
        // Values with broken escapes are kept as written.
        let value = match unescape(&raw) {
            Ok(value) => value.into_owned(),
            Err(_) => raw,
        };
        return Ok(Some(value));
    }
    Ok(None)
}

/// Append the character data carried by `event` to `out`.
///
/// Text, CDATA and entity references contribute; every other event is ignored.
pub fn push_text(event: &Event<'_>, out: &mut String) {
    match event {
        Event::Text(text) => out.push_str(&String::from_utf8_lossy(text)),
        Event::CData(data) => out.push_str(&String::from_utf8_lossy(data)),
        Event::GeneralRef(reference) => push_reference(reference, out),
        _ => {}
    }
}

fn push_reference(reference: &BytesRef<'_>, out: &mut String) {
    let name = String::from_utf8_lossy(reference);
    if let Some(code) = name.strip_prefix('#') {
        let parsed = match code.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        if let Some(ch) = parsed.and_then(char::from_u32).filter(|ch| is_xml_char(*ch)) {
            out.push(ch);
            return;
        }
    } else if let Some(value) = resolve_predefined_entity(&name) {
        out.push_str(value);
        return;
    }
    // Unknown entities and references to disallowed characters are kept verbatim.
    out.push('&');
    out.push_str(&name);
    out.push(';');
}

/// Characters allowed in an XML 1.0 document.
fn is_xml_char(ch: char) -> bool {
    matches!(
        ch,
        '\u{9}' | '\u{A}' | '\u{D}' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..
    )
}

/// Consume the remainder of an element whose start tag was just read and
/// return all character data inside it.
pub fn read_element_text<R: BufRead>(
    reader: &mut Reader<R>,
    buf: &mut Vec<u8>,
    element: &str,
) -> Result<String, XmlError> {
    let mut text = String::new();
    let mut depth = 0usize;
    loop {
        buf.clear();
        let event = next_event(reader, buf)?;
        match event {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                if depth == 0 {
                    return Ok(text);
                }
                depth -= 1;
            }
            Event::Eof => {
                return Err(XmlError::UnexpectedEof {
                    element: element.to_string(),
                    position: reader.buffer_position(),
                });
            }
            other => push_text(&other, &mut text),
        }
    }
}

/// Consume the remainder of an element whose start tag was just read and
/// return the text of each direct child, in document order.
///
/// Grandchildren are not reported separately; their text is folded into the
/// direct child that contains them.
pub fn read_child_texts<R: BufRead>(
    reader: &mut Reader<R>,
    buf: &mut Vec<u8>,
    element: &str,
) -> Result<Vec<(String, String)>, XmlError> {
    let mut children = Vec::new();
    let mut current: Option<(String, String)> = None;
    let mut depth = 0usize;
    loop {
        buf.clear();
        let event = next_event(reader, buf)?;
        match event {
            Event::Start(start) => {
                if depth == 0 {
                    current = Some((local_name(start.local_name().as_ref()), String::new()));
                }
                depth += 1;
            }
            Event::Empty(empty) => {
                if depth == 0 {
                    children.push((local_name(empty.local_name().as_ref()), String::new()));
                }
            }
            Event::End(_) => {
                if depth == 0 {
                    return Ok(children);
                }
                depth -= 1;
                if depth == 0
                    && let Some(child) = current.take()
                {
                    children.push(child);
                }
            }
            Event::Eof => {
                return Err(XmlError::UnexpectedEof {
                    element: element.to_string(),
                    position: reader.buffer_position(),
                });
            }
            other => {
                if let Some((_, text)) = current.as_mut() {
                    push_text(&other, text);
                }
            }
        }
    }
}
