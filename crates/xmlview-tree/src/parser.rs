//! XML parser building an [`Element`] tree with `quick-xml`.

use std::borrow::Cow;
use std::collections::HashMap;
use std::io::BufRead;

use quick_xml::encoding::{decode, detect_encoding};
use quick_xml::escape::{EscapeError, resolve_xml_entity, unescape_with};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::element::{Document, Element};
use crate::error::ParseError;

/// General entities declared in the internal DTD subset.
type Entities = HashMap<String, String>;

/// Parse XML text into a [`Document`].
///
/// Source whitespace is kept in `text` and `tail`, after XML 1.0 end-of-line
/// normalization. Attribute values get whitespace normalization. Comments,
/// processing instructions and declarations are skipped.
///
/// General entities declared in an internal DTD subset are expanded as
/// text; markup inside their replacement text is not parsed. External
/// entities are not loaded.
pub fn parse_str(xml: &str) -> Result<Document, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    parse_document(&mut reader)
}

/// Parse XML bytes into a [`Document`].
///
/// The encoding comes from the byte order mark or the `encoding` of the XML
/// declaration, defaulting to UTF-8.
pub fn parse_bytes(xml: &[u8]) -> Result<Document, ParseError> {
    // UTF-16 is not ASCII-compatible, so the reader cannot scan it directly
    if let Some((encoding, bom_len)) = detect_encoding(xml)
        && !encoding.is_ascii_compatible()
    {
        tracing::debug!(encoding = encoding.name(), "Transcoding XML input");
        let text = decode(&xml[bom_len..], encoding)?;
        return parse_str(&text);
    }

    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    parse_document(&mut reader)
}

fn parse_document<R: BufRead>(reader: &mut Reader<R>) -> Result<Document, ParseError> {
    let mut buf = Vec::new();
    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut entities = Entities::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                if root.is_some() {
                    return Err(ParseError::ContentAfterRoot);
                }
                open.push(start_element(reader, &e, &entities)?);
            }
            Event::Empty(e) => {
                if root.is_some() {
                    return Err(ParseError::ContentAfterRoot);
                }
                let element = start_element(reader, &e, &entities)?;
                close_element(&mut open, &mut root, element);
            }
            Event::End(_) => {
                // quick-xml verifies that the end name matches the open one
                if let Some(element) = open.pop() {
                    close_element(&mut open, &mut root, element);
                }
            }
            Event::Text(e) => {
                append_text(&mut open, &e.xml10_content()?)?;
            }
            Event::GeneralRef(e) => {
                let text = match e.resolve_char_ref()? {
                    Some(ch) => ch.to_string(),
                    None => {
                        let name = e.decode()?;
                        resolve_entity(&name, &entities)
                            .ok_or_else(|| ParseError::UnknownEntity(name.into_owned()))?
                            .to_owned()
                    }
                };
                append_text(&mut open, &text)?;
            }
            Event::CData(e) => {
                append_text(&mut open, &e.xml10_content()?)?;
            }
            Event::DocType(e) => {
                entities = internal_entities(&e.decode()?)?;
            }
            Event::Eof => break,
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) => {}
        }
        buf.clear();
    }

    if let Some(unclosed) = open.pop() {
        return Err(ParseError::UnclosedElement(unclosed.tag));
    }
    let root = root.ok_or(ParseError::NoRootElement)?;
    tracing::debug!(tag = %root.tag, nodes = root.node_count(), "Parsed XML document");
    Ok(Document::new(root))
}

/// Build an element from a start (or empty) tag.
fn start_element<R>(
    reader: &Reader<R>,
    e: &BytesStart,
    entities: &Entities,
) -> Result<Element, ParseError> {
    let decoder = reader.decoder();
    let tag = decoder.decode(e.name().as_ref())?.into_owned();
    let mut element = Element::new(tag);
    for attr in e.attributes() {
        let attr = attr?;
        let key = decoder.decode(attr.key.as_ref())?.into_owned();
        let raw = decoder.decode(&attr.value)?;
        let value = unescape(&normalize_attr_value(&raw), entities)?;
        element.attrs.insert(key, value);
    }
    Ok(element)
}

/// Attach a finished element to its parent, or make it the root.
fn close_element(open: &mut [Element], root: &mut Option<Element>, element: Element) {
    match open.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

/// Append text to the current element's text or its last child's tail.
fn append_text(open: &mut [Element], text: &str) -> Result<(), ParseError> {
    let Some(current) = open.last_mut() else {
        // Whitespace around the root is not part of the tree
        if text.trim().is_empty() {
            return Ok(());
        }
        return Err(ParseError::TextOutsideRoot(text.to_owned()));
    };
    match current.children.last_mut() {
        Some(last_child) => last_child.tail.push_str(text),
        None => current.text.push_str(text),
    }
    Ok(())
}

/// Replace literal whitespace in a raw attribute value with spaces.
///
/// Character references are expanded afterwards, so `&#10;` survives.
fn normalize_attr_value(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['\t', '\n', '\r']) {
        return Cow::Borrowed(raw);
    }
    Cow::Owned(raw.replace("\r\n", " ").replace(['\t', '\n', '\r'], " "))
}

/// Predefined XML entity or one declared in the DTD.
fn resolve_entity<'a>(name: &str, entities: &'a Entities) -> Option<&'a str> {
    resolve_xml_entity(name).or_else(|| entities.get(name).map(String::as_str))
}

/// Expand character and entity references in `raw`.
fn unescape(raw: &str, entities: &Entities) -> Result<String, ParseError> {
    unescape_with(raw, |name| resolve_entity(name, entities))
        .map(Cow::into_owned)
        .map_err(|e| match e {
            EscapeError::UnrecognizedEntity(_, name) => ParseError::UnknownEntity(name),
            other => ParseError::Xml(other.into()),
        })
}

/// Collect internal general entities from the body of a `<!DOCTYPE ...>`.
///
/// Parameter entities and external (`SYSTEM`/`PUBLIC`) entities are
/// skipped. The first declaration of a name wins.
fn internal_entities(doctype: &str) -> Result<Entities, ParseError> {
    let mut entities = Entities::new();
    let Some(subset_start) = doctype.find('[') else {
        return Ok(entities);
    };

    let mut rest = &doctype[subset_start + 1..];
    while let Some(pos) = rest.find("<!ENTITY") {
        rest = rest[pos + "<!ENTITY".len()..].trim_start();
        if rest.starts_with('%') {
            continue;
        }
        let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let name = &rest[..name_end];
        rest = rest[name_end..].trim_start();

        let Some(quote) = rest.chars().next().filter(|c| matches!(c, '"' | '\'')) else {
            continue;
        };
        let Some(value_len) = rest[1..].find(quote) else {
            break;
        };
        let raw = &rest[1..=value_len];
        rest = &rest[value_len + 2..];

        if !entities.contains_key(name) {
            let value = unescape(raw, &entities)?;
            tracing::debug!(entity = name, "Declared internal entity");
            entities.insert(name.to_owned(), value);
        }
    }
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ROYALS: &str = r#"<root><parent class="royals">Princess Diana - Prince Charles<child>Prince William</child><child>Prince Harry</child></parent>the end</root>"#;

    #[test]
    fn test_parse_simple_element() {
        let doc = parse_str("<p>Hello</p>").unwrap();
        assert_eq!(doc.root().tag, "p");
        assert_eq!(doc.root().text, "Hello");
        assert!(doc.root().children.is_empty());
    }

    #[test]
    fn test_parse_text_and_tail() {
        let doc = parse_str(ROYALS).unwrap();
        let parent = &doc.root().children[0];
        assert_eq!(parent.tag, "parent");
        assert_eq!(parent.text, "Princess Diana - Prince Charles");
        assert_eq!(parent.tail, "the end");
        assert_eq!(parent.children[0].text, "Prince William");
        assert_eq!(parent.children[1].text, "Prince Harry");
        assert_eq!(
            parent.attrs.get("class").map(String::as_str),
            Some("royals")
        );
    }

    #[test]
    fn test_parse_keeps_whitespace() {
        let doc = parse_str("<root>\n    <a>x</a>\n</root>\n").unwrap();
        assert_eq!(doc.root().text, "\n    ");
        assert_eq!(doc.root().children[0].tail, "\n");
        assert_eq!(doc.root().tail, "");
    }

    #[test]
    fn test_parse_self_closing_elements() {
        let doc = parse_str("<p>Before<br />After</p>").unwrap();
        let root = doc.root();
        assert_eq!(root.text, "Before");
        assert_eq!(root.children[0].tag, "br");
        assert_eq!(root.children[0].tail, "After");
    }

    #[test]
    fn test_parse_entities() {
        let doc = parse_str("<p a=\"x &amp; y\">1 &lt; 2 &#65;&#x42;</p>").unwrap();
        assert_eq!(doc.root().text, "1 < 2 AB");
        assert_eq!(doc.root().attrs.get("a").map(String::as_str), Some("x & y"));
    }

    #[test]
    fn test_parse_cdata_becomes_text() {
        let doc = parse_str("<p><![CDATA[a < b]]></p>").unwrap();
        assert_eq!(doc.root().text, "a < b");
    }

    #[test]
    fn test_parse_skips_declaration_and_comments() {
        let doc = parse_str("<?xml version=\"1.0\"?>\n<!-- c --><r>a<!-- d -->b</r>").unwrap();
        assert_eq!(doc.root().tag, "r");
        assert_eq!(doc.root().text, "ab");
    }

    #[test]
    fn test_parse_attribute_order() {
        let doc = parse_str(r#"<r z="1" a="2" m="3"/>"#).unwrap();
        let keys: Vec<&str> = doc.root().attrs.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_parse_bytes() {
        let doc = parse_bytes(ROYALS.as_bytes()).unwrap();
        assert_eq!(doc.root().tag, "root");
        assert_eq!(doc.root().children[0].children.len(), 2);
    }

    #[test]
    fn test_mismatched_end_tag_is_error() {
        let err = parse_str("<a><b></a>").unwrap_err();
        assert!(matches!(err, ParseError::Xml(_)), "got {err:?}");
    }

    #[test]
    fn test_unclosed_element_is_error() {
        let err = parse_str("<a><b>").unwrap_err();
        assert!(
            matches!(err, ParseError::UnclosedElement(_) | ParseError::Xml(_)),
            "got {err:?}"
        );
    }

    #[test]
    fn test_empty_input_is_error() {
        let err = parse_str("   ").unwrap_err();
        assert!(matches!(err, ParseError::NoRootElement), "got {err:?}");
    }

    #[test]
    fn test_second_root_is_error() {
        let err = parse_str("<a/><b/>").unwrap_err();
        assert!(matches!(err, ParseError::ContentAfterRoot), "got {err:?}");
    }

    #[test]
    fn test_text_outside_root_is_error() {
        let err = parse_str("<a/>trailing").unwrap_err();
        assert!(matches!(err, ParseError::TextOutsideRoot(_)), "got {err:?}");
    }

    #[test]
    fn test_unknown_entity_is_error() {
        let err = parse_str("<a>&nbsp;</a>").unwrap_err();
        assert!(matches!(err, ParseError::UnknownEntity(ref e) if e == "nbsp"), "got {err:?}");
    }

    #[test]
    fn test_parse_bytes_declared_latin1() {
        let doc = parse_bytes(b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><a t=\"\xe9\">caf\xe9</a>")
            .unwrap();
        assert_eq!(doc.root().text, "caf\u{e9}");
        assert_eq!(doc.root().attrs.get("t").map(String::as_str), Some("\u{e9}"));
    }

    #[test]
    fn test_parse_bytes_utf16le_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "<?xml version=\"1.0\" encoding=\"UTF-16\"?><a>h\u{e9}</a>".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let doc = parse_bytes(&bytes).unwrap();
        assert_eq!(doc.root().tag, "a");
        assert_eq!(doc.root().text, "h\u{e9}");
    }

    #[test]
    fn test_parse_bytes_utf8_bom() {
        let doc = parse_bytes(b"\xEF\xBB\xBF<a>hi</a>").unwrap();
        assert_eq!(doc.root().text, "hi");
    }

    #[test]
    fn test_parse_bytes_invalid_utf8_is_error() {
        let err = parse_bytes(b"<a>caf\xe9</a>").unwrap_err();
        assert!(matches!(err, ParseError::Encoding(_)), "got {err:?}");
    }

    #[test]
    fn test_parse_normalizes_line_endings() {
        let doc = parse_str("<a>a\r\nb\rc<b/>d\r\n</a>").unwrap();
        assert_eq!(doc.root().text, "a\nb\nc");
        assert_eq!(doc.root().children[0].tail, "d\n");
    }

    #[test]
    fn test_parse_normalizes_attribute_whitespace() {
        let doc = parse_str("<a v=\"x\ty\nz\" w=\"p\r\nq\" r=\"1&#10;2\"/>").unwrap();
        let attrs = &doc.root().attrs;
        assert_eq!(attrs.get("v").map(String::as_str), Some("x y z"));
        assert_eq!(attrs.get("w").map(String::as_str), Some("p q"));
        assert_eq!(attrs.get("r").map(String::as_str), Some("1\n2"));
    }

    #[test]
    fn test_parse_internal_dtd_entities() {
        let xml = r#"<!DOCTYPE r [
  <!ENTITY e "x">
  <!ENTITY nested '&e;2'>
  <!ENTITY e "ignored">
  <!ENTITY % param "skipped">
]>
<r a="&e;">&e;&amp;&nested;</r>"#;
        let doc = parse_str(xml).unwrap();
        assert_eq!(doc.root().text, "x&x2");
        assert_eq!(doc.root().attrs.get("a").map(String::as_str), Some("x"));
    }

    #[test]
    fn test_external_entity_is_unknown() {
        let xml = r#"<!DOCTYPE r [<!ENTITY ext SYSTEM "ext.xml">]><r>&ext;</r>"#;
        let err = parse_str(xml).unwrap_err();
        assert!(matches!(err, ParseError::UnknownEntity(ref e) if e == "ext"), "got {err:?}");
    }

    #[test]
    fn test_unknown_entity_in_attribute_is_error() {
        let err = parse_str(r#"<a v="&nbsp;"/>"#).unwrap_err();
        assert!(matches!(err, ParseError::UnknownEntity(ref e) if e == "nbsp"), "got {err:?}");
    }
}
