//! String-resource upserts in `res/values/strings.xml`.
//!
//! The rewrite is an event-level round-trip: everything the template
//! already declares passes through untouched except entries whose `name`
//! matches an upserted key, which get their text replaced in place.
//! Missing entries are appended just before `</resources>`.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::config::BuildConfig;
use crate::error::InjectError;
use crate::layout::{RES_ADJUST_TOKEN, RES_APP_NAME, RES_EVENT_TOKEN, RES_WEB_URL};

/// Upsert the configured values into the string-resource file at `path`.
///
/// Entries for absent optional config fields are not touched at all.
pub fn update_strings(path: &Path, config: &BuildConfig) -> Result<(), InjectError> {
    let mut entries: Vec<(&str, &str)> = vec![
        (RES_APP_NAME, config.app_name.as_str()),
        (RES_WEB_URL, config.web_url.as_str()),
    ];
    if let Some(token) = &config.adjust_token {
        entries.push((RES_ADJUST_TOKEN, token));
    }
    if let Some(token) = &config.event_token {
        entries.push((RES_EVENT_TOKEN, token));
    }

    let xml = fs::read_to_string(path).map_err(|e| InjectError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let rewritten = upsert_string_resources(&xml, &entries)?;

    fs::write(path, rewritten).map_err(|e| InjectError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Rewrite `xml`, replacing the text of `<string name="...">` elements whose
/// name appears in `entries` and appending elements for names not present.
///
/// Returns the rewritten document as a string.
pub fn upsert_string_resources(
    xml: &str,
    entries: &[(&str, &str)],
) -> Result<String, InjectError> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    let mut seen: Vec<&str> = Vec::new();
    // When replacing an element's content we skip its original children;
    // this tracks nesting depth inside the element being replaced.
    let mut skip_depth: usize = 0;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| InjectError::Xml(e.to_string()))?;

        if skip_depth > 0 {
            match event {
                Event::Start(_) => skip_depth += 1,
                Event::End(_) => {
                    skip_depth -= 1;
                    if skip_depth == 0 {
                        write(&mut writer, Event::End(BytesEnd::new("string")))?;
                    }
                }
                Event::Eof => {
                    return Err(InjectError::Xml(
                        "unexpected end of document inside a string element".into(),
                    ))
                }
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(ref e) if e.name().as_ref() == b"string" => {
                match matched_entry(e, entries)? {
                    Some((name, value)) => {
                        seen.push(name);
                        write(&mut writer, Event::Start(e.to_owned()))?;
                        write(&mut writer, Event::Text(BytesText::new(value)))?;
                        skip_depth = 1;
                    }
                    None => write(&mut writer, Event::Start(e.to_owned()))?,
                }
            }
            Event::Empty(ref e) if e.name().as_ref() == b"string" => {
                match matched_entry(e, entries)? {
                    Some((name, value)) => {
                        seen.push(name);
                        write(&mut writer, Event::Start(e.to_owned()))?;
                        write(&mut writer, Event::Text(BytesText::new(value)))?;
                        write(&mut writer, Event::End(BytesEnd::new("string")))?;
                    }
                    None => write(&mut writer, Event::Empty(e.to_owned()))?,
                }
            }
            Event::End(ref e) if e.name().as_ref() == b"resources" => {
                for (name, value) in entries {
                    if !seen.contains(name) {
                        write(&mut writer, Event::Text(BytesText::new("    ")))?;
                        write_string_element(&mut writer, name, value)?;
                        write(&mut writer, Event::Text(BytesText::new("\n")))?;
                    }
                }
                write(&mut writer, Event::End(e.to_owned()))?;
            }
            Event::Eof => break,
            other => write(&mut writer, other)?,
        }
    }

    String::from_utf8(writer.into_inner().into_inner())
        .map_err(|e| InjectError::Xml(e.to_string()))
}

/// Return the `(name, value)` entry matching the element's `name` attribute.
fn matched_entry<'a>(
    element: &BytesStart<'_>,
    entries: &[(&'a str, &'a str)],
) -> Result<Option<(&'a str, &'a str)>, InjectError> {
    let attr = element
        .try_get_attribute("name")
        .map_err(|e| InjectError::Xml(e.to_string()))?;

    let Some(attr) = attr else {
        return Ok(None);
    };
    let name = attr
        .unescape_value()
        .map_err(|e| InjectError::Xml(e.to_string()))?;

    Ok(entries
        .iter()
        .find(|(key, _)| *key == name.as_ref())
        .copied())
}

fn write_string_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    name: &str,
    value: &str,
) -> Result<(), InjectError> {
    let mut start = BytesStart::new("string");
    start.push_attribute(("name", name));
    write(writer, Event::Start(start))?;
    write(writer, Event::Text(BytesText::new(value)))?;
    write(writer, Event::End(BytesEnd::new("string")))
}

fn write(writer: &mut Writer<Cursor<Vec<u8>>>, event: Event<'_>) -> Result<(), InjectError> {
    writer
        .write_event(event)
        .map_err(|e| InjectError::Xml(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <string name="app_name">Template App</string>
    <string name="backend_web_url">https://template.example</string>
    <string name="untouched">keep me</string>
</resources>
"#;

    // -- upsert behaviour -----------------------------------------------------

    #[test]
    fn replaces_existing_entry_in_place() {
        let out = upsert_string_resources(
            TEMPLATE,
            &[("backend_web_url", "https://new.example")],
        )
        .unwrap();

        assert!(out.contains(r#"<string name="backend_web_url">https://new.example</string>"#));
        assert!(!out.contains("https://template.example"));
    }

    #[test]
    fn appends_missing_entry_before_closing_tag() {
        let out =
            upsert_string_resources(TEMPLATE, &[("backend_app_name", "New App")]).unwrap();

        let appended = out.find(r#"<string name="backend_app_name">New App</string>"#);
        let closing = out.find("</resources>");
        assert!(appended.is_some());
        assert!(appended.unwrap() < closing.unwrap());
    }

    #[test]
    fn untouched_entries_are_preserved() {
        let out =
            upsert_string_resources(TEMPLATE, &[("backend_app_name", "New App")]).unwrap();

        assert!(out.contains(r#"<string name="untouched">keep me</string>"#));
        assert!(out.contains(r#"<string name="app_name">Template App</string>"#));
    }

    #[test]
    fn empty_element_is_upserted() {
        let xml = r#"<resources><string name="backend_app_name"/></resources>"#;
        let out = upsert_string_resources(xml, &[("backend_app_name", "App")]).unwrap();
        assert!(out.contains(r#"<string name="backend_app_name">App</string>"#));
    }

    #[test]
    fn special_characters_are_escaped() {
        let out = upsert_string_resources(
            TEMPLATE,
            &[("backend_app_name", "Fish & Chips <html>")],
        )
        .unwrap();
        assert!(out.contains("Fish &amp; Chips &lt;html&gt;"));
    }

    #[test]
    fn upsert_twice_is_byte_equivalent() {
        let entries = [
            ("backend_app_name", "App"),
            ("backend_web_url", "https://a.example"),
        ];
        let once = upsert_string_resources(TEMPLATE, &entries).unwrap();
        let twice = upsert_string_resources(&once, &entries).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn malformed_xml_is_an_error() {
        let out = upsert_string_resources("<resources><string", &[("a", "b")]);
        assert!(out.is_err());
    }
}
