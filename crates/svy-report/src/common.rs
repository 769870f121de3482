//! Shared helpers for dataset emission.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

/// Dataset format version marker.
pub const DS_FORMAT: &str = "113";

/// Byte order marker: low-to-high.
pub const BYTE_ORDER: &str = "LOHI";

/// File-type marker for a data file.
pub const FILE_TYPE: &str = "1";

/// Write a simple text element.
pub fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Write a text element carrying a single `varname` attribute.
pub fn write_varname_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    varname: &str,
    text: &str,
) -> Result<()> {
    let mut node = BytesStart::new(name);
    node.push_attribute(("varname", varname));
    writer.write_event(Event::Start(node))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Generation timestamp in the header's `dd Mon yyyy HH:MM` form.
pub fn header_timestamp(now: DateTime<Utc>) -> String {
    now.format("%d %b %Y %H:%M").to_string()
}

/// Cut a value to at most `max` bytes without splitting a character.
pub fn truncate_to_bytes(value: &str, max: usize) -> &str {
    if value.len() <= max {
        return value;
    }
    let mut end = max;
    while end > 0 && !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_form() {
        let now = Utc.with_ymd_and_hms(2026, 8, 7, 9, 30, 0).unwrap();
        assert_eq!(header_timestamp(now), "07 Aug 2026 09:30");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_to_bytes("hello", 10), "hello");
        assert_eq!(truncate_to_bytes("hello", 3), "hel");
        // 'é' is two bytes; cutting mid-char backs off.
        assert_eq!(truncate_to_bytes("ééé", 3), "é");
        assert_eq!(truncate_to_bytes("ééé", 4), "éé");
    }

    #[test]
    fn varname_element_shape() {
        let mut writer = Writer::new(Vec::new());
        write_varname_element(&mut writer, "type", "gender", "byte").unwrap();
        let xml = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(xml, r#"<type varname="gender">byte</type>"#);
    }
}
