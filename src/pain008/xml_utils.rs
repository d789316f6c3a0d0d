use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Cursor;

use crate::core::{EinzugError, cents_to_decimal};

fn xml_io(e: std::io::Error) -> EinzugError {
    EinzugError::Xml(format!("write error: {e}"))
}

/// Indenting element writer over an in-memory buffer.
pub struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    pub fn new() -> Result<Self, EinzugError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_io)?;
        Ok(Self { writer })
    }

    pub fn into_string(self) -> Result<String, EinzugError> {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| EinzugError::Xml(format!("UTF-8 error: {e}")))
    }

    pub fn start_element(&mut self, name: &str) -> Result<&mut Self, EinzugError> {
        self.start_element_with(name, &[])
    }

    /// Opening tag carrying attributes, e.g. the namespace declarations.
    pub fn start_element_with(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, EinzugError> {
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs {
            elem.push_attribute((*k, *v));
        }
        self.writer
            .write_event(Event::Start(elem))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn end_element(&mut self, name: &str) -> Result<&mut Self, EinzugError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, EinzugError> {
        self.start_element(name)?;
        self.text(text)?;
        self.end_element(name)
    }

    /// Cent amount as a two-decimal value with its `Ccy` attribute.
    pub fn amount_element(
        &mut self,
        name: &str,
        cents: i64,
        currency: &str,
    ) -> Result<&mut Self, EinzugError> {
        self.start_element_with(name, &[("Ccy", currency)])?;
        self.text(&format_cents(cents))?;
        self.end_element(name)
    }

    fn text(&mut self, text: &str) -> Result<(), EinzugError> {
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)
    }

    /// `<Outer><Inner>text</Inner></Outer>`, a frequent pain.008 shape.
    pub fn wrapped_text(
        &mut self,
        path: &[&str],
        text: &str,
    ) -> Result<&mut Self, EinzugError> {
        let Some((leaf, outer)) = path.split_last() else {
            return Ok(self);
        };
        for name in outer {
            self.start_element(name)?;
        }
        self.text_element(leaf, text)?;
        for name in outer.iter().rev() {
            self.end_element(name)?;
        }
        Ok(self)
    }
}

/// Cents as a two-decimal XML amount, e.g. `1999` → "19.99".
pub fn format_cents(cents: i64) -> String {
    cents_to_decimal(cents).to_string()
}
