//! Markup export: XML 1.0.
//!
//! ```xml
//! <lexicon language="Rakhine" iso_code="rki" script="Myanmar" version="1.0.0">
//!   <metadata description="…"><source>…</source></metadata>
//!   <entry id="rki_0001" script="ရေ" romanization="re" pos="noun" gloss_en="water">
//!     <synonyms><ref>rki_0002</ref></synonyms>
//!     <etymology source="Pali"><cognate>…</cognate></etymology>
//!     <sense index="1" gloss_en="…"/>
//!   </entry>
//! </lexicon>
//! ```
//!
//! Scalar fields are attributes; senses, etymology, and reference lists are
//! child elements. Tabs and line breaks in attributes are written as
//! character references so they survive attribute normalization.

use std::fmt::Write as _;

use rki_core::corpus::CorpusMetadata;
use rki_core::entities::{Entry, Etymology, Sense};
use rki_core::enums::RefRelation;
use rki_lexicon::store::Snapshot;

use crate::error::{ExportError, Failures};
use crate::format::ExportFormat;

/// Render the snapshot as an XML document.
///
/// # Errors
///
/// Returns `ExportError::Format` naming every entry field that contains a
/// character forbidden in XML 1.0.
pub fn render(snapshot: &Snapshot) -> Result<String, ExportError> {
    let mut failures = Failures::new(ExportFormat::Markup);
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");

    write_header(&mut out, snapshot.metadata(), &mut failures);
    for entry in snapshot.iter() {
        write_entry(&mut out, entry, &mut failures);
    }
    out.push_str("</lexicon>\n");

    failures.finish(out)
}

fn write_header(out: &mut String, metadata: &CorpusMetadata, failures: &mut Failures) {
    let mut xml = Xml::new(out, "metadata", failures);
    xml.open("lexicon", 0);
    xml.attr("language", Some(metadata.language.as_str()));
    xml.attr("iso_code", Some(metadata.iso_code.as_str()));
    xml.attr("script", Some(metadata.script.as_str()));
    xml.attr("version", Some(metadata.version.as_str()));
    xml.end_open();

    xml.open("metadata", 1);
    xml.attr("description", Some(metadata.description.as_str()));
    xml.attr("created", metadata.created.as_deref());
    xml.attr("modified", metadata.modified.as_deref());
    if metadata.sources.is_empty() {
        xml.self_close();
        return;
    }
    xml.end_open();
    for (index, source) in metadata.sources.iter().enumerate() {
        xml.text_element("source", &format!("sources[{index}]"), source, 2);
    }
    xml.close("metadata", 1);
}

fn write_entry(out: &mut String, entry: &Entry, failures: &mut Failures) {
    let ipa = entry.ipa.as_ref().map(ToString::to_string);
    let mut xml = Xml::new(out, &entry.id, failures);
    xml.open("entry", 1);
    xml.attr("id", Some(entry.id.as_str()));
    xml.attr("script", Some(entry.script.as_str()));
    xml.attr("romanization", Some(entry.romanization.as_str()));
    xml.attr("ipa", ipa.as_deref());
    xml.attr("pos", Some(entry.pos.as_str()));
    xml.attr("gloss_en", entry.gloss_en.as_deref());
    xml.attr("gloss_my", entry.gloss_my.as_deref());
    xml.attr("definition_en", entry.definition_en.as_deref());
    xml.attr("definition_my", entry.definition_my.as_deref());
    xml.attr("example", entry.example.as_deref());
    xml.attr("example_translation", entry.example_translation.as_deref());
    xml.attr("dialect", entry.dialect.as_deref());
    xml.attr("notes", entry.notes.as_deref());
    xml.attr("source", entry.source.as_deref());

    let has_children = entry.references().next().is_some()
        || entry.etymology.is_some()
        || !entry.senses.is_empty();
    if !has_children {
        xml.self_close();
        return;
    }
    xml.end_open();

    for relation in RefRelation::ALL {
        let refs = entry.refs(relation);
        if refs.is_empty() {
            continue;
        }
        let field = relation.field();
        xml.open(field, 2);
        xml.end_open();
        for (index, reference) in refs.iter().enumerate() {
            xml.text_element("ref", &format!("{field}[{index}]"), reference.as_str(), 3);
        }
        xml.close(field, 2);
    }
    if let Some(etymology) = &entry.etymology {
        write_etymology(&mut xml, etymology);
    }
    for (index, sense) in entry.senses.iter().enumerate() {
        write_sense(&mut xml, index, sense);
    }
    xml.close("entry", 1);
}

fn write_etymology(xml: &mut Xml<'_>, etymology: &Etymology) {
    xml.open("etymology", 2);
    xml.attr_at("etymology.source", "source", etymology.source.as_deref());
    xml.attr_at("etymology.original", "original", etymology.original.as_deref());
    xml.attr_at("etymology.notes", "notes", etymology.notes.as_deref());
    if etymology.cognates.is_empty() {
        xml.self_close();
        return;
    }
    xml.end_open();
    for (index, cognate) in etymology.cognates.iter().enumerate() {
        xml.text_element("cognate", &format!("etymology.cognates[{index}]"), cognate, 3);
    }
    xml.close("etymology", 2);
}

fn write_sense(xml: &mut Xml<'_>, index: usize, sense: &Sense) {
    let field = |name: &str| format!("senses[{index}].{name}");
    xml.open("sense", 2);
    let number = (index + 1).to_string();
    xml.attr("index", Some(number.as_str()));
    xml.attr_at(&field("gloss_en"), "gloss_en", sense.gloss_en.as_deref());
    xml.attr_at(&field("gloss_my"), "gloss_my", sense.gloss_my.as_deref());
    xml.attr_at(
        &field("definition_en"),
        "definition_en",
        sense.definition_en.as_deref(),
    );
    xml.attr_at(
        &field("definition_my"),
        "definition_my",
        sense.definition_my.as_deref(),
    );
    xml.attr_at(&field("example"), "example", sense.example.as_deref());
    xml.attr_at(
        &field("example_translation"),
        "example_translation",
        sense.example_translation.as_deref(),
    );
    xml.attr_at(&field("dialect"), "dialect", sense.dialect.as_deref());
    xml.attr_at(&field("domain"), "domain", sense.domain.as_deref());
    xml.self_close();
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Minimal element writer that records forbidden characters as failures.
struct Xml<'a> {
    out: &'a mut String,
    owner: &'a str,
    failures: &'a mut Failures,
}

impl<'a> Xml<'a> {
    fn new(out: &'a mut String, owner: &'a str, failures: &'a mut Failures) -> Self {
        Self {
            out,
            owner,
            failures,
        }
    }

    fn open(&mut self, name: &str, depth: usize) {
        indent(self.out, depth);
        self.out.push('<');
        self.out.push_str(name);
    }

    fn end_open(&mut self) {
        self.out.push_str(">\n");
    }

    fn self_close(&mut self) {
        self.out.push_str("/>\n");
    }

    fn close(&mut self, name: &str, depth: usize) {
        indent(self.out, depth);
        let _ = writeln!(self.out, "</{name}>");
    }

    fn attr(&mut self, name: &str, value: Option<&str>) {
        self.attr_at(name, name, value);
    }

    /// Attribute `name`, reported as `field` on failure.
    fn attr_at(&mut self, field: &str, name: &str, value: Option<&str>) {
        let Some(value) = value else { return };
        match escape(value, true) {
            Ok(escaped) => {
                let _ = write!(self.out, " {name}=\"{escaped}\"");
            }
            Err(message) => self.failures.push(self.owner, field, message),
        }
    }

    fn text_element(&mut self, name: &str, field: &str, text: &str, depth: usize) {
        match escape(text, false) {
            Ok(escaped) => {
                indent(self.out, depth);
                let _ = writeln!(self.out, "<{name}>{escaped}</{name}>");
            }
            Err(message) => self.failures.push(self.owner, field, message),
        }
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

/// Whether `c` is allowed by the XML 1.0 `Char` production.
const fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

fn escape(value: &str, attribute: bool) -> Result<String, String> {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if !is_xml_char(c) {
            return Err(format!(
                "character U+{:04X} is not allowed in XML 1.0",
                u32::from(c)
            ));
        }
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\t' if attribute => out.push_str("&#9;"),
            '\n' if attribute => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(c),
        }
    }
    Ok(out)
}
