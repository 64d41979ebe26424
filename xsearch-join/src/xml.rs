//! XML configuration of joins.
//!
//! ```xml
//! <joins>
//!   <join indexName="products" queryTemplate="" localField="sku" foreignField="id"
//!         returnFields="true" returnScores="false" returnFacets="false" type="OUTER">brand:acme</join>
//! </joins>
//! ```
//!
//! Attributes are optional on read. Flags are `true` only for a
//! case-insensitive `true`; an unknown `type` reads as inner. The element
//! text (text and CDATA) is the query string.

use crate::error::{JoinError, Result};
use crate::list::JoinList;
use crate::spec::{JoinSpec, JoinType};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fmt;
use std::io;

pub const JOIN_ELEMENT: &str = "join";
pub const JOINS_ELEMENT: &str = "joins";

pub const ATTR_INDEX_NAME: &str = "indexName";
pub const ATTR_QUERY_TEMPLATE: &str = "queryTemplate";
pub const ATTR_LOCAL_FIELD: &str = "localField";
pub const ATTR_FOREIGN_FIELD: &str = "foreignField";
pub const ATTR_RETURN_FIELDS: &str = "returnFields";
pub const ATTR_RETURN_SCORES: &str = "returnScores";
pub const ATTR_RETURN_FACETS: &str = "returnFacets";
pub const ATTR_TYPE: &str = "type";

fn xml_error(err: impl fmt::Display) -> JoinError {
    JoinError::Xml {
        message: err.to_string(),
    }
}

fn parse_bool(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

impl JoinSpec {
    /// Parse the first `join` element of `xml`.
    pub fn from_xml(xml: &str) -> Result<Self> {
        parse_joins(xml)?
            .into_iter()
            .next()
            .ok_or_else(|| xml_error(format!("no <{JOIN_ELEMENT}> element found")))
    }

    /// Build a join from the attributes of a `join` start tag.
    ///
    /// The query string is element text, so it is left empty here.
    pub fn from_xml_element(element: &BytesStart<'_>) -> Result<Self> {
        let mut spec = JoinSpec::default();
        let mut join_type = None;
        for attr in element.attributes() {
            let attr = attr.map_err(xml_error)?;
            let value = attr.unescape_value().map_err(xml_error)?;
            match attr.key.local_name().as_ref() {
                b"indexName" => spec.set_index_name(value),
                b"queryTemplate" => spec.set_query_template(value),
                b"localField" => spec.set_local_field(value),
                b"foreignField" => spec.set_foreign_field(value),
                b"returnFields" => spec.set_return_fields(parse_bool(&value)),
                b"returnScores" => spec.set_return_scores(parse_bool(&value)),
                b"returnFacets" => spec.set_return_facets(parse_bool(&value)),
                b"type" => join_type = Some(value.into_owned()),
                _ => {}
            }
        }
        spec.set_join_type(JoinType::find(join_type.as_deref()));
        Ok(spec)
    }

    /// Write this join as one `join` element.
    pub fn write_xml<W: io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let return_fields = self.return_fields().to_string();
        let return_scores = self.return_scores().to_string();
        let return_facets = self.return_facets().to_string();

        let mut start = BytesStart::new(JOIN_ELEMENT);
        start.push_attribute((ATTR_INDEX_NAME, self.index_name()));
        start.push_attribute((ATTR_QUERY_TEMPLATE, self.query_template()));
        start.push_attribute((ATTR_LOCAL_FIELD, self.local_field()));
        start.push_attribute((ATTR_FOREIGN_FIELD, self.foreign_field()));
        start.push_attribute((ATTR_RETURN_FIELDS, return_fields.as_str()));
        start.push_attribute((ATTR_RETURN_SCORES, return_scores.as_str()));
        start.push_attribute((ATTR_RETURN_FACETS, return_facets.as_str()));
        start.push_attribute((ATTR_TYPE, self.join_type().name()));

        if self.query_string().is_empty() {
            writer.write_event(Event::Empty(start)).map_err(xml_error)?;
            return Ok(());
        }
        writer.write_event(Event::Start(start)).map_err(xml_error)?;
        writer
            .write_event(Event::Text(BytesText::new(self.query_string())))
            .map_err(xml_error)?;
        writer
            .write_event(Event::End(BytesEnd::new(JOIN_ELEMENT)))
            .map_err(xml_error)?;
        Ok(())
    }

    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        self.write_xml(&mut writer)?;
        String::from_utf8(writer.into_inner()).map_err(xml_error)
    }
}

impl JoinList {
    /// Parse every `join` element of `xml`, in document order.
    ///
    /// Positions are assigned by order; a `joins` root is optional.
    pub fn from_xml(xml: &str) -> Result<Self> {
        Ok(parse_joins(xml)?.into_iter().collect())
    }

    pub fn write_xml<W: io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        if self.is_empty() {
            writer
                .write_event(Event::Empty(BytesStart::new(JOINS_ELEMENT)))
                .map_err(xml_error)?;
            return Ok(());
        }
        writer
            .write_event(Event::Start(BytesStart::new(JOINS_ELEMENT)))
            .map_err(xml_error)?;
        for join in self {
            join.write_xml(writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(JOINS_ELEMENT)))
            .map_err(xml_error)?;
        Ok(())
    }

    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        self.write_xml(&mut writer)?;
        String::from_utf8(writer.into_inner()).map_err(xml_error)
    }
}

fn parse_joins(xml: &str) -> Result<Vec<JoinSpec>> {
    let mut reader = Reader::from_str(xml);
    let mut joins = Vec::new();
    let mut current: Option<JoinSpec> = None;
    let mut text_buf = String::new();

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(ref e) if e.local_name().as_ref() == JOIN_ELEMENT.as_bytes() => {
                if current.is_some() {
                    return Err(xml_error(format!("nested <{JOIN_ELEMENT}> element")));
                }
                current = Some(JoinSpec::from_xml_element(e)?);
                text_buf.clear();
            }
            Event::Empty(ref e) if e.local_name().as_ref() == JOIN_ELEMENT.as_bytes() => {
                if current.is_some() {
                    return Err(xml_error(format!("nested <{JOIN_ELEMENT}/> element")));
                }
                joins.push(JoinSpec::from_xml_element(e)?);
            }
            Event::Text(ref e) if current.is_some() => {
                text_buf.push_str(&e.unescape().map_err(xml_error)?);
            }
            Event::CData(ref e) if current.is_some() => {
                text_buf.push_str(std::str::from_utf8(e).map_err(xml_error)?);
            }
            Event::End(ref e) if e.local_name().as_ref() == JOIN_ELEMENT.as_bytes() => {
                if let Some(mut spec) = current.take() {
                    spec.set_query_string(std::mem::take(&mut text_buf));
                    joins.push(spec);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    tracing::trace!(joins = joins.len(), "join XML parsed");
    Ok(joins)
}
