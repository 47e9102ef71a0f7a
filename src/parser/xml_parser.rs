use super::record_builder::RecordBuilder;
use crate::errors::{AppError, AppResult};
use crate::models::Record;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, Event};
use quick_xml::reader::Reader;
use std::io::BufRead;

/// Parses a whole XML document and flattens its root element into a [`Record`].
///
/// Text, CDATA and entity references inside an element contribute to its text;
/// comments, processing instructions and the declaration are ignored. Line endings
/// in text are normalized to `\n` as XML 1.0 requires.
///
/// # Errors
///
/// Returns `ParseError` for malformed XML: mismatched or unclosed tags, a missing
/// root element, a second root element, non-whitespace text outside the root, or
/// an undefined entity. Read failures (including decompression errors from the
/// underlying reader) are reported the same way.
pub fn parse_document<R: BufRead>(source: R) -> AppResult<Record> {
    let mut reader = Reader::from_reader(source);
    let mut buf = Vec::with_capacity(8192);

    let mut stack: Vec<RecordBuilder> = Vec::with_capacity(16);
    let mut root: Option<Record> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                ensure_single_root(&stack, &root)?;
                stack.push(RecordBuilder::from_start(&e)?);
            }
            Event::Empty(e) => {
                ensure_single_root(&stack, &root)?;
                let record = RecordBuilder::from_start(&e)?.build();
                attach(&mut stack, &mut root, record);
            }
            Event::End(e) => {
                let builder = stack.pop().ok_or_else(|| {
                    AppError::ParseError(format!(
                        "Unexpected closing tag </{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    ))
                })?;
                attach(&mut stack, &mut root, builder.build());
            }
            Event::Text(e) => {
                let text = e.xml10_content().map_err(|e| {
                    AppError::ParseError(format!("Failed to decode XML text: {e}"))
                })?;
                push_text(&mut stack, &text)?;
            }
            Event::CData(e) => {
                let text = e.xml10_content().map_err(|e| {
                    AppError::ParseError(format!("Failed to decode CDATA: {e}"))
                })?;
                push_text(&mut stack, &text)?;
            }
            Event::GeneralRef(e) => {
                let text = resolve_reference(&e)?;
                push_text(&mut stack, &text)?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(AppError::ParseError(format!(
            "Unexpected end of document: <{}> is not closed",
            open.tag()
        )));
    }

    root.ok_or_else(|| AppError::ParseError("No root element found".into()))
}

/// Parses a backup export and returns one record per child of the root element
/// (each `<sms>`, `<mms>` or `<call>`), in document order.
pub fn parse_records<R: BufRead>(source: R) -> AppResult<Vec<Record>> {
    Ok(parse_document(source)?.children)
}

fn ensure_single_root(stack: &[RecordBuilder], root: &Option<Record>) -> AppResult<()> {
    if stack.is_empty() && root.is_some() {
        return Err(AppError::ParseError(
            "Junk after document element".into(),
        ));
    }
    Ok(())
}

fn attach(stack: &mut [RecordBuilder], root: &mut Option<Record>, record: Record) {
    match stack.last_mut() {
        Some(parent) => parent.push_child(record),
        None => *root = Some(record),
    }
}

fn push_text(stack: &mut [RecordBuilder], text: &str) -> AppResult<()> {
    match stack.last_mut() {
        Some(current) => current.push_text(text),
        None if text.trim().is_empty() => {}
        None => {
            return Err(AppError::ParseError(
                "Text outside of the root element".into(),
            ))
        }
    }
    Ok(())
}

fn resolve_reference(reference: &BytesRef<'_>) -> AppResult<String> {
    let char_ref = reference
        .resolve_char_ref()
        .map_err(|e| AppError::ParseError(format!("Invalid character reference: {e}")))?;
    if let Some(ch) = char_ref {
        return Ok(ch.to_string());
    }

    let name = reference
        .decode()
        .map_err(|e| AppError::ParseError(format!("Failed to decode entity name: {e}")))?;
    resolve_predefined_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| AppError::ParseError(format!("Undefined entity &{name};")))
}
