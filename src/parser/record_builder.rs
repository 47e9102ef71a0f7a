use crate::errors::{AppError, AppResult};
use crate::models::Record;
use quick_xml::escape::unescape;
use quick_xml::events::BytesStart;
use std::collections::BTreeMap;

/// Accumulates one element while its subtree is being read.
///
/// Text is only collected until the first child element arrives, matching the
/// element-tree notion of `.text`; text after a child belongs to that child's tail
/// and is dropped.
pub(crate) struct RecordBuilder {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: String,
    children: Vec<Record>,
}

impl RecordBuilder {
    /// Starts a record from an opening (or self-closing) tag.
    ///
    /// Literal tabs and line breaks in attribute values become spaces, then entity and
    /// character references are unescaped, so `&#10;` still yields a newline.
    /// Duplicate attributes are a parse error.
    pub(crate) fn from_start(start: &BytesStart<'_>) -> AppResult<Self> {
        let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = BTreeMap::new();

        for attr in start.attributes() {
            let attr = attr.map_err(|e| {
                AppError::ParseError(format!("Invalid attribute on <{tag}>: {e}"))
            })?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let raw = std::str::from_utf8(&attr.value).map_err(|e| {
                AppError::ParseError(format!("Invalid UTF-8 in {tag}@{key}: {e}"))
            })?;
            let value = unescape(&normalize_attribute_whitespace(raw))
                .map_err(|e| {
                    AppError::ParseError(format!("Invalid value for {tag}@{key}: {e}"))
                })?
                .into_owned();
            attributes.insert(key, value);
        }

        Ok(Self {
            tag,
            attributes,
            text: String::new(),
            children: Vec::new(),
        })
    }

    pub(crate) fn tag(&self) -> &str {
        &self.tag
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        if self.children.is_empty() {
            self.text.push_str(text);
        }
    }

    pub(crate) fn push_child(&mut self, child: Record) {
        self.children.push(child);
    }

    /// Finishes the record. Any non-empty text is kept verbatim, indentation included.
    pub(crate) fn build(self) -> Record {
        let text = if self.text.is_empty() {
            None
        } else {
            Some(self.text)
        };
        Record {
            tag: self.tag,
            attributes: self.attributes,
            text,
            children: self.children,
        }
    }
}

fn normalize_attribute_whitespace(raw: &str) -> String {
    raw.replace("\r\n", " ")
        .replace(['\r', '\n', '\t'], " ")
}
