use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical, flattened form of one XML element and its subtree.
///
/// Attributes live in a sorted map so that document attribute order never
/// affects equality or fingerprints. `text` is only set when the element's
/// direct text has a non-whitespace character, and an empty `children` list
/// means the element had no child elements.
///
/// The derived serde impls are what the snapshot format stores; the JSON
/// output goes through [`RecordView`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub text: Option<String>,
    pub children: Vec<Record>,
}

impl Record {
    /// Creates a leaf record with no attributes, text or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Record) -> Self {
        self.children.push(child);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty() && self.text.is_none()
    }

    /// Borrowed view used for canonical hashing and JSON output.
    pub fn view(&self) -> RecordView<'_> {
        RecordView {
            tag: &self.tag,
            attributes: &self.attributes,
            text: self.text.as_deref(),
            children: self.children.iter().map(Record::view).collect(),
        }
    }
}

/// JSON shape of a [`Record`]: absent text and empty children are omitted.
///
/// Field order is fixed by the struct and attributes serialize in key order,
/// which makes the encoding byte-deterministic.
#[derive(Debug, Serialize)]
pub struct RecordView<'a> {
    pub tag: &'a str,
    pub attributes: &'a BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RecordView<'a>>,
}

/// A record paired with its resolved instant (seconds since the Unix epoch).
#[derive(Debug, Clone, PartialEq)]
pub struct TimedRecord {
    pub record: Record,
    pub ts: f64,
}

impl Serialize for TimedRecord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Timed<'a> {
            #[serde(flatten)]
            record: RecordView<'a>,
            #[serde(rename = "_ts")]
            ts: f64,
        }

        Timed {
            record: self.record.view(),
            ts: self.ts,
        }
        .serialize(serializer)
    }
}
