//! In-memory corpus.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{
    AttrId, Collation, Corpus, CorpusError, Document, GroupKind, Segment, Span, SyntaxGroup,
};
use crate::{Interner, Symbol};

/// Serializable part of a corpus. Everything else is derived on load.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub(super) struct Layout {
    pub interner: Interner,
    pub attributes: Vec<String>,
    /// Row-major: `attributes.len()` symbols per position.
    pub tokens: Vec<Symbol>,
    pub documents: Vec<Document>,
    pub subdocuments: IndexMap<String, Vec<Span>>,
    pub groups: Vec<SyntaxGroup>,
    pub granularity: Option<usize>,
}

/// A corpus held entirely in memory.
///
/// The positional index (`occurrences`) is only built when the corpus has a
/// granularity; without one the search area restrictor sees an unindexed
/// corpus and every position is a candidate.
#[derive(Debug)]
pub struct MemoryCorpus {
    layout: Layout,
    width: usize,
    dictionaries: Vec<Vec<Symbol>>,
    group_types: Vec<Symbol>,
    meta_values: HashMap<Symbol, Vec<Symbol>>,
    index: HashMap<(AttrId, Symbol), Vec<u32>>,
    collation: Collation,
}

impl MemoryCorpus {
    pub(super) fn from_layout(layout: Layout) -> Result<Self, CorpusError> {
        validate(&layout)?;

        let width = layout.attributes.len();
        let len = layout.tokens.len() / width;

        let mut dictionaries = vec![Vec::new(); width];
        let mut seen = vec![HashSet::new(); width];
        for (i, &sym) in layout.tokens.iter().enumerate() {
            let attr = i % width;
            if seen[attr].insert(sym) {
                dictionaries[attr].push(sym);
            }
        }

        let mut group_types = Vec::new();
        for group in &layout.groups {
            if !group_types.contains(&group.group_type) {
                group_types.push(group.group_type);
            }
        }

        let mut meta_values: HashMap<Symbol, Vec<Symbol>> = HashMap::new();
        for doc in &layout.documents {
            for (&key, &value) in &doc.meta {
                let values = meta_values.entry(key).or_default();
                if !values.contains(&value) {
                    values.push(value);
                }
            }
        }

        let mut index: HashMap<(AttrId, Symbol), Vec<u32>> = HashMap::new();
        if layout.granularity.is_some() {
            for position in 0..len {
                let row = &layout.tokens[position * width..(position + 1) * width];
                for (attr, &sym) in row.iter().enumerate() {
                    index
                        .entry((attr as AttrId, sym))
                        .or_default()
                        .push(position as u32);
                }
            }
        }

        let collation = Collation::new(&layout.interner);

        Ok(Self {
            layout,
            width,
            dictionaries,
            group_types,
            meta_values,
            index,
            collation,
        })
    }

    pub(super) fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Names of the positional attributes, `orth` first.
    pub fn attributes(&self) -> &[String] {
        &self.layout.attributes
    }

    /// Index of the document containing `position`.
    pub fn document_at(&self, position: usize) -> Option<usize> {
        let docs = &self.layout.documents;
        let i = docs.partition_point(|d| d.span.high <= position);
        (i < docs.len() && docs[i].span.contains(position)).then_some(i)
    }

    /// Orthographic forms of `span`, joined by spaces.
    pub fn text(&self, span: Span) -> String {
        let mut out = String::new();
        for position in span.low..span.high.min(self.len()) {
            if position > span.low {
                out.push(' ');
            }
            let sym = self.layout.tokens[position * self.width];
            out.push_str(self.layout.interner.resolve(sym));
        }
        out
    }
}

impl Corpus for MemoryCorpus {
    fn len(&self) -> usize {
        self.layout.tokens.len() / self.width
    }

    fn interner(&self) -> &Interner {
        &self.layout.interner
    }

    fn attribute(&self, name: &str) -> Option<AttrId> {
        self.layout
            .attributes
            .iter()
            .position(|a| a == name)
            .map(|i| i as AttrId)
    }

    fn attribute_name(&self, attr: AttrId) -> &str {
        self.layout
            .attributes
            .get(attr as usize)
            .map_or("?", String::as_str)
    }

    fn dictionary(&self, attr: AttrId) -> &[Symbol] {
        self.dictionaries
            .get(attr as usize)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn segment(&self, index: usize) -> Option<Segment<'_>> {
        let row = self
            .layout
            .tokens
            .get(index * self.width..(index + 1) * self.width)?;
        Some(Segment::new(index, row))
    }

    fn documents(&self) -> &[Document] {
        &self.layout.documents
    }

    fn subdocuments(&self, kind: &str) -> Option<&[Span]> {
        self.layout.subdocuments.get(kind).map(Vec::as_slice)
    }

    fn syntax_groups(&self) -> &[SyntaxGroup] {
        &self.layout.groups
    }

    fn group_types(&self) -> &[Symbol] {
        &self.group_types
    }

    fn meta_values(&self, key: Symbol) -> &[Symbol] {
        self.meta_values
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn occurrences(&self, attr: AttrId, value: Symbol) -> Option<&[u32]> {
        self.layout.granularity?;
        Some(
            self.index
                .get(&(attr, value))
                .map(Vec::as_slice)
                .unwrap_or_default(),
        )
    }

    fn granularity(&self) -> Option<usize> {
        self.layout.granularity
    }

    fn collation(&self) -> &Collation {
        &self.collation
    }
}

fn invalid(msg: impl Into<String>) -> CorpusError {
    CorpusError::Invalid(msg.into())
}

fn validate(layout: &Layout) -> Result<(), CorpusError> {
    let width = layout.attributes.len();
    if width == 0 {
        return Err(invalid("corpus declares no attributes"));
    }
    if layout.tokens.len() % width != 0 {
        return Err(invalid("token table is not a multiple of the attribute count"));
    }
    if let Some(sym) = layout
        .tokens
        .iter()
        .find(|s| layout.interner.try_resolve(**s).is_none())
    {
        return Err(invalid(format!("unknown symbol {}", sym.as_u32())));
    }
    if layout.granularity == Some(0) {
        return Err(invalid("granularity must be positive"));
    }

    let len = layout.tokens.len() / width;

    let mut expected_low = 0;
    for (i, doc) in layout.documents.iter().enumerate() {
        if doc.span.low != expected_low || doc.span.high < doc.span.low {
            return Err(invalid(format!(
                "document {i} spans {}..{}, expected to start at {expected_low}",
                doc.span.low, doc.span.high
            )));
        }
        expected_low = doc.span.high;
    }
    if expected_low != len {
        return Err(invalid(format!(
            "documents cover {expected_low} of {len} positions"
        )));
    }

    for (kind, spans) in &layout.subdocuments {
        let mut previous_high = 0;
        for span in spans {
            if span.low >= span.high || span.high > len || span.low < previous_high {
                return Err(invalid(format!(
                    "sub-document `{kind}` {}..{} is empty, out of range or overlapping",
                    span.low, span.high
                )));
            }
            previous_high = span.high;
        }
    }

    let mut previous_from = 0;
    for (i, group) in layout.groups.iter().enumerate() {
        if group.from < previous_from {
            return Err(invalid(format!("syntax group {i} is out of order")));
        }
        previous_from = group.from;
        if group.from > group.to || group.to >= len {
            return Err(invalid(format!(
                "syntax group {i} spans {}..={} outside the corpus",
                group.from, group.to
            )));
        }
        match group.kind {
            GroupKind::Simple { synh, semh } => {
                if synh.into_iter().chain(semh).any(|h| h >= len) {
                    return Err(invalid(format!("syntax group {i} has a head out of range")));
                }
            }
            GroupKind::Coordination { members } => {
                if i + members >= layout.groups.len() {
                    return Err(invalid(format!(
                        "coordination {i} claims {members} members past the last group"
                    )));
                }
            }
            GroupKind::Conjunction => {}
        }
    }

    Ok(())
}
