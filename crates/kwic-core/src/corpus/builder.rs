//! Incremental corpus construction.

use indexmap::IndexMap;

use super::memory::Layout;
use super::{CorpusError, Document, GroupKind, MemoryCorpus, Span, SyntaxGroup};
use crate::Symbol;

/// Builds a [`MemoryCorpus`] token by token.
///
/// Positions are absolute. Tokens pushed before the first
/// [`begin_document`](Self::begin_document) form an implicit document without
/// metadata. Sub-documents and groups may be added in any order; they are
/// sorted on [`build`](Self::build), which also validates the layout.
///
/// ```
/// use kwic_core::{Corpus, CorpusBuilder};
///
/// let mut builder = CorpusBuilder::new(["orth", "pos"]);
/// builder.begin_document([("title", "fables")]);
/// builder.push_token(&["the", "det"]).unwrap();
/// builder.push_token(&["fox", "noun"]).unwrap();
/// builder.subdocument("s", 0, 2);
///
/// let corpus = builder.build().unwrap();
/// assert_eq!(corpus.len(), 2);
/// ```
#[derive(Debug)]
pub struct CorpusBuilder {
    layout: Layout,
    open: Option<(usize, IndexMap<Symbol, Symbol>)>,
}

impl CorpusBuilder {
    /// Start a corpus with the given positional attributes. The first one is
    /// the orthographic form.
    pub fn new<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let layout = Layout {
            attributes: attributes.into_iter().map(Into::into).collect(),
            ..Layout::default()
        };
        Self { layout, open: None }
    }

    /// Number of positions pushed so far.
    pub fn len(&self) -> usize {
        match self.layout.attributes.len() {
            0 => 0,
            width => self.layout.tokens.len() / width,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Group positions into granules of `granularity` for the positional index.
    /// `None` builds an unindexed corpus.
    pub fn granularity(&mut self, granularity: Option<usize>) -> &mut Self {
        self.layout.granularity = granularity;
        self
    }

    /// Close the current document and open a new one at the current position.
    pub fn begin_document<'a, I>(&mut self, meta: I) -> &mut Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.close_document();
        let interner = &mut self.layout.interner;
        let meta = meta
            .into_iter()
            .map(|(k, v)| (interner.intern(k), interner.intern(v)))
            .collect();
        self.open = Some((self.len(), meta));
        self
    }

    /// Append one position, returning its index.
    pub fn push_token(&mut self, values: &[&str]) -> Result<usize, CorpusError> {
        if values.len() != self.layout.attributes.len() {
            return Err(CorpusError::Invalid(format!(
                "token has {} values, corpus has {} attributes",
                values.len(),
                self.layout.attributes.len()
            )));
        }
        let position = self.len();
        for value in values {
            let sym = self.layout.interner.intern(value);
            self.layout.tokens.push(sym);
        }
        Ok(position)
    }

    /// Record a sub-document of `kind` covering `low..high`.
    pub fn subdocument(&mut self, kind: &str, low: usize, high: usize) -> &mut Self {
        self.layout
            .subdocuments
            .entry(kind.to_owned())
            .or_default()
            .push(Span::new(low, high));
        self
    }

    /// Record a syntax group covering `from..=to`.
    pub fn group(
        &mut self,
        from: usize,
        to: usize,
        group_type: &str,
        kind: GroupKind,
    ) -> &mut Self {
        let group_type = self.layout.interner.intern(group_type);
        self.layout.groups.push(SyntaxGroup {
            from,
            to,
            group_type,
            kind,
        });
        self
    }

    pub fn build(mut self) -> Result<MemoryCorpus, CorpusError> {
        self.close_document();
        for spans in self.layout.subdocuments.values_mut() {
            spans.sort_by_key(|s| s.low);
        }
        // Stable: a coordination precedes its members starting at the same position.
        self.layout.groups.sort_by_key(|g| g.from);
        MemoryCorpus::from_layout(self.layout)
    }

    fn close_document(&mut self) {
        let len = self.len();
        match self.open.take() {
            Some((low, meta)) => self.layout.documents.push(Document {
                span: Span::new(low, len),
                meta,
            }),
            None => {
                let low = self.layout.documents.last().map_or(0, |d| d.span.high);
                if low < len {
                    self.layout.documents.push(Document {
                        span: Span::new(low, len),
                        meta: IndexMap::new(),
                    });
                }
            }
        }
    }
}
