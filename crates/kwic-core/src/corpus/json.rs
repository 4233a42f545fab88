//! JSON corpus format.
//!
//! ```json
//! {
//!   "attributes": ["orth", "base", "pos"],
//!   "granularity": 64,
//!   "documents": [{
//!     "meta": { "title": "fables" },
//!     "tokens": [["The", "the", "det"], ["fox", "fox", "noun"]],
//!     "subdocuments": { "s": [[0, 2]] },
//!     "groups": [{ "from": 0, "to": 1, "type": "NP", "synh": 1, "semh": 1 }]
//!   }]
//! }
//! ```
//!
//! Positions inside a document (sub-document spans, group bounds and heads)
//! are relative to the document start.

use indexmap::IndexMap;
use serde::Deserialize;

use super::{CorpusBuilder, CorpusError, GroupKind, MemoryCorpus};

#[derive(Debug, Deserialize)]
struct RawCorpus {
    attributes: Vec<String>,
    #[serde(default)]
    granularity: Option<usize>,
    documents: Vec<RawDocument>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    meta: IndexMap<String, String>,
    tokens: Vec<Vec<String>>,
    #[serde(default)]
    subdocuments: IndexMap<String, Vec<(usize, usize)>>,
    #[serde(default)]
    groups: Vec<RawGroup>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawGroupKind {
    #[default]
    Simple,
    Coordination,
    Conjunction,
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    from: usize,
    to: usize,
    #[serde(rename = "type")]
    group_type: String,
    #[serde(default)]
    kind: RawGroupKind,
    #[serde(default)]
    synh: Option<usize>,
    #[serde(default)]
    semh: Option<usize>,
    #[serde(default)]
    members: usize,
}

impl MemoryCorpus {
    /// Parse a corpus from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, CorpusError> {
        let raw: RawCorpus = serde_json::from_str(json).map_err(CorpusError::Json)?;
        let mut builder = CorpusBuilder::new(raw.attributes);
        builder.granularity(raw.granularity);

        for doc in raw.documents {
            builder.begin_document(doc.meta.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            let base = builder.len();

            for token in &doc.tokens {
                let values: Vec<&str> = token.iter().map(String::as_str).collect();
                builder.push_token(&values)?;
            }
            for (kind, spans) in &doc.subdocuments {
                for &(low, high) in spans {
                    builder.subdocument(kind, base + low, base + high);
                }
            }
            for group in &doc.groups {
                let kind = match group.kind {
                    RawGroupKind::Simple => GroupKind::Simple {
                        synh: group.synh.map(|h| base + h),
                        semh: group.semh.map(|h| base + h),
                    },
                    RawGroupKind::Coordination => GroupKind::Coordination {
                        members: group.members,
                    },
                    RawGroupKind::Conjunction => GroupKind::Conjunction,
                };
                builder.group(base + group.from, base + group.to, &group.group_type, kind);
            }
        }

        builder.build()
    }
}
