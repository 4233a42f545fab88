//! Shared logic for dump, exec and trace.

use std::fs;
use std::path::{Path, PathBuf};

use kwic_compiler::Query;
use kwic_core::{Corpus, MemoryCorpus, Span};
use kwic_vm::{
    CancellationToken, Match, MatchBuffer, MatchBufferInfo, Produced, SearchOptions, Searcher,
    Tracer,
};

use super::corpus_loader::load_corpus;
use super::error::{CliError, fail};
use super::query_loader::load_query_source;

/// Progress is logged every this many results.
const NOTIFY_EVERY: usize = 1000;

/// Search flags shared by exec and trace.
#[derive(Clone, Debug, Default)]
pub struct SearchArgs {
    pub limit: usize,
    pub sample: Option<u64>,
    pub nested: bool,
    pub max_length: Option<usize>,
    pub no_index: bool,
    pub config: Option<PathBuf>,
}

pub struct QueryInput<'a> {
    pub query_path: Option<&'a Path>,
    pub query_text: Option<&'a str>,
    pub corpus_path: Option<&'a Path>,
    pub color: bool,
}

pub struct PreparedQuery {
    pub corpus: MemoryCorpus,
    pub query: Query,
}

/// Load the corpus and compile the query against it.
///
/// Prints diagnostics and exits on failure.
pub fn prepare_query(input: QueryInput) -> PreparedQuery {
    let corpus = load_corpus(input.corpus_path).unwrap_or_else(|e| fail(e));
    let source =
        load_query_source(input.query_path, input.query_text).unwrap_or_else(|e| fail(e));

    let query = match Query::compile(&source.text, &corpus) {
        Ok(query) => query,
        Err(err) => {
            let mut printer = err.printer(&source.text).colored(input.color);
            if let Some(name) = source.name.as_deref() {
                printer = printer.path(name);
            }
            eprintln!("{}", printer.render());
            std::process::exit(1);
        }
    };

    tracing::debug!(states = query.dfa().len(), "query compiled");
    PreparedQuery { corpus, query }
}

/// Options from `--config`, overridden by explicit flags.
pub fn search_options(args: &SearchArgs) -> Result<SearchOptions, CliError> {
    let mut options = match &args.config {
        Some(path) => read_options(path)?,
        None => SearchOptions::default(),
    };

    if let Some(length) = args.max_length {
        options.max_match_length = length;
    }
    if args.nested {
        options.nested_results = true;
    }
    if args.sample.is_some() {
        options.sample_seed = args.sample;
    }
    if args.no_index {
        options.use_index = false;
    }
    Ok(options)
}

fn read_options(path: &Path) -> Result<SearchOptions, CliError> {
    let name = path.to_string_lossy().into_owned();
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: name.clone(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Config { path: name, source })
}

/// Result of [`run_search`].
pub struct SearchRun {
    pub buffer: MatchBuffer,
    pub outcome: Produced,
    pub sampled: bool,
}

/// Search until the corpus is exhausted or `limit` results fill the buffer.
pub fn run_search<T: Tracer>(
    prepared: &PreparedQuery,
    args: &SearchArgs,
    token: &CancellationToken,
    tracer: &mut T,
) -> Result<SearchRun, CliError> {
    let options = search_options(args)?;
    let sampled = options.is_sampling();
    let buffer = MatchBuffer::new(args.limit);
    let mut searcher = Searcher::new(&prepared.query, &prepared.corpus, options);

    let progress = |info: &MatchBufferInfo| {
        tracing::debug!(used = info.used, num_results = info.num_results, "search progress");
    };
    let outcome = searcher.produce_with(
        &buffer,
        usize::MAX,
        token,
        NOTIFY_EVERY,
        progress,
        tracer,
    )?;

    let info = buffer.info();
    tracing::info!(
        ?outcome,
        used = info.used,
        num_results = info.num_results,
        "search finished"
    );
    Ok(SearchRun {
        buffer,
        outcome,
        sampled,
    })
}

/// One concordance line: `context` positions either side of the match,
/// clipped to the match's document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Concordance {
    pub left: String,
    pub text: String,
    pub right: String,
}

impl Concordance {
    pub fn new(corpus: &MemoryCorpus, m: &Match, context: usize) -> Self {
        let doc = corpus
            .documents()
            .get(m.document)
            .map_or(Span::new(0, corpus.len()), |d| d.span);
        let left_start = m.start.saturating_sub(context).max(doc.low);
        let right_end = m.end.saturating_add(context).min(doc.high);

        Self {
            left: corpus.text(Span::new(left_start, m.start)),
            text: match_text(corpus, m),
            right: corpus.text(Span::new(m.end, right_end)),
        }
    }

    /// `left [text] right`, skipping empty context.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.left.is_empty() {
            out.push_str(&self.left);
            out.push(' ');
        }
        out.push('[');
        out.push_str(&self.text);
        out.push(']');
        if !self.right.is_empty() {
            out.push(' ');
            out.push_str(&self.right);
        }
        out
    }
}

/// Word forms of the match, the focus marked with `^` when the match has
/// more than one position.
fn match_text(corpus: &MemoryCorpus, m: &Match) -> String {
    if m.end.saturating_sub(m.start) <= 1 {
        return corpus.text(m.span());
    }
    (m.start..m.end)
        .map(|position| {
            let word = corpus.text(Span::new(position, position + 1));
            if position == m.focus {
                format!("^{word}")
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One-line summary of a finished search.
pub fn summary(run: &SearchRun) -> String {
    let info = run.buffer.info();
    if run.sampled {
        return format!("{} sampled of {} results", info.used, info.num_results);
    }
    match run.outcome {
        Produced::BufferFull => format!("first {} results (limit reached)", info.used),
        Produced::Cancelled => format!("{} results (cancelled)", info.used),
        Produced::Exhausted | Produced::LimitReached => format!("{} results", info.used),
    }
}
