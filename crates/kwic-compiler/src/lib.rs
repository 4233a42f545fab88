//! Pattern compiler for the kwic corpus query engine.
//!
//! # Example
//!
//! ```
//! use kwic_compiler::Query;
//! use kwic_core::CorpusBuilder;
//!
//! let mut builder = CorpusBuilder::new(["orth", "pos"]);
//! for (orth, pos) in [("the", "det"), ("quick", "adj"), ("fox", "noun")] {
//!     builder.push_token(&[orth, pos]).unwrap();
//! }
//! let corpus = builder.build().unwrap();
//!
//! let query = Query::compile("[pos=adj]{1,2} [pos=noun]", &corpus).unwrap();
//! eprintln!("{}", query.dump());
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod diagnostics;
pub mod error;
pub mod expr;
pub mod graph;
pub mod lower;
pub mod parser;
pub mod query;


pub use diagnostics::DiagnosticPrinter;
pub use error::{CompileError, Result};
pub use expr::{Bindings, Expr, ExprType, MAX_VARIABLES, SymbolId, VariableRanges};
pub use graph::{BuildError, Dfa, DfaLink, DfaState, Label, LinkFlags, StateId};
pub use lower::{MAX_REPEAT, Within};
pub use query::Query;
