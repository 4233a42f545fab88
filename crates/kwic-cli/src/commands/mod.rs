pub mod corpus_loader;
pub mod dump;
pub mod error;
pub mod exec;
pub mod pack;
pub mod query_loader;
pub mod run_common;
pub mod trace;

#[cfg(test)]
mod loader_tests;
#[cfg(test)]
mod run_common_tests;
