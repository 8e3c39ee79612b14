//! insight: semantic document search from the command line.
//!
//! insight uploads local documents to a remote semantic-search service, lists the ranked
//! matches with a relevance tier for each, and shows a selected document with the matched
//! passage and query terms highlighted, in the terminal or as a standalone HTML page.

#![warn(missing_docs)]

pub mod cli;
