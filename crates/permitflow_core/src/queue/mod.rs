//! In-flight document parsing state.
//!
//! Parsing itself runs in external services; this module only records which
//! projects are waiting on a parse result for each document class.

pub mod parse_queue;
