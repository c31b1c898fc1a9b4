//! Internal test modules - whitebox tests with crate access
//!
//! These tests drive the pipeline stages directly, including the
//! crate-private lexer and parser, to pin down how the stages hand data to
//! each other.
