//! Library-level integration tests: golden fixtures and whole-tree runs.

mod golden;
mod tree;
