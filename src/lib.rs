//! Language analysis and workspace indexing for TDL grammars
//!
//! This crate provides the language intelligence behind TDL editor tooling:
//! completion, hover documentation, go-to-definition, and semantic
//! highlighting over a workspace of grammar files.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `text`: Positions, offset conversion, comment filtering, word lookup
//! - `tokenizer`: The shared structural token vocabulary
//! - `config`: Lookup window limits
//! - `attributes`: Object/attribute extraction from feature structures
//! - `definitions`: `Name := ...` definitions and attached doc blocks
//! - `tags`: The workspace-wide `#tag` vocabulary with file provenance
//! - `workspace`: Mutable indexing state and filesystem scanning
//! - `completion`: Context-sensitive completion candidates
//! - `hover`: Documentation lookup for the identifier under the cursor
//! - `go_to_definition`: Definition sites translated against workspace roots
//! - `semantic_tokens`: Definition-name highlighting
//!
//! # Design Principles
//!
//! - **Synchronous**: indexing runs to completion before queries observe it
//! - **Protocol-agnostic**: query results use plain types plus the
//!   `lsp_types` vocabulary, so any host loop can adapt them
//! - **Bounded**: per-query cost is limited by configurable windows rather
//!   than document size
//!
//! # Usage
//!
//! ```rust,ignore
//! use tdl_analysis::workspace::Workspace;
//! use tdl_analysis::completion;
//!
//! let mut workspace = Workspace::new();
//! let indexed = workspace.scan_root(project_dir);
//!
//! let items = completion::completion_items(&workspace, document_text, cursor);
//! ```

// Core utilities
pub mod config;
pub mod text;
pub mod tokenizer;

// Indexing
pub mod attributes;
pub mod definitions;
pub mod tags;
pub mod workspace;

// Analysis features
pub mod completion;
pub mod go_to_definition;
pub mod hover;
pub mod semantic_tokens;

// Test support (available in tests and as dev-dependency)
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
