//! Workspace indexing state.
//!
//! A [`Workspace`] owns every table the query features read: per-file
//! attribute maps, the merged global symbol table, definition and
//! documentation indexes, and the tag vocabulary. Indexing is synchronous
//! and event-driven; every update replaces the affected file's map wholesale
//! and rebuilds the global table before returning, so queries always observe
//! the union of the currently registered files.

use crate::attributes::{self, AttributeMap};
use crate::config::AnalysisLimits;
use crate::definitions;
use crate::tags::TagIndex;
use crate::text::Range;
use ignore::WalkBuilder;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// File extension discovered by workspace scans.
pub const TDL_EXTENSION: &str = "tdl";

/// True for keystrokes that restructure feature structures. Hosts re-index
/// on save; an edit inserting one of these characters warrants an immediate
/// re-index as well.
pub fn is_structural_edit(ch: char) -> bool {
    matches!(ch, ':' | ']' | '<' | '>' | '&')
}

/// Errors surfaced while indexing a single on-disk file.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot express {} as a file URL", .0.display())]
    InvalidPath(PathBuf),
}

/// A definition or lookup target: a file plus the name's range within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub uri: Url,
    pub range: Range,
}

#[derive(Debug, Default)]
struct FileIndex {
    attributes: AttributeMap,
    text: String,
}

/// The indexing engine's whole mutable state.
///
/// Mutating operations take `&mut self` and run to completion; queries take
/// `&self`. There is no interior locking: event serialization is the host
/// dispatch loop's concern.
#[derive(Debug, Default)]
pub struct Workspace {
    files: HashMap<Url, FileIndex>,
    symbols: AttributeMap,
    definitions: HashMap<String, Location>,
    documentation: HashMap<String, String>,
    tags: TagIndex,
    roots: Vec<PathBuf>,
    limits: AnalysisLimits,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: AnalysisLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    pub fn limits(&self) -> AnalysisLimits {
        self.limits
    }

    /// Re-indexes one file from its full text.
    ///
    /// Replaces the file's attribute map and stored text, records its
    /// definitions and doc blocks (later indexing always wins on name
    /// collisions), and rebuilds the global symbol table. Tags are indexed
    /// separately via [`Workspace::index_tags`].
    pub fn update_file(&mut self, uri: Url, text: &str) {
        let attributes = attributes::extract_attributes(text);

        for record in definitions::extract_definitions(text) {
            let location = Location {
                uri: uri.clone(),
                range: record.range,
            };
            if let Some(previous) = self.definitions.insert(record.name.clone(), location) {
                if previous.uri != uri {
                    tracing::debug!(
                        name = %record.name,
                        previous = %previous.uri,
                        now = %uri,
                        "definition moved to a later-indexed file"
                    );
                }
            }
            if let Some(doc) = record.doc {
                self.documentation.insert(record.name, doc);
            }
        }

        self.files.insert(
            uri,
            FileIndex {
                attributes,
                text: text.to_string(),
            },
        );
        self.rebuild_symbols();
    }

    /// Drops a file's attribute contributions and tag ownership.
    ///
    /// Definitions and documentation recorded from the file are kept; they
    /// remain addressable until another file redefines the same names.
    pub fn remove_file(&mut self, uri: &Url) {
        self.tags.remove_owner(uri);
        if self.files.remove(uri).is_some() {
            self.rebuild_symbols();
        }
    }

    /// Replaces the file's tag contribution with the tags in `text`.
    pub fn index_tags(&mut self, uri: &Url, text: &str) {
        self.tags.index_document(uri, text);
    }

    /// Reads and indexes one on-disk file: attributes, definitions, docs,
    /// and tags. The unit of work for scans and watched-file events.
    pub fn index_file(&mut self, path: &Path) -> Result<Url, IndexError> {
        let text = fs::read_to_string(path)?;
        let uri = Url::from_file_path(path)
            .map_err(|_| IndexError::InvalidPath(path.to_path_buf()))?;
        self.update_file(uri.clone(), &text);
        self.index_tags(&uri, &text);
        Ok(uri)
    }

    /// Registers a workspace root and indexes every `.tdl` file beneath it.
    ///
    /// The walk is iterative, honors ignore files, and visits paths in
    /// sorted order so that duplicate definitions resolve the same way on
    /// every platform. Per-file failures are logged and skipped. Returns
    /// the number of files indexed.
    pub fn scan_root(&mut self, root: &Path) -> usize {
        let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
        if !root.is_dir() {
            tracing::warn!(root = %root.display(), "scan root is not a directory");
            return 0;
        }
        if !self.roots.contains(&root) {
            self.roots.push(root.clone());
        }

        let mut walker = WalkBuilder::new(&root);
        walker
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .ignore(true)
            .add_custom_ignore_filename(".gitignore")
            .hidden(false)
            .follow_links(false)
            .standard_filters(true)
            .sort_by_file_path(|a, b| a.cmp(b));

        let mut indexed = 0usize;
        for result in walker.build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(error) => {
                    tracing::warn!(%error, "workspace walk error");
                    continue;
                }
            };
            let Some(file_type) = entry.file_type() else {
                continue;
            };
            if !file_type.is_file() {
                continue;
            }
            if entry.path().extension().and_then(|ext| ext.to_str()) != Some(TDL_EXTENSION) {
                continue;
            }
            match self.index_file(entry.path()) {
                Ok(_) => indexed += 1,
                Err(error) => {
                    tracing::warn!(path = %entry.path().display(), %error, "skipping file");
                }
            }
        }

        tracing::debug!(root = %root.display(), indexed, "workspace scan finished");
        indexed
    }

    /// Attribute names recorded for an object, across all live files.
    pub fn attributes_for(&self, object: &str) -> Option<&BTreeSet<String>> {
        self.symbols.get(object)
    }

    /// Every object name in the global symbol table, in no particular order.
    pub fn object_names(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(String::as_str)
    }

    pub fn definition(&self, name: &str) -> Option<&Location> {
        self.definitions.get(name)
    }

    pub fn definition_names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    pub fn documentation(&self, name: &str) -> Option<&str> {
        self.documentation.get(name).map(String::as_str)
    }

    /// Visible tags in first-seen order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.visible()
    }

    /// The most recently indexed text for a file, if any.
    pub fn file_text(&self, uri: &Url) -> Option<&str> {
        self.files.get(uri).map(|index| index.text.as_str())
    }

    /// Registered scan roots, in registration order.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn rebuild_symbols(&mut self) {
        let mut symbols = AttributeMap::new();
        for index in self.files.values() {
            for (object, attributes) in &index.attributes {
                symbols
                    .entry(object.clone())
                    .or_default()
                    .extend(attributes.iter().cloned());
            }
        }
        self.symbols = symbols;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> Url {
        Url::parse(&format!("file:///grammar/{name}")).unwrap()
    }

    fn attribute_names(ws: &Workspace, object: &str) -> Vec<String> {
        ws.attributes_for(object)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    #[test]
    fn global_table_is_the_union_of_live_files() {
        let mut ws = Workspace::new();
        ws.update_file(file("a.tdl"), "obj [ FROM-A x ]");
        ws.update_file(file("b.tdl"), "obj [ FROM-B y ]");

        assert_eq!(attribute_names(&ws, "obj"), vec!["FROM-A", "FROM-B"]);
    }

    #[test]
    fn removing_a_file_keeps_other_contributions() {
        let mut ws = Workspace::new();
        ws.update_file(file("a.tdl"), "obj [ SHARED s, ONLY-A a ]");
        ws.update_file(file("b.tdl"), "obj [ SHARED s ]");

        ws.remove_file(&file("a.tdl"));
        assert_eq!(attribute_names(&ws, "obj"), vec!["SHARED"]);
    }

    #[test]
    fn reindexing_replaces_the_previous_map_wholesale() {
        let mut ws = Workspace::new();
        let uri = file("a.tdl");
        ws.update_file(uri.clone(), "obj [ STALE x ]");
        ws.update_file(uri, "obj [ FRESH y ]");

        assert_eq!(attribute_names(&ws, "obj"), vec!["FRESH"]);
    }

    #[test]
    fn definitions_survive_file_removal() {
        let mut ws = Workspace::new();
        let uri = file("a.tdl");
        ws.update_file(uri.clone(), "ghost := *top*.");
        ws.remove_file(&uri);

        assert!(ws.definition("ghost").is_some());
    }

    #[test]
    fn later_update_wins_name_collisions() {
        let mut ws = Workspace::new();
        ws.update_file(file("a.tdl"), "dup := x.");
        ws.update_file(file("b.tdl"), "dup := y.");

        let def = ws.definition("dup").unwrap();
        assert_eq!(def.uri, file("b.tdl"));
    }

    #[test]
    fn documentation_is_indexed_with_definitions() {
        let mut ws = Workspace::new();
        ws.update_file(file("a.tdl"), "verb := x &\n\"\"\" A verb. \"\"\" .");
        assert_eq!(ws.documentation("verb"), Some("A verb."));
    }

    #[test]
    fn tag_indexing_is_separate_from_attribute_indexing() {
        let mut ws = Workspace::new();
        let uri = file("a.tdl");
        ws.update_file(uri.clone(), "x [ ARGS #subj ]");
        assert_eq!(ws.tags().count(), 0);

        ws.index_tags(&uri, "x [ ARGS #subj ]");
        assert_eq!(ws.tags().collect::<Vec<_>>(), vec!["subj"]);
    }

    #[test]
    fn removing_a_tag_only_file_withdraws_its_tags() {
        let mut ws = Workspace::new();
        let uri = file("markers.tdl");
        ws.index_tags(&uri, "#alpha");
        ws.remove_file(&uri);
        assert_eq!(ws.tags().count(), 0);
    }

    #[test]
    fn structural_edit_characters() {
        for ch in [':', ']', '<', '>', '&'] {
            assert!(is_structural_edit(ch));
        }
        for ch in ['[', 'a', ' ', '#', '.'] {
            assert!(!is_structural_edit(ch));
        }
    }

    #[test]
    fn scan_of_a_missing_root_indexes_nothing() {
        let mut ws = Workspace::new();
        assert_eq!(ws.scan_root(Path::new("/definitely/not/here")), 0);
        assert!(ws.roots().is_empty());
        assert!(ws.is_empty());
    }
}
