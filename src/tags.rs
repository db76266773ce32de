//! Workspace-wide tag vocabulary with provenance.
//!
//! Tags (`#hook`) are a flat marker namespace unrelated to the attribute
//! system. Completion offers them in the order they were first seen anywhere
//! in the workspace, so each tag keeps a permanent insertion rank. Ownership
//! is tracked per file: a tag is visible while at least one indexed file
//! still contains it, and a tag that regains an owner reappears at its
//! original rank.

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use url::Url;

// Tag bodies are narrower than general identifiers: no `*`.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([A-Za-z0-9_+\-]+)").expect("tag pattern compiles"));

#[derive(Debug, Default)]
pub struct TagIndex {
    entries: Vec<TagEntry>,
    ranks: HashMap<String, usize>,
}

#[derive(Debug)]
struct TagEntry {
    text: String,
    owners: HashSet<Url>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces `owner`'s tag contribution with the tags found in `text`.
    pub fn index_document(&mut self, owner: &Url, text: &str) {
        let mut current: HashSet<String> = HashSet::new();
        for caps in TAG_RE.captures_iter(text) {
            let tag = &caps[1];
            current.insert(tag.to_string());
            let rank = match self.ranks.get(tag) {
                Some(&rank) => rank,
                None => {
                    let rank = self.entries.len();
                    self.entries.push(TagEntry {
                        text: tag.to_string(),
                        owners: HashSet::new(),
                    });
                    self.ranks.insert(tag.to_string(), rank);
                    rank
                }
            };
            self.entries[rank].owners.insert(owner.clone());
        }

        for entry in &mut self.entries {
            if !current.contains(&entry.text) {
                entry.owners.remove(owner);
            }
        }
    }

    /// Withdraws every tag owned by `owner`, hiding tags it alone sustained.
    pub fn remove_owner(&mut self, owner: &Url) {
        for entry in &mut self.entries {
            entry.owners.remove(owner);
        }
    }

    /// Visible tags in first-seen order.
    pub fn visible(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|entry| !entry.owners.is_empty())
            .map(|entry| entry.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> Url {
        Url::parse(&format!("file:///grammar/{name}")).unwrap()
    }

    fn visible(index: &TagIndex) -> Vec<&str> {
        index.visible().collect()
    }

    #[test]
    fn tags_appear_in_first_seen_order() {
        let mut index = TagIndex::new();
        index.index_document(&file("a.tdl"), "ARGS < #subj, #comp > #subj");
        assert_eq!(visible(&index), vec!["subj", "comp"]);
    }

    #[test]
    fn ranks_span_files() {
        let mut index = TagIndex::new();
        index.index_document(&file("a.tdl"), "#probe");
        index.index_document(&file("b.tdl"), "#prime #probe");
        assert_eq!(visible(&index), vec!["probe", "prime"]);
    }

    #[test]
    fn removing_the_sole_owner_hides_the_tag() {
        let mut index = TagIndex::new();
        index.index_document(&file("a.tdl"), "#shared #only-a");
        index.index_document(&file("b.tdl"), "#shared");

        index.remove_owner(&file("a.tdl"));
        assert_eq!(visible(&index), vec!["shared"]);
    }

    #[test]
    fn reindexing_drops_tags_no_longer_in_the_file() {
        let mut index = TagIndex::new();
        let a = file("a.tdl");
        index.index_document(&a, "#old #kept");
        index.index_document(&a, "#kept #new");
        assert_eq!(visible(&index), vec!["kept", "new"]);
    }

    #[test]
    fn a_returning_tag_keeps_its_original_rank() {
        let mut index = TagIndex::new();
        let a = file("a.tdl");
        index.index_document(&a, "#first #second");
        index.index_document(&a, "#second");
        index.index_document(&a, "#second #first");
        assert_eq!(visible(&index), vec!["first", "second"]);
    }

    #[test]
    fn tag_bodies_stop_at_asterisks() {
        let mut index = TagIndex::new();
        index.index_document(&file("a.tdl"), "#top*list");
        assert_eq!(visible(&index), vec!["top"]);
    }
}
