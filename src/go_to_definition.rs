use crate::text::{Position, SourceLocation, word_at};
use crate::workspace::{Location, Workspace};
use pathdiff::diff_paths;
use std::path::{Path, PathBuf};
use url::Url;

/// Resolves the identifier under `position` to its definition site.
///
/// The stored location is translated against the registered workspace root
/// containing the defining file, so hosts receive a URL rooted in the folder
/// they opened. Definitions outside every registered root do not resolve.
pub fn goto_definition(workspace: &Workspace, uri: &Url, position: Position) -> Option<Location> {
    let text = workspace.file_text(uri)?;
    let locator = SourceLocation::new(text);
    let offset = locator.offset_at(position);
    let span = word_at(text, offset, workspace.limits().word_window)?;

    let definition = workspace.definition(&text[span])?;
    let definition_path = definition.uri.to_file_path().ok()?;

    let (root, relative) = containing_root(workspace.roots(), &definition_path)?;
    let uri = Url::from_file_path(root.join(relative)).ok()?;
    Some(Location {
        uri,
        range: definition.range.clone(),
    })
}

/// Picks the deepest registered root containing `path`.
fn containing_root<'a>(roots: &'a [PathBuf], path: &Path) -> Option<(&'a Path, PathBuf)> {
    roots
        .iter()
        .filter_map(|root| {
            let relative = diff_paths(path, root)?;
            if relative.starts_with("..") || relative.is_absolute() {
                return None;
            }
            Some((root.as_path(), relative))
        })
        .max_by_key(|(root, _)| root.components().count())
}
