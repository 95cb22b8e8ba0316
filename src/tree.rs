use std::collections::{HashMap, HashSet};

use crate::remote::{ChangeKind, ChangedFile, EntryKind, FileEntry};

/// Workspace-relative path of the tree root.
pub const ROOT_PATH: &str = ".";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
}

#[derive(Debug)]
pub struct TreeNode {
    pub name: String,
    pub path: String,
    pub kind: EntryKind,
    pub state: LoadState,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn directory(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            kind: EntryKind::Directory,
            state: LoadState::Unloaded,
            children: Vec::new(),
        }
    }

    fn file(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            kind: EntryKind::File,
            state: LoadState::Loaded,
            children: Vec::new(),
        }
    }
}

fn child_path(parent: &str, name: &str) -> String {
    if parent == ROOT_PATH {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

/// Lazily loaded workspace file tree with change badges.
///
/// Directory contents are fetched on demand: expanding an unloaded
/// directory marks it for loading and `pending_loads` hands the paths to
/// the caller to fetch. The expanded-path set survives refreshes, so an
/// open subtree reloads in place. Badges come from the session's change
/// summary and bubble up to ancestor directories as a dirty marker.
#[derive(Debug)]
pub struct FileTree {
    root: TreeNode,
    expanded: HashSet<String>,
    badges: HashMap<String, ChangeKind>,
    dirty_dirs: HashSet<String>,
}

impl Default for FileTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FileTree {
    pub fn new() -> Self {
        Self {
            root: TreeNode::directory(ROOT_PATH, ROOT_PATH),
            expanded: HashSet::new(),
            badges: HashMap::new(),
            dirty_dirs: HashSet::new(),
        }
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        path == ROOT_PATH || self.expanded.contains(path)
    }

    pub fn toggle(&mut self, path: &str) {
        if path == ROOT_PATH {
            return;
        }
        if !self.expanded.remove(path) {
            self.expanded.insert(path.to_string());
        }
    }

    /// Directories that are visible, expanded, and not yet loaded. Marks
    /// them `Loading` so each fetch is requested once.
    pub fn pending_loads(&mut self) -> Vec<String> {
        let mut wanted = Vec::new();
        collect_pending(&mut self.root, &self.expanded, &mut wanted);
        wanted
    }

    /// Fill a directory with a fetched listing, directories first. Already
    /// loaded child subtrees are kept when name and kind still match.
    pub fn apply_listing(&mut self, path: &str, entries: &[FileEntry]) {
        let Some(node) = find_node_mut(&mut self.root, path) else {
            return;
        };
        let mut previous: HashMap<String, TreeNode> = node
            .children
            .drain(..)
            .map(|child| (child.name.clone(), child))
            .collect();

        let mut sorted: Vec<&FileEntry> = entries.iter().collect();
        sorted.sort_by(|a, b| {
            let rank = |e: &FileEntry| match e.kind {
                EntryKind::Directory => 0,
                EntryKind::File => 1,
            };
            rank(a).cmp(&rank(b)).then_with(|| a.name.cmp(&b.name))
        });

        node.children = sorted
            .into_iter()
            .map(|entry| {
                let full = child_path(path, &entry.name);
                match previous.remove(&entry.name) {
                    Some(old) if old.kind == entry.kind => old,
                    _ => match entry.kind {
                        EntryKind::Directory => TreeNode::directory(&entry.name, &full),
                        EntryKind::File => TreeNode::file(&entry.name, &full),
                    },
                }
            })
            .collect();
        node.state = LoadState::Loaded;
    }

    /// Re-fetch everything while keeping the expansion set and badges.
    pub fn refresh(&mut self) {
        mark_unloaded(&mut self.root);
    }

    /// Forget everything (session switched).
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn apply_changes(&mut self, files: &[ChangedFile]) {
        self.badges.clear();
        self.dirty_dirs.clear();
        for file in files {
            self.badges.insert(file.path.clone(), file.status);
            for ancestor in ancestors(&file.path) {
                self.dirty_dirs.insert(ancestor);
            }
        }
    }

    pub fn badge(&self, path: &str) -> Option<ChangeKind> {
        self.badges.get(path).copied()
    }

    /// Whether any changed file lives under this directory.
    pub fn dir_has_changes(&self, path: &str) -> bool {
        if path == ROOT_PATH {
            !self.badges.is_empty()
        } else {
            self.dirty_dirs.contains(path)
        }
    }

    pub fn changed_paths(&self) -> impl Iterator<Item = &str> {
        self.badges.keys().map(String::as_str)
    }

    #[cfg(test)]
    fn node(&self, path: &str) -> Option<&TreeNode> {
        find_node(&self.root, path)
    }
}

fn collect_pending(node: &mut TreeNode, expanded: &HashSet<String>, wanted: &mut Vec<String>) {
    if node.kind != EntryKind::Directory {
        return;
    }
    let visible = node.path == ROOT_PATH || expanded.contains(&node.path);
    if !visible {
        return;
    }
    match node.state {
        LoadState::Unloaded => {
            node.state = LoadState::Loading;
            wanted.push(node.path.clone());
        }
        LoadState::Loading => {}
        LoadState::Loaded => {
            for child in &mut node.children {
                collect_pending(child, expanded, wanted);
            }
        }
    }
}

fn mark_unloaded(node: &mut TreeNode) {
    if node.kind == EntryKind::Directory {
        node.state = LoadState::Unloaded;
        for child in &mut node.children {
            mark_unloaded(child);
        }
    }
}

fn find_node_mut<'a>(node: &'a mut TreeNode, path: &str) -> Option<&'a mut TreeNode> {
    if node.path == path {
        return Some(node);
    }
    node.children
        .iter_mut()
        .find(|child| path == child.path || path.starts_with(&format!("{}/", child.path)))
        .and_then(|child| find_node_mut(child, path))
}

#[cfg(test)]
fn find_node<'a>(node: &'a TreeNode, path: &str) -> Option<&'a TreeNode> {
    if node.path == path {
        return Some(node);
    }
    node.children
        .iter()
        .find(|child| path == child.path || path.starts_with(&format!("{}/", child.path)))
        .and_then(|child| find_node(child, path))
}

/// Ancestor directories of a workspace-relative path, nearest last.
fn ancestors(path: &str) -> Vec<String> {
    let mut out = Vec::new();
    for (i, byte) in path.bytes().enumerate() {
        if byte == b'/' {
            out.push(path[..i].to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir(name: &str) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            kind: EntryKind::Directory,
            size: None,
        }
    }

    fn file(name: &str) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            kind: EntryKind::File,
            size: Some(1),
        }
    }

    #[test]
    fn root_loads_lazily_and_once() {
        let mut tree = FileTree::new();
        assert_eq!(tree.pending_loads(), vec![ROOT_PATH.to_string()]);
        // Loading state suppresses a duplicate request.
        assert!(tree.pending_loads().is_empty());

        tree.apply_listing(ROOT_PATH, &[dir("src"), file("Cargo.toml")]);
        assert!(tree.pending_loads().is_empty());
    }

    #[test]
    fn listing_sorts_directories_first() {
        let mut tree = FileTree::new();
        tree.pending_loads();
        tree.apply_listing(ROOT_PATH, &[file("zz.txt"), dir("src"), file("aa.txt"), dir("docs")]);
        let names: Vec<&str> = tree
            .root()
            .children
            .iter()
            .map(|n| n.name.as_str())
            .collect();
        assert_eq!(names, ["docs", "src", "aa.txt", "zz.txt"]);
    }

    #[test]
    fn expanding_a_directory_requests_its_listing() {
        let mut tree = FileTree::new();
        tree.pending_loads();
        tree.apply_listing(ROOT_PATH, &[dir("src")]);

        // Collapsed: nothing to load yet.
        assert!(tree.pending_loads().is_empty());

        tree.toggle("src");
        assert_eq!(tree.pending_loads(), vec!["src".to_string()]);
        tree.apply_listing("src", &[dir("ui"), file("main.rs")]);

        tree.toggle("src/ui");
        assert_eq!(tree.pending_loads(), vec!["src/ui".to_string()]);
        tree.apply_listing("src/ui", &[file("chat.rs")]);
        assert_eq!(tree.node("src/ui/chat.rs").unwrap().kind, EntryKind::File);
    }

    #[test]
    fn refresh_keeps_expansion_and_reloads_open_dirs() {
        let mut tree = FileTree::new();
        tree.pending_loads();
        tree.apply_listing(ROOT_PATH, &[dir("src")]);
        tree.toggle("src");
        tree.pending_loads();
        tree.apply_listing("src", &[file("main.rs")]);

        tree.refresh();
        assert!(tree.is_expanded("src"));
        // Root reloads first; src stays pending until its parent is back.
        assert_eq!(tree.pending_loads(), vec![ROOT_PATH.to_string()]);
        tree.apply_listing(ROOT_PATH, &[dir("src")]);
        assert_eq!(tree.pending_loads(), vec!["src".to_string()]);
    }

    #[test]
    fn reloaded_listing_keeps_loaded_subtrees() {
        let mut tree = FileTree::new();
        tree.pending_loads();
        tree.apply_listing(ROOT_PATH, &[dir("src")]);
        tree.toggle("src");
        tree.pending_loads();
        tree.apply_listing("src", &[file("main.rs")]);

        // Root relist with the same directory keeps src's children.
        tree.apply_listing(ROOT_PATH, &[dir("src"), file("README.md")]);
        let src = tree.node("src").unwrap();
        assert_eq!(src.state, LoadState::Loaded);
        assert_eq!(src.children.len(), 1);
    }

    #[test]
    fn badges_mark_files_and_dirty_ancestors() {
        let mut tree = FileTree::new();
        tree.apply_changes(&[
            ChangedFile {
                path: "src/ui/chat.rs".into(),
                status: ChangeKind::Modified,
                old_path: None,
            },
            ChangedFile {
                path: "README.md".into(),
                status: ChangeKind::Added,
                old_path: None,
            },
        ]);

        assert_eq!(tree.badge("src/ui/chat.rs"), Some(ChangeKind::Modified));
        assert_eq!(tree.badge("README.md"), Some(ChangeKind::Added));
        assert_eq!(tree.badge("src"), None);
        assert!(tree.dir_has_changes("src"));
        assert!(tree.dir_has_changes("src/ui"));
        assert!(tree.dir_has_changes(ROOT_PATH));
        assert!(!tree.dir_has_changes("docs"));
    }

    #[test]
    fn reapplying_changes_replaces_old_badges() {
        let mut tree = FileTree::new();
        tree.apply_changes(&[ChangedFile {
            path: "a.txt".into(),
            status: ChangeKind::Modified,
            old_path: None,
        }]);
        tree.apply_changes(&[]);
        assert_eq!(tree.badge("a.txt"), None);
        assert!(!tree.dir_has_changes(ROOT_PATH));
    }
}
