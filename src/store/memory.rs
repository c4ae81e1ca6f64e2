use super::{BookmarkStore, StoreError, StoreResult, ROOT_ID};
use crate::models::{BookmarkNode, BookmarkSummary};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

pub(crate) const PRIMARY_ID: &str = "1";
pub(crate) const SECONDARY_ID: &str = "2";

#[derive(Clone, Debug)]
struct Entry {
    parent_id: Option<String>,
    title: String,
    url: Option<String>,
    children: Option<Vec<String>>,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    next_id: u64,
    offline: bool,
}

/// In-process bookmark tree with `chrome.bookmarks` semantics.
///
/// Backs the demo page when the extension API is missing. Clones share the same tree.
#[derive(Clone, Debug, Default)]
pub(crate) struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Builds a store whose root holds the two given containers' children.
    pub(crate) fn with_containers(primary: Vec<BookmarkNode>, secondary: Vec<BookmarkNode>) -> Self {
        let mut inner = Inner::default();

        inner.entries.insert(
            ROOT_ID.to_string(),
            Entry {
                parent_id: None,
                title: String::new(),
                url: None,
                children: Some(vec![PRIMARY_ID.to_string(), SECONDARY_ID.to_string()]),
            },
        );

        for (id, title, children) in [
            (PRIMARY_ID, "Bookmarks bar", primary),
            (SECONDARY_ID, "Other bookmarks", secondary),
        ] {
            let folder = BookmarkNode::folder(id, title, children);
            inner.insert_tree(&folder, ROOT_ID);
        }

        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Sample tree shown when the page is opened outside an extension.
    pub(crate) fn demo() -> Self {
        Self::with_containers(
            vec![
                BookmarkNode::folder(
                    "10",
                    "Rust",
                    vec![
                        BookmarkNode::link("11", "The Book", "https://doc.rust-lang.org/book/"),
                        BookmarkNode::link("12", "Reference", "https://doc.rust-lang.org/reference/"),
                        BookmarkNode::link("13", "Rustonomicon", "https://doc.rust-lang.org/nomicon/"),
                        BookmarkNode::folder(
                            "14",
                            "Crates",
                            vec![
                                BookmarkNode::link("15", "docs.rs", "https://docs.rs"),
                                BookmarkNode::link("16", "crates.io", "https://crates.io"),
                            ],
                        ),
                    ],
                ),
                BookmarkNode::link("20", "Leptos", "https://leptos.dev"),
                BookmarkNode::link("21", "wasm-bindgen guide", "https://rustwasm.github.io/docs/wasm-bindgen/"),
            ],
            vec![
                BookmarkNode::folder(
                    "30",
                    "Reading",
                    vec![BookmarkNode::link("31", "This Week in Rust", "https://this-week-in-rust.org")],
                ),
                BookmarkNode::link("32", "MDN", "https://developer.mozilla.org"),
            ],
        )
    }

    #[cfg(test)]
    pub(crate) fn set_offline(&self, offline: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.offline = offline;
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Inner>> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| StoreError::unavailable("memory store lock poisoned"))?;
        if inner.offline {
            return Err(StoreError::unavailable("memory store is offline"));
        }
        Ok(inner)
    }
}

impl Inner {
    fn insert_tree(&mut self, node: &BookmarkNode, parent_id: &str) {
        let children = node.children.as_ref().map(|children| {
            for child in children {
                self.insert_tree(child, &node.id);
            }
            children.iter().map(|c| c.id.clone()).collect()
        });

        if let Ok(n) = node.id.parse::<u64>() {
            self.next_id = self.next_id.max(n + 1);
        }

        self.entries.insert(
            node.id.clone(),
            Entry {
                parent_id: Some(parent_id.to_string()),
                title: node.title.clone(),
                url: node.url.clone(),
                children,
            },
        );
    }

    fn entry(&self, id: &str) -> StoreResult<&Entry> {
        self.entries.get(id).ok_or_else(|| StoreError::not_found(id))
    }

    /// The synthetic root and its direct children cannot be modified.
    fn guard_modifiable(&self, ctx: &str, id: &str) -> StoreResult<()> {
        let entry = self.entry(id)?;
        if id == ROOT_ID || entry.parent_id.as_deref() == Some(ROOT_ID) {
            return Err(StoreError::rejected(ctx, "Can't modify the root bookmark folders."));
        }
        Ok(())
    }

    fn build(&self, id: &str) -> StoreResult<BookmarkNode> {
        let entry = self.entry(id)?;
        let children = match &entry.children {
            Some(ids) => Some(ids.iter().map(|c| self.build(c)).collect::<StoreResult<Vec<_>>>()?),
            None => None,
        };
        let index = entry.parent_id.as_deref().and_then(|p| self.position(p, id));

        Ok(BookmarkNode {
            id: id.to_string(),
            parent_id: entry.parent_id.clone(),
            index,
            title: entry.title.clone(),
            url: entry.url.clone(),
            children,
        })
    }

    fn position(&self, parent_id: &str, id: &str) -> Option<usize> {
        self.entries
            .get(parent_id)?
            .children
            .as_ref()?
            .iter()
            .position(|c| c == id)
    }

    fn child_ids_mut(&mut self, ctx: &str, parent_id: &str) -> StoreResult<&mut Vec<String>> {
        self.entries
            .get_mut(parent_id)
            .ok_or_else(|| StoreError::not_found(parent_id))?
            .children
            .as_mut()
            .ok_or_else(|| StoreError::rejected(ctx, format!("{parent_id} is not a folder")))
    }

    fn is_descendant(&self, id: &str, ancestor: &str) -> bool {
        let mut cursor = Some(id.to_string());
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.entries.get(&current).and_then(|e| e.parent_id.clone());
        }
        false
    }

    fn remove_recursive(&mut self, id: &str) {
        if let Some(entry) = self.entries.remove(id) {
            for child in entry.children.unwrap_or_default() {
                self.remove_recursive(&child);
            }
        }
    }
}

impl BookmarkStore for MemoryStore {
    async fn get_tree(&self) -> StoreResult<BookmarkNode> {
        self.lock()?.build(ROOT_ID)
    }

    async fn get(&self, id: &str) -> StoreResult<BookmarkSummary> {
        let inner = self.lock()?;
        let entry = inner.entry(id)?;
        Ok(BookmarkSummary {
            id: id.to_string(),
            parent_id: entry.parent_id.clone(),
            title: entry.title.clone(),
            url: entry.url.clone(),
        })
    }

    async fn get_subtree(&self, id: &str) -> StoreResult<BookmarkNode> {
        self.lock()?.build(id)
    }

    async fn create_folder(&self, parent_id: &str, index: usize, title: &str) -> StoreResult<BookmarkNode> {
        let mut inner = self.lock()?;
        if parent_id == ROOT_ID {
            return Err(StoreError::rejected("bookmarks.create", "Can't modify the root bookmark folders."));
        }

        let id = inner.next_id.to_string();
        let siblings = inner.child_ids_mut("bookmarks.create", parent_id)?;
        let index = index.min(siblings.len());
        siblings.insert(index, id.clone());

        inner.next_id += 1;
        inner.entries.insert(
            id.clone(),
            Entry {
                parent_id: Some(parent_id.to_string()),
                title: title.to_string(),
                url: None,
                children: Some(Vec::new()),
            },
        );

        inner.build(&id)
    }

    async fn update_title(&self, id: &str, title: &str) -> StoreResult<()> {
        let mut inner = self.lock()?;
        inner.guard_modifiable("bookmarks.update", id)?;
        if let Some(entry) = inner.entries.get_mut(id) {
            entry.title = title.to_string();
        }
        Ok(())
    }

    async fn remove_tree(&self, id: &str) -> StoreResult<()> {
        let mut inner = self.lock()?;
        inner.guard_modifiable("bookmarks.removeTree", id)?;

        if let Some(parent_id) = inner.entry(id)?.parent_id.clone() {
            inner.child_ids_mut("bookmarks.removeTree", &parent_id)?.retain(|c| c != id);
        }
        inner.remove_recursive(id);
        Ok(())
    }

    async fn move_node(&self, id: &str, parent_id: &str, index: usize) -> StoreResult<()> {
        let mut inner = self.lock()?;
        inner.guard_modifiable("bookmarks.move", id)?;
        if parent_id == ROOT_ID {
            return Err(StoreError::rejected("bookmarks.move", "Can't modify the root bookmark folders."));
        }
        if inner.is_descendant(parent_id, id) {
            return Err(StoreError::rejected("bookmarks.move", "Can't move a folder into itself."));
        }
        // Validate the destination before detaching anything.
        inner.child_ids_mut("bookmarks.move", parent_id)?;

        if let Some(old_parent) = inner.entry(id)?.parent_id.clone() {
            inner.child_ids_mut("bookmarks.move", &old_parent)?.retain(|c| c != id);
        }

        let siblings = inner.child_ids_mut("bookmarks.move", parent_id)?;
        let index = index.min(siblings.len());
        siblings.insert(index, id.to_string());

        if let Some(entry) = inner.entries.get_mut(id) {
            entry.parent_id = Some(parent_id.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreErrorKind;
    use futures::executor::block_on;

    fn titles(node: &BookmarkNode) -> Vec<String> {
        node.children
            .as_ref()
            .map(|c| c.iter().map(|n| n.title.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_demo_tree_has_two_containers() {
        let store = MemoryStore::demo();
        let root = block_on(store.get_tree()).expect("tree should load");
        assert_eq!(root.id, ROOT_ID);
        assert_eq!(titles(&root), vec!["Bookmarks bar", "Other bookmarks"]);
        assert!(root.validate().is_ok());
    }

    #[test]
    fn test_get_reports_parent() {
        let store = MemoryStore::demo();
        let summary = block_on(store.get("14")).expect("crates folder exists");
        assert_eq!(summary.parent_id.as_deref(), Some("10"));

        let bar = block_on(store.get(PRIMARY_ID)).unwrap();
        assert_eq!(bar.parent_id.as_deref(), Some(ROOT_ID));
    }

    #[test]
    fn test_create_folder_inserts_at_index_with_fresh_id() {
        let store = MemoryStore::demo();
        let created = block_on(store.create_folder(PRIMARY_ID, 1, "New Folder")).expect("create should succeed");
        assert_eq!(created.children, Some(vec![]));
        assert_eq!(created.index, Some(1));
        assert_eq!(created.id, "33");

        let bar = block_on(store.get_subtree(PRIMARY_ID)).unwrap();
        assert_eq!(titles(&bar), vec!["Rust", "New Folder", "Leptos", "wasm-bindgen guide"]);
    }

    #[test]
    fn test_create_clamps_index_past_end() {
        let store = MemoryStore::with_containers(vec![], vec![]);
        let created = block_on(store.create_folder(SECONDARY_ID, 9, "x")).unwrap();
        assert_eq!(created.index, Some(0));
    }

    #[test]
    fn test_remove_tree_drops_descendants() {
        let store = MemoryStore::demo();
        block_on(store.remove_tree("10")).expect("remove should succeed");
        assert_eq!(block_on(store.get("15")).unwrap_err().kind, StoreErrorKind::NotFound);
        let bar = block_on(store.get_subtree(PRIMARY_ID)).unwrap();
        assert_eq!(titles(&bar), vec!["Leptos", "wasm-bindgen guide"]);
    }

    #[test]
    fn test_root_folders_are_protected() {
        let store = MemoryStore::demo();
        let err = block_on(store.remove_tree(PRIMARY_ID)).unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::Rejected);
        let err = block_on(store.update_title(ROOT_ID, "x")).unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::Rejected);
    }

    #[test]
    fn test_move_node_across_containers() {
        let store = MemoryStore::demo();
        block_on(store.move_node("20", SECONDARY_ID, 0)).expect("move should succeed");
        let other = block_on(store.get_subtree(SECONDARY_ID)).unwrap();
        assert_eq!(titles(&other), vec!["Leptos", "Reading", "MDN"]);
        assert_eq!(block_on(store.get("20")).unwrap().parent_id.as_deref(), Some(SECONDARY_ID));
    }

    #[test]
    fn test_move_into_own_descendant_is_rejected() {
        let store = MemoryStore::demo();
        let err = block_on(store.move_node("10", "14", 0)).unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::Rejected);
        let rust = block_on(store.get_subtree("10")).unwrap();
        assert_eq!(rust.children.unwrap().len(), 4);
    }

    #[test]
    fn test_offline_store_is_unavailable() {
        let store = MemoryStore::demo();
        store.set_offline(true);
        let err = block_on(store.get_tree()).unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::Unavailable);
    }
}
