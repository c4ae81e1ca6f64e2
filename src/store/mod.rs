mod chrome;
pub(crate) mod memory;

pub(crate) use chrome::ChromeBookmarks;
pub(crate) use memory::MemoryStore;

use crate::models::{BookmarkNode, BookmarkSummary};

/// Id of the synthetic root above the top-level containers.
pub(crate) const ROOT_ID: &str = "0";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum StoreErrorKind {
    /// The store cannot be reached (missing API, extension context gone).
    Unavailable,
    /// The store refused the request (JS exception or rejected promise).
    Rejected,
    NotFound,
    Parse,
    /// The store returned a node that is neither a link nor a folder, or both.
    Integrity,
}

#[derive(Clone, Debug)]
pub(crate) struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StoreError {}

impl StoreError {
    pub(crate) fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: StoreErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub(crate) fn rejected(ctx: &str, detail: impl std::fmt::Display) -> Self {
        Self {
            kind: StoreErrorKind::Rejected,
            message: format!("{ctx}: {detail}"),
        }
    }

    pub(crate) fn not_found(id: &str) -> Self {
        Self {
            kind: StoreErrorKind::NotFound,
            message: format!("no bookmark with id {id}"),
        }
    }

    pub(crate) fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: StoreErrorKind::Parse,
            message: e.to_string(),
        }
    }

    pub(crate) fn integrity(message: impl Into<String>) -> Self {
        Self {
            kind: StoreErrorKind::Integrity,
            message: message.into(),
        }
    }
}

pub(crate) type StoreResult<T> = Result<T, StoreError>;

/// Async CRUD surface of the external bookmark tree.
///
/// Futures are polled on the single UI thread, so implementations are not
/// required to be `Send`.
#[allow(async_fn_in_trait)]
pub(crate) trait BookmarkStore {
    /// Synthetic root whose first two children are the primary and secondary containers.
    async fn get_tree(&self) -> StoreResult<BookmarkNode>;

    async fn get(&self, id: &str) -> StoreResult<BookmarkSummary>;

    async fn get_subtree(&self, id: &str) -> StoreResult<BookmarkNode>;

    /// Creates a folder. The returned node carries an empty `children` list.
    async fn create_folder(&self, parent_id: &str, index: usize, title: &str) -> StoreResult<BookmarkNode>;

    async fn update_title(&self, id: &str, title: &str) -> StoreResult<()>;

    async fn remove_tree(&self, id: &str) -> StoreResult<()>;

    async fn move_node(&self, id: &str, parent_id: &str, index: usize) -> StoreResult<()>;
}

/// The store backing the page: the browser's bookmarks, or the demo tree.
#[derive(Clone)]
pub(crate) enum AnyStore {
    Chrome(ChromeBookmarks),
    Memory(MemoryStore),
}

impl AnyStore {
    /// Prefers `chrome.bookmarks` unless the demo tree is forced or the API is missing.
    pub(crate) fn select(force_demo: bool) -> Self {
        if !force_demo && ChromeBookmarks::is_available() {
            AnyStore::Chrome(ChromeBookmarks)
        } else {
            AnyStore::Memory(MemoryStore::demo())
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            AnyStore::Chrome(_) => "chrome.bookmarks",
            AnyStore::Memory(_) => "demo",
        }
    }
}

impl BookmarkStore for AnyStore {
    async fn get_tree(&self) -> StoreResult<BookmarkNode> {
        match self {
            AnyStore::Chrome(s) => s.get_tree().await,
            AnyStore::Memory(s) => s.get_tree().await,
        }
    }

    async fn get(&self, id: &str) -> StoreResult<BookmarkSummary> {
        match self {
            AnyStore::Chrome(s) => s.get(id).await,
            AnyStore::Memory(s) => s.get(id).await,
        }
    }

    async fn get_subtree(&self, id: &str) -> StoreResult<BookmarkNode> {
        match self {
            AnyStore::Chrome(s) => s.get_subtree(id).await,
            AnyStore::Memory(s) => s.get_subtree(id).await,
        }
    }

    async fn create_folder(&self, parent_id: &str, index: usize, title: &str) -> StoreResult<BookmarkNode> {
        match self {
            AnyStore::Chrome(s) => s.create_folder(parent_id, index, title).await,
            AnyStore::Memory(s) => s.create_folder(parent_id, index, title).await,
        }
    }

    async fn update_title(&self, id: &str, title: &str) -> StoreResult<()> {
        match self {
            AnyStore::Chrome(s) => s.update_title(id, title).await,
            AnyStore::Memory(s) => s.update_title(id, title).await,
        }
    }

    async fn remove_tree(&self, id: &str) -> StoreResult<()> {
        match self {
            AnyStore::Chrome(s) => s.remove_tree(id).await,
            AnyStore::Memory(s) => s.remove_tree(id).await,
        }
    }

    async fn move_node(&self, id: &str, parent_id: &str, index: usize) -> StoreResult<()> {
        match self {
            AnyStore::Chrome(s) => s.move_node(id, parent_id, index).await,
            AnyStore::Memory(s) => s.move_node(id, parent_id, index).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display_is_message() {
        let e = StoreError::rejected("bookmarks.move", "Can't modify the root bookmark folders.");
        assert_eq!(e.kind, StoreErrorKind::Rejected);
        assert_eq!(e.to_string(), "bookmarks.move: Can't modify the root bookmark folders.");
    }

    #[test]
    fn test_not_found_names_id() {
        let e = StoreError::not_found("42");
        assert_eq!(e.kind, StoreErrorKind::NotFound);
        assert!(e.message.contains("42"));
    }

    #[test]
    fn test_select_falls_back_to_demo_when_forced() {
        let store = AnyStore::select(true);
        assert_eq!(store.name(), "demo");
    }
}
