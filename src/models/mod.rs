use crate::store::StoreError;
use serde::{Deserialize, Serialize};

/// One entry of the bookmark tree as mirrored from the store.
///
/// `chrome.bookmarks` returns camelCase keys (`parentId`, `dateAdded`, ...).
/// Fields we never read are ignored on decode.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BookmarkNode {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,

    #[serde(default)]
    pub title: String,

    /// Present only on links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Present (possibly empty) only on folders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<BookmarkNode>>,
}

impl BookmarkNode {
    pub fn folder(id: impl Into<String>, title: impl Into<String>, children: Vec<BookmarkNode>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            index: None,
            title: title.into(),
            url: None,
            children: Some(children),
        }
    }

    pub fn link(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            index: None,
            title: title.into(),
            url: Some(url.into()),
            children: None,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.children.is_some()
    }

    /// Label handed to the rendering layer.
    pub fn display_label(&self) -> String {
        if self.is_folder() {
            format!("📁 {}", self.title)
        } else {
            self.title.clone()
        }
    }

    /// Checks that every node in this subtree is either a link or a folder, never both or neither.
    pub fn validate(&self) -> Result<(), StoreError> {
        match (&self.url, &self.children) {
            (Some(_), Some(_)) => Err(StoreError::integrity(format!(
                "node {} has both a url and children",
                self.id
            ))),
            (None, None) => Err(StoreError::integrity(format!(
                "node {} has neither a url nor children",
                self.id
            ))),
            (None, Some(children)) => children.iter().try_for_each(BookmarkNode::validate),
            (Some(_), None) => Ok(()),
        }
    }

    /// Moves the children out of a validated folder.
    pub fn into_children(self) -> Vec<BookmarkNode> {
        self.children.unwrap_or_default()
    }
}

/// Basic fields of a node as returned by a lookup by id. Never carries children.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BookmarkSummary {
    pub id: String,

    #[serde(default)]
    pub parent_id: Option<String>,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub url: Option<String>,
}
