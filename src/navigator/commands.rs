use super::PaneId;
use crate::models::BookmarkNode;
use crate::store::{BookmarkStore, StoreResult};

/// Which entry to select once a container has been reopened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Selection {
    /// The child we ascended from; falls back to the first entry when it is gone.
    Child(String),
    First,
}

/// A store mutation or lookup issued by a transition.
///
/// Each command carries the context its result is merged back into, since the
/// cursor may have moved on by the time the store answers.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StoreCommand {
    CreateFolder {
        pane: PaneId,
        parent_id: String,
        index: usize,
        title: String,
    },
    Rename {
        pane: PaneId,
        node_id: String,
        title: String,
    },
    Remove {
        pane: PaneId,
        container_id: String,
        node_id: String,
    },
    MoveAcross {
        from: PaneId,
        from_container_id: String,
        to_container_id: String,
        node: BookmarkNode,
    },
    LookupParent {
        pane: PaneId,
        container_id: String,
    },
    /// Replaces `pane`'s items with `container_id`'s children, provided the pane
    /// still shows `expected_container_id` when the result lands.
    OpenContainer {
        pane: PaneId,
        expected_container_id: String,
        container_id: String,
        select: Selection,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StoreReply {
    Created(BookmarkNode),
    Done,
    Parent(Option<String>),
    Container(BookmarkNode),
}

impl StoreCommand {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            StoreCommand::CreateFolder { .. } => "create-folder",
            StoreCommand::Rename { .. } => "rename",
            StoreCommand::Remove { .. } => "remove",
            StoreCommand::MoveAcross { .. } => "move",
            StoreCommand::LookupParent { .. } => "lookup-parent",
            StoreCommand::OpenContainer { .. } => "open-container",
        }
    }
}

/// Runs one command against the store.
pub(crate) async fn execute<S: BookmarkStore>(store: &S, command: &StoreCommand) -> StoreResult<StoreReply> {
    match command {
        StoreCommand::CreateFolder {
            parent_id,
            index,
            title,
            ..
        } => store
            .create_folder(parent_id, *index, title)
            .await
            .map(StoreReply::Created),
        StoreCommand::Rename { node_id, title, .. } => {
            store.update_title(node_id, title).await?;
            Ok(StoreReply::Done)
        }
        StoreCommand::Remove { node_id, .. } => {
            store.remove_tree(node_id).await?;
            Ok(StoreReply::Done)
        }
        StoreCommand::MoveAcross {
            to_container_id,
            node,
            ..
        } => {
            store.move_node(&node.id, to_container_id, 0).await?;
            Ok(StoreReply::Done)
        }
        StoreCommand::LookupParent { container_id, .. } => {
            let summary = store.get(container_id).await?;
            Ok(StoreReply::Parent(summary.parent_id))
        }
        StoreCommand::OpenContainer { container_id, .. } => {
            let node = store.get_subtree(container_id).await?;
            node.validate()?;
            Ok(StoreReply::Container(node))
        }
    }
}
