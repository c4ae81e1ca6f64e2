//! Cursor and edit state for the two bookmark panes.
//!
//! Every key press resolves to one [`Transition`]: local state changes happen
//! immediately, store work is returned as [`Effect::Store`] commands. The page
//! runs those commands and hands the results back through
//! [`Navigator::complete`]. Mutations only touch the cached panes once the
//! store has acknowledged them.

mod commands;
mod keys;

pub(crate) use commands::{execute, Selection, StoreCommand, StoreReply};
pub(crate) use keys::Key;

use crate::models::BookmarkNode;
use crate::storage::SessionSnapshot;
use crate::store::{StoreError, StoreErrorKind, StoreResult, ROOT_ID};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum PaneId {
    Primary,
    Secondary,
}

impl PaneId {
    pub(crate) fn opposite(self) -> PaneId {
        match self {
            PaneId::Primary => PaneId::Secondary,
            PaneId::Secondary => PaneId::Primary,
        }
    }
}

/// How ArrowLeft/ArrowRight behave and how many panes are on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum PaneLayout {
    /// Both panes visible. Pressing toward the pane you are already on ascends.
    #[default]
    Split,
    /// One pane visible at a time. Left/Right always jump to that pane's top.
    Toggle,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Pane {
    /// Folder whose children are listed.
    pub container_id: String,
    pub items: Vec<BookmarkNode>,
    /// Pixel shift applied to the list so the selection stays visible.
    pub scroll_offset: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cursor {
    pub pane: PaneId,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EditSession {
    pub node_id: String,
    pub draft: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) enum InputMode {
    #[default]
    Browsing,
    Renaming(EditSession),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Effect {
    Store(StoreCommand),
    /// Bring the selection of `pane` into view after the next render.
    Reveal { pane: PaneId, force_top: bool },
    OpenUrl(String),
    Reload,
    FocusEditor,
    BlurEditor,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Transition {
    /// Whether the key's default browser action must be suppressed.
    pub prevent_default: bool,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn handled(effects: Vec<Effect>) -> Self {
        Self {
            prevent_default: true,
            effects,
        }
    }

    fn ignored() -> Self {
        Self::default()
    }

    fn effects(effects: Vec<Effect>) -> Self {
        Self {
            prevent_default: false,
            effects,
        }
    }
}

/// Answers destructive-action prompts.
pub(crate) trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Navigator {
    primary: Pane,
    secondary: Pane,
    cursor: Cursor,
    mode: InputMode,
    layout: PaneLayout,
    new_folder_title: String,
    /// Last store failure, cleared by the next success.
    status: Option<String>,
}

impl Navigator {
    /// Mirrors the first two containers below the store root.
    pub(crate) fn from_tree(
        root: BookmarkNode,
        layout: PaneLayout,
        new_folder_title: impl Into<String>,
    ) -> StoreResult<Self> {
        root.validate()?;

        let mut containers = root.into_children().into_iter();
        let (Some(primary), Some(secondary)) = (containers.next(), containers.next()) else {
            return Err(StoreError::integrity(
                "bookmark tree root must hold a primary and a secondary container",
            ));
        };
        if !primary.is_folder() || !secondary.is_folder() {
            return Err(StoreError::integrity("top-level containers must be folders"));
        }

        let pane = |node: BookmarkNode| Pane {
            container_id: node.id.clone(),
            items: node.into_children(),
            scroll_offset: 0.0,
        };

        Ok(Self {
            primary: pane(primary),
            secondary: pane(secondary),
            cursor: Cursor {
                pane: PaneId::Primary,
                index: 0,
            },
            mode: InputMode::Browsing,
            layout,
            new_folder_title: new_folder_title.into(),
            status: None,
        })
    }

    pub(crate) fn pane(&self, id: PaneId) -> &Pane {
        match id {
            PaneId::Primary => &self.primary,
            PaneId::Secondary => &self.secondary,
        }
    }

    fn pane_mut(&mut self, id: PaneId) -> &mut Pane {
        match id {
            PaneId::Primary => &mut self.primary,
            PaneId::Secondary => &mut self.secondary,
        }
    }

    fn active(&self) -> &Pane {
        self.pane(self.cursor.pane)
    }

    pub(crate) fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub(crate) fn mode(&self) -> &InputMode {
        &self.mode
    }

    pub(crate) fn layout(&self) -> PaneLayout {
        self.layout
    }

    pub(crate) fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub(crate) fn selected(&self) -> Option<&BookmarkNode> {
        self.active().items.get(self.cursor.index)
    }

    /// Display labels in pane order, for the rendering layer.
    pub(crate) fn labels(&self, pane: PaneId) -> Vec<String> {
        self.pane(pane).items.iter().map(BookmarkNode::display_label).collect()
    }

    pub(crate) fn is_selected(&self, pane: PaneId, index: usize) -> bool {
        self.cursor.pane == pane && self.cursor.index == index && index < self.pane(pane).items.len()
    }

    pub(crate) fn set_scroll_offset(&mut self, pane: PaneId, offset: f64) {
        self.pane_mut(pane).scroll_offset = offset;
    }

    pub(crate) fn set_draft(&mut self, text: impl Into<String>) {
        if let InputMode::Renaming(session) = &mut self.mode {
            session.draft = text.into();
        }
    }

    /// The edit field lost focus: drop the session without renaming.
    pub(crate) fn end_rename(&mut self) {
        if let InputMode::Renaming(session) = &self.mode {
            debug!(node_id = %session.node_id, "rename abandoned");
            self.mode = InputMode::Browsing;
        }
    }

    pub(crate) fn session(&self) -> SessionSnapshot {
        SessionSnapshot {
            active_pane: self.cursor.pane,
            primary_container_id: self.primary.container_id.clone(),
            secondary_container_id: self.secondary.container_id.clone(),
        }
    }

    /// Reopens the containers saved by a previous visit.
    pub(crate) fn restore(&mut self, saved: &SessionSnapshot) -> Transition {
        let mut effects = Vec::new();
        for pane in [PaneId::Primary, PaneId::Secondary] {
            let current = &self.pane(pane).container_id;
            let wanted = saved.container_id(pane);
            if !wanted.is_empty() && wanted != current {
                effects.push(Effect::Store(StoreCommand::OpenContainer {
                    pane,
                    expected_container_id: current.clone(),
                    container_id: wanted.to_string(),
                    select: Selection::First,
                }));
            }
        }

        self.cursor = Cursor {
            pane: saved.active_pane,
            index: 0,
        };
        effects.push(Effect::Reveal {
            pane: saved.active_pane,
            force_top: true,
        });
        Transition::effects(effects)
    }

    pub(crate) fn handle_key(&mut self, key: Key, confirm: &dyn Confirm) -> Transition {
        if matches!(self.mode, InputMode::Renaming(_)) {
            return self.rename_key(key);
        }
        self.browse(key, confirm)
    }

    fn reveal(&self, force_top: bool) -> Transition {
        Transition::handled(vec![Effect::Reveal {
            pane: self.cursor.pane,
            force_top,
        }])
    }

    fn clamp_cursor(&mut self) {
        let len = self.active().items.len();
        self.cursor.index = self.cursor.index.min(len.saturating_sub(1));
    }

    fn browse(&mut self, key: Key, confirm: &dyn Confirm) -> Transition {
        match key {
            Key::Reload => Transition::handled(vec![Effect::Reload]),
            Key::Up => {
                self.cursor.index = self.cursor.index.saturating_sub(1);
                self.reveal(self.cursor.index == 0)
            }
            Key::Down => {
                let len = self.active().items.len();
                self.cursor.index = (self.cursor.index + 1).min(len.saturating_sub(1));
                self.reveal(false)
            }
            Key::Left => self.switch_or_ascend(PaneId::Primary),
            Key::Right => self.switch_or_ascend(PaneId::Secondary),
            Key::Home => {
                self.cursor.index = 0;
                self.reveal(true)
            }
            Key::End => {
                let len = self.active().items.len();
                if len == 0 {
                    return Transition::handled(vec![]);
                }
                self.cursor.index = len - 1;
                self.reveal(self.cursor.index == 0)
            }
            Key::CreateFolder => {
                let pane = self.active();
                let index = if pane.items.is_empty() {
                    0
                } else {
                    self.cursor.index + 1
                };
                Transition::handled(vec![Effect::Store(StoreCommand::CreateFolder {
                    pane: self.cursor.pane,
                    parent_id: pane.container_id.clone(),
                    index,
                    title: self.new_folder_title.clone(),
                })])
            }
            Key::Rename => {
                let Some(node) = self.selected() else {
                    return Transition::handled(vec![]);
                };
                self.mode = InputMode::Renaming(EditSession {
                    node_id: node.id.clone(),
                    draft: node.title.clone(),
                });
                Transition::handled(vec![Effect::FocusEditor])
            }
            Key::Delete => {
                let Some(node) = self.selected() else {
                    return Transition::handled(vec![]);
                };
                let prompt = format!("Are you sure you want to delete \"{}\"?", node.title);
                if !confirm.confirm(&prompt) {
                    debug!(node_id = %node.id, "delete declined");
                    return Transition::handled(vec![]);
                }
                Transition::handled(vec![Effect::Store(StoreCommand::Remove {
                    pane: self.cursor.pane,
                    container_id: self.active().container_id.clone(),
                    node_id: node.id.clone(),
                })])
            }
            Key::MoveAcross => {
                let Some(node) = self.selected().cloned() else {
                    return Transition::handled(vec![]);
                };
                let from = self.cursor.pane;
                Transition::handled(vec![Effect::Store(StoreCommand::MoveAcross {
                    from,
                    from_container_id: self.pane(from).container_id.clone(),
                    to_container_id: self.pane(from.opposite()).container_id.clone(),
                    node,
                })])
            }
            Key::Enter => {
                let Some(node) = self.selected().cloned() else {
                    return Transition::handled(vec![]);
                };
                if let Some(url) = &node.url {
                    return Transition::handled(vec![Effect::OpenUrl(url.clone())]);
                }
                let pane = self.pane_mut(self.cursor.pane);
                pane.container_id = node.id.clone();
                pane.items = node.into_children();
                self.cursor.index = 0;
                self.reveal(true)
            }
            Key::Ascend => Transition::handled(vec![Effect::Store(StoreCommand::LookupParent {
                pane: self.cursor.pane,
                container_id: self.active().container_id.clone(),
            })]),
            Key::Confirm => Transition::ignored(),
        }
    }

    fn switch_or_ascend(&mut self, target: PaneId) -> Transition {
        if self.layout == PaneLayout::Split && self.cursor.pane == target {
            return self.browse(Key::Ascend, &NeverConfirm);
        }
        self.cursor = Cursor {
            pane: target,
            index: 0,
        };
        self.reveal(true)
    }

    fn rename_key(&mut self, key: Key) -> Transition {
        if key != Key::Confirm {
            return Transition::ignored();
        }
        let InputMode::Renaming(session) = std::mem::take(&mut self.mode) else {
            return Transition::ignored();
        };
        Transition::handled(vec![
            Effect::BlurEditor,
            Effect::Store(StoreCommand::Rename {
                pane: self.cursor.pane,
                node_id: session.node_id,
                title: session.draft,
            }),
        ])
    }

    /// Merges a store result into the cached panes.
    pub(crate) fn complete(&mut self, command: StoreCommand, result: StoreResult<StoreReply>) -> Transition {
        let transition = self.merge(command, result);
        self.follow_edit_target();
        transition
    }

    /// Keeps the row being renamed under the cursor. Ends the session when
    /// that row is no longer in either pane.
    fn follow_edit_target(&mut self) {
        let InputMode::Renaming(session) = &self.mode else {
            return;
        };
        let node_id = session.node_id.clone();
        let found = [self.cursor.pane, self.cursor.pane.opposite()]
            .into_iter()
            .find_map(|pane| {
                let index = self.pane(pane).items.iter().position(|n| n.id == node_id)?;
                Some(Cursor { pane, index })
            });
        match found {
            Some(cursor) => self.cursor = cursor,
            None => {
                debug!(%node_id, "renamed node left the screen, rename dropped");
                self.mode = InputMode::Browsing;
            }
        }
    }

    fn merge(&mut self, command: StoreCommand, result: StoreResult<StoreReply>) -> Transition {
        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                self.record_failure(&command, &e);
                return Transition::ignored();
            }
        };
        self.status = None;

        match (command, reply) {
            (
                StoreCommand::CreateFolder {
                    pane,
                    parent_id,
                    index,
                    ..
                },
                StoreReply::Created(node),
            ) => {
                let target = self.pane_mut(pane);
                if target.container_id != parent_id {
                    debug!(%pane, %parent_id, "created folder lands outside the open container");
                    return Transition::ignored();
                }
                let index = index.min(target.items.len());
                target.items.insert(index, node);
                if self.cursor.pane != pane {
                    return Transition::ignored();
                }
                self.cursor.index = index;
                Transition::effects(vec![Effect::Reveal {
                    pane,
                    force_top: false,
                }])
            }
            (StoreCommand::Rename { pane, node_id, title }, StoreReply::Done) => {
                if let Some(node) = self.pane_mut(pane).items.iter_mut().find(|n| n.id == node_id) {
                    node.title = title;
                }
                Transition::ignored()
            }
            (
                StoreCommand::Remove {
                    pane,
                    container_id,
                    node_id,
                },
                StoreReply::Done,
            ) => {
                let target = self.pane_mut(pane);
                if target.container_id != container_id {
                    debug!(%pane, %node_id, "removed node is no longer on screen");
                    return Transition::ignored();
                }
                let before = target.items.len();
                target.items.retain(|n| n.id != node_id);
                let removed = target.items.len() != before;
                if removed && self.cursor.pane == pane {
                    self.cursor.index = self.cursor.index.saturating_sub(1);
                }
                self.clamp_cursor();
                Transition::ignored()
            }
            (
                StoreCommand::MoveAcross {
                    from,
                    from_container_id,
                    to_container_id,
                    node,
                },
                StoreReply::Done,
            ) => {
                let to = from.opposite();
                let source = self.pane_mut(from);
                if source.container_id == from_container_id {
                    source.items.retain(|n| n.id != node.id);
                }
                let target = self.pane_mut(to);
                if target.container_id == to_container_id {
                    target.items.insert(0, node);
                }
                self.cursor = Cursor { pane: to, index: 0 };
                self.clamp_cursor();
                Transition::effects(vec![Effect::Reveal {
                    pane: to,
                    force_top: true,
                }])
            }
            (StoreCommand::LookupParent { pane, container_id }, StoreReply::Parent(parent)) => {
                match parent {
                    Some(parent_id) if parent_id != ROOT_ID => {
                        Transition::effects(vec![Effect::Store(StoreCommand::OpenContainer {
                            pane,
                            expected_container_id: container_id.clone(),
                            container_id: parent_id,
                            select: Selection::Child(container_id),
                        })])
                    }
                    _ => {
                        debug!(%pane, %container_id, "already at the top level");
                        Transition::ignored()
                    }
                }
            }
            (
                StoreCommand::OpenContainer {
                    pane,
                    expected_container_id,
                    container_id,
                    select,
                },
                StoreReply::Container(node),
            ) => {
                if !node.is_folder() {
                    let e = StoreError::integrity(format!("container {} is not a folder", node.id));
                    self.record_failure(
                        &StoreCommand::OpenContainer {
                            pane,
                            expected_container_id,
                            container_id,
                            select,
                        },
                        &e,
                    );
                    return Transition::ignored();
                }
                let target = self.pane_mut(pane);
                if target.container_id != expected_container_id {
                    debug!(%pane, %container_id, "pane moved on before the container loaded");
                    return Transition::ignored();
                }
                let items = node.into_children();
                let index = match &select {
                    Selection::Child(id) => items.iter().position(|n| &n.id == id).unwrap_or(0),
                    Selection::First => 0,
                };
                target.container_id = container_id;
                target.items = items;
                if self.cursor.pane != pane {
                    return Transition::ignored();
                }
                self.cursor.index = index;
                Transition::effects(vec![Effect::Reveal {
                    pane,
                    force_top: index == 0,
                }])
            }
            (command, reply) => {
                warn!(command = command.name(), ?reply, "store reply does not match command");
                Transition::ignored()
            }
        }
    }

    fn record_failure(&mut self, command: &StoreCommand, e: &StoreError) {
        // A saved folder that vanished since the last visit is not worth reporting.
        if let StoreCommand::OpenContainer {
            select: Selection::First,
            ..
        } = command
        {
            debug!(command = command.name(), error = %e, "could not reopen saved container");
            return;
        }

        if e.kind == StoreErrorKind::Integrity {
            error!(command = command.name(), error = %e, "store returned a malformed node");
        } else {
            warn!(command = command.name(), error = %e, "store request failed");
        }
        self.status = Some(format!("{} failed: {e}", command.name()));
    }
}

/// Used where a transition is re-dispatched internally and never prompts.
struct NeverConfirm;

impl Confirm for NeverConfirm {
    fn confirm(&self, _message: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::{PRIMARY_ID, SECONDARY_ID};
    use crate::store::{BookmarkStore, MemoryStore};
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct Scripted {
        answer: bool,
        asked: RefCell<Vec<String>>,
    }

    impl Scripted {
        fn answering(answer: bool) -> Self {
            Self {
                answer,
                asked: RefCell::default(),
            }
        }
    }

    impl Confirm for Scripted {
        fn confirm(&self, message: &str) -> bool {
            self.asked.borrow_mut().push(message.to_string());
            self.answer
        }
    }

    fn navigator(store: &MemoryStore, layout: PaneLayout) -> Navigator {
        let root = block_on(store.get_tree()).expect("tree should load");
        Navigator::from_tree(root, layout, "New Folder").expect("tree should mirror")
    }

    /// Runs store commands to completion, returning every other effect in order.
    fn drain(nav: &mut Navigator, store: &MemoryStore, effects: Vec<Effect>) -> Vec<Effect> {
        let mut queue: VecDeque<Effect> = effects.into();
        let mut rest = Vec::new();
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::Store(command) => {
                    let result = block_on(execute(store, &command));
                    queue.extend(nav.complete(command, result).effects);
                }
                other => rest.push(other),
            }
        }
        rest
    }

    fn press(nav: &mut Navigator, store: &MemoryStore, key: Key) -> Vec<Effect> {
        let transition = nav.handle_key(key, &Scripted::answering(true));
        drain(nav, store, transition.effects)
    }

    fn titles(nav: &Navigator, pane: PaneId) -> Vec<String> {
        nav.pane(pane).items.iter().map(|n| n.title.clone()).collect()
    }

    fn abc_store() -> MemoryStore {
        MemoryStore::with_containers(
            vec![
                BookmarkNode::folder("40", "A", vec![]),
                BookmarkNode::folder("41", "B", vec![BookmarkNode::link("44", "inside", "https://b.example")]),
                BookmarkNode::link("42", "C", "https://c.example"),
            ],
            vec![BookmarkNode::link("5", "Old", "https://old.example")],
        )
    }

    #[test]
    fn test_from_tree_mirrors_both_containers() {
        let store = MemoryStore::demo();
        let nav = navigator(&store, PaneLayout::Split);
        assert_eq!(nav.pane(PaneId::Primary).container_id, PRIMARY_ID);
        assert_eq!(nav.pane(PaneId::Secondary).container_id, SECONDARY_ID);
        assert_eq!(titles(&nav, PaneId::Secondary), vec!["Reading", "MDN"]);
        assert_eq!(nav.cursor(), Cursor { pane: PaneId::Primary, index: 0 });
    }

    #[test]
    fn test_from_tree_rejects_single_container() {
        let root = BookmarkNode::folder("0", "", vec![BookmarkNode::folder("1", "Bar", vec![])]);
        let err = Navigator::from_tree(root, PaneLayout::Split, "x").unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::Integrity);
    }

    #[test]
    fn test_arrow_down_saturates_at_last_item() {
        let store = abc_store();
        let mut nav = navigator(&store, PaneLayout::Split);
        for _ in 0..10 {
            press(&mut nav, &store, Key::Down);
            assert!(nav.cursor().index <= 2);
        }
        assert_eq!(nav.cursor().index, 2);
    }

    #[test]
    fn test_arrow_up_saturates_at_zero_and_scrolls_to_top() {
        let store = abc_store();
        let mut nav = navigator(&store, PaneLayout::Split);
        press(&mut nav, &store, Key::Down);
        let effects = press(&mut nav, &store, Key::Up);
        assert_eq!(
            effects,
            vec![Effect::Reveal { pane: PaneId::Primary, force_top: true }]
        );
        press(&mut nav, &store, Key::Up);
        assert_eq!(nav.cursor().index, 0);
    }

    #[test]
    fn test_arrow_down_on_empty_pane_keeps_zero() {
        let store = MemoryStore::with_containers(vec![], vec![]);
        let mut nav = navigator(&store, PaneLayout::Split);
        press(&mut nav, &store, Key::Down);
        assert_eq!(nav.cursor().index, 0);
        assert!(nav.selected().is_none());
    }

    #[test]
    fn test_home_and_end() {
        let store = abc_store();
        let mut nav = navigator(&store, PaneLayout::Split);
        let effects = press(&mut nav, &store, Key::End);
        assert_eq!(nav.cursor().index, 2);
        assert_eq!(effects, vec![Effect::Reveal { pane: PaneId::Primary, force_top: false }]);

        let effects = press(&mut nav, &store, Key::Home);
        assert_eq!(nav.cursor().index, 0);
        assert_eq!(effects, vec![Effect::Reveal { pane: PaneId::Primary, force_top: true }]);
    }

    #[test]
    fn test_end_on_empty_pane_is_noop() {
        let store = MemoryStore::with_containers(vec![], vec![]);
        let mut nav = navigator(&store, PaneLayout::Split);
        let transition = nav.handle_key(Key::End, &Scripted::answering(true));
        assert!(transition.prevent_default);
        assert!(transition.effects.is_empty());
    }

    #[test]
    fn test_descend_then_ascend_restores_index() {
        let store = abc_store();
        let mut nav = navigator(&store, PaneLayout::Split);
        press(&mut nav, &store, Key::Down);

        press(&mut nav, &store, Key::Enter);
        assert_eq!(nav.pane(PaneId::Primary).container_id, "41");
        assert_eq!(titles(&nav, PaneId::Primary), vec!["inside"]);
        assert_eq!(nav.cursor().index, 0);

        let effects = press(&mut nav, &store, Key::Ascend);
        assert_eq!(nav.pane(PaneId::Primary).container_id, PRIMARY_ID);
        assert_eq!(titles(&nav, PaneId::Primary), vec!["A", "B", "C"]);
        assert_eq!(nav.cursor().index, 1);
        assert_eq!(effects, vec![Effect::Reveal { pane: PaneId::Primary, force_top: false }]);
    }

    #[test]
    fn test_ascend_at_top_level_is_noop() {
        let store = abc_store();
        let mut nav = navigator(&store, PaneLayout::Split);
        press(&mut nav, &store, Key::Down);
        let before = nav.clone();

        let effects = press(&mut nav, &store, Key::Ascend);
        assert!(effects.is_empty());
        assert_eq!(nav, before);
    }

    #[test]
    fn test_enter_on_link_opens_url() {
        let store = abc_store();
        let mut nav = navigator(&store, PaneLayout::Split);
        press(&mut nav, &store, Key::End);
        let effects = press(&mut nav, &store, Key::Enter);
        assert_eq!(effects, vec![Effect::OpenUrl("https://c.example".to_string())]);
        assert_eq!(nav.pane(PaneId::Primary).container_id, PRIMARY_ID);
    }

    #[test]
    fn test_enter_on_empty_pane_does_nothing() {
        let store = MemoryStore::with_containers(vec![], vec![]);
        let mut nav = navigator(&store, PaneLayout::Split);
        let before = nav.clone();
        assert!(press(&mut nav, &store, Key::Enter).is_empty());
        assert_eq!(nav, before);
    }

    #[test]
    fn test_split_layout_switches_then_ascends() {
        let store = abc_store();
        let mut nav = navigator(&store, PaneLayout::Split);
        press(&mut nav, &store, Key::Down);
        press(&mut nav, &store, Key::Enter);

        // Already on primary: Left ascends.
        press(&mut nav, &store, Key::Left);
        assert_eq!(nav.pane(PaneId::Primary).container_id, PRIMARY_ID);
        assert_eq!(nav.cursor(), Cursor { pane: PaneId::Primary, index: 1 });

        let effects = press(&mut nav, &store, Key::Right);
        assert_eq!(nav.cursor(), Cursor { pane: PaneId::Secondary, index: 0 });
        assert_eq!(effects, vec![Effect::Reveal { pane: PaneId::Secondary, force_top: true }]);
    }

    #[test]
    fn test_toggle_layout_always_switches() {
        let store = abc_store();
        let mut nav = navigator(&store, PaneLayout::Toggle);
        press(&mut nav, &store, Key::Down);
        press(&mut nav, &store, Key::Enter);

        press(&mut nav, &store, Key::Left);
        assert_eq!(nav.pane(PaneId::Primary).container_id, "41");
        assert_eq!(nav.cursor(), Cursor { pane: PaneId::Primary, index: 0 });
    }

    #[test]
    fn test_create_folder_after_selection() {
        let store = abc_store();
        let mut nav = navigator(&store, PaneLayout::Split);
        let transition = nav.handle_key(Key::CreateFolder, &Scripted::answering(true));
        assert_eq!(
            transition.effects,
            vec![Effect::Store(StoreCommand::CreateFolder {
                pane: PaneId::Primary,
                parent_id: PRIMARY_ID.to_string(),
                index: 1,
                title: "New Folder".to_string(),
            })]
        );

        drain(&mut nav, &store, transition.effects);
        assert_eq!(titles(&nav, PaneId::Primary), vec!["A", "New Folder", "B", "C"]);
        assert_eq!(nav.cursor().index, 1);
        assert_eq!(nav.selected().and_then(|n| n.children.clone()), Some(vec![]));
    }

    #[test]
    fn test_create_folder_in_empty_pane() {
        let store = MemoryStore::with_containers(vec![], vec![]);
        let mut nav = navigator(&store, PaneLayout::Split);
        press(&mut nav, &store, Key::CreateFolder);
        assert_eq!(titles(&nav, PaneId::Primary), vec!["New Folder"]);
        assert_eq!(nav.cursor().index, 0);
    }

    #[test]
    fn test_create_result_for_abandoned_container_is_dropped() {
        let store = abc_store();
        let mut nav = navigator(&store, PaneLayout::Split);
        let pending = nav.handle_key(Key::CreateFolder, &Scripted::answering(true));

        // Descend into A before the store answers.
        press(&mut nav, &store, Key::Enter);
        drain(&mut nav, &store, pending.effects);

        assert_eq!(nav.pane(PaneId::Primary).container_id, "40");
        assert!(nav.pane(PaneId::Primary).items.is_empty());
        assert_eq!(nav.cursor().index, 0);
    }

    #[test]
    fn test_delete_only_item_leaves_empty_pane() {
        let store = abc_store();
        let mut nav = navigator(&store, PaneLayout::Split);
        press(&mut nav, &store, Key::Right);
        let confirm = Scripted::answering(true);
        let transition = nav.handle_key(Key::Delete, &confirm);
        drain(&mut nav, &store, transition.effects);

        assert_eq!(
            confirm.asked.borrow().as_slice(),
            ["Are you sure you want to delete \"Old\"?".to_string()]
        );
        assert!(nav.pane(PaneId::Secondary).items.is_empty());
        assert_eq!(nav.cursor(), Cursor { pane: PaneId::Secondary, index: 0 });
        assert!(block_on(store.get("5")).is_err());
    }

    #[test]
    fn test_store_result_during_rename_keeps_edited_row_selected() {
        let store = abc_store();
        let mut nav = navigator(&store, PaneLayout::Split);
        let pending = nav.handle_key(Key::CreateFolder, &Scripted::answering(true)).effects;
        nav.handle_key(Key::Rename, &Scripted::answering(true));
        drain(&mut nav, &store, pending);

        assert_eq!(titles(&nav, PaneId::Primary), vec!["A", "New Folder", "B", "C"]);
        assert!(matches!(nav.mode(), InputMode::Renaming(s) if s.node_id == "40"));
        assert_eq!(nav.cursor(), Cursor { pane: PaneId::Primary, index: 0 });
        assert!(nav.is_selected(PaneId::Primary, 0));
    }

    #[test]
    fn test_rename_ends_when_edited_row_is_removed() {
        let store = abc_store();
        let mut nav = navigator(&store, PaneLayout::Split);
        let pending = nav.handle_key(Key::Delete, &Scripted::answering(true)).effects;
        nav.handle_key(Key::Rename, &Scripted::answering(true));
        drain(&mut nav, &store, pending);

        assert_eq!(titles(&nav, PaneId::Primary), vec!["B", "C"]);
        assert_eq!(nav.mode(), &InputMode::Browsing);
        assert!(!nav.handle_key(Key::Down, &Scripted::answering(true)).effects.is_empty());
    }

    #[test]
    fn test_delete_moves_cursor_up() {
        let store = abc_store();
        let mut nav = navigator(&store, PaneLayout::Split);
        press(&mut nav, &store, Key::End);
        press(&mut nav, &store, Key::Delete);
        assert_eq!(titles(&nav, PaneId::Primary), vec!["A", "B"]);
        assert_eq!(nav.cursor().index, 1);
    }

    #[test]
    fn test_declined_delete_is_noop() {
        let store = abc_store();
        let mut nav = navigator(&store, PaneLayout::Split);
        let before = nav.clone();
        let transition = nav.handle_key(Key::Delete, &Scripted::answering(false));
        assert!(transition.prevent_default);
        assert!(transition.effects.is_empty());
        assert_eq!(nav, before);
    }

    #[test]
    fn test_rename_flow_updates_store_and_cache() {
        let store = abc_store();
        let mut nav = navigator(&store, PaneLayout::Split);
        press(&mut nav, &store, Key::Right);

        let effects = press(&mut nav, &store, Key::Rename);
        assert_eq!(effects, vec![Effect::FocusEditor]);
        assert_eq!(
            nav.mode(),
            &InputMode::Renaming(EditSession {
                node_id: "5".to_string(),
                draft: "Old".to_string(),
            })
        );

        nav.set_draft("New");
        let transition = nav.handle_key(Key::Confirm, &Scripted::answering(true));
        assert!(transition.prevent_default);
        assert_eq!(
            transition.effects,
            vec![
                Effect::BlurEditor,
                Effect::Store(StoreCommand::Rename {
                    pane: PaneId::Secondary,
                    node_id: "5".to_string(),
                    title: "New".to_string(),
                }),
            ]
        );
        assert_eq!(nav.mode(), &InputMode::Browsing);

        drain(&mut nav, &store, transition.effects);
        assert_eq!(titles(&nav, PaneId::Secondary), vec!["New"]);
        assert_eq!(block_on(store.get("5")).unwrap().title, "New");
    }

    #[test]
    fn test_renaming_suspends_browsing_keys() {
        let store = abc_store();
        let mut nav = navigator(&store, PaneLayout::Split);
        press(&mut nav, &store, Key::Rename);

        let transition = nav.handle_key(Key::Down, &Scripted::answering(true));
        assert!(!transition.prevent_default);
        assert!(transition.effects.is_empty());
        assert_eq!(nav.cursor().index, 0);

        let transition = nav.handle_key(Key::Delete, &Scripted::answering(true));
        assert!(transition.effects.is_empty());
        assert_eq!(titles(&nav, PaneId::Primary), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_blur_abandons_rename() {
        let store = abc_store();
        let mut nav = navigator(&store, PaneLayout::Split);
        press(&mut nav, &store, Key::Rename);
        nav.set_draft("Changed");
        nav.end_rename();
        assert_eq!(nav.mode(), &InputMode::Browsing);
        assert_eq!(titles(&nav, PaneId::Primary), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_rename_without_selection_stays_browsing() {
        let store = MemoryStore::with_containers(vec![], vec![]);
        let mut nav = navigator(&store, PaneLayout::Split);
        assert!(press(&mut nav, &store, Key::Rename).is_empty());
        assert_eq!(nav.mode(), &InputMode::Browsing);
    }

    #[test]
    fn test_move_to_opposite_pane() {
        let store = abc_store();
        let mut nav = navigator(&store, PaneLayout::Split);
        press(&mut nav, &store, Key::Down);

        let effects = press(&mut nav, &store, Key::MoveAcross);
        assert_eq!(titles(&nav, PaneId::Primary), vec!["A", "C"]);
        assert_eq!(titles(&nav, PaneId::Secondary), vec!["B", "Old"]);
        assert_eq!(nav.cursor(), Cursor { pane: PaneId::Secondary, index: 0 });
        assert_eq!(effects, vec![Effect::Reveal { pane: PaneId::Secondary, force_top: true }]);
        assert_eq!(block_on(store.get("41")).unwrap().parent_id.as_deref(), Some(SECONDARY_ID));
    }

    #[test]
    fn test_failed_store_request_leaves_state_and_sets_status() {
        let store = abc_store();
        let mut nav = navigator(&store, PaneLayout::Split);
        store.set_offline(true);
        let before_items = nav.pane(PaneId::Primary).clone();

        press(&mut nav, &store, Key::MoveAcross);
        assert_eq!(nav.pane(PaneId::Primary), &before_items);
        assert_eq!(nav.cursor().pane, PaneId::Primary);
        assert!(nav.status().unwrap_or_default().starts_with("move failed"));

        store.set_offline(false);
        press(&mut nav, &store, Key::CreateFolder);
        assert!(nav.status().is_none());
    }

    #[test]
    fn test_malformed_container_is_reported() {
        let store = abc_store();
        let mut nav = navigator(&store, PaneLayout::Split);
        let before = nav.pane(PaneId::Primary).clone();
        let command = StoreCommand::OpenContainer {
            pane: PaneId::Primary,
            expected_container_id: PRIMARY_ID.to_string(),
            container_id: "42".to_string(),
            select: Selection::Child("x".to_string()),
        };
        let link = BookmarkNode::link("42", "C", "https://c.example");
        nav.complete(command, Ok(StoreReply::Container(link)));
        assert_eq!(nav.pane(PaneId::Primary), &before);
        assert!(nav.status().is_some());
    }

    #[test]
    fn test_reload_and_ctrl_enter_while_browsing() {
        let store = abc_store();
        let mut nav = navigator(&store, PaneLayout::Split);
        assert_eq!(press(&mut nav, &store, Key::Reload), vec![Effect::Reload]);
        assert!(!nav.handle_key(Key::Confirm, &Scripted::answering(true)).prevent_default);
    }

    #[test]
    fn test_render_contract() {
        let store = abc_store();
        let mut nav = navigator(&store, PaneLayout::Split);
        press(&mut nav, &store, Key::Down);
        assert_eq!(nav.labels(PaneId::Primary), vec!["📁 A", "📁 B", "C"]);
        assert!(nav.is_selected(PaneId::Primary, 1));
        assert!(!nav.is_selected(PaneId::Secondary, 1));
        assert!(!nav.is_selected(PaneId::Primary, 0));
    }

    #[test]
    fn test_restore_reopens_saved_containers() {
        let store = MemoryStore::demo();
        let mut nav = navigator(&store, PaneLayout::Split);
        let saved = SessionSnapshot {
            active_pane: PaneId::Secondary,
            primary_container_id: "14".to_string(),
            secondary_container_id: "30".to_string(),
        };
        let transition = nav.restore(&saved);
        drain(&mut nav, &store, transition.effects);

        assert_eq!(titles(&nav, PaneId::Primary), vec!["docs.rs", "crates.io"]);
        assert_eq!(titles(&nav, PaneId::Secondary), vec!["This Week in Rust"]);
        assert_eq!(nav.cursor(), Cursor { pane: PaneId::Secondary, index: 0 });
        assert_eq!(nav.session(), saved);
    }

    #[test]
    fn test_restore_of_deleted_container_is_silent() {
        let store = MemoryStore::demo();
        let mut nav = navigator(&store, PaneLayout::Split);
        let saved = SessionSnapshot {
            active_pane: PaneId::Primary,
            primary_container_id: "999".to_string(),
            secondary_container_id: SECONDARY_ID.to_string(),
        };
        let transition = nav.restore(&saved);
        drain(&mut nav, &store, transition.effects);
        assert_eq!(nav.pane(PaneId::Primary).container_id, PRIMARY_ID);
        assert!(nav.status().is_none());
    }
}
