use super::AppState;
use crate::navigator::{execute, Confirm, Effect, Key, Navigator, StoreCommand};
use crate::storage::{load_session, save_session};
use crate::store::BookmarkStore;
use crate::util::{blur_by_id, defer, focus_by_id};
use crate::viewport;
use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::{debug, error, info, warn};

pub(crate) const RENAME_INPUT_ID: &str = "bookmark-rename-input";

/// A missing window counts as a failure too.
fn reload_failed(outcome: &Option<Result<(), wasm_bindgen::JsValue>>) -> bool {
    !matches!(outcome, Some(Ok(())))
}

/// Asks through `window.confirm`. A missing window counts as "no".
pub(crate) struct WindowConfirm;

impl Confirm for WindowConfirm {
    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }
}

/// Drives the navigator: runs its effects against the store and the DOM, and
/// feeds store results back in.
impl AppState {
    /// Fetches the tree, builds the navigator and reopens the saved session.
    pub fn bootstrap(self) {
        let store = self.store.get_value();
        let config = self.config.get_value();
        info!(store = store.name(), layout = ?config.layout, "loading bookmark tree");

        spawn_local(async move {
            let built = match store.get_tree().await {
                Ok(root) => Navigator::from_tree(root, config.layout, config.new_folder_title),
                Err(e) => Err(e),
            };

            match built {
                Ok(mut nav) => {
                    let restored = load_session().map(|saved| {
                        debug!(?saved, "restoring previous session");
                        nav.restore(&saved)
                    });
                    self.navigator.set(Some(nav));
                    self.loading.set(false);
                    if let Some(transition) = restored {
                        self.apply(transition.effects);
                    }
                }
                Err(e) => {
                    error!(error = %e, "could not load bookmarks");
                    self.fatal_error.set(Some(e.to_string()));
                    self.loading.set(false);
                }
            }
        });
    }

    /// Feeds one key press through the navigator. Returns whether the browser
    /// default must be suppressed.
    pub fn dispatch_key(self, key: Key) -> bool {
        let transition = self
            .navigator
            .try_update(|nav| nav.as_mut().map(|nav| nav.handle_key(key, &WindowConfirm)))
            .flatten();
        let Some(transition) = transition else {
            return false;
        };

        debug!(?key, effects = transition.effects.len(), "key handled");
        self.apply(transition.effects);
        self.persist_session();
        transition.prevent_default
    }

    /// Nothing renders the draft after the field mounts, so this does not notify.
    pub fn edit_draft(self, text: String) {
        self.navigator.update_untracked(|nav| {
            if let Some(nav) = nav {
                nav.set_draft(text);
            }
        });
    }

    pub fn abandon_rename(self) {
        self.navigator.update(|nav| {
            if let Some(nav) = nav {
                nav.end_rename();
            }
        });
    }

    fn apply(self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Store(command) => self.run_command(command),
                Effect::Reveal { pane, force_top } => {
                    let sync = self.viewport;
                    defer(move || {
                        let next = self
                            .navigator
                            .with_untracked(|nav| nav.as_ref().and_then(|nav| viewport::reveal(&sync, nav, pane, force_top)));
                        if let Some(offset) = next {
                            self.navigator.update(|nav| {
                                if let Some(nav) = nav {
                                    nav.set_scroll_offset(pane, offset);
                                }
                            });
                        }
                    });
                }
                Effect::OpenUrl(url) => {
                    let opened = web_sys::window().map(|w| w.open_with_url_and_target(&url, "_blank"));
                    if !matches!(opened, Some(Ok(Some(_)))) {
                        warn!(%url, "could not open bookmark");
                    }
                }
                Effect::Reload => {
                    let reloaded = web_sys::window().map(|w| w.location().reload());
                    if reload_failed(&reloaded) {
                        warn!(?reloaded, "could not reload page");
                    }
                }
                Effect::FocusEditor => defer(|| {
                    if !focus_by_id(RENAME_INPUT_ID) {
                        debug!("rename field not mounted");
                    }
                }),
                Effect::BlurEditor => defer(|| {
                    blur_by_id(RENAME_INPUT_ID);
                }),
            }
        }
    }

    fn run_command(self, command: StoreCommand) {
        let store = self.store.get_value();
        self.pending.update(|n| *n += 1);
        debug!(command = command.name(), "store command issued");

        spawn_local(async move {
            let result = execute(&store, &command).await;
            self.pending.update(|n| *n = n.saturating_sub(1));

            let transition = self
                .navigator
                .try_update(|nav| nav.as_mut().map(|nav| nav.complete(command, result)))
                .flatten();
            if let Some(transition) = transition {
                self.apply(transition.effects);
                self.persist_session();
            }
        });
    }

    fn persist_session(self) {
        let Some(snapshot) = self.navigator.with_untracked(|nav| nav.as_ref().map(Navigator::session)) else {
            return;
        };
        self.last_session
            .update_value(|last| save_session(&snapshot, last));
    }
}
