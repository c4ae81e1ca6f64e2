use crate::components::ui::{
    Alert, AlertDescription, AlertTitle, InlineInput, Kbd, KbdGroup, Spinner,
};
use crate::navigator::{InputMode, Key, Navigator, PaneId, PaneLayout};
use crate::state::{AppContext, RENAME_INPUT_ID};
use crate::viewport::SELECTED_ROW_ID;
use leptos::ev;
use leptos::prelude::*;
use leptos_dom::helpers::window_event_listener;
use tw_merge::tw_merge;

/// One rendered line of a pane. The edit draft is deliberately absent so typing
/// does not re-key the row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct RowView {
    pub node_id: String,
    pub label: String,
    pub selected: bool,
    pub editing: bool,
}

pub(crate) fn pane_rows(nav: &Navigator, pane: PaneId) -> Vec<RowView> {
    let editing_id = match nav.mode() {
        InputMode::Renaming(session) => Some(session.node_id.as_str()),
        InputMode::Browsing => None,
    };
    nav.labels(pane)
        .into_iter()
        .zip(&nav.pane(pane).items)
        .enumerate()
        .map(|(index, (label, node))| {
            let selected = nav.is_selected(pane, index);
            RowView {
                node_id: node.id.clone(),
                label,
                selected,
                editing: selected && editing_id == Some(node.id.as_str()),
            }
        })
        .collect()
}

/// Toggle shows only the pane holding the cursor.
pub(crate) fn visible_panes(layout: PaneLayout, active: PaneId) -> Vec<PaneId> {
    match layout {
        PaneLayout::Split => vec![PaneId::Primary, PaneId::Secondary],
        PaneLayout::Toggle => vec![active],
    }
}

const SHORTCUTS: &[(&str, &str)] = &[
    ("↑ ↓", "move"),
    ("Home End", "first / last"),
    ("← →", "switch pane / up"),
    ("Enter", "open"),
    ("Backspace", "up one folder"),
    ("k", "new folder"),
    ("r", "rename"),
    ("Ctrl Enter", "save name"),
    ("d", "delete"),
    ("m", "move across"),
    ("F5", "reload"),
];

#[component]
pub fn ManagerPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>().0;

    // The only keyboard entry point. While renaming, the navigator ignores
    // everything but Ctrl+Enter, so typing reaches the field untouched.
    let _key_handle = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        let Some(key) = Key::from_dom(&ev.key(), ev.ctrl_key()) else {
            return;
        };
        if app_state.dispatch_key(key) {
            ev.prevent_default();
        }
    });

    let loading = move || app_state.loading.get();
    let fatal_error = move || app_state.fatal_error.get();
    let busy = move || app_state.pending.get() > 0;
    let status = move || {
        app_state
            .navigator
            .with(|nav| nav.as_ref().and_then(|nav| nav.status().map(str::to_string)))
    };
    // Memoized so cursor moves inside a pane do not rebuild the panes.
    let panes = Memo::new(move |_| {
        app_state.navigator.with(|nav| {
            nav.as_ref()
                .map(|nav| visible_panes(nav.layout(), nav.cursor().pane))
                .unwrap_or_default()
        })
    });
    let store_name = app_state.store.with_value(|s| s.name());

    view! {
        <div class="flex min-h-screen flex-col bg-background text-foreground">
            <header class="flex h-10 items-center justify-between border-b px-4">
                <div class="text-sm font-medium">"Bookmarks"</div>
                <div class="flex items-center gap-2 text-xs text-muted-foreground">
                    <Show when=busy fallback=|| ().into_view()>
                        <Spinner class="size-3" />
                    </Show>
                    <span>{store_name}</span>
                </div>
            </header>

            <Show when=move || status().is_some() fallback=|| ().into_view()>
                {move || {
                    status().map(|message| {
                        view! {
                            <Alert class="rounded-none border-x-0 border-t-0 border-destructive/30">
                                <AlertDescription class="text-destructive text-xs">
                                    {message}
                                </AlertDescription>
                            </Alert>
                        }
                    })
                }}
            </Show>

            <main class="flex min-h-0 flex-1">
                {move || {
                    if loading() {
                        return view! {
                            <div class="flex flex-1 items-center justify-center">
                                <Spinner class="size-6" />
                            </div>
                        }
                        .into_any();
                    }
                    if let Some(e) = fatal_error() {
                        return view! {
                            <div class="mx-auto w-full max-w-md px-4 py-12">
                                <Alert class="border-destructive/30">
                                    <AlertTitle class="text-destructive">"Could not load bookmarks"</AlertTitle>
                                    <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                                </Alert>
                            </div>
                        }
                        .into_any();
                    }
                    panes
                        .get()
                        .into_iter()
                        .map(|pane| view! { <BookmarkPane pane=pane /> })
                        .collect_view()
                        .into_any()
                }}
            </main>

            <HelpFooter />
        </div>
    }
}

#[component]
fn BookmarkPane(pane: PaneId) -> impl IntoView {
    let app_state = expect_context::<AppContext>().0;

    let rows = move || {
        app_state
            .navigator
            .with(|nav| nav.as_ref().map(|nav| pane_rows(nav, pane)).unwrap_or_default())
    };
    let active = move || {
        app_state
            .navigator
            .with(|nav| nav.as_ref().is_some_and(|nav| nav.cursor().pane == pane))
    };
    let offset = move || {
        app_state
            .navigator
            .with(|nav| nav.as_ref().map(|nav| nav.pane(pane).scroll_offset).unwrap_or(0.0))
    };
    let is_empty = move || {
        app_state
            .navigator
            .with(|nav| nav.as_ref().map_or(true, |nav| nav.pane(pane).items.is_empty()))
    };

    view! {
        <section
            data-pane=pane.to_string()
            class=move || {
                tw_merge!(
                    "relative flex-1 overflow-hidden border-r last:border-r-0",
                    if active() { "bg-background" } else { "bg-muted/30" }
                )
            }
        >
            <div class="sticky top-0 z-10 border-b bg-inherit px-4 py-1 text-[11px] uppercase tracking-wide text-muted-foreground">
                {pane.to_string()}
            </div>
            <ul class="px-2 py-1" style=move || format!("margin-top: {}px", offset())>
                <Show when=is_empty fallback=|| ().into_view()>
                    <li class="px-2 py-1 text-xs text-muted-foreground">"(empty)"</li>
                </Show>
                <For each=rows key=|row| row.clone() children=move |row: RowView| view! { <BookmarkRow row=row /> } />
            </ul>
        </section>
    }
}

#[component]
fn BookmarkRow(row: RowView) -> impl IntoView {
    let app_state = expect_context::<AppContext>().0;

    let class = tw_merge!(
        "flex h-7 items-center truncate rounded-sm px-2 text-sm",
        if row.selected { "bg-accent text-accent-foreground" } else { "" }
    );
    let id = row.selected.then_some(SELECTED_ROW_ID);

    if row.editing {
        let initial = app_state.navigator.with_untracked(|nav| match nav.as_ref().map(Navigator::mode) {
            Some(InputMode::Renaming(session)) => session.draft.clone(),
            _ => String::new(),
        });
        return view! {
            <li id=id class=class>
                <InlineInput
                    id=RENAME_INPUT_ID
                    initial=initial
                    on_text=move |text: String| app_state.edit_draft(text)
                    on_leave=move |_| app_state.abandon_rename()
                />
            </li>
        }
        .into_any();
    }

    view! {
        <li id=id class=class data-node-id=row.node_id>
            {row.label}
        </li>
    }
    .into_any()
}

#[component]
fn HelpFooter() -> impl IntoView {
    view! {
        <footer class="flex flex-wrap gap-x-4 gap-y-1 border-t px-4 py-2 text-xs text-muted-foreground">
            {SHORTCUTS
                .iter()
                .map(|(keys, action)| {
                    view! {
                        <span class="inline-flex items-center gap-1">
                            <KbdGroup>
                                {keys.split(' ').map(|k| view! { <Kbd>{k}</Kbd> }).collect_view()}
                            </KbdGroup>
                            {*action}
                        </span>
                    }
                })
                .collect_view()}
        </footer>
    }
}
