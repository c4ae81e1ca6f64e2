mod sync;

pub(crate) use sync::RENAME_INPUT_ID;

use crate::config::ManagerConfig;
use crate::navigator::Navigator;
use crate::storage::SessionSnapshot;
use crate::store::AnyStore;
use crate::viewport::ViewportSync;
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    /// `None` until the initial tree has been fetched.
    pub navigator: RwSignal<Option<Navigator>>,

    /// Bootstrap in progress.
    pub loading: RwSignal<bool>,
    /// The initial fetch failed; nothing can be shown.
    pub fatal_error: RwSignal<Option<String>>,
    /// Store commands not yet completed.
    pub pending: RwSignal<usize>,

    pub config: StoredValue<ManagerConfig>,
    pub store: StoredValue<AnyStore>,
    pub viewport: ViewportSync,

    /// Last snapshot written to localStorage.
    pub last_session: StoredValue<Option<SessionSnapshot>>,
}

impl AppState {
    pub fn new(config: ManagerConfig, store: AnyStore) -> Self {
        Self {
            navigator: RwSignal::new(None),
            loading: RwSignal::new(true),
            fatal_error: RwSignal::new(None),
            pending: RwSignal::new(0),
            viewport: ViewportSync::new(config.reveal_threshold_px),
            config: StoredValue::new(config),
            store: StoredValue::new(store),
            last_session: StoredValue::new(None),
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);
