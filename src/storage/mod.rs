use crate::navigator::PaneId;
use serde::{Deserialize, Serialize};

pub(crate) const SESSION_KEY: &str = "bookmark_panes_session";

/// Where the user was when the page last changed state.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct SessionSnapshot {
    pub active_pane: PaneId,
    pub primary_container_id: String,
    pub secondary_container_id: String,
}

impl SessionSnapshot {
    pub(crate) fn container_id(&self, pane: PaneId) -> &str {
        match pane {
            PaneId::Primary => &self.primary_container_id,
            PaneId::Secondary => &self.secondary_container_id,
        }
    }
}

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
    let json = storage.get_item(key).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

pub(crate) fn save_json_to_storage<T: Serialize>(key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.set_item(key, &json);
        }
    }
}

pub(crate) fn load_session() -> Option<SessionSnapshot> {
    load_json_from_storage::<SessionSnapshot>(SESSION_KEY)
}

/// Skips the write when nothing changed since the last save.
pub(crate) fn save_session(snapshot: &SessionSnapshot, last: &mut Option<SessionSnapshot>) {
    if last.as_ref() == Some(snapshot) {
        return;
    }
    save_json_to_storage(SESSION_KEY, snapshot);
    *last = Some(snapshot.clone());
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_session_storage_roundtrip() {
        let snap = SessionSnapshot {
            active_pane: PaneId::Secondary,
            primary_container_id: "1".to_string(),
            secondary_container_id: "30".to_string(),
        };
        let mut last = None;
        save_session(&snap, &mut last);
        assert_eq!(last.as_ref(), Some(&snap));
        assert_eq!(load_session(), Some(snap));
    }
}
