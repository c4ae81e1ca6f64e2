use crate::navigator::PaneLayout;
use serde::{Deserialize, Serialize};

/// Page settings, read from `window.ENV` when the hosting HTML provides one.
///
/// ```html
/// <script>window.ENV = { layout: "toggle", logFilter: "bookmark_panes=debug" };</script>
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct ManagerConfig {
    /// Pixels kept clear above the selected row.
    pub reveal_threshold_px: f64,
    pub new_folder_title: String,
    pub layout: PaneLayout,
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
    /// Use the built-in sample tree even inside the extension.
    pub demo: bool,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            reveal_threshold_px: 32.0,
            new_folder_title: "New Folder".to_string(),
            layout: PaneLayout::Split,
            log_filter: "info".to_string(),
            demo: false,
        }
    }
}

impl ManagerConfig {
    /// Parses the `window.ENV` object serialized as JSON. Errors leave every field at its default.
    pub(crate) fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn load() -> (Self, Option<String>) {
        let Some(window) = web_sys::window() else {
            return (Self::default(), None);
        };
        let Some(env) = window.get("ENV") else {
            return (Self::default(), None);
        };
        if env.is_undefined() || !env.is_object() {
            return (Self::default(), None);
        }

        let json = js_sys::JSON::stringify(&env).ok().map(String::from);
        match json.as_deref().map(Self::from_json) {
            Some(Ok(config)) => (config, None),
            Some(Err(e)) => (Self::default(), Some(format!("ignoring malformed window.ENV: {e}"))),
            None => (Self::default(), Some("window.ENV is not serializable".to_string())),
        }
    }
}
