use crate::config::ManagerConfig;
use crate::logging;
use crate::pages::ManagerPage;
use crate::state::{AppContext, AppState};
use crate::store::AnyStore;
use leptos::prelude::*;
use tracing::warn;

#[component]
pub fn App() -> impl IntoView {
    let (config, config_problem) = ManagerConfig::load();
    logging::init(&config.log_filter);
    if let Some(problem) = config_problem {
        warn!("{problem}");
    }

    let store = AnyStore::select(config.demo);
    let app_state = AppState::new(config, store);
    provide_context(AppContext(app_state));
    app_state.bootstrap();

    view! { <ManagerPage /> }
}
