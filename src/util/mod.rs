use wasm_bindgen::JsCast;

/// Runs `f` on the next tick, after the current render has been committed.
pub(crate) fn defer(f: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        wasm_bindgen::closure::Closure::once_into_js(f)
            .as_ref()
            .unchecked_ref(),
        0,
    );
}

pub(crate) fn html_element_by_id(id: &str) -> Option<web_sys::HtmlElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id(id)?
        .dyn_into()
        .ok()
}

/// Moves focus to the element with `id`, if it is mounted. Returns whether it was found.
pub(crate) fn focus_by_id(id: &str) -> bool {
    match html_element_by_id(id) {
        Some(el) => {
            let _ = el.focus();
            true
        }
        None => false,
    }
}

pub(crate) fn blur_by_id(id: &str) -> bool {
    match html_element_by_id(id) {
        Some(el) => {
            let _ = el.blur();
            true
        }
        None => false,
    }
}
