use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

/// Inline text field used while renaming a bookmark row.
///
/// The value is only written once, at mount. Edits are reported through
/// `on_text` so the caller can keep the draft outside the reactive graph and
/// the field is never re-rendered under the user's caret.
#[component]
pub fn InlineInput(
    #[prop(into, optional)] class: String,
    #[prop(into)] id: String,
    #[prop(into)] initial: String,
    #[prop(into)] on_text: Callback<String>,
    #[prop(into)] on_leave: Callback<()>,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "h-7 w-full min-w-0 rounded-sm border border-input bg-background px-2 text-sm outline-none",
        "focus-visible:border-ring focus-visible:ring-ring/50 focus-visible:ring-2",
        class
    );

    let on_input = move |ev: web_sys::Event| {
        if let Some(target) = ev.target() {
            if let Some(input) = target.dyn_ref::<web_sys::HtmlInputElement>() {
                on_text.run(input.value());
            }
        }
    };

    view! {
        <input
            data-name="InlineInput"
            type="text"
            class=merged_class
            id=id
            prop:value=initial
            on:input=on_input
            on:blur=move |_| on_leave.run(())
        />
    }
}
