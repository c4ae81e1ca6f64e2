use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Alert, div, "relative w-full rounded-md border px-3 py-2 text-sm"}
    clx! {AlertTitle, h4, "mb-1 font-medium leading-none"}
    clx! {AlertDescription, p, "text-sm leading-relaxed"}
}

pub use components::*;
