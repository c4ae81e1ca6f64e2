use super::{BookmarkStore, StoreError, StoreResult};
use crate::models::{BookmarkNode, BookmarkSummary};
use js_sys::Promise;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

// Manifest V3 `chrome.bookmarks` returns a Promise when no callback is passed.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["chrome", "bookmarks"], js_name = getTree, catch)]
    fn js_get_tree() -> Result<Promise, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "bookmarks"], js_name = get, catch)]
    fn js_get(id: &str) -> Result<Promise, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "bookmarks"], js_name = getSubTree, catch)]
    fn js_get_sub_tree(id: &str) -> Result<Promise, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "bookmarks"], js_name = create, catch)]
    fn js_create(details: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "bookmarks"], js_name = update, catch)]
    fn js_update(id: &str, changes: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "bookmarks"], js_name = removeTree, catch)]
    fn js_remove_tree(id: &str) -> Result<Promise, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "bookmarks"], js_name = "move", catch)]
    fn js_move(id: &str, destination: &JsValue) -> Result<Promise, JsValue>;
}

/// The browser's bookmark tree, reached through the extension API.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ChromeBookmarks;

impl ChromeBookmarks {
    /// True when the page runs inside an extension context with the `bookmarks` permission.
    pub(crate) fn is_available() -> bool {
        let global = js_sys::global();
        let Ok(chrome) = js_sys::Reflect::get(&global, &"chrome".into()) else {
            return false;
        };
        if chrome.is_undefined() || chrome.is_null() {
            return false;
        }
        js_sys::Reflect::get(&chrome, &"bookmarks".into())
            .map(|b| !b.is_undefined() && !b.is_null())
            .unwrap_or(false)
    }
}

fn describe(e: &JsValue) -> String {
    if let Some(err) = e.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}

async fn settle(ctx: &str, promise: Result<Promise, JsValue>) -> StoreResult<JsValue> {
    let promise = promise.map_err(|e| StoreError::rejected(ctx, describe(&e)))?;
    JsFuture::from(promise)
        .await
        .map_err(|e| StoreError::rejected(ctx, describe(&e)))
}

fn decode<T: DeserializeOwned>(value: &JsValue) -> StoreResult<T> {
    let json = js_sys::JSON::stringify(value).map_err(|e| StoreError::parse(describe(&e)))?;
    let json: String = json.into();
    serde_json::from_str(&json).map_err(StoreError::parse)
}

fn encode(value: &serde_json::Value) -> StoreResult<JsValue> {
    js_sys::JSON::parse(&value.to_string()).map_err(|e| StoreError::parse(describe(&e)))
}

/// Lookups resolve to a one-element array.
fn single<T>(list: Vec<T>, id: &str) -> StoreResult<T> {
    list.into_iter().next().ok_or_else(|| StoreError::not_found(id))
}

impl BookmarkStore for ChromeBookmarks {
    async fn get_tree(&self) -> StoreResult<BookmarkNode> {
        let value = settle("bookmarks.getTree", js_get_tree()).await?;
        let root = single(decode::<Vec<BookmarkNode>>(&value)?, super::ROOT_ID)?;
        root.validate()?;
        Ok(root)
    }

    async fn get(&self, id: &str) -> StoreResult<BookmarkSummary> {
        let value = settle("bookmarks.get", js_get(id)).await?;
        single(decode(&value)?, id)
    }

    async fn get_subtree(&self, id: &str) -> StoreResult<BookmarkNode> {
        let value = settle("bookmarks.getSubTree", js_get_sub_tree(id)).await?;
        let node = single(decode::<Vec<BookmarkNode>>(&value)?, id)?;
        node.validate()?;
        Ok(node)
    }

    async fn create_folder(&self, parent_id: &str, index: usize, title: &str) -> StoreResult<BookmarkNode> {
        let details = encode(&serde_json::json!({
            "parentId": parent_id,
            "index": index,
            "title": title,
        }))?;
        let value = settle("bookmarks.create", js_create(&details)).await?;
        let mut node: BookmarkNode = decode(&value)?;
        // Created folders come back without a children list.
        if node.url.is_none() && node.children.is_none() {
            node.children = Some(Vec::new());
        }
        node.validate()?;
        Ok(node)
    }

    async fn update_title(&self, id: &str, title: &str) -> StoreResult<()> {
        let changes = encode(&serde_json::json!({ "title": title }))?;
        settle("bookmarks.update", js_update(id, &changes)).await?;
        Ok(())
    }

    async fn remove_tree(&self, id: &str) -> StoreResult<()> {
        settle("bookmarks.removeTree", js_remove_tree(id)).await?;
        Ok(())
    }

    async fn move_node(&self, id: &str, parent_id: &str, index: usize) -> StoreResult<()> {
        let destination = encode(&serde_json::json!({
            "parentId": parent_id,
            "index": index,
        }))?;
        settle("bookmarks.move", js_move(id, &destination)).await?;
        Ok(())
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_plain_page_has_no_bookmarks_api() {
        assert!(!ChromeBookmarks::is_available());
    }

    #[wasm_bindgen_test]
    fn test_decode_roundtrips_through_js_json() {
        let value = encode(&serde_json::json!([{ "id": "1", "parentId": "0", "title": "Bar", "children": [] }]))
            .expect("should encode");
        let nodes: Vec<BookmarkNode> = decode(&value).expect("should decode");
        assert_eq!(nodes[0].parent_id.as_deref(), Some("0"));
        assert!(nodes[0].is_folder());
    }
}
