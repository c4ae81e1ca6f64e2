use crate::navigator::{Navigator, PaneId};
use wasm_bindgen::JsCast;

/// Vertical edges of the selected row, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RowBounds {
    pub top: f64,
    pub bottom: f64,
}

/// Keeps the selected row between the reveal threshold and the bottom of the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ViewportSync {
    /// Minimum distance between the viewport top and the selected row.
    pub threshold: f64,
}

impl ViewportSync {
    pub(crate) fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Next scroll offset for a pane, or `None` when there is nothing to change.
    ///
    /// A positive offset pushes the list down. Adjustments are exactly the
    /// intrusion past either bound, so a second pass over the moved row is a no-op.
    pub(crate) fn next_offset(
        &self,
        current: f64,
        row: Option<RowBounds>,
        viewport_height: f64,
        force_top: bool,
    ) -> Option<f64> {
        if force_top {
            return (current != 0.0).then_some(0.0);
        }
        let row = row?;

        let mut offset = current;
        if row.top < self.threshold {
            offset += self.threshold - row.top;
        }
        if row.bottom > viewport_height {
            offset -= row.bottom - viewport_height;
        }
        (offset != current).then_some(offset)
    }
}

pub(crate) const SELECTED_ROW_ID: &str = "selected-bookmark";

/// Measures the selected row, if it is mounted.
pub(crate) fn selected_row_bounds() -> Option<RowBounds> {
    let document = web_sys::window()?.document()?;
    let el: web_sys::HtmlElement = document.get_element_by_id(SELECTED_ROW_ID)?.dyn_into().ok()?;
    let rect = el.get_bounding_client_rect();
    Some(RowBounds {
        top: rect.top(),
        bottom: rect.bottom(),
    })
}

pub(crate) fn viewport_height() -> f64 {
    web_sys::window()
        .and_then(|w| w.inner_height().ok())
        .and_then(|h| h.as_f64())
        .unwrap_or(0.0)
}

/// Computes the pane's new offset from the current DOM, without touching it.
pub(crate) fn reveal(sync: &ViewportSync, nav: &Navigator, pane: PaneId, force_top: bool) -> Option<f64> {
    let current = nav.pane(pane).scroll_offset;
    sync.next_offset(current, selected_row_bounds(), viewport_height(), force_top)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEIGHT: f64 = 600.0;

    fn row(top: f64, bottom: f64) -> Option<RowBounds> {
        Some(RowBounds { top, bottom })
    }

    #[test]
    fn test_row_above_threshold_pushes_list_down() {
        let sync = ViewportSync::new(32.0);
        let next = sync.next_offset(-100.0, row(10.0, 40.0), HEIGHT, false);
        assert_eq!(next, Some(-78.0));
    }

    #[test]
    fn test_row_below_window_pulls_list_up() {
        let sync = ViewportSync::new(32.0);
        let next = sync.next_offset(0.0, row(590.0, 620.0), HEIGHT, false);
        assert_eq!(next, Some(-20.0));
    }

    #[test]
    fn test_row_within_bounds_is_left_alone() {
        let sync = ViewportSync::new(32.0);
        assert_eq!(sync.next_offset(-40.0, row(32.0, 600.0), HEIGHT, false), None);
        assert_eq!(sync.next_offset(-40.0, row(100.0, 130.0), HEIGHT, false), None);
    }

    #[test]
    fn test_adjustment_converges() {
        let sync = ViewportSync::new(32.0);
        let first = sync.next_offset(0.0, row(610.0, 640.0), HEIGHT, false).unwrap();
        let shift = first - 0.0;
        let moved = row(610.0 + shift, 640.0 + shift);
        assert_eq!(sync.next_offset(first, moved, HEIGHT, false), None);
    }

    #[test]
    fn test_force_top_resets_offset() {
        let sync = ViewportSync::new(32.0);
        assert_eq!(sync.next_offset(-250.0, row(500.0, 530.0), HEIGHT, true), Some(0.0));
    }

    #[test]
    fn test_force_top_applies_to_empty_pane() {
        let sync = ViewportSync::new(32.0);
        assert_eq!(sync.next_offset(-250.0, None, HEIGHT, true), Some(0.0));
        assert_eq!(sync.next_offset(0.0, None, HEIGHT, true), None);
    }

    #[test]
    fn test_missing_row_is_noop() {
        let sync = ViewportSync::new(32.0);
        assert_eq!(sync.next_offset(-250.0, None, HEIGHT, false), None);
    }
}
