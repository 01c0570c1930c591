//! DOM input overlay used as the edit surface.
//!
//! One `<input>` element is created lazily inside the grid container and
//! repositioned over the edit cursor's cell. The grid core decides where it
//! goes and what it holds; this type only mirrors that onto the DOM.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlInputElement};

use crate::layout::Rect;

pub(crate) struct InputOverlay {
    input: Option<HtmlInputElement>,
    focused: bool,
}

impl InputOverlay {
    pub(crate) fn new() -> Self {
        InputOverlay {
            input: None,
            focused: false,
        }
    }

    /// Place the surface at `rect` (container pixels) holding `value`.
    ///
    /// `focused` gives it keyboard focus with the caret at the end; otherwise
    /// it is shown blurred.
    pub(crate) fn show(&mut self, rect: Rect, value: &str, focused: bool, container: &HtmlElement) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(input) = self.get_or_create_input(&document, container) else {
            return;
        };
        let style = input.style();
        let _ = style.set_property("display", "block");
        let _ = style.set_property("left", &format!("{}px", rect.x));
        let _ = style.set_property("top", &format!("{}px", rect.y));
        let _ = style.set_property("width", &format!("{}px", rect.width));
        let _ = style.set_property("height", &format!("{}px", rect.height));

        if input.value() != value {
            input.set_value(value);
        }
        let input = input.clone();
        if focused && !self.focused {
            self.focused = true;
            let _ = input.focus();
            // Caret at the end of the existing text
            let end = u32::try_from(value.encode_utf16().count()).unwrap_or(u32::MAX);
            let _ = input.set_selection_range(end, end);
        } else if !focused && self.focused {
            self.focused = false;
            let _ = input.blur();
        }
    }

    pub(crate) fn hide(&mut self) {
        if let Some(ref input) = self.input {
            let _ = input.style().set_property("display", "none");
            if std::mem::take(&mut self.focused) {
                let _ = input.blur();
            }
        }
    }

    /// The element, once created; the binding attaches `input`/`blur` listeners to it.
    pub(crate) fn element(&self) -> Option<&HtmlInputElement> {
        self.input.as_ref()
    }

    /// Create the element on first use.
    pub(crate) fn ensure(&mut self, container: &HtmlElement) -> Option<&HtmlInputElement> {
        let document = web_sys::window().and_then(|w| w.document())?;
        self.get_or_create_input(&document, container)
    }

    fn get_or_create_input(
        &mut self,
        document: &Document,
        container: &HtmlElement,
    ) -> Option<&HtmlInputElement> {
        if self.input.is_none() {
            let input = document
                .create_element("input")
                .ok()?
                .dyn_into::<HtmlInputElement>()
                .ok()?;
            input.set_type("text");
            let style = input.style();
            let _ = style.set_property("position", "absolute");
            let _ = style.set_property("z-index", "10");
            let _ = style.set_property("box-sizing", "border-box");
            let _ = style.set_property("border", "2px solid #008000");
            let _ = style.set_property("outline", "none");
            let _ = style.set_property("padding", "0 4px");
            let _ = style.set_property("font", "12px Arial");
            let _ = style.set_property("background", "#fff");
            let _ = style.set_property("display", "none");
            let _ = container.append_child(&input);
            self.input = Some(input);
        }
        self.input.as_ref()
    }
}

impl Drop for InputOverlay {
    fn drop(&mut self) {
        if let Some(ref input) = self.input {
            if let Some(parent) = input.parent_node() {
                let _ = parent.remove_child(input);
            }
        }
    }
}
