//! Browser binding for [`SheetView`].
//!
//! The host passes a scrollable container element. The widget sizes a spacer
//! child to the grid's content so the container's native scrollbars drive the
//! viewport, positions an `<input>` over the edit cursor, and calls the host's
//! render callback once per animation frame that has changes. Drawing itself
//! stays on the JS side, which pulls [`GridWidget::frame`].

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use js_sys::{Function, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Event, EventTarget, FocusEvent, HtmlDivElement, HtmlElement, IdleDeadline, KeyboardEvent,
    MouseEvent, Node,
};

use super::SheetView;
use crate::config::GridConfig;
use crate::editor::InputOverlay;
use crate::interaction::{Cursor, KeyInput, PointerEvent, PointerTarget};
use crate::layout::Rect;
use crate::store::{rows_from_json, rows_from_value, LoadProgress};

/// Idle budget used when `requestIdleCallback` is unavailable.
const FALLBACK_IDLE_BUDGET_MS: f64 = 8.0;

pub(crate) fn now_ms() -> f64 {
    if let Some(window) = web_sys::window() {
        if let Some(perf) = window.performance() {
            return perf.now();
        }
    }
    js_sys::Date::now()
}

fn scroll_left_f64(element: &HtmlElement) -> f64 {
    Reflect::get(element.as_ref(), &JsValue::from_str("scrollLeft"))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or_else(|| f64::from(element.scroll_left()))
}

fn scroll_top_f64(element: &HtmlElement) -> f64 {
    Reflect::get(element.as_ref(), &JsValue::from_str("scrollTop"))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or_else(|| f64::from(element.scroll_top()))
}

fn set_scroll(element: &HtmlElement, property: &str, value: f64) {
    let _ = Reflect::set(
        element.as_ref(),
        &JsValue::from_str(property),
        &JsValue::from_f64(value),
    );
}

/// A DOM listener that detaches itself on drop.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Function,
    _closure: Box<dyn Any>,
}

impl Listener {
    fn attach<E>(target: &EventTarget, event: &'static str, handler: impl FnMut(E) + 'static) -> Self
    where
        E: FromWasmAbi + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
        let callback: Function = closure.as_ref().unchecked_ref::<Function>().clone();
        target
            .add_event_listener_with_callback(event, &callback)
            .ok();
        Listener {
            target: target.clone(),
            event,
            callback,
            _closure: Box::new(closure),
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, &self.callback);
    }
}

/// At most one pending `requestAnimationFrame`.
#[derive(Default)]
struct FrameLoop {
    scheduled: Cell<bool>,
    callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl FrameLoop {
    fn schedule(&self) {
        if self.scheduled.replace(true) {
            return;
        }
        let callback = self.callback.borrow();
        let requested = match (web_sys::window(), callback.as_ref()) {
            (Some(window), Some(cb)) => window
                .request_animation_frame(cb.as_ref().unchecked_ref())
                .is_ok(),
            _ => false,
        };
        if !requested {
            self.scheduled.set(false);
        }
    }
}

/// At most one pending idle callback, falling back to `setTimeout`.
#[derive(Default)]
struct IdleLoop {
    scheduled: Cell<bool>,
    callback: RefCell<Option<Closure<dyn FnMut(JsValue)>>>,
}

impl IdleLoop {
    fn schedule(&self) {
        if self.scheduled.replace(true) {
            return;
        }
        let callback = self.callback.borrow();
        let requested = match (web_sys::window(), callback.as_ref()) {
            (Some(window), Some(cb)) => {
                let function: &Function = cb.as_ref().unchecked_ref();
                window.request_idle_callback(function).is_ok()
                    || window
                        .set_timeout_with_callback_and_timeout_and_arguments_0(function, 0)
                        .is_ok()
            }
            _ => false,
        };
        if !requested {
            self.scheduled.set(false);
        }
    }
}

struct Shared {
    view: SheetView,
    render_callback: Option<Function>,
    cursor: Cursor,
}

struct Dom {
    container: HtmlElement,
    spacer: HtmlDivElement,
    overlay: RefCell<InputOverlay>,
}

impl Dom {
    fn pointer_event(&self, event: &MouseEvent) -> PointerEvent {
        let rect = self.container.get_bounding_client_rect();
        let x = f64::from(event.client_x()) - rect.left();
        let y = f64::from(event.client_y()) - rect.top();
        let target = if x < 0.0 || y < 0.0 || x > rect.width() || y > rect.height() {
            PointerTarget::Outside
        } else if x >= f64::from(self.container.client_width())
            || y >= f64::from(self.container.client_height())
        {
            PointerTarget::Scrollbar
        } else {
            PointerTarget::Grid
        };
        PointerEvent::new(x, y, event.time_stamp()).with_target(target)
    }

    fn client_size(&self) -> (f64, f64) {
        (
            f64::from(self.container.client_width()),
            f64::from(self.container.client_height()),
        )
    }

    fn set_cursor(&self, cursor: Cursor) {
        let _ = self.container.style().set_property("cursor", cursor.as_css());
    }

    /// Mirror grid state onto the DOM: spacer size, scroll offset and edit surface.
    ///
    /// The shared borrow is released before touching the DOM: setting scroll
    /// or moving focus fires listeners that borrow it again.
    fn sync(&self, shared: &RefCell<Shared>) {
        let (size, scroll, edit) = {
            let Ok(s) = shared.try_borrow() else {
                return;
            };
            let grid = s.view.grid();
            let edit = grid
                .editing
                .as_ref()
                .filter(|session| session.is_visible())
                .and_then(|session| {
                    let rect = grid.edit_surface_rect()?;
                    Some((rect, session.value().to_string(), session.is_focused()))
                });
            (
                s.view.content_size(),
                (grid.viewport.scroll_x, grid.viewport.scroll_y),
                edit,
            )
        };

        let style = self.spacer.style();
        let _ = style.set_property("width", &format!("{}px", size.width));
        let _ = style.set_property("height", &format!("{}px", size.height));

        let (sx, sy) = scroll;
        if (scroll_left_f64(&self.container) - sx).abs() > 0.5 {
            set_scroll(&self.container, "scrollLeft", sx);
        }
        if (scroll_top_f64(&self.container) - sy).abs() > 0.5 {
            set_scroll(&self.container, "scrollTop", sy);
        }

        let Ok(mut overlay) = self.overlay.try_borrow_mut() else {
            return;
        };
        match edit {
            // The input lives in the scrolled content, so it takes content coordinates
            Some((rect, value, focused)) => {
                let placed = Rect {
                    x: rect.x + sx,
                    y: rect.y + sy,
                    ..rect
                };
                overlay.show(placed, &value, focused, &self.container);
            }
            None => overlay.hide(),
        }
    }
}

#[wasm_bindgen]
pub struct GridWidget {
    shared: Rc<RefCell<Shared>>,
    dom: Rc<Dom>,
    frames: Rc<FrameLoop>,
    idle: Rc<IdleLoop>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl GridWidget {
    /// Attach a grid to `container`. `config` is a partial `GridConfig`
    /// object; missing fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(container: HtmlElement, config: JsValue) -> Result<GridWidget, JsValue> {
        console_error_panic_hook::set_once();

        let config = if config.is_undefined() || config.is_null() {
            GridConfig::default()
        } else {
            serde_wasm_bindgen::from_value::<GridConfig>(config)?
        };
        config.validate()?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let spacer = document
            .create_element("div")?
            .dyn_into::<HtmlDivElement>()
            .map_err(JsValue::from)?;
        let spacer_style = spacer.style();
        let _ = spacer_style.set_property("position", "absolute");
        let _ = spacer_style.set_property("top", "0");
        let _ = spacer_style.set_property("left", "0");
        let _ = spacer_style.set_property("pointer-events", "none");
        container.append_child(&spacer)?;

        let container_style = container.style();
        if container_style
            .get_property_value("position")
            .unwrap_or_default()
            .is_empty()
        {
            let _ = container_style.set_property("position", "relative");
        }
        let _ = container_style.set_property("overflow", "auto");

        let frames = Rc::new(FrameLoop::default());
        let idle = Rc::new(IdleLoop::default());
        let hook_frames = Rc::clone(&frames);
        let view = SheetView::new(config, Box::new(move || hook_frames.schedule()))?;

        let shared = Rc::new(RefCell::new(Shared {
            view,
            render_callback: None,
            cursor: Cursor::Default,
        }));
        let dom = Rc::new(Dom {
            container,
            spacer,
            overlay: RefCell::new(InputOverlay::new()),
        });

        Self::install_frame_loop(&frames, &shared, &dom);
        Self::install_idle_loop(&idle, &shared);

        let mut widget = GridWidget {
            shared,
            dom,
            frames,
            idle,
            listeners: Vec::new(),
        };
        widget.attach_listeners();

        let (width, height) = widget.dom.client_size();
        widget.shared.borrow_mut().view.resize(width, height);
        widget.dom.sync(&widget.shared);
        log::info!("grid widget attached: {width}x{height}");
        Ok(widget)
    }

    fn install_frame_loop(frames: &Rc<FrameLoop>, shared: &Rc<RefCell<Shared>>, dom: &Rc<Dom>) {
        let frames_ref: Weak<FrameLoop> = Rc::downgrade(frames);
        let shared_ref: Weak<RefCell<Shared>> = Rc::downgrade(shared);
        let dom = Rc::clone(dom);
        let closure = Closure::wrap(Box::new(move |_timestamp: f64| {
            let (Some(frames), Some(shared)) = (frames_ref.upgrade(), shared_ref.upgrade()) else {
                return;
            };
            frames.scheduled.set(false);
            let (report, callback) = match shared.try_borrow_mut() {
                Ok(mut s) => (s.view.on_frame(), s.render_callback.clone()),
                Err(_) => {
                    frames.schedule();
                    return;
                }
            };
            dom.sync(&shared);
            if report.render {
                if let Some(callback) = callback {
                    if let Err(err) = callback.call0(&JsValue::NULL) {
                        log::error!("render callback failed: {err:?}");
                    }
                }
            }
            if report.keep_running {
                frames.schedule();
            }
        }) as Box<dyn FnMut(f64)>);
        *frames.callback.borrow_mut() = Some(closure);
    }

    fn install_idle_loop(idle: &Rc<IdleLoop>, shared: &Rc<RefCell<Shared>>) {
        let idle_ref: Weak<IdleLoop> = Rc::downgrade(idle);
        let shared_ref: Weak<RefCell<Shared>> = Rc::downgrade(shared);
        let closure = Closure::wrap(Box::new(move |deadline: JsValue| {
            let (Some(idle), Some(shared)) = (idle_ref.upgrade(), shared_ref.upgrade()) else {
                return;
            };
            idle.scheduled.set(false);
            let deadline = deadline.dyn_into::<IdleDeadline>().ok();
            let started = now_ms();
            let has_time = move || match &deadline {
                Some(deadline) => deadline.time_remaining() > 1.0,
                None => now_ms() - started < FALLBACK_IDLE_BUDGET_MS,
            };
            let progress = match shared.try_borrow_mut() {
                Ok(mut s) => s.view.on_idle(has_time),
                Err(_) => LoadProgress::Pending,
            };
            if progress == LoadProgress::Pending {
                idle.schedule();
            }
        }) as Box<dyn FnMut(JsValue)>);
        *idle.callback.borrow_mut() = Some(closure);
    }

    fn attach_listeners(&mut self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let container: &EventTarget = self.dom.container.as_ref();

        // Pointer down on the container; move/up on the window so drags
        // keep tracking outside the grid.
        {
            let shared = Rc::clone(&self.shared);
            let dom = Rc::clone(&self.dom);
            self.listeners.push(Listener::attach(container, "mousedown", move |event: MouseEvent| {
                if event.button() != 0 {
                    return;
                }
                let ev = dom.pointer_event(&event);
                let handled = match shared.try_borrow_mut() {
                    Ok(mut s) => s.view.pointer_down(&ev),
                    Err(_) => return,
                };
                if handled {
                    // Keep focus where the grid puts it
                    event.prevent_default();
                }
                dom.sync(&shared);
            }));
        }
        {
            let shared = Rc::clone(&self.shared);
            let dom = Rc::clone(&self.dom);
            self.listeners.push(Listener::attach(window.as_ref(), "mousemove", move |event: MouseEvent| {
                let ev = dom.pointer_event(&event);
                let changed = match shared.try_borrow_mut() {
                    Ok(mut s) => {
                        let cursor = s.view.pointer_move(&ev);
                        let changed = (cursor != s.cursor).then_some(cursor);
                        s.cursor = cursor;
                        changed
                    }
                    Err(_) => return,
                };
                if let Some(cursor) = changed {
                    dom.set_cursor(cursor);
                }
            }));
        }
        {
            let shared = Rc::clone(&self.shared);
            let dom = Rc::clone(&self.dom);
            self.listeners.push(Listener::attach(window.as_ref(), "mouseup", move |event: MouseEvent| {
                let ev = dom.pointer_event(&event);
                match shared.try_borrow_mut() {
                    Ok(mut s) => s.view.pointer_up(&ev),
                    Err(_) => return,
                }
                dom.sync(&shared);
            }));
        }

        // Keyboard on the document, ignoring keys aimed at other inputs on the page
        if let Some(document) = window.document() {
            let shared = Rc::clone(&self.shared);
            let dom = Rc::clone(&self.dom);
            let doc = document.clone();
            self.listeners.push(Listener::attach(document.as_ref(), "keydown", move |event: KeyboardEvent| {
                if event.ctrl_key() || event.meta_key() || event.alt_key() {
                    return;
                }
                if let Some(active) = doc.active_element() {
                    let active: &Node = &active;
                    let ours = dom.container.is_same_node(Some(active))
                        || doc.body().is_some_and(|b| b.is_same_node(Some(active)))
                        || dom
                            .overlay
                            .try_borrow()
                            .ok()
                            .and_then(|o| o.element().map(|e| e.is_same_node(Some(active))))
                            .unwrap_or(false);
                    if !ours {
                        return;
                    }
                }
                let key = KeyInput::from_key(&event.key());
                let consumed = match shared.try_borrow_mut() {
                    Ok(mut s) => {
                        let typing = s
                            .view
                            .grid()
                            .editing
                            .as_ref()
                            .is_some_and(|session| session.is_focused());
                        // Focused input takes characters natively and reports them via `input`
                        if typing && matches!(key, KeyInput::Char(_)) {
                            return;
                        }
                        s.view.key_down(key)
                    }
                    Err(_) => return,
                };
                if consumed {
                    event.prevent_default();
                }
                dom.sync(&shared);
            }));
        }

        // Native scrolling drives the viewport
        {
            let shared = Rc::clone(&self.shared);
            let dom = Rc::clone(&self.dom);
            self.listeners.push(Listener::attach(container, "scroll", move |_event: Event| {
                let (x, y) = (scroll_left_f64(&dom.container), scroll_top_f64(&dom.container));
                match shared.try_borrow_mut() {
                    Ok(mut s) => s.view.on_scroll(x, y),
                    Err(_) => return,
                }
                dom.sync(&shared);
            }));
        }
        {
            let shared = Rc::clone(&self.shared);
            let dom = Rc::clone(&self.dom);
            self.listeners.push(Listener::attach(window.as_ref(), "resize", move |_event: Event| {
                let (width, height) = dom.client_size();
                match shared.try_borrow_mut() {
                    Ok(mut s) => s.view.resize(width, height),
                    Err(_) => return,
                }
                dom.sync(&shared);
            }));
        }

        // Edit surface: mirror typed text, commit on blur
        let input = self
            .dom
            .overlay
            .borrow_mut()
            .ensure(&self.dom.container)
            .cloned();
        if let Some(input) = input {
            {
                let shared = Rc::clone(&self.shared);
                let source = input.clone();
                self.listeners.push(Listener::attach(input.as_ref(), "input", move |_event: Event| {
                    if let Ok(mut s) = shared.try_borrow_mut() {
                        s.view.set_edit_value(&source.value());
                    }
                }));
            }
            {
                let shared = Rc::clone(&self.shared);
                let dom = Rc::clone(&self.dom);
                self.listeners.push(Listener::attach(input.as_ref(), "blur", move |_event: FocusEvent| {
                    match shared.try_borrow_mut() {
                        Ok(mut s) => s.view.blur_edit(),
                        Err(_) => return,
                    }
                    dom.sync(&shared);
                }));
            }
        }
    }

    fn with_view<R>(&self, f: impl FnOnce(&mut SheetView) -> R) -> R {
        let result = f(&mut self.shared.borrow_mut().view);
        self.dom.sync(&self.shared);
        result
    }

    /// Called once per frame with changes; the callback should call `frame()` and draw.
    #[wasm_bindgen(js_name = "setRenderCallback")]
    pub fn set_render_callback(&self, callback: Option<Function>) {
        let mut s = self.shared.borrow_mut();
        s.render_callback = callback;
        s.view.invalidate();
    }

    /// Everything the renderer needs for the current frame.
    pub fn frame(&self) -> Result<JsValue, JsValue> {
        let snapshot = self.shared.borrow().view.frame();
        Ok(serde_wasm_bindgen::to_value(&snapshot)?)
    }

    /// Replace the grid contents with an array of row objects.
    ///
    /// The first rows appear immediately; the rest load in idle time.
    #[wasm_bindgen(js_name = "loadRows")]
    pub fn load_rows(&self, rows: JsValue) -> Result<(), JsValue> {
        let value: serde_json::Value = serde_wasm_bindgen::from_value(rows)?;
        let rows = rows_from_value(value)?;
        if self.with_view(|view| view.load_rows(rows)) == LoadProgress::Pending {
            self.idle.schedule();
        }
        Ok(())
    }

    /// Like `loadRows`, from JSON text.
    #[wasm_bindgen(js_name = "loadJson")]
    pub fn load_json(&self, text: &str) -> Result<(), JsValue> {
        let rows = rows_from_json(text)?;
        if self.with_view(|view| view.load_rows(rows)) == LoadProgress::Pending {
            self.idle.schedule();
        }
        Ok(())
    }

    #[wasm_bindgen(js_name = "isLoading")]
    pub fn is_loading(&self) -> bool {
        self.shared.borrow().view.is_loading()
    }

    #[wasm_bindgen(js_name = "clearData")]
    pub fn clear_data(&self) {
        self.with_view(SheetView::clear_data);
    }

    #[wasm_bindgen(js_name = "setCell")]
    pub fn set_cell(&self, row: u32, col: u32, value: &str) {
        self.with_view(|view| view.set_cell(row, col, value, None));
    }

    #[wasm_bindgen(js_name = "cellValue")]
    pub fn cell_value(&self, row: u32, col: u32) -> Option<String> {
        self.shared
            .borrow()
            .view
            .cell(row, col)
            .map(|cell| cell.value.clone())
    }

    /// `{ sum, count, average }` over the selection.
    pub fn statistics(&self) -> Result<JsValue, JsValue> {
        let stats = self.shared.borrow().view.statistics();
        Ok(serde_wasm_bindgen::to_value(&stats)?)
    }

    /// Normalized selection range, or `undefined`.
    pub fn selection(&self) -> Result<JsValue, JsValue> {
        let range = self.shared.borrow().view.selected_range();
        Ok(serde_wasm_bindgen::to_value(&range)?)
    }

    #[wasm_bindgen(js_name = "contentSize")]
    pub fn content_size(&self) -> Result<JsValue, JsValue> {
        let size = self.shared.borrow().view.content_size();
        Ok(serde_wasm_bindgen::to_value(&size)?)
    }

    /// Resolve the target under a viewport point and return the menu captions.
    #[wasm_bindgen(js_name = "contextMenu")]
    pub fn context_menu(&self, client_x: f64, client_y: f64) -> Result<JsValue, JsValue> {
        let rect = self.dom.container.get_bounding_client_rect();
        let labels = {
            let mut s = self.shared.borrow_mut();
            s.view.context_target(client_x - rect.left(), client_y - rect.top());
            s.view.context_labels()
        };
        Ok(serde_wasm_bindgen::to_value(&labels)?)
    }

    #[wasm_bindgen(js_name = "insertRowAbove")]
    pub fn insert_row_above(&self) -> Result<bool, JsValue> {
        self.with_view(SheetView::insert_row_above).map_err(JsValue::from)
    }

    #[wasm_bindgen(js_name = "insertRowBelow")]
    pub fn insert_row_below(&self) -> Result<bool, JsValue> {
        self.with_view(SheetView::insert_row_below).map_err(JsValue::from)
    }

    #[wasm_bindgen(js_name = "insertColumnLeft")]
    pub fn insert_column_left(&self) -> Result<bool, JsValue> {
        self.with_view(SheetView::insert_column_left).map_err(JsValue::from)
    }

    #[wasm_bindgen(js_name = "insertColumnRight")]
    pub fn insert_column_right(&self) -> Result<bool, JsValue> {
        self.with_view(SheetView::insert_column_right).map_err(JsValue::from)
    }

    #[wasm_bindgen(js_name = "deleteRow")]
    pub fn delete_row(&self) -> Result<bool, JsValue> {
        self.with_view(SheetView::delete_target_row).map_err(JsValue::from)
    }

    #[wasm_bindgen(js_name = "deleteColumn")]
    pub fn delete_column(&self) -> Result<bool, JsValue> {
        self.with_view(SheetView::delete_target_column).map_err(JsValue::from)
    }

    /// Re-read the container size after a layout change the window did not report.
    pub fn resize(&self) {
        let (width, height) = self.dom.client_size();
        self.with_view(|view| view.resize(width, height));
    }

    #[wasm_bindgen(js_name = "scrollTo")]
    pub fn scroll_to(&self, x: f64, y: f64) {
        self.with_view(|view| view.on_scroll(x, y));
    }
}

impl Drop for GridWidget {
    fn drop(&mut self) {
        self.listeners.clear();
        self.frames.callback.borrow_mut().take();
        self.idle.callback.borrow_mut().take();
        if let Some(parent) = self.dom.spacer.parent_node() {
            let _ = parent.remove_child(&self.dom.spacer);
        }
    }
}
