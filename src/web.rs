//! Browser host built on `web-sys`.
//!
//! [`WebPage`] implements [`Page`] against the live document. [`mount`] loads a [`Stage`] over it,
//! wires the document listeners, and paces the stage clock with `requestAnimationFrame` while
//! frames are wanted and `setTimeout` while only timers are pending.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;

use crate::config::StageConfig;
use crate::foundation::core::{Millis, ScrollSnapshot, Viewport};
use crate::foundation::error::{StageError, StageResult};
use crate::overlay::consent::Consent;
use crate::page::{Element, Page, ScrollBehavior};
use crate::render::grid::{CellContent, GridCell};
use crate::session::{Stage, StageReport};

const ANIMATED_PARTS: &str = "image, path, g";
const EMBED_ALLOW: &str = "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture; fullscreen";

fn js_error(make: fn(String) -> StageError, what: &str, err: &JsValue) -> StageError {
    make(format!("{what}: {err:?}"))
}

fn style_of(el: &web_sys::Element) -> Option<web_sys::CssStyleDeclaration> {
    if let Some(html) = el.dyn_ref::<web_sys::HtmlElement>() {
        return Some(html.style());
    }
    el.dyn_ref::<web_sys::SvgElement>().map(|svg| svg.style())
}

fn set_style(el: &web_sys::Element, property: &str, value: Option<&str>) {
    let Some(style) = style_of(el) else {
        return;
    };
    let res = match value {
        Some(v) => style.set_property(property, v),
        None => style.remove_property(property).map(|_| ()),
    };
    if let Err(err) = res {
        tracing::debug!(property, ?err, "style write rejected");
    }
}

fn for_each_part(root: &web_sys::Element, mut f: impl FnMut(&web_sys::Element)) {
    let Ok(parts) = root.query_selector_all(ANIMATED_PARTS) else {
        return;
    };
    for i in 0..parts.length() {
        if let Some(el) = parts.get(i).and_then(|n| n.dyn_into::<web_sys::Element>().ok()) {
            f(&el);
        }
    }
}

/// [`Page`] over the live browser document.
///
/// Elements are resolved once at construction; the background effect draw is supplied by the
/// embedder since the shader program lives outside this crate.
pub struct WebPage {
    window: web_sys::Window,
    document: web_sys::Document,
    elements: BTreeMap<Element, web_sys::Element>,
    draw: Box<dyn FnMut()>,
}

impl std::fmt::Debug for WebPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebPage")
            .field("elements", &self.elements.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl WebPage {
    /// Bind to the global window and resolve every known element.
    pub fn attach(draw: impl FnMut() + 'static) -> StageResult<Self> {
        let window =
            web_sys::window().ok_or_else(|| StageError::validation("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| StageError::validation("window has no document"))?;
        let elements = Element::ALL
            .into_iter()
            .filter_map(|el| {
                let node = document.query_selector(el.selector()).ok().flatten()?;
                Some((el, node))
            })
            .collect();
        Ok(Self {
            window,
            document,
            elements,
            draw: Box::new(draw),
        })
    }

    fn get(&self, el: Element) -> Option<&web_sys::Element> {
        self.elements.get(&el)
    }

    fn storage(&self) -> StageResult<web_sys::Storage> {
        self.window
            .local_storage()
            .map_err(|e| js_error(StageError::Storage, "open localStorage", &e))?
            .ok_or_else(|| StageError::storage("localStorage unavailable"))
    }

    fn canvas(&self) -> Option<web_sys::HtmlCanvasElement> {
        self.get(Element::EffectCanvas)?
            .clone()
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .ok()
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }
}

impl Page for WebPage {
    fn has_element(&self, el: Element) -> bool {
        self.elements.contains_key(&el)
    }

    fn set_opacity(&mut self, el: Element, opacity: Option<f64>) {
        if let Some(node) = self.get(el) {
            set_style(node, "opacity", opacity.map(|v| v.to_string()).as_deref());
        }
    }

    fn set_displayed(&mut self, el: Element, displayed: bool) {
        if let Some(node) = self.get(el) {
            set_style(node, "display", Some(if displayed { "block" } else { "none" }));
        }
    }

    fn set_pointer_events(&mut self, el: Element, enabled: bool) {
        if let Some(node) = self.get(el) {
            set_style(node, "pointer-events", Some(if enabled { "auto" } else { "none" }));
        }
    }

    fn set_class(&mut self, el: Element, class: &str, on: bool) {
        if let Some(node) = self.get(el)
            && let Err(err) = node.class_list().toggle_with_force(class, on)
        {
            tracing::debug!(?el, class, ?err, "class toggle rejected");
        }
    }

    fn has_class(&self, el: Element, class: &str) -> bool {
        self.get(el).is_some_and(|n| n.class_list().contains(class))
    }

    fn set_text(&mut self, el: Element, text: &str) {
        if let Some(node) = self.get(el) {
            node.set_text_content(Some(text));
        }
    }

    fn hide_animated_parts(&mut self, el: Element) {
        if let Some(root) = self.get(el) {
            for_each_part(root, |part| {
                set_style(part, "opacity", Some("0"));
                set_style(part, "animation", Some("none"));
            });
        }
    }

    fn restart_animations(&mut self, el: Element) {
        if let Some(root) = self.get(el) {
            for_each_part(root, |part| {
                set_style(part, "animation", Some("none"));
                // Layout read so the cleared animation is observed before it comes back.
                let _ = part.get_bounding_client_rect();
                set_style(part, "animation", None);
            });
        }
    }

    fn play_media(&mut self, el: Element) -> StageResult<()> {
        let Some(media) = self
            .get(el)
            .and_then(|n| n.dyn_ref::<web_sys::HtmlMediaElement>())
        else {
            return Ok(());
        };
        let promise = media
            .play()
            .map_err(|e| js_error(StageError::Media, "start playback", &e))?;
        let on_reject = Closure::wrap(Box::new(move |err: JsValue| {
            tracing::warn!(?err, "media playback rejected");
        }) as Box<dyn FnMut(JsValue)>);
        let _ = promise.catch(&on_reject);
        on_reject.forget();
        Ok(())
    }

    fn set_body_overflow_locked(&mut self, locked: bool) {
        if let Some(body) = self.document.body() {
            set_style(&body, "overflow", locked.then_some("hidden"));
        }
    }

    fn scroll_snapshot(&self) -> ScrollSnapshot {
        ScrollSnapshot {
            offset: self.scroll_y(),
            viewport_height: self.viewport().height,
        }
    }

    fn viewport(&self) -> Viewport {
        let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Viewport {
            width: dim(self.window.inner_width()),
            height: dim(self.window.inner_height()),
        }
    }

    fn section_top(&self, section: &str) -> Option<f64> {
        let el = self.document.get_element_by_id(section)?;
        Some(el.get_bounding_client_rect().top() + self.scroll_y())
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        let opts = web_sys::ScrollToOptions::new();
        opts.set_top(top);
        opts.set_behavior(match behavior {
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
        });
        self.window.scroll_to_with_scroll_to_options(&opts);
    }

    fn push_history(&mut self, path: &str) {
        let pushed = self
            .window
            .history()
            .and_then(|h| h.push_state_with_url(&JsValue::NULL, "", Some(path)));
        if let Err(err) = pushed {
            tracing::warn!(path, ?err, "history push rejected");
        }
    }

    fn location_path(&self) -> String {
        self.window
            .location()
            .pathname()
            .unwrap_or_else(|_| "/".to_owned())
    }

    fn storage_get(&self, key: &str) -> StageResult<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|e| js_error(StageError::Storage, "read localStorage", &e))
    }

    fn storage_set(&mut self, key: &str, value: &str) -> StageResult<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| js_error(StageError::Storage, "write localStorage", &e))
    }

    fn acquire_render_context(&mut self) -> StageResult<()> {
        let canvas = self
            .canvas()
            .ok_or_else(|| StageError::render_context("effect canvas is missing"))?;
        match canvas.get_context("webgl") {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(StageError::render_context("webgl context unavailable")),
            Err(e) => Err(js_error(StageError::RenderContext, "get webgl context", &e)),
        }
    }

    fn resize_canvas(&mut self, viewport: Viewport) {
        if let Some(canvas) = self.canvas() {
            canvas.set_width(viewport.width.max(0.0) as u32);
            canvas.set_height(viewport.height.max(0.0) as u32);
        }
    }

    fn draw_effect(&mut self) {
        (self.draw)();
    }

    fn render_grid(&mut self, cells: &[GridCell]) {
        let Some(layer) = self.get(Element::GridLayer) else {
            return;
        };
        layer.set_inner_html("");
        for cell in cells {
            let Ok(div) = self.document.create_element("div") else {
                return;
            };
            match &cell.content {
                CellContent::Keyword(word) => {
                    div.set_class_name("grid-item keyword");
                    div.set_text_content(Some(word));
                }
                CellContent::Icon => div.set_class_name("grid-item icon"),
            }
            set_style(&div, "opacity", Some(&cell.opacity.to_string()));
            if layer.append_child(&div).is_err() {
                return;
            }
        }
    }

    fn set_modal_embed(&mut self, src: Option<&str>) {
        let Some(container) = self.get(Element::ModalContent) else {
            return;
        };
        container.set_inner_html("");
        let Some(src) = src else {
            return;
        };
        let Ok(frame) = self.document.create_element("iframe") else {
            return;
        };
        let attrs = [("src", src), ("allow", EMBED_ALLOW), ("allowfullscreen", "")];
        for (name, value) in attrs {
            let _ = frame.set_attribute(name, value);
        }
        if let Err(err) = container.append_child(&frame) {
            tracing::warn!(?err, "modal embed rejected");
        }
    }

    fn current_year(&self) -> Option<i32> {
        i32::try_from(js_sys::Date::new_0().get_full_year()).ok()
    }
}

type SharedStage = Rc<RefCell<Stage<WebPage>>>;

/// Paces the stage clock with real time.
///
/// At most one animation frame and one timeout are outstanding. Frames drive [`Stage::tick`];
/// timeouts only catch timers up, so a frame is drawn from animation callbacks alone.
struct Driver {
    window: web_sys::Window,
    performance: web_sys::Performance,
    origin_ms: f64,
    frame_id: Cell<Option<i32>>,
    timeout: Cell<Option<(i32, Millis)>>,
    on_frame: RefCell<Option<Closure<dyn FnMut()>>>,
    on_timeout: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl Driver {
    fn now(&self) -> Millis {
        Millis((self.performance.now() - self.origin_ms).max(0.0) as u64)
    }

    fn cancel_timeout(&self) {
        if let Some((id, _)) = self.timeout.take() {
            self.window.clear_timeout_with_handle(id);
        }
    }

    fn arm(&self, stage: &Stage<WebPage>) {
        if stage.wants_frame() {
            self.cancel_timeout();
            if self.frame_id.get().is_some() {
                return;
            }
            let cb = self.on_frame.borrow();
            let Some(cb) = cb.as_ref() else {
                return;
            };
            match self.window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                Ok(id) => self.frame_id.set(Some(id)),
                Err(err) => tracing::error!(?err, "failed to request animation frame"),
            }
            return;
        }
        // The pending frame callback re-arms once it has run.
        if self.frame_id.get().is_some() {
            return;
        }
        let Some(at) = stage.next_wakeup() else {
            self.cancel_timeout();
            return;
        };
        if self.timeout.get().is_some_and(|(_, due)| due <= at) {
            return;
        }
        self.cancel_timeout();
        let cb = self.on_timeout.borrow();
        let Some(cb) = cb.as_ref() else {
            return;
        };
        let delay = i32::try_from(at.since(self.now())).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), delay)
        {
            Ok(id) => self.timeout.set(Some((id, at))),
            Err(err) => tracing::error!(?err, "failed to schedule stage timeout"),
        }
    }

    /// Run `f` against the stage at the current real time, then re-arm.
    fn dispatch<R>(&self, stage: &SharedStage, f: impl FnOnce(&mut Stage<WebPage>) -> R) -> Option<R> {
        let Ok(mut s) = stage.try_borrow_mut() else {
            tracing::debug!("stage busy, event dropped");
            return None;
        };
        s.catch_up(self.now());
        let out = f(&mut s);
        self.arm(&s);
        Some(out)
    }
}

/// Handle to a mounted stage, for embedders such as the video feed renderer.
#[derive(Clone)]
pub struct StageHandle {
    stage: SharedStage,
    driver: Rc<Driver>,
}

impl StageHandle {
    /// Open the video modal for `id`.
    pub fn open_video(&self, id: &str) -> bool {
        self.driver
            .dispatch(&self.stage, |s| s.open_video(id))
            .unwrap_or(false)
    }

    pub fn report(&self) -> Option<StageReport> {
        self.stage.try_borrow().ok().map(|s| s.report())
    }
}

fn listen(target: &web_sys::EventTarget, event: &str, cb: Box<dyn FnMut(web_sys::Event)>) {
    let closure = Closure::wrap(cb);
    if let Err(err) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
    {
        tracing::warn!(event, ?err, "listener registration failed");
    }
    closure.forget();
}

fn closest(target: &web_sys::Element, selector: &str) -> Option<web_sys::Element> {
    target.closest(selector).ok().flatten()
}

fn on_click(s: &mut Stage<WebPage>, event: &web_sys::Event) {
    let Some(target) = event
        .target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
    else {
        return;
    };

    if let Some(link) = closest(&target, ".nav-links a") {
        if let Some(href) = link.get_attribute("href")
            && s.on_link_click(&href)
        {
            event.prevent_default();
        }
        return;
    }
    if closest(&target, "#mobile-menu-toggle").is_some() {
        s.toggle_mobile_menu();
    } else if closest(&target, "#video-modal .close-modal").is_some() {
        s.close_video();
    } else if target.id() == "video-modal" {
        s.on_modal_click(true);
    } else if closest(&target, "#accept-cookies").is_some() {
        s.choose_consent(Consent::Accepted);
    } else if closest(&target, "#reject-cookies").is_some() {
        s.choose_consent(Consent::Rejected);
    } else if let Some(card) = closest(&target, "[data-video-id]")
        && let Some(id) = card.get_attribute("data-video-id")
    {
        s.open_video(&id);
    }
}

/// Load a stage over the live document and start driving it.
///
/// `draw` renders one frame of the background effect; it is only called while the effect is
/// visible.
pub fn mount(config: StageConfig, draw: impl FnMut() + 'static) -> StageResult<StageHandle> {
    let page = WebPage::attach(draw)?;
    let window = page.window.clone();
    let document = page.document.clone();
    let stage: SharedStage = Rc::new(RefCell::new(Stage::load(page, config)?));
    let performance = window
        .performance()
        .ok_or_else(|| StageError::validation("window.performance is unavailable"))?;
    let driver = Rc::new(Driver {
        window: window.clone(),
        origin_ms: performance.now(),
        performance,
        frame_id: Cell::new(None),
        timeout: Cell::new(None),
        on_frame: RefCell::new(None),
        on_timeout: RefCell::new(None),
    });

    let on_frame = {
        let stage = Rc::clone(&stage);
        let driver = Rc::clone(&driver);
        Closure::wrap(Box::new(move || {
            driver.frame_id.set(None);
            let Ok(mut s) = stage.try_borrow_mut() else {
                return;
            };
            s.tick(driver.now());
            driver.arm(&s);
        }) as Box<dyn FnMut()>)
    };
    let on_timeout = {
        let stage = Rc::clone(&stage);
        let driver = Rc::clone(&driver);
        Closure::wrap(Box::new(move || {
            driver.timeout.set(None);
            let Ok(mut s) = stage.try_borrow_mut() else {
                return;
            };
            s.catch_up(driver.now());
            driver.arm(&s);
        }) as Box<dyn FnMut()>)
    };
    *driver.on_frame.borrow_mut() = Some(on_frame);
    *driver.on_timeout.borrow_mut() = Some(on_timeout);

    let handle = StageHandle {
        stage: Rc::clone(&stage),
        driver: Rc::clone(&driver),
    };
    let win: &web_sys::EventTarget = window.as_ref();
    let doc: &web_sys::EventTarget = document.as_ref();

    let h = handle.clone();
    listen(
        win,
        "scroll",
        Box::new(move |_| {
            h.driver.dispatch(&h.stage, |s| s.on_scroll());
        }),
    );
    let h = handle.clone();
    listen(
        win,
        "resize",
        Box::new(move |_| {
            h.driver.dispatch(&h.stage, |s| s.on_resize());
        }),
    );
    let h = handle.clone();
    listen(
        win,
        "popstate",
        Box::new(move |_| {
            h.driver.dispatch(&h.stage, |s| s.on_popstate());
        }),
    );
    let h = handle.clone();
    listen(
        doc,
        "keydown",
        Box::new(move |e| {
            let Some(key) = e.dyn_ref::<web_sys::KeyboardEvent>().map(|k| k.key()) else {
                return;
            };
            h.driver.dispatch(&h.stage, |s| s.on_keydown(&key));
        }),
    );
    let h = handle.clone();
    listen(
        doc,
        "click",
        Box::new(move |e| {
            h.driver.dispatch(&h.stage, |s| on_click(s, &e));
        }),
    );

    if let Ok(s) = stage.try_borrow() {
        driver.arm(&s);
    }
    tracing::debug!("stage mounted");
    Ok(handle)
}
