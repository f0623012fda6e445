//! DOM wiring: listeners, countdown, submit flow, round advance.
//!
//! One `App` behind an `Rc<RefCell<..>>` is captured by every listener
//! closure. Borrows are scoped tightly: each handler computes an outcome
//! inside one borrow, then acts on it, so re-entrant events never trip the
//! cell.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, Event, HtmlButtonElement, HtmlCanvasElement,
    HtmlInputElement, PointerEvent, Window,
};

use crate::GameConfig;
use crate::api::{Api, CompleteRequest, PlayerProfile};
use crate::brush::{Brush, plan_segment};
use crate::color::Color;
use crate::geometry::{CanvasMetrics, Point};
use crate::render::CanvasPainter;
use crate::session::{Phase, Session, SubmitError, SubmitTicket, Tick};
use crate::timer::Countdown;
use crate::view::ResultPanel;

/// Intrinsic raster resolution, independent of the displayed size.
pub const CANVAS_WIDTH: u32 = 800;
pub const CANVAS_HEIGHT: u32 = 600;

/// Settle delay between showing a result and advancing to the next round, ms.
const RESULT_SETTLE_MS: i32 = 2500;
/// Delay before an expired (no-mark) round advances, ms.
const EXPIRED_ADVANCE_MS: i32 = 2000;

struct App {
    window: Window,
    document: Document,
    canvas: HtmlCanvasElement,
    painter: CanvasPainter,
    panel: ResultPanel,
    api: Api,
    config: GameConfig,
    session: Session,
    unlocked: Vec<Brush>,
    last_point: Option<Point>,
    pointer_down: bool,
    countdown: Option<Countdown>,
}

impl App {
    fn debug(&self, msg: &str) {
        if self.config.debug_logging {
            web_sys::console::log_1(&JsValue::from_str(msg));
        }
    }

    fn metrics(&self) -> CanvasMetrics {
        let rect = self.canvas.get_bounding_client_rect();
        CanvasMetrics {
            intrinsic_width: self.canvas.width() as f64,
            intrinsic_height: self.canvas.height() as f64,
            rect_left: rect.left(),
            rect_top: rect.top(),
            rect_width: rect.width(),
            rect_height: rect.height(),
        }
    }

    /// Render one committed segment with the active brush and record the
    /// mark. The painter only exists if init found a drawing surface, so
    /// every path into here is already guarded.
    fn draw_segment(&mut self, from: Point, to: Point) -> Result<(), JsValue> {
        let ops = plan_segment(
            self.session.brush,
            self.session.color,
            self.session.brush_size as f64,
            from,
            to,
            &mut js_sys::Math::random,
        );
        self.painter.apply(&ops)?;
        self.session.mark_drawn();
        Ok(())
    }

    fn alert(&self, msg: &str) {
        let _ = self.window.alert_with_message(msg);
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_disabled(&self, id: &str, disabled: bool) {
        if let Some(el) = self.document.get_element_by_id(id) {
            if let Ok(button) = el.dyn_into::<HtmlButtonElement>() {
                button.set_disabled(disabled);
            }
        }
    }

    fn set_low_time(&self, low: bool) {
        if let Some(el) = self.document.get_element_by_id("timer") {
            let classes = el.class_list();
            let _ = if low {
                classes.add_1("low-time")
            } else {
                classes.remove_1("low-time")
            };
        }
    }

    fn show_timer(&self, seconds: u32) {
        self.set_text("timer", &format!("{seconds}s"));
    }
}

pub fn start(config: GameConfig) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    // Drawing surface unavailable means initialization aborts here; nothing
    // below runs without a painter.
    let canvas: HtmlCanvasElement = get_element(&document, "draw-canvas")?;
    canvas.set_width(CANVAS_WIDTH);
    canvas.set_height(CANVAS_HEIGHT);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into()?;
    let painter = CanvasPainter::new(ctx, CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64);
    painter.clear();

    let unlocked: Vec<Brush> = config
        .unlocked_brushes
        .iter()
        .filter_map(|id| Brush::from_id(id))
        .collect();

    let app = Rc::new(RefCell::new(App {
        panel: ResultPanel::new(window.clone(), document.clone()),
        api: Api::from_window(&window),
        window,
        document: document.clone(),
        canvas: canvas.clone(),
        painter,
        config,
        session: Session::new(),
        unlocked,
        last_point: None,
        pointer_down: false,
        countdown: None,
    }));

    {
        let app = app.borrow();
        app.debug(&format!("inkly boot, player {}", app.api.player_id));
        app.set_disabled("start-btn", true);
        app.set_disabled("submit-btn", true);
        refresh_palette(&app);
    }

    wire_pointer_events(&app, &canvas)?;
    wire_controls(&app, &document)?;
    load_profile(app.clone());
    request_prompt(app);
    Ok(())
}

fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))?
        .dyn_into()
        .map_err(|_| JsValue::from_str(&format!("element #{id} has the wrong type")))
}

// --- Boot-time data ----------------------------------------------------------

fn load_profile(app: Rc<RefCell<App>>) {
    let api = app.borrow().api.clone();
    spawn_local(async move {
        match api.fetch_player().await {
            Ok(profile) => {
                let mut a = app.borrow_mut();
                apply_unlocks(&mut a, &profile);
                a.debug(&format!("profile loaded: level {}", profile.level));
            }
            // Profile is an enhancement; the config defaults already allow
            // playing, so a failure only logs.
            Err(e) => {
                let a = app.borrow();
                a.debug(&format!("profile fetch failed: {e:?}"));
            }
        }
    });
}

/// Fold the server's earned brushes into the unlocked set. Older profiles
/// without an explicit list fall back to the level ladder. Unlocks are
/// append-only; config defaults stay available.
fn apply_unlocks(app: &mut App, profile: &PlayerProfile) {
    let server_brushes: Vec<Brush> = profile
        .brushes_unlocked
        .iter()
        .filter_map(|id| Brush::from_id(id))
        .collect();
    let earned = if server_brushes.is_empty() {
        crate::brushes_for_level(profile.level)
    } else {
        server_brushes
    };
    for brush in earned {
        if !app.unlocked.contains(&brush) {
            app.unlocked.push(brush);
        }
    }
    refresh_palette(app);
}

fn refresh_palette(app: &App) {
    if let Ok(nodes) = app.document.query_selector_all("[data-brush]") {
        for i in 0..nodes.length() {
            let Some(node) = nodes.item(i) else { continue };
            let Ok(button) = node.dyn_into::<HtmlButtonElement>() else {
                continue;
            };
            let id = button.get_attribute("data-brush").unwrap_or_default();
            let known = Brush::from_id(&id);
            let enabled = known.is_some_and(|b| app.unlocked.contains(&b));
            button.set_disabled(!enabled);
            let _ = if known == Some(app.session.brush) {
                button.class_list().add_1("active")
            } else {
                button.class_list().remove_1("active")
            };
        }
    }
}

// --- Round lifecycle ---------------------------------------------------------

fn request_prompt(app: Rc<RefCell<App>>) {
    let api = app.borrow().api.clone();
    spawn_local(async move {
        match api.start_session().await {
            Ok(resp) => {
                let mut a = app.borrow_mut();
                a.session
                    .load_prompt(resp.session_id, resp.prompt.text.clone(), resp.prompt.time_limit);
                a.set_text("prompt-text", &resp.prompt.text);
                a.show_timer(resp.prompt.time_limit);
                a.set_disabled("start-btn", false);
                a.debug(&format!("prompt loaded: {}", resp.prompt.text));
            }
            // No retry: the session stays Idle without a prompt and the
            // start guard keeps rejecting until the service recovers.
            Err(e) => {
                let a = app.borrow();
                a.alert("Could not reach the game service. Reload to try again.");
                a.debug(&format!("prompt fetch failed: {e:?}"));
            }
        }
    });
}

fn begin_round(app: &Rc<RefCell<App>>) {
    {
        let mut a = app.borrow_mut();
        match a.session.begin_round() {
            Ok(()) => {}
            Err(_) => {
                // No prompt yet, or a round already underway.
                return;
            }
        }
        a.set_disabled("start-btn", true);
        a.set_disabled("submit-btn", false);
        a.set_disabled("skip-btn", false);
        let limit = a.session.time_limit();
        a.show_timer(limit);
        a.debug("round started");
    }
    start_countdown(app);
}

fn start_countdown(app: &Rc<RefCell<App>>) {
    let tick_app = app.clone();
    let tick = Closure::<dyn FnMut()>::new(move || on_tick(&tick_app));
    let countdown = {
        let a = app.borrow();
        Countdown::start(&a.window, tick)
    };
    match countdown {
        // Replacing the slot drops (and thereby cancels) any previous
        // interval; at most one countdown ever runs.
        Ok(countdown) => app.borrow_mut().countdown = Some(countdown),
        Err(e) => app.borrow().debug(&format!("countdown failed to start: {e:?}")),
    }
}

fn on_tick(app: &Rc<RefCell<App>>) {
    let outcome = app.borrow_mut().session.tick();
    match outcome {
        Tick::Ignored => {}
        Tick::Continue { time_left, low_time } => {
            let a = app.borrow();
            a.show_timer(time_left);
            a.set_low_time(low_time);
        }
        Tick::AutoSubmit(ticket) => {
            {
                let mut a = app.borrow_mut();
                a.countdown = None;
                a.show_timer(0);
            }
            submit_drawing(app.clone(), ticket);
        }
        Tick::Expired => {
            {
                let mut a = app.borrow_mut();
                a.countdown = None;
                a.show_timer(0);
                a.set_text("prompt-text", "Time's up! Nothing submitted.");
            }
            schedule_advance(app.clone(), EXPIRED_ADVANCE_MS);
        }
    }
}

fn submit_clicked(app: &Rc<RefCell<App>>) {
    let attempt = app.borrow_mut().session.try_submit();
    match attempt {
        Ok(ticket) => {
            app.borrow_mut().countdown = None;
            submit_drawing(app.clone(), ticket);
        }
        Err(SubmitError::NothingDrawn) => {
            app.borrow().alert("Draw something first!");
        }
        // Double submit or a submit racing the final tick; first wins.
        Err(SubmitError::NotActive) => {}
    }
}

fn submit_drawing(app: Rc<RefCell<App>>, ticket: SubmitTicket) {
    let (api, request) = {
        let mut a = app.borrow_mut();
        a.set_disabled("submit-btn", true);
        a.set_disabled("skip-btn", true);
        let drawing_data = match a.canvas.to_data_url() {
            Ok(url) => url,
            // Raster export can fail (tainted canvas); recover the same way
            // as a failed completion request, otherwise the round would be
            // stuck in Submitting with every affordance disabled.
            Err(e) => {
                a.session.submission_failed();
                a.set_disabled("submit-btn", false);
                a.set_disabled("skip-btn", false);
                a.alert("Submitting your drawing failed. Try again.");
                a.debug(&format!("canvas export failed: {e:?}"));
                return;
            }
        };
        (
            a.api.clone(),
            CompleteRequest {
                session_id: ticket.session_id,
                drawing_data,
                time_spent: ticket.time_spent,
            },
        )
    };

    spawn_local(async move {
        match api.complete_session(&request).await {
            Ok(result) => {
                {
                    let a = app.borrow();
                    if let Err(e) = a.panel.render(&result) {
                        a.debug(&format!("result render failed: {e:?}"));
                    }
                    a.debug(&format!("scored {}", result.score));
                }
                schedule_advance(app, RESULT_SETTLE_MS);
            }
            // No retry and no silent advance: back to Active with the
            // countdown cancelled so the user may resubmit.
            Err(e) => {
                let mut a = app.borrow_mut();
                a.session.submission_failed();
                // Back in Active, both manual exits apply again.
                a.set_disabled("submit-btn", false);
                a.set_disabled("skip-btn", false);
                a.alert("Submitting your drawing failed. Try again.");
                a.debug(&format!("completion failed: {e:?}"));
            }
        }
    });
}

fn schedule_advance(app: Rc<RefCell<App>>, delay_ms: i32) {
    let window = app.borrow().window.clone();
    let advance = Closure::once_into_js(move || advance_round(&app));
    let _ = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(advance.unchecked_ref(), delay_ms);
}

/// Round boundary: blank raster, transient flags reset, result hidden, new
/// prompt requested. Input stays closed until the next explicit start.
fn advance_round(app: &Rc<RefCell<App>>) {
    {
        let mut a = app.borrow_mut();
        a.countdown = None;
        a.session.advance_round();
        a.painter.clear();
        a.last_point = None;
        a.pointer_down = false;
        a.set_low_time(false);
        let _ = a.panel.hide();
        a.set_disabled("submit-btn", true);
        a.set_disabled("skip-btn", true);
        a.set_text("prompt-text", "Loading next prompt...");
    }
    request_prompt(app.clone());
}

fn skip_round(app: &Rc<RefCell<App>>) {
    let confirmed = {
        let a = app.borrow();
        if a.session.phase() != Phase::Active {
            return;
        }
        a.window
            .confirm_with_message("Skip this prompt?")
            .unwrap_or(false)
    };
    if !confirmed {
        return;
    }
    let skipped = {
        let mut a = app.borrow_mut();
        let skipped = a.session.skip();
        if skipped {
            a.countdown = None;
        }
        skipped
    };
    if skipped {
        advance_round(app);
    }
}

// --- Listener wiring ---------------------------------------------------------

fn wire_pointer_events(app: &Rc<RefCell<App>>, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    {
        let app = app.clone();
        let target = canvas.clone();
        let ondown = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            if event.button() != 0 {
                return;
            }
            let mut a = app.borrow_mut();
            if !a.session.accepting_input() {
                return;
            }
            event.prevent_default();
            let point = a
                .metrics()
                .to_canvas(event.client_x() as f64, event.client_y() as f64);
            a.pointer_down = true;
            a.last_point = Some(point);
            // First sample of the stroke: a zero-length segment still
            // renders a stub.
            if let Err(e) = a.draw_segment(point, point) {
                a.debug(&format!("draw failed: {e:?}"));
            }
            let _ = target.set_pointer_capture(event.pointer_id());
        });
        canvas.add_event_listener_with_callback("pointerdown", ondown.as_ref().unchecked_ref())?;
        ondown.forget();
    }

    {
        let app = app.clone();
        let onmove = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let mut a = app.borrow_mut();
            if !a.pointer_down || !a.session.accepting_input() {
                return;
            }
            let point = a
                .metrics()
                .to_canvas(event.client_x() as f64, event.client_y() as f64);
            let Some(last) = a.last_point else { return };
            if let Err(e) = a.draw_segment(last, point) {
                a.debug(&format!("draw failed: {e:?}"));
            }
            a.last_point = Some(point);
        });
        canvas.add_event_listener_with_callback("pointermove", onmove.as_ref().unchecked_ref())?;
        onmove.forget();
    }

    {
        let app = app.clone();
        let target = canvas.clone();
        let onstop = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let mut a = app.borrow_mut();
            if !a.pointer_down {
                return;
            }
            a.pointer_down = false;
            a.last_point = None;
            if target.has_pointer_capture(event.pointer_id()) {
                let _ = target.release_pointer_capture(event.pointer_id());
            }
        });
        canvas.add_event_listener_with_callback("pointerup", onstop.as_ref().unchecked_ref())?;
        canvas.add_event_listener_with_callback("pointercancel", onstop.as_ref().unchecked_ref())?;
        canvas.add_event_listener_with_callback("pointerleave", onstop.as_ref().unchecked_ref())?;
        onstop.forget();
    }

    Ok(())
}

fn wire_controls(app: &Rc<RefCell<App>>, document: &Document) -> Result<(), JsValue> {
    wire_click(app, document, "start-btn", begin_round)?;
    wire_click(app, document, "submit-btn", submit_clicked)?;
    wire_click(app, document, "skip-btn", skip_round)?;

    {
        let app = app.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            let mut a = app.borrow_mut();
            a.painter.clear();
            a.session.canvas_cleared();
            a.last_point = None;
        });
        if let Some(el) = document.get_element_by_id("clear-btn") {
            el.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        }
        onclick.forget();
    }

    // Brush palette: one delegated listener per button element.
    let nodes = document.query_selector_all("[data-brush]")?;
    for i in 0..nodes.length() {
        let Some(node) = nodes.item(i) else { continue };
        let Ok(button) = node.dyn_into::<Element>() else {
            continue;
        };
        let app = app.clone();
        let id = button.get_attribute("data-brush").unwrap_or_default();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            let Some(brush) = Brush::from_id(&id) else { return };
            let mut a = app.borrow_mut();
            if !a.unlocked.contains(&brush) {
                return;
            }
            a.session.brush = brush;
            // Changing brush mid-stroke only affects the next segment, but
            // any lingering glow is dropped immediately.
            a.painter.reset_modifiers();
            refresh_palette(&a);
            a.debug(&format!("brush -> {}", brush.id()));
        });
        button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let app = app.clone();
        let oninput = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(input) = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            let mut a = app.borrow_mut();
            a.session.brush_size = (input.value_as_number() as u32).max(1);
        });
        if let Some(el) = document.get_element_by_id("brush-size") {
            el.add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        }
        oninput.forget();
    }

    {
        let app = app.clone();
        let oninput = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(input) = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            // Both #rrggbb and rgb(..) arrive here; unknown forms keep the
            // previous color.
            if let Some(color) = Color::parse(&input.value()) {
                app.borrow_mut().session.color = color;
            }
        });
        if let Some(el) = document.get_element_by_id("color-picker") {
            el.add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        }
        oninput.forget();
    }

    Ok(())
}

fn wire_click(
    app: &Rc<RefCell<App>>,
    document: &Document,
    id: &str,
    handler: fn(&Rc<RefCell<App>>),
) -> Result<(), JsValue> {
    let app = app.clone();
    let onclick = Closure::<dyn FnMut(Event)>::new(move |_: Event| handler(&app));
    if let Some(el) = document.get_element_by_id(id) {
        el.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
    }
    onclick.forget();
    Ok(())
}
