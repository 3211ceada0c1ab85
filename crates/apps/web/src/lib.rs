//! Browser entry point: binds the globe scene to Mapbox GL JS.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use console_error_panic_hook::set_once;
use foundation::time::Time;
use globe::{GlobeConfig, GlobeScene, MapEvent};
use serde_json::json;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

mod console;
mod engine;
mod fetch;
mod mapbox;

use engine::{MapboxEngine, tag_of};

/// Element id of the loading overlay.
const LOADING_ID: &str = "loading";
const HIDDEN_CLASS: &str = "hidden";

struct App {
    scene: GlobeScene,
    engine: MapboxEngine,
    cfg: GlobeConfig,
    started_ms: f64,
    // Due time of the timer currently armed for deferred scene work.
    timer_due: Option<Time>,
}

impl App {
    fn now(&self) -> Time {
        let elapsed = (js_sys::Date::now() - self.started_ms).max(0.0);
        Time::from_millis(elapsed as u64)
    }

    fn handle(&mut self, event: &MapEvent) {
        let now = self.now();
        self.scene.on_event(event, &mut self.engine, now);
        self.run_due(now);
    }

    fn run_due(&mut self, now: Time) {
        if self.scene.tick(now) > 0 {
            self.timer_due = None;
            sync_overlay(self.scene.is_loading_visible());
        }
        if let Some(due) = self.scene.next_due() {
            if self.timer_due != Some(due) {
                self.timer_due = Some(due);
                arm_timer((due.as_millis() - now.as_millis()).max(0.0));
            }
        }
    }
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
    // Events raised while the scene is busy wait here.
    static INBOX: RefCell<VecDeque<MapEvent>> = const { RefCell::new(VecDeque::new()) };
}

/// Run `f` against the app, then deliver anything queued meanwhile.
fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    let out = APP
        .try_with(|cell| {
            let mut guard = cell.try_borrow_mut().ok()?;
            guard.as_mut().map(f)
        })
        .ok()
        .flatten();
    pump();
    out
}

fn dispatch(event: MapEvent) {
    let _ = INBOX.try_with(|q| q.borrow_mut().push_back(event));
    pump();
}

// A no-op while the app is borrowed; the outer caller drains the inbox.
fn pump() {
    let _ = APP.try_with(|cell| {
        let Ok(mut guard) = cell.try_borrow_mut() else {
            return;
        };
        let Some(app) = guard.as_mut() else {
            return;
        };
        while let Some(event) = INBOX.with(|q| q.borrow_mut().pop_front()) {
            app.handle(&event);
        }
    });
}

fn arm_timer(delay_ms: f64) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let callback = Closure::once_into_js(move || {
        with_app(|app| {
            let now = app.now();
            app.timer_due = None;
            app.run_due(now);
        });
    });
    if let Err(err) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        delay_ms.ceil() as i32,
    ) {
        tracing::warn!(?err, "could not arm timer");
    }
}

fn sync_overlay(visible: bool) {
    let Some(el) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(LOADING_ID))
    else {
        return;
    };
    let classes = el.class_list();
    let result = if visible {
        classes.remove_1(HIDDEN_CLASS)
    } else {
        classes.add_1(HIDDEN_CLASS)
    };
    if let Err(err) = result {
        tracing::debug!(?err, "overlay class not updated");
    }
}

// Same keys, in the same order, as `globe::config::ENV_KEYS`.
const BUILD_VARS: &[(&str, Option<&str>)] = &[
    ("MAPBOX_TOKEN", option_env!("MAPBOX_TOKEN")),
    ("GLOBE_BASE_PATH", option_env!("GLOBE_BASE_PATH")),
    ("GLOBE_STYLE_URL", option_env!("GLOBE_STYLE_URL")),
    ("GLOBE_PORTFOLIO_URL", option_env!("GLOBE_PORTFOLIO_URL")),
    ("GLOBE_SHEET_URL", option_env!("GLOBE_SHEET_URL")),
    ("GLOBE_SPIN_INCREMENT_DEG", option_env!("GLOBE_SPIN_INCREMENT_DEG")),
    ("GLOBE_SPIN_EASE_MS", option_env!("GLOBE_SPIN_EASE_MS")),
    ("GLOBE_MAX_SPIN_ZOOM", option_env!("GLOBE_MAX_SPIN_ZOOM")),
    ("GLOBE_FLIGHT_ZOOM", option_env!("GLOBE_FLIGHT_ZOOM")),
    ("GLOBE_FLIGHT_PITCH", option_env!("GLOBE_FLIGHT_PITCH")),
    ("GLOBE_FLIGHT_DURATION_MS", option_env!("GLOBE_FLIGHT_DURATION_MS")),
    ("GLOBE_HOME_LNG", option_env!("GLOBE_HOME_LNG")),
    ("GLOBE_HOME_LAT", option_env!("GLOBE_HOME_LAT")),
    ("GLOBE_HOME_ZOOM", option_env!("GLOBE_HOME_ZOOM")),
    ("GLOBE_LOADING_HIDE_DELAY_MS", option_env!("GLOBE_LOADING_HIDE_DELAY_MS")),
];

fn build_time_var(key: &str) -> Option<String> {
    BUILD_VARS
        .iter()
        .find(|(name, _)| *name == key)
        .and_then(|(_, value)| value.map(str::to_string))
}

/// Build-time configuration, with a token passed from the page taking
/// precedence over the one baked in.
fn page_config(access_token: Option<String>) -> Result<GlobeConfig, JsValue> {
    let mut cfg = GlobeConfig::from_lookup(build_time_var).map_err(|e| JsValue::from_str(&e.to_string()))?;
    if let Some(token) = access_token.filter(|t| !t.trim().is_empty()) {
        cfg.access_token = token;
    }
    Ok(cfg)
}

fn map_options(cfg: &GlobeConfig, container: &str) -> serde_json::Value {
    json!({
        "container": container,
        "style": cfg.style_url,
        "projection": "globe",
        "center": cfg.home.center.as_array(),
        "zoom": cfg.home.zoom,
        "attributionControl": false,
    })
}

fn on_map(map: &mapbox::Map, name: &str, event: MapEvent) {
    let handler = Closure::<dyn FnMut(JsValue)>::new(move |_e: JsValue| dispatch(event));
    map.on(name, handler.as_ref().unchecked_ref());
    handler.forget();
}

fn wire_events(map: &mapbox::Map) {
    on_map(map, "mousedown", MapEvent::PointerDown);
    on_map(map, "mouseup", MapEvent::PointerUp);
    on_map(map, "dragstart", MapEvent::DragStart);
    on_map(map, "dragend", MapEvent::DragEnd);
    on_map(map, "touchstart", MapEvent::TouchStart);
    on_map(map, "touchend", MapEvent::TouchEnd);
    on_map(map, "style.load", MapEvent::StyleLoaded);

    let moveend = Closure::<dyn FnMut(JsValue)>::new(move |e: JsValue| {
        dispatch(MapEvent::MoveEnd { tag: tag_of(&e) });
    });
    map.on("moveend", moveend.as_ref().unchecked_ref());
    moveend.forget();
}

/// Create the map in `container`, wire its events and start loading the feed.
///
/// Fails when Mapbox GL JS is missing or the map cannot be constructed.
#[wasm_bindgen]
pub fn start(container: &str, access_token: Option<String>) -> Result<(), JsValue> {
    set_once();
    console::init(tracing::Level::INFO);

    if APP.with(|cell| cell.borrow().is_some()) {
        tracing::debug!("already started");
        return Ok(());
    }

    let cfg = page_config(access_token)?;
    mapbox::set_access_token(&cfg.access_token)?;

    let options = mapbox::to_js(&map_options(&cfg, container))?;
    let map = mapbox::Map::new(&options).inspect_err(|err| {
        tracing::error!(?err, "map init failed");
    })?;
    wire_events(&map);

    let engine = MapboxEngine::new(map, Rc::new(dispatch));
    let spec = cfg.feed.clone();
    tracing::info!(base_path = %cfg.normalized_base_path(), style = %cfg.style_url, "globe starting");

    APP.with(|cell| {
        *cell.borrow_mut() = Some(App {
            scene: GlobeScene::new(&cfg),
            engine,
            cfg,
            started_ms: js_sys::Date::now(),
            timer_due: None,
        });
    });

    spawn_local(async move {
        let records = fetch::load_locations(&spec).await;
        with_app(|app| {
            app.scene.set_locations(records, &mut app.engine);
        });
    });

    Ok(())
}

/// Fly back to the home pose; rotation resumes when the flight lands.
#[wasm_bindgen]
pub fn go_home() {
    with_app(|app| {
        app.scene.go_home(&mut app.engine);
    });
}

#[wasm_bindgen]
pub fn portfolio_url() -> String {
    APP.with(|cell| cell.borrow().as_ref().map(|app| app.cfg.portfolio_url.clone()))
        .unwrap_or_else(|| globe::config::DEFAULT_PORTFOLIO_URL.to_string())
}

/// Navigate the page to the portfolio link.
#[wasm_bindgen]
pub fn open_portfolio() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    window.location().set_href(&portfolio_url())
}
