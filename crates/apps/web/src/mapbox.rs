//! Bindings for the subset of Mapbox GL JS the page uses.
//!
//! `mapboxgl` is expected as a global, loaded from a `<script>` tag.

use js_sys::Function;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mapboxgl)]
    pub type Map;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, catch)]
    pub fn new(options: &JsValue) -> Result<Map, JsValue>;

    #[wasm_bindgen(method)]
    pub fn on(this: &Map, event: &str, handler: &Function);

    #[wasm_bindgen(method, js_name = easeTo)]
    pub fn ease_to(this: &Map, options: &JsValue, event_data: &JsValue);

    #[wasm_bindgen(method, js_name = flyTo)]
    pub fn fly_to(this: &Map, options: &JsValue, event_data: &JsValue);

    #[wasm_bindgen(method, js_name = getCenter)]
    pub fn get_center(this: &Map) -> MapLngLat;

    #[wasm_bindgen(method, js_name = getZoom)]
    pub fn get_zoom(this: &Map) -> f64;

    #[wasm_bindgen(method, js_name = getPitch)]
    pub fn get_pitch(this: &Map) -> f64;

    #[wasm_bindgen(method, js_name = getBearing)]
    pub fn get_bearing(this: &Map) -> f64;

    #[wasm_bindgen(method, js_name = setFog)]
    pub fn set_fog(this: &Map, fog: &JsValue);

    #[wasm_bindgen(method, js_name = isStyleLoaded)]
    pub fn is_style_loaded(this: &Map) -> bool;

    /// `undefined` when no source has this id.
    #[wasm_bindgen(method, js_name = getSource)]
    pub fn get_source(this: &Map, id: &str) -> JsValue;

    #[wasm_bindgen(method, js_name = addSource)]
    pub fn add_source(this: &Map, id: &str, source: &JsValue);

    #[wasm_bindgen(method, js_name = addLayer)]
    pub fn add_layer(this: &Map, layer: &JsValue);

    pub type MapLngLat;

    #[wasm_bindgen(method, getter)]
    pub fn lng(this: &MapLngLat) -> f64;

    #[wasm_bindgen(method, getter)]
    pub fn lat(this: &MapLngLat) -> f64;

    pub type GeoJsonSource;

    #[wasm_bindgen(method, js_name = setData)]
    pub fn set_data(this: &GeoJsonSource, data: &JsValue);

    #[wasm_bindgen(js_namespace = mapboxgl)]
    pub type Marker;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl)]
    pub fn new(options: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = setLngLat)]
    pub fn set_lng_lat(this: &Marker, lng_lat: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = setPopup)]
    pub fn set_popup(this: &Marker, popup: &Popup) -> Marker;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &Marker, map: &Map) -> Marker;

    #[wasm_bindgen(method)]
    pub fn remove(this: &Marker) -> Marker;

    #[wasm_bindgen(js_namespace = mapboxgl)]
    pub type Popup;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl)]
    pub fn new(options: &JsValue) -> Popup;

    #[wasm_bindgen(method, js_name = setHTML)]
    pub fn set_html(this: &Popup, html: &str) -> Popup;
}

/// Set `mapboxgl.accessToken`.
pub fn set_access_token(token: &str) -> Result<(), JsValue> {
    let mapboxgl = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("mapboxgl"))?;
    if mapboxgl.is_undefined() {
        return Err(JsValue::from_str("mapboxgl is not loaded"));
    }
    js_sys::Reflect::set(&mapboxgl, &JsValue::from_str("accessToken"), &JsValue::from_str(token))?;
    Ok(())
}

/// Serialize through JSON into a plain JS object.
pub fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    let text = serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&text)
}
