use std::collections::BTreeMap;

use foundation::camera::{CameraPose, Easing};
use foundation::geo::LngLat;
use foundation::ids::AnimationId;
use globe::markers::MARKER_CLASS;
use globe::{CameraAnimation, FogSettings, MapEngine, MapEvent, MarkerSpec, RouteLayer};
use js_sys::{Function, Object, Reflect};
use serde_json::json;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::mapbox::{self, GeoJsonSource, Map, Marker, Popup};

/// Key carried in animation event data so `moveend` can name its request.
const TAG_KEY: &str = "animationId";

struct InstalledMarker {
    marker: Marker,
    // Dropping the closure detaches the click handler.
    _on_click: Closure<dyn FnMut(web_sys::Event)>,
}

/// [`MapEngine`] over a live Mapbox map.
///
/// Engine calls can fire `moveend` synchronously (interrupting an animation
/// does), so event handlers must queue rather than re-enter the scene.
pub struct MapboxEngine {
    map: Map,
    linear: Function,
    markers: BTreeMap<usize, InstalledMarker>,
    on_marker_click: std::rc::Rc<dyn Fn(MapEvent)>,
}

impl MapboxEngine {
    pub fn new(map: Map, on_marker_click: std::rc::Rc<dyn Fn(MapEvent)>) -> Self {
        Self {
            map,
            linear: Function::new_with_args("t", "return t;"),
            markers: BTreeMap::new(),
            on_marker_click,
        }
    }

    fn animation_options(&self, anim: &CameraAnimation) -> Result<JsValue, JsValue> {
        let mut options = json!({
            "center": anim.center.as_array(),
            "duration": anim.duration_ms,
            "essential": anim.essential,
        });
        if let Some(zoom) = anim.zoom {
            options["zoom"] = json!(zoom);
        }
        if let Some(pitch) = anim.pitch {
            options["pitch"] = json!(pitch);
        }
        let options = mapbox::to_js(&options)?;
        if anim.easing == Easing::Linear {
            Reflect::set(&options, &JsValue::from_str("easing"), &self.linear)?;
        }
        Ok(options)
    }

    fn event_data(anim: &CameraAnimation) -> Result<JsValue, JsValue> {
        match anim.tag {
            Some(id) => mapbox::to_js(&json!({ TAG_KEY: id.get() })),
            None => Ok(Object::new().into()),
        }
    }

    fn animate(&mut self, anim: &CameraAnimation, fly: bool) {
        let prepared = self
            .animation_options(anim)
            .and_then(|options| Ok((options, Self::event_data(anim)?)));
        match prepared {
            Ok((options, data)) if fly => self.map.fly_to(&options, &data),
            Ok((options, data)) => self.map.ease_to(&options, &data),
            Err(err) => tracing::warn!(?err, "camera request not sent"),
        }
    }

    fn build_marker(&self, spec: &MarkerSpec) -> Result<InstalledMarker, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let element = document.create_element("div")?;
        element.set_class_name(MARKER_CLASS);
        element.set_inner_html(&spec.element_html);

        let options = Object::new();
        Reflect::set(&options, &JsValue::from_str("element"), &element)?;
        Reflect::set(&options, &JsValue::from_str("anchor"), &JsValue::from_str(spec.anchor.as_str()))?;

        let popup_options = mapbox::to_js(&json!({
            "offset": spec.popup.offset,
            "maxWidth": spec.popup.max_width,
            "closeButton": spec.popup.close_button,
        }))?;
        let popup = Popup::new(&popup_options).set_html(&spec.popup.html);

        let marker = Marker::new(&options)
            .set_lng_lat(&mapbox::to_js(&spec.position.as_array())?)
            .set_popup(&popup)
            .add_to(&self.map);

        let index = spec.index;
        let dispatch = self.on_marker_click.clone();
        let on_click = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
            dispatch(MapEvent::MarkerClicked { index });
        });
        element.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;

        Ok(InstalledMarker {
            marker,
            _on_click: on_click,
        })
    }

    fn write_route(&self, route: &RouteLayer) -> Result<(), JsValue> {
        let existing = self.map.get_source(route.source_id);
        if !existing.is_undefined() && !existing.is_null() {
            existing
                .unchecked_into::<GeoJsonSource>()
                .set_data(&mapbox::to_js(&route.data)?);
            return Ok(());
        }
        self.map.add_source(route.source_id, &mapbox::to_js(&route.source())?);
        for layer in &route.layers {
            self.map.add_layer(&mapbox::to_js(layer)?);
        }
        Ok(())
    }
}

impl MapEngine for MapboxEngine {
    fn camera(&self) -> CameraPose {
        let center = self.map.get_center();
        CameraPose {
            center: LngLat::new(center.lng(), center.lat()),
            zoom: self.map.get_zoom(),
            pitch: self.map.get_pitch(),
            bearing: self.map.get_bearing(),
        }
    }

    fn ease_to(&mut self, anim: &CameraAnimation) {
        self.animate(anim, false);
    }

    fn fly_to(&mut self, anim: &CameraAnimation) {
        self.animate(anim, true);
    }

    fn is_style_loaded(&self) -> bool {
        self.map.is_style_loaded()
    }

    fn set_fog(&mut self, fog: &FogSettings) {
        match mapbox::to_js(fog) {
            Ok(value) => self.map.set_fog(&value),
            Err(err) => tracing::warn!(?err, "fog not applied"),
        }
    }

    fn add_marker(&mut self, marker: &MarkerSpec) {
        match self.build_marker(marker) {
            Ok(installed) => {
                if let Some(old) = self.markers.insert(marker.index, installed) {
                    old.marker.remove();
                }
            }
            Err(err) => tracing::warn!(index = marker.index, ?err, "marker not added"),
        }
    }

    fn remove_marker(&mut self, index: usize) {
        if let Some(installed) = self.markers.remove(&index) {
            installed.marker.remove();
        }
    }

    fn upsert_route(&mut self, route: &RouteLayer) {
        if let Err(err) = self.write_route(route) {
            tracing::warn!(?err, "route not drawn");
        }
    }
}

/// Tag attached to a `moveend` event, if the animation carried one.
pub fn tag_of(event: &JsValue) -> Option<AnimationId> {
    let raw = Reflect::get(event, &JsValue::from_str(TAG_KEY)).ok()?;
    let id = raw.as_f64()?;
    (id >= 0.0 && id.fract() == 0.0).then(|| AnimationId::new(id as u64))
}
