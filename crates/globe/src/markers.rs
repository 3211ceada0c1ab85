//! Marker and popup construction from feed records.

use feed::LocationRecord;
use foundation::geo::LngLat;
use serde::Serialize;

/// CSS class of the outer marker element.
pub const MARKER_CLASS: &str = "destination-marker";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    /// Bottom-center of the element sits on the coordinate.
    #[default]
    Bottom,
}

impl Anchor {
    pub fn as_str(self) -> &'static str {
        match self {
            Anchor::Bottom => "bottom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupSpec {
    /// Pixel offset from the marker anchor.
    pub offset: [f64; 2],
    pub max_width: String,
    pub close_button: bool,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerSpec {
    /// Position of the record in the feed; also the click target id.
    pub index: usize,
    pub position: LngLat,
    pub anchor: Anchor,
    /// Inner HTML of the marker element: label, stem and pulsing dot.
    pub element_html: String,
    pub popup: PopupSpec,
}

impl MarkerSpec {
    pub fn from_record(index: usize, record: &LocationRecord) -> Self {
        Self {
            index,
            position: record.lng_lat(),
            anchor: Anchor::Bottom,
            element_html: marker_html(&record.name),
            popup: PopupSpec {
                offset: [0.0, -50.0],
                max_width: "320px".to_string(),
                close_button: false,
                html: popup_html(record),
            },
        }
    }
}

/// One marker per record, in feed order.
pub fn build_markers(records: &[LocationRecord]) -> Vec<MarkerSpec> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| MarkerSpec::from_record(i, r))
        .collect()
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// The wrapper div carries the hover transform so the engine's own transform
// on the outer element is left alone.
fn marker_html(name: &str) -> String {
    format!(
        "<div class=\"marker-animator\">\
         <div class=\"marker-label\">{}</div>\
         <div class=\"marker-line\"></div>\
         <div class=\"marker-dot\"></div>\
         </div>",
        escape_html(&name.to_uppercase())
    )
}

fn popup_html(record: &LocationRecord) -> String {
    format!(
        "<div class=\"popup-content-wrapper\">\
         <img src=\"{}\" class=\"popup-image\" />\
         <h3 class=\"popup-title\">{}</h3>\
         <p class=\"popup-desc\">{}</p>\
         </div>",
        escape_html(&record.image),
        escape_html(&record.name),
        escape_html(&record.description)
    )
}

#[cfg(test)]
mod tests {
    use super::{Anchor, MarkerSpec, build_markers, escape_html};
    use feed::LocationRecord;
    use foundation::geo::LngLat;

    fn record(name: &str, lng: f64, lat: f64) -> LocationRecord {
        LocationRecord {
            name: name.into(),
            description: "Street food & coffee".into(),
            image: "https://img.example/a.jpg".into(),
            latitude: lat,
            longitude: lng,
        }
    }

    #[test]
    fn marker_sits_on_record_coordinates() {
        let m = MarkerSpec::from_record(3, &record("Hoi An", 108.33, 15.88));
        assert_eq!(m.index, 3);
        assert_eq!(m.position, LngLat::new(108.33, 15.88));
        assert_eq!(m.anchor, Anchor::Bottom);
        assert_eq!(m.popup.offset, [0.0, -50.0]);
        assert_eq!(m.popup.max_width, "320px");
        assert!(!m.popup.close_button);
    }

    #[test]
    fn label_is_upper_case_and_popup_shows_fields() {
        let m = MarkerSpec::from_record(0, &record("Hoi An", 108.33, 15.88));
        assert!(m.element_html.contains(">HOI AN<"));
        assert!(m.popup.html.contains("<h3 class=\"popup-title\">Hoi An</h3>"));
        assert!(m.popup.html.contains("src=\"https://img.example/a.jpg\""));
        assert!(m.popup.html.contains("Street food &amp; coffee"));
    }

    #[test]
    fn markup_in_fields_is_escaped() {
        assert_eq!(escape_html("<b>\"x\"</b>"), "&lt;b&gt;&quot;x&quot;&lt;/b&gt;");
        let m = MarkerSpec::from_record(0, &record("<script>", 0.0, 0.0));
        assert!(!m.element_html.contains("<SCRIPT>"));
        assert!(!m.popup.html.contains("<script>"));
    }

    #[test]
    fn one_marker_per_record_in_order() {
        let markers = build_markers(&[record("A", 10.0, 20.0), record("B", 30.0, 40.0)]);
        let idx: Vec<_> = markers.iter().map(|m| m.index).collect();
        assert_eq!(idx, vec![0, 1]);
        assert_eq!(markers[1].position, LngLat::new(30.0, 40.0));
    }
}
