//! URL state encoding/decoding for shareable URLs.
//!
//! Encodes the map center and zoom in the URL query string so reloading
//! restores the view and URLs can be shared.

/// Parsed URL parameters.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UrlParams {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub zoom: Option<f64>,
}

/// Parses a query string such as `?lat=10&lon=20&zoom=4`.
///
/// Unknown keys and unparseable or non-finite values are ignored.
#[cfg(any(target_arch = "wasm32", test))]
pub fn parse_query(query: &str) -> UrlParams {
    let mut params = UrlParams::default();

    let query = query.trim_start_matches('?');
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let mut kv = pair.splitn(2, '=');
        let key = kv.next().unwrap_or("");
        let value = kv
            .next()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite());
        match key {
            "lat" => params.lat = value.filter(|v| (-90.0..=90.0).contains(v)),
            "lon" => params.lon = value.filter(|v| (-180.0..=180.0).contains(v)),
            "zoom" => params.zoom = value,
            _ => {}
        }
    }

    params
}

/// Formats the view as a query string.
#[cfg(any(target_arch = "wasm32", test))]
pub fn format_query(lat: f64, lon: f64, zoom: f64) -> String {
    format!("?lat={:.4}&lon={:.4}&zoom={:.2}", lat, lon, zoom)
}

/// Parse URL query parameters from the current browser URL.
#[cfg(target_arch = "wasm32")]
pub fn parse_from_url() -> UrlParams {
    let Some(search) = web_sys::window().and_then(|w| w.location().search().ok()) else {
        return UrlParams::default();
    };
    parse_query(&search)
}

/// No-op stub for native builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn parse_from_url() -> UrlParams {
    UrlParams::default()
}

/// Push current view to the URL query string using `replaceState`.
#[cfg(target_arch = "wasm32")]
pub fn push_to_url(lat: f64, lon: f64, zoom: f64) {
    let query = format_query(lat, lon, zoom);

    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&query));
}

/// No-op stub for native builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn push_to_url(_lat: f64, _lon: f64, _zoom: f64) {}
