use std::{fs, path::PathBuf};

use askama::Template;
use serde::Serialize;

use geoavp_core::gateways::map::{MapGateway, MapMarker, RenderError};

// Default map view over the Rosario metropolitan area.
const CENTER_LAT_DEG: f64 = -32.940506;
const CENTER_LNG_DEG: f64 = -60.712480;
const ZOOM: u8 = 12;

#[derive(Template)]
#[template(path = "map.html")]
struct MapHtmlTemplate<'a> {
    center_lat: f64,
    center_lng: f64,
    zoom: u8,
    markers_json: &'a str,
}

#[derive(Serialize)]
struct MarkerJson<'a> {
    id: &'a str,
    label: &'a str,
    lat: f64,
    lng: f64,
    flagged: bool,
}

/// Writes the verification map as a self-contained Leaflet HTML file,
/// rewriting it in place on every render, and optionally opens it in
/// the operator's default browser.
pub struct LeafletMap {
    out_file: PathBuf,
    open_in_browser: bool,
}

impl LeafletMap {
    pub fn new(out_file: PathBuf, open_in_browser: bool) -> Self {
        Self {
            out_file,
            open_in_browser,
        }
    }
}

impl MapGateway for LeafletMap {
    fn render_markers(&self, markers: &[MapMarker]) -> Result<(), RenderError> {
        let payload: Vec<MarkerJson> = markers
            .iter()
            .map(|m| MarkerJson {
                id: m.id.as_str(),
                label: &m.label,
                lat: m.pos.lat(),
                lng: m.pos.lng(),
                flagged: m.flagged,
            })
            .collect();
        let markers_json =
            serde_json::to_string(&payload).map_err(|err| RenderError::Template(err.to_string()))?;
        let html = MapHtmlTemplate {
            center_lat: CENTER_LAT_DEG,
            center_lng: CENTER_LNG_DEG,
            zoom: ZOOM,
            markers_json: &markers_json,
        }
        .render()
        .map_err(|err| RenderError::Template(err.to_string()))?;
        fs::write(&self.out_file, html)?;
        log::debug!(
            "Rendered {} markers to {}",
            markers.len(),
            self.out_file.display()
        );
        if self.open_in_browser {
            if let Err(err) = webbrowser::open(&self.out_file.to_string_lossy()) {
                log::warn!("Could not open the map in a browser: {err}");
            }
        }
        Ok(())
    }
}
