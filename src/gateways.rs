use std::path::PathBuf;

use geoavp_gateways::{console::StdConsole, esri::Esri, leaflet::LeafletMap, opencage::OpenCage};

use crate::cfg::Cfg;

pub fn opencage_gateway(cfg: &Cfg) -> anyhow::Result<OpenCage> {
    OpenCage::new(cfg.opencage_api_key.clone())
}

pub fn esri_gateway(cfg: &Cfg) -> anyhow::Result<Esri> {
    Esri::new(
        cfg.esri_user.clone(),
        cfg.esri_pass.clone(),
        cfg.esri_api_key.clone(),
    )
}

pub fn map_gateway(out_file: PathBuf, open_in_browser: bool) -> LeafletMap {
    LeafletMap::new(out_file, open_in_browser)
}

pub fn operator_console() -> StdConsole {
    StdConsole::default()
}
