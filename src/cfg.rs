use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use anyhow::anyhow;

/// Provider credentials, read from the environment (or a `.env` file
/// loaded beforehand). All of them are required up front so a missing
/// key aborts the run before any work is done.
#[derive(Debug)]
pub struct Cfg {
    pub opencage_api_key: String,
    pub esri_user: String,
    pub esri_pass: String,
    pub esri_api_key: String,
}

impl Cfg {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            opencage_api_key: required("OC_APIKEY")?,
            esri_user: required("ESRI_USER")?,
            esri_pass: required("ESRI_PASS")?,
            esri_api_key: required("ESRI_APIKEY")?,
        })
    }
}

fn required(name: &'static str) -> anyhow::Result<String> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| anyhow!("falta la credencial {name} en el entorno (revise su archivo .env)"))
}

/// All file locations of one monthly run, derived from the working
/// directory and the year/month pair.
#[derive(Debug)]
pub struct RunPaths {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub log_file: PathBuf,
    pub map_file: PathBuf,
    results_dir: PathBuf,
    logs_dir: PathBuf,
    graphs_dir: PathBuf,
}

impl RunPaths {
    pub fn new(dir: &Path, year: &str, month: &str) -> Self {
        let input_file = dir
            .join("data")
            .join(year)
            .join(format!("Avp {month} del {year} con género.csv"));
        let results_dir = dir.join("results").join(year);
        let output_file = results_dir.join(format!("{year}-{month}_AVP-geocoded.csv"));
        let logs_dir = dir.join("logs").join(year);
        let log_file = logs_dir.join(format!("{year}-{month}_AVP-geocoded.log"));
        let graphs_dir = dir.join("graphs");
        let map_file = graphs_dir.join("map_geo.html");
        Self {
            input_file,
            output_file,
            log_file,
            map_file,
            results_dir,
            logs_dir,
            graphs_dir,
        }
    }

    /// Creates the output directories. The input directory is not
    /// touched; a missing input file stays an error.
    pub fn create_dirs(&self) -> io::Result<()> {
        fs::create_dir_all(&self.results_dir)?;
        fs::create_dir_all(&self.logs_dir)?;
        fs::create_dir_all(&self.graphs_dir)?;
        Ok(())
    }
}
