mod cfg;
mod cli;
mod gateways;
mod logger;

use clap::Parser;

use geoavp_application::{geocode_batch, persist_with_retry, Dataset, PipelineContext};
use geoavp_core::gateways::console::OperatorConsole;

const INSTRUCTIONS: &str = "\
- Geocodificación de registros de AVP -

Requerimientos:
  * El archivo de entrada debe estar en data/<aaaa>/ con el nombre
    'Avp <mm> del <aaaa> con género.csv'.
  * Las credenciales OC_APIKEY, ESRI_USER, ESRI_PASS y ESRI_APIKEY
    deben estar definidas en el entorno o en un archivo .env.
  * Los resultados se guardan en results/<aaaa>/ y el registro de la
    corrida en logs/<aaaa>/.
";

fn main() {
    dotenvy::dotenv().ok();
    let args = cli::Args::parse();
    if let Err(err) = run(&args) {
        eprintln!();
        eprintln!("Error: {err}");
        eprintln!("El programa finalizará.");
        std::process::exit(1);
    }
}

fn run(args: &cli::Args) -> anyhow::Result<()> {
    let paths = cfg::RunPaths::new(&args.dir, &args.year, &args.month);
    paths.create_dirs()?;
    logger::init(&paths.log_file)?;
    let cfg = cfg::Cfg::from_env()?;

    let mut console = gateways::operator_console();
    console.info(INSTRUCTIONS);
    if !console.confirm("Ingrese 'si' en caso de cumplir los requerimientos para continuar.") {
        anyhow::bail!("ejecución cancelada por el usuario");
    }

    let dataset = Dataset::read_from_file(&paths.input_file, &args.year, &args.month)?;
    log::info!(
        "Loaded {} records from {}",
        dataset.len(),
        paths.input_file.display()
    );

    let primary = gateways::opencage_gateway(&cfg)?;
    let secondary = gateways::esri_gateway(&cfg)?;
    let map = gateways::map_gateway(paths.map_file.clone(), !args.no_browser);

    let mut ctx = PipelineContext {
        primary: &primary,
        secondary: &secondary,
        map: &map,
        console: &mut console,
    };
    let buckets = geocode_batch(dataset.records(), &mut ctx)?;
    let merged = buckets.into_merged();

    persist_with_retry(&dataset, &paths.output_file, &merged, &mut console);
    log::info!(
        "Saved {} records to {}",
        merged.len(),
        paths.output_file.display()
    );
    Ok(())
}
