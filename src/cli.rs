use std::path::PathBuf;

use clap::Parser;

/// Geocodificación en dos etapas de los registros de AVP.
#[derive(Debug, Parser)]
#[command(name = "geoavp", version, about)]
pub struct Args {
    /// Año de los datos a geocodificar (aaaa).
    #[arg(long, value_parser = parse_year)]
    pub year: String,

    /// Mes de los datos a geocodificar (mm).
    #[arg(long, value_parser = parse_month)]
    pub month: String,

    /// Directorio de trabajo con las carpetas data/, results/ y logs/.
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// No abrir el mapa en el navegador en cada verificación.
    #[arg(long)]
    pub no_browser: bool,
}

fn parse_year(value: &str) -> Result<String, String> {
    if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(value.to_owned())
    } else {
        Err("el año debe tener 4 caracteres numéricos (aaaa)".to_owned())
    }
}

fn parse_month(value: &str) -> Result<String, String> {
    let valid = value.len() == 2
        && value.bytes().all(|b| b.is_ascii_digit())
        && matches!(value.parse::<u8>(), Ok(1..=12));
    if valid {
        Ok(value.to_owned())
    } else {
        Err("el mes debe tener 2 caracteres numéricos entre 01 y 12 (mm)".to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_year_and_month() {
        assert!(parse_year("2023").is_ok());
        assert!(parse_month("01").is_ok());
        assert!(parse_month("12").is_ok());
    }

    #[test]
    fn rejects_malformed_year() {
        assert!(parse_year("23").is_err());
        assert!(parse_year("20233").is_err());
        assert!(parse_year("dosmil").is_err());
    }

    #[test]
    fn rejects_malformed_month() {
        assert!(parse_month("1").is_err());
        assert!(parse_month("13").is_err());
        assert!(parse_month("00").is_err());
        assert!(parse_month("ab").is_err());
    }
}
