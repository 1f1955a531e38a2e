use std::{
    collections::{HashMap, HashSet},
    fs,
    path::Path,
};

use anyhow::anyhow;
use geoavp_core::gateways::console::OperatorConsole;
use geoavp_entities::record::{Record, RecordId};

use crate::{
    error::{AppError, InputError},
    Result,
};

pub const COL_ID: &str = "id";
pub const COL_ENTRY_DATE: &str = "fecha_ingreso";
pub const COL_ADDRESS: &str = "direccion_avp";

/// Extra columns appended to the output file, after the input columns.
const OUTPUT_COLUMNS: &[&str] = &["direccion_orig", "lat", "lon", "geocoder"];

/// In-memory copy of one monthly input file.
///
/// Holds every input row untouched so the output file can reproduce
/// them with the geocoding columns appended, and derives one [`Record`]
/// per row keyed by the composite id `<aaaa><mm><id>`.
#[derive(Debug)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    address_column: usize,
    records: Vec<Record>,
    row_index_by_id: HashMap<RecordId, usize>,
}

impl Dataset {
    /// Reads and validates the input CSV.
    ///
    /// Header names are normalized (lower-case, legacy names mapped,
    /// spaces to underscores) and the `id` column is checked up front:
    /// the whole run aborts on the first empty, non-numeric or
    /// duplicate cell.
    pub fn read_from_file(path: &Path, year: &str, month: &str) -> Result<Self> {
        let file = fs::File::open(path).map_err(|err| InputError::Open {
            path: path.to_owned(),
            source: err,
        })?;
        let mut reader = csv::Reader::from_reader(file);

        let headers: Vec<String> = reader
            .headers()
            .map_err(AppError::Csv)?
            .iter()
            .map(normalize_header)
            .collect();
        let column = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| InputError::MissingColumn(name.to_owned()).into())
        };
        let id_column = column(COL_ID)?;
        column(COL_ENTRY_DATE)?;
        let address_column = column(COL_ADDRESS)?;

        let mut rows = Vec::new();
        for row in reader.records() {
            let row = row.map_err(AppError::Csv)?;
            rows.push(row.iter().map(str::to_owned).collect::<Vec<String>>());
        }

        // The composite id pads the row id to the width of the largest
        // possible one, so all ids of a month compare equally long.
        let width = rows.len().to_string().len();
        let mut seen = HashSet::new();
        let mut records = Vec::with_capacity(rows.len());
        let mut row_index_by_id = HashMap::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let cell = row.get(id_column).map(String::as_str).unwrap_or_default();
            let cell = cell.trim();
            if cell.is_empty() {
                return Err(InputError::EmptyId { row: index + 2 }.into());
            }
            let numeric: u64 = cell
                .parse()
                .map_err(|_| InputError::NonNumericId(cell.to_owned()))?;
            if !seen.insert(numeric) {
                return Err(InputError::DuplicateId(cell.to_owned()).into());
            }

            let id: RecordId = format!("{year}{month}{numeric:0width$}")
                .parse()
                .map_err(|err| anyhow!("composite id for row {}: {err}", index + 2))?;
            let address = row
                .get(address_column)
                .map(|cell| cell.trim())
                .filter(|cell| !cell.is_empty())
                .map(str::to_owned);
            row_index_by_id.insert(id.clone(), index);
            records.push(Record::new(id, address));
        }

        log::debug!(
            "Read {} rows from {} (id width {})",
            rows.len(),
            path.display(),
            width
        );
        Ok(Self {
            headers,
            rows,
            address_column,
            records,
            row_index_by_id,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The geocodable view of the dataset, one record per input row.
    pub fn records(&self) -> Vec<Record> {
        self.records.clone()
    }

    /// Writes the output CSV: all input columns with the address cell
    /// replaced by the geocoding query, followed by the original
    /// address, the coordinates and the resolving provider.
    ///
    /// The file is written to a temporary sibling first and renamed
    /// into place, so an aborted run never leaves a truncated output.
    pub fn write_geocoded(&self, path: &Path, merged: &[Record]) -> Result<()> {
        let tmp = path.with_extension("csv.tmp");
        let mut writer = csv::Writer::from_path(&tmp).map_err(AppError::Csv)?;

        let mut headers = self.headers.clone();
        headers.extend(OUTPUT_COLUMNS.iter().map(|h| h.to_string()));
        writer.write_record(&headers).map_err(AppError::Csv)?;

        for record in merged {
            let index = *self
                .row_index_by_id
                .get(&record.id)
                .ok_or_else(|| anyhow!("unknown record id {}", record.id))?;
            let row = &self.rows[index];

            let mut out: Vec<String> = Vec::with_capacity(row.len() + OUTPUT_COLUMNS.len());
            for (column, value) in row.iter().enumerate() {
                if column == self.address_column {
                    out.push(record.query.clone().unwrap_or_else(|| value.clone()));
                } else {
                    out.push(value.clone());
                }
            }
            out.push(
                record
                    .raw_address
                    .as_deref()
                    .unwrap_or_default()
                    .to_lowercase(),
            );
            let (lat, lon) = match record.pos {
                Some(pos) => (pos.lat().to_string(), pos.lng().to_string()),
                None => (String::new(), String::new()),
            };
            out.push(lat);
            out.push(lon);
            out.push(record.provenance.to_string());
            writer.write_record(&out).map_err(AppError::Csv)?;
        }

        writer.flush().map_err(AppError::Io)?;
        drop(writer);
        fs::rename(&tmp, path).map_err(AppError::Io)?;
        Ok(())
    }
}

/// Writes the output file, asking the operator to retry on failure
/// (typically the file being open in a spreadsheet program).
pub fn persist_with_retry(
    dataset: &Dataset,
    path: &Path,
    merged: &[Record],
    console: &mut dyn OperatorConsole,
) {
    loop {
        match dataset.write_geocoded(path, merged) {
            Ok(()) => {
                console.info("- Archivo guardado correctamente -");
                return;
            }
            Err(err) => {
                log::error!("Could not write {}: {err}", path.display());
                console.info(&format!("No se pudo guardar el archivo: {err}"));
                console.info("Cierre el archivo si lo tiene abierto.");
                console.prompt_line("Presione enter para reintentar.");
            }
        }
    }
}

fn normalize_header(header: &str) -> String {
    let header = header.trim().to_lowercase();
    match header.as_str() {
        "fecha de ingreso" => COL_ENTRY_DATE.to_owned(),
        "lugar del avp" => COL_ADDRESS.to_owned(),
        _ => header.replace(' ', "_"),
    }
}
