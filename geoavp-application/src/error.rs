use std::{io, path::PathBuf};

use thiserror::Error;

use geoavp_core::gateways::map::RenderError;

/// Fatal input validation failures. The messages are shown to the
/// operator before the process exits non-zero, hence Spanish.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("no se encontró el archivo de entrada: {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("falta la columna requerida '{0}'")]
    MissingColumn(String),
    #[error("la columna 'id' no debe tener celdas vacías (fila {row})")]
    EmptyId { row: usize },
    #[error("la columna 'id' debe tener sólo valores numéricos ('{0}')")]
    NonNumericId(String),
    #[error("la columna 'id' no debe tener celdas repetidas ('{0}')")]
    DuplicateId(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
