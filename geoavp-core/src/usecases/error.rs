use thiserror::Error;

/// Operator input validation errors.
///
/// These are consumed by the prompt-retry loop and shown as guidance
/// text; they never propagate out of a verification session. The
/// messages are operator-facing and therefore Spanish.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("El id ingresado debe tener {expected} caracteres numéricos")]
    IdLength { expected: usize },
    #[error("El id ingresado debe tener solo caracteres numéricos")]
    IdNotNumeric,
}
