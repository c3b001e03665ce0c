use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtomIntError {
    #[error("Unknown transform mode: {0}")]
    UnknownTransformMode(String),
    #[error("Invalid transform axes: {0}")]
    InvalidAxes(String),
    #[error("Invalid atom selection: {0}")]
    InvalidAtoms(String),
    #[error("Integral engine error: {0}")]
    Engine(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
