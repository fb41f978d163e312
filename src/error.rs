use std::io;

#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    #[error("reading log: {0}")]
    Io(#[from] io::Error),

    #[error("field '{0}' is not declared in the #Fields directive")]
    FieldNotFound(String),
}
