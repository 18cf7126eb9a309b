use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid {entity} id '{value}': expected a {width}-character code")]
    InvalidId {
        entity: &'static str,
        width: usize,
        value: String,
    },

    #[error("Invalid input for {0}: {1}")]
    InvalidInput(&'static str, String),
}
