use thiserror::Error;

#[derive(Debug, Error)]
pub enum AreaQueryError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid filter set: {0}")]
    InvalidFilterSet(String),

    #[error("No usable filters")]
    NoUsableFilters,

    #[error("Collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    #[error("Serde JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl AreaQueryError {
    /// Errors caused by the request itself rather than by this service or its collaborators.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidGeometry(_) | Self::InvalidFilterSet(_) | Self::Json(_))
    }
}

impl From<std::io::Error> for AreaQueryError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
