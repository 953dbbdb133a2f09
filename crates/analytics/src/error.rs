use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AnalyticsError {
    #[error("Season {0} not found")]
    SeasonNotFound(i32),

    #[error("Member {0} not found")]
    MemberNotFound(i64),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid power ranking weights: {0}")]
    InvalidWeights(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AnalyticsError {
    /// Whether the error means the requested entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AnalyticsError::SeasonNotFound(_) | AnalyticsError::MemberNotFound(_) | AnalyticsError::NotFound(_)
        )
    }
}
