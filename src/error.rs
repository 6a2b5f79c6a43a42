use thiserror::Error;

/// Failures of the strategy core.
///
/// Malformed stint ranges are not errors; they are simulated literally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrategyError {
    #[error("Unknown tire compound '{0}'.")]
    UnknownCompound(String),
    #[error("Unknown circuit '{0}'.")]
    InvalidCircuit(String),
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<StrategyError> for AppError {
    fn from(err: StrategyError) -> Self {
        AppError::new(3, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_errors_map_to_exit_code_3() {
        let err: AppError = StrategyError::InvalidCircuit("spa".to_string()).into();
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.to_string(), "Unknown circuit 'spa'.");
    }
}
