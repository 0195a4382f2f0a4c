use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
/// Option validation failures raised before any clustering work starts.
pub enum ClusterError {
    #[error("{name} must be a finite value in [0, 1], got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
    #[error("{name} must be at least 1")]
    ZeroLimit { name: &'static str },
}

pub(crate) fn validate_threshold(name: &'static str, value: f64) -> Result<(), ClusterError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ClusterError::InvalidThreshold { name, value })
    }
}
