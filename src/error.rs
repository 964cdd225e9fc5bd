use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnsupportedUnitError {
    #[error("unknown unit `{0}`")]
    Unknown(String),
    #[error("entity provides no native unit to convert from")]
    MissingNative,
    #[error("cannot convert from `{0}`, source unit must be physical")]
    NonPhysicalSource(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    /// Missing or invalid entity at setup. Rendering refuses to proceed.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// Local to one display value, which is omitted.
    #[error(transparent)]
    UnsupportedUnit(#[from] UnsupportedUnitError),
    #[error("forecast subscription failed: {0}")]
    Subscription(String),
    /// Canvas not mounted yet, retried on the next animation frame.
    #[error("chart render target is not mounted")]
    RenderTargetMissing,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_errors_convert_into_card_errors() {
        let err: CardError = UnsupportedUnitError::Unknown("kn".to_string()).into();
        assert_eq!(err.to_string(), "unknown unit `kn`");
        assert!(matches!(err, CardError::UnsupportedUnit(_)));
    }
}
