//! Error types for the TV.com scraper.
//!
//! A field whose extraction pattern does not match is NOT an error; it is
//! a successful fetch yielding an empty value. Errors are reserved for bad
//! construction input and transport failures.

use thiserror::Error;

use crate::transport::TransportError;

/// Error type for TV.com scraper operations
#[derive(Debug, Error)]
pub enum TvComError {
    /// Construction input was missing, or not usable as an id or name
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The name-search request itself failed
    #[error("search request failed: {0}")]
    LookupFailed(TransportError),

    /// The search succeeded but returned no matching show
    #[error("no show found matching: {0}")]
    NotFound(String),

    /// A page fetch failed for the given entity id
    #[error("failed to fetch page for id {id}: {source}")]
    FetchFailed {
        /// Id whose page was requested
        id: u32,
        /// Underlying transport failure
        source: TransportError,
    },
}

/// Result type alias for TV.com scraper operations
pub type Result<T> = std::result::Result<T, TvComError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_argument() {
        let error = TvComError::InvalidArgument("no id or name given".to_string());
        assert_eq!(error.to_string(), "invalid argument: no id or name given");
    }

    #[test]
    fn test_display_lookup_failed() {
        let error = TvComError::LookupFailed(TransportError::Other("timed out".to_string()));
        assert_eq!(error.to_string(), "search request failed: timed out");
    }

    #[test]
    fn test_display_not_found() {
        let error = TvComError::NotFound("Prison Break".to_string());
        assert_eq!(error.to_string(), "no show found matching: Prison Break");
    }

    #[test]
    fn test_display_fetch_failed_carries_id() {
        let error = TvComError::FetchFailed {
            id: 31635,
            source: TransportError::Status(503),
        };
        let display = error.to_string();
        assert!(display.contains("31635"));
        assert!(display.contains("503"));
    }
}
