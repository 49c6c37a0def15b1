use thiserror::Error;

#[derive(Debug, Error)]
pub enum SwiftError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] anyhow::Error),
}

impl SwiftError {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::DuplicateKey(_) => 409,
            Self::Validation(_) => 400,
            Self::StoreUnavailable(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, SwiftError>;

#[cfg(test)]
mod tests {
    use super::*;

    // ── http_status ─────────────────────────────────────────────

    #[test]
    fn http_status_not_found() {
        assert_eq!(SwiftError::NotFound("x".into()).http_status(), 404);
    }

    #[test]
    fn http_status_duplicate_key() {
        assert_eq!(SwiftError::DuplicateKey("x".into()).http_status(), 409);
    }

    #[test]
    fn http_status_validation() {
        assert_eq!(SwiftError::Validation("x".into()).http_status(), 400);
    }

    #[test]
    fn http_status_store_unavailable() {
        let err = SwiftError::StoreUnavailable(anyhow::anyhow!("connection refused"));
        assert_eq!(err.http_status(), 500);
    }

    // ── Display ─────────────────────────────────────────────────

    #[test]
    fn display_duplicate_key() {
        let e = SwiftError::DuplicateKey("AAAABBCCXXX".into());
        assert_eq!(e.to_string(), "duplicate key: AAAABBCCXXX");
    }

    #[test]
    fn display_store_unavailable() {
        let e = SwiftError::StoreUnavailable(anyhow::anyhow!("pool timed out"));
        assert_eq!(e.to_string(), "store unavailable: pool timed out");
    }
}
