/// Result alias that carries the custom [`DemoError`] type.
pub type Result<T> = std::result::Result<T, DemoError>;

/// Common error type for the core crate.
///
/// The simulation itself never fails; every variant here originates from a
/// collaborator (an output surface, the filesystem, an encoder).
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    /// An output surface rejected a draw or present call.
    #[error("surface error: {0}")]
    Surface(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Draw-command logs failed to serialise.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// A framebuffer snapshot failed to encode or save.
    #[error("{0}")]
    Image(#[from] image::ImageError),
}

impl DemoError {
    /// Creates a surface error carrying the backend's reason.
    pub fn surface<T: Into<String>>(reason: T) -> Self {
        Self::Surface(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_errors_name_their_origin() {
        let err = DemoError::surface("device lost");
        assert_eq!(err.to_string(), "surface error: device lost");
    }

    #[test]
    fn io_errors_convert_with_question_mark() {
        fn open() -> Result<()> {
            std::fs::File::open("/definitely/not/here/retronova")?;
            Ok(())
        }

        assert!(matches!(open(), Err(DemoError::Io(_))));
    }
}
