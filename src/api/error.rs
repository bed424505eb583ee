use std::path::PathBuf;

/// Errors from the content REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("server responded {status}: {body}")]
    Status { status: u16, body: String },

    /// The upload response parsed but carried no file identifier.
    #[error("upload response has no data.file identifier")]
    MissingFileId,

    /// A 2xx response whose body is not what the endpoint promises.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The image chosen for upload could not be read.
    #[error("cannot read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    /// The HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_shows_body() {
        let err = ApiError::Status {
            status: 400,
            body: r#"{"slug": ["already exists"]}"#.into(),
        };
        assert_eq!(
            err.to_string(),
            r#"server responded 400: {"slug": ["already exists"]}"#
        );
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn read_error_names_the_file() {
        let err = ApiError::ReadFile {
            path: PathBuf::from("/tmp/missing.png"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "cannot read /tmp/missing.png: not found");
        assert_eq!(err.status(), None);
    }
}
