// src/source.rs
use reqwest::{Client, StatusCode};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Why a load was abandoned. Callers collapse every variant into a single
/// "failed to load" state; the detail is for logs only.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("fetching {resource} failed: {reason}")]
    Fetch { resource: &'static str, reason: String },

    #[error("fetching {resource} returned HTTP {status}")]
    Status { resource: &'static str, status: StatusCode },

    #[error("reading {resource} failed: {source}")]
    Read {
        resource: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Where a CSV export lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Http(String),
    File(PathBuf),
}

impl Source {
    pub fn parse(s: &str) -> Source {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            Source::Http(s.to_string())
        } else {
            Source::File(PathBuf::from(s))
        }
    }
}

/// Fetch one export as text. No timeout and no retry: a failure here
/// aborts the whole load.
pub async fn fetch_text(client: &Client, resource: &'static str, source: &Source) -> Result<String, LoadError> {
    let text = match source {
        Source::Http(url) => {
            info!("📡 GET {} → {}", resource, url);
            let resp = client
                .get(url)
                .send()
                .await
                .map_err(|e| LoadError::Fetch { resource, reason: e.to_string() })?;

            if resp.status() != StatusCode::OK {
                return Err(LoadError::Status { resource, status: resp.status() });
            }

            resp.text()
                .await
                .map_err(|e| LoadError::Fetch { resource, reason: e.to_string() })?
        }
        Source::File(path) => {
            info!("📂 Reading {} from {}", resource, path.display());
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| LoadError::Read { resource, source })?
        }
    };

    info!("📩 {} loaded ({} bytes)", resource, text.len());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_prefixes_select_http() {
        assert_eq!(
            Source::parse("https://example.com/allbridge.csv"),
            Source::Http("https://example.com/allbridge.csv".into())
        );
        assert_eq!(Source::parse("http://localhost/x.csv"), Source::Http("http://localhost/x.csv".into()));
        assert_eq!(Source::parse(" public/outflow.csv "), Source::File(PathBuf::from("public/outflow.csv")));
    }

    #[tokio::test]
    async fn reads_local_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inflow.csv");
        std::fs::write(&path, "chain,transfers,usdc_value\nBase,1,2\n").unwrap();

        let text = fetch_text(&Client::new(), "inflow", &Source::File(path)).await.unwrap();
        assert!(text.contains("Base,1,2"));
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = fetch_text(&Client::new(), "outflow", &Source::File(dir.path().join("nope.csv")))
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Read { resource: "outflow", .. }));
    }
}
