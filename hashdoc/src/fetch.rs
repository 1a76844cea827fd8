//! Document sources
//!
//! A documentation page is fetched once per navigation as raw markdown text,
//! either over HTTP from `{base_url}/{section_id}.md` or from a local docs
//! directory. Failures are reported as [`FetchError`]; turning them into a
//! visible fallback block is the renderer's job.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use thiserror::Error;

/// Section ids are slash-separated segments of `[A-Za-z0-9_-]`
static SECTION_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+(/[A-Za-z0-9_-]+)*$").expect("section id pattern is valid")
});

/// Default HTTP timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Errors that can occur while fetching a document
#[derive(Error, Debug)]
pub enum FetchError {
    /// The section id contains characters that cannot form a document path
    #[error("invalid section id '{0}'")]
    InvalidSectionId(String),

    /// The document does not exist (HTTP 404 or missing file)
    #[error("document '{0}' not found")]
    NotFound(String),

    /// The server answered with a non-success status other than 404
    #[error("HTTP {status} while fetching {url}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// The response is not a text document
    #[error("{url} returned non-text content ({content_type})")]
    NotText {
        /// Requested URL
        url: String,
        /// Content type reported by the server
        content_type: String,
    },

    /// Transport-level failure (DNS, connection, timeout, body decoding)
    #[error("failed to fetch {url}: {message}")]
    Network {
        /// Requested URL
        url: String,
        /// Underlying error message
        message: String,
    },

    /// Reading a local document failed
    #[error("failed to read {path}: {source}", path = .path.display())]
    Io {
        /// File that could not be read
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Whether the document is known not to exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound(_))
    }
}

/// Something that can produce the raw markdown for a documentation section
pub trait DocumentSource {
    /// Fetch the raw markdown of a section
    ///
    /// # Parameters
    /// * `section_id` - Documentation section id (e.g. `guides/ocr`)
    ///
    /// # Returns
    /// * `Ok(String)` - Raw markdown text
    /// * `Err(FetchError)` - The document could not be produced
    fn fetch(&self, section_id: &str) -> Result<String, FetchError>;

    /// Human-readable location of a section, for logs
    fn location(&self, section_id: &str) -> String;
}

/// Check that a section id can safely be turned into a path or URL
pub fn validate_section_id(section_id: &str) -> Result<(), FetchError> {
    if SECTION_ID.is_match(section_id) {
        Ok(())
    } else {
        Err(FetchError::InvalidSectionId(section_id.to_string()))
    }
}

/// Fetches documents over HTTP
pub struct HttpSource {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpSource {
    /// Create a source rooted at `base_url` with the default timeout
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a source with an explicit request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: http_agent(timeout),
        }
    }

    /// URL of a section's markdown document
    pub fn url_for(&self, section_id: &str) -> String {
        format!("{}/{}.md", self.base_url, section_id)
    }
}

impl DocumentSource for HttpSource {
    fn fetch(&self, section_id: &str) -> Result<String, FetchError> {
        validate_section_id(section_id)?;
        get_document(&self.agent, &self.url_for(section_id))
    }

    fn location(&self, section_id: &str) -> String {
        self.url_for(section_id)
    }
}

/// Fetch a markdown document from an absolute URL with the default timeout
pub fn fetch_url(url: &str) -> Result<String, FetchError> {
    let agent = http_agent(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    get_document(&agent, url)
}

fn http_agent(timeout: Duration) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build();
    ureq::Agent::new_with_config(config)
}

/// GET a textual document; 404 maps to [`FetchError::NotFound`]
fn get_document(agent: &ureq::Agent, url: &str) -> Result<String, FetchError> {
    log::debug!("Fetching {}", url);

    let url = url.to_string();
    let mut response = match agent.get(&url).call() {
        Ok(response) => response,
        Err(ureq::Error::StatusCode(404)) => return Err(FetchError::NotFound(url)),
        Err(ureq::Error::StatusCode(status)) => return Err(FetchError::Status { url, status }),
        Err(e) => {
            return Err(FetchError::Network {
                url,
                message: e.to_string(),
            });
        }
    };

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_ascii_lowercase());
    if let Some(content_type) = content_type {
        if !is_textual(&content_type) {
            return Err(FetchError::NotText { url, content_type });
        }
    }

    response
        .body_mut()
        .read_to_string()
        .map_err(|e| FetchError::Network {
            url,
            message: e.to_string(),
        })
}

/// Whether a content type can carry a markdown document
fn is_textual(content_type: &str) -> bool {
    content_type.starts_with("text/")
        || content_type.contains("markdown")
        || content_type.starts_with("application/octet-stream")
}

/// Reads documents from a local docs directory
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Create a source reading `{root}/{section_id}.md`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the documents
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a section's markdown file
    pub fn path_for(&self, section_id: &str) -> PathBuf {
        self.root.join(format!("{}.md", section_id))
    }
}

impl DocumentSource for DirectorySource {
    fn fetch(&self, section_id: &str) -> Result<String, FetchError> {
        validate_section_id(section_id)?;
        let path = self.path_for(section_id);

        log::debug!("Reading {}", path.display());

        std::fs::read_to_string(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => FetchError::NotFound(section_id.to_string()),
            _ => FetchError::Io { path, source },
        })
    }

    fn location(&self, section_id: &str) -> String {
        self.path_for(section_id).display().to_string()
    }
}

/// Serves documents held in memory
#[derive(Debug, Default, Clone)]
pub struct StaticSource {
    documents: HashMap<String, String>,
}

impl StaticSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a document
    pub fn insert(&mut self, section_id: &str, document: &str) {
        self.documents
            .insert(section_id.to_string(), document.to_string());
    }

    /// Builder-style variant of [`StaticSource::insert`]
    pub fn with(mut self, section_id: &str, document: &str) -> Self {
        self.insert(section_id, document);
        self
    }
}

impl DocumentSource for StaticSource {
    fn fetch(&self, section_id: &str) -> Result<String, FetchError> {
        validate_section_id(section_id)?;
        self.documents
            .get(section_id)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(section_id.to_string()))
    }

    fn location(&self, section_id: &str) -> String {
        format!("memory:{}", section_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_model::{render_fetched, PageStatus, RenderOptions};
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;

    /// Serve one canned HTTP response per connection, in order
    ///
    /// Returns the base URL and a handle yielding the request lines received.
    fn serve_responses(responses: Vec<String>) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = std::thread::spawn(move || {
            let mut request_lines = Vec::new();
            for response in responses {
                let (mut stream, _) = listener.accept().unwrap();

                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = stream.read(&mut buf).unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                }
                let text = String::from_utf8_lossy(&request);
                request_lines.push(text.lines().next().unwrap_or_default().to_string());

                stream.write_all(response.as_bytes()).unwrap();
                stream.flush().unwrap();
            }
            request_lines
        });

        (base_url, handle)
    }

    fn response(status_line: &str, content_type: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            content_type,
            body.len(),
            body
        )
    }

    #[test]
    fn test_validate_section_id() {
        assert!(validate_section_id("getting-started").is_ok());
        assert!(validate_section_id("guides/ocr_v2").is_ok());
        assert!(validate_section_id("../secrets").is_err());
        assert!(validate_section_id("guides//ocr").is_err());
        assert!(validate_section_id("/absolute").is_err());
        assert!(validate_section_id("").is_err());
    }

    #[test]
    fn test_http_source_url() {
        let source = HttpSource::new("https://docs.hashub.dev/docs/");

        assert_eq!(
            source.url_for("api/embeddings"),
            "https://docs.hashub.dev/docs/api/embeddings.md"
        );
    }

    #[test]
    fn test_http_source_rejects_bad_id_without_request() {
        let source = HttpSource::new("http://127.0.0.1:9");

        let err = source.fetch("../etc/passwd").unwrap_err();

        assert!(matches!(err, FetchError::InvalidSectionId(_)));
    }

    #[test]
    fn test_is_textual() {
        assert!(is_textual("text/markdown; charset=utf-8"));
        assert!(is_textual("text/plain"));
        assert!(!is_textual("image/png"));
        assert!(!is_textual("application/json"));
    }

    #[test]
    fn test_directory_source_missing_file_is_not_found() {
        let source = DirectorySource::new(std::env::temp_dir().join("hashdoc-no-such-dir"));

        let err = source.fetch("intro").unwrap_err();

        assert!(err.is_not_found());
    }

    #[test]
    fn test_http_source_maps_status_codes() {
        // Arrange
        let (base_url, server) = serve_responses(vec![
            response("200 OK", "text/markdown; charset=utf-8", "# Intro\n"),
            response("404 Not Found", "text/plain", ""),
            response("503 Service Unavailable", "text/plain", ""),
        ]);
        let source = HttpSource::with_timeout(&base_url, Duration::from_secs(5));

        // Act
        let found = source.fetch("intro");
        let missing = source.fetch("guides/missing");
        let unavailable = source.fetch("guides/ocr");

        // Assert
        assert_eq!(found.unwrap(), "# Intro\n");
        match missing {
            Err(FetchError::NotFound(url)) => assert!(url.ends_with("/guides/missing.md")),
            other => panic!("Expected NotFound, got {:?}", other),
        }
        match unavailable {
            Err(FetchError::Status { status, .. }) => assert_eq!(status, 503),
            other => panic!("Expected Status, got {:?}", other),
        }
        assert_eq!(
            server.join().unwrap(),
            vec![
                "GET /intro.md HTTP/1.1",
                "GET /guides/missing.md HTTP/1.1",
                "GET /guides/ocr.md HTTP/1.1",
            ]
        );
    }

    #[test]
    fn test_http_not_found_renders_not_found_page() {
        // Arrange
        let (base_url, server) =
            serve_responses(vec![response("404 Not Found", "text/html", "<h1>404</h1>")]);
        let source = HttpSource::with_timeout(&base_url, Duration::from_secs(5));

        // Act
        let page = render_fetched(source.fetch("guides/missing"), &RenderOptions::default());

        // Assert
        assert_eq!(page.status, PageStatus::NotFound);
        assert!(page.html.contains("Page not found"));
        server.join().unwrap();
    }

    #[test]
    fn test_http_non_text_response_is_rejected() {
        let (base_url, server) = serve_responses(vec![response("200 OK", "image/png", "PNG")]);
        let source = HttpSource::with_timeout(&base_url, Duration::from_secs(5));

        let err = source.fetch("logo").unwrap_err();

        assert!(matches!(
            err,
            FetchError::NotText { ref content_type, .. } if content_type == "image/png"
        ));
        server.join().unwrap();
    }

    #[test]
    fn test_static_source() {
        let source = StaticSource::new().with("intro", "# Intro\n");

        assert_eq!(source.fetch("intro").unwrap(), "# Intro\n");
        assert!(source.fetch("missing").unwrap_err().is_not_found());
        assert_eq!(source.location("intro"), "memory:intro");
    }
}
