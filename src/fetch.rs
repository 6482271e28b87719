use std::borrow::Cow;
use std::time::Duration;

use scraper::{Html, Node};
use thiserror::Error;

/// Errors from resolving a linked submission. The checker always
/// recovers from these by degrading to the raw link text.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure from the HTTP client.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failure from a fetcher that is not HTTP-backed.
    #[error("{0}")]
    Unavailable(String),
}

/// Resolves a URL to comparable plain text.
pub trait ContentFetcher: Send + Sync {
    fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

/// Blocking HTTP fetcher used by the plagiarism checker.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    max_chars: usize,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, max_chars: usize) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0")
            .build()?;
        Ok(Self { client, max_chars })
    }
}

impl ContentFetcher for HttpFetcher {
    /// Downloads `url` and reduces the body to plain text.
    ///
    /// Non-success responses are not treated as errors; whatever body the
    /// server returned is what gets compared.
    fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let url = rewrite_drive_url(url);
        let body = self.client.get(&*url).send()?.text()?;
        Ok(truncate_chars(&extract_text(&body), self.max_chars))
    }
}

/// True when a content field holds a link instead of inline text.
pub fn is_http_url(content: &str) -> bool {
    content.starts_with("http://") || content.starts_with("https://")
}

/// Google Drive share links point at an HTML viewer; rewrite them to the
/// direct-download endpoint so the fetched body is the document itself.
fn rewrite_drive_url(url: &str) -> Cow<'_, str> {
    if url.contains("drive.google.com") {
        if let Some(rest) = url.split("/file/d/").nth(1) {
            let file_id = rest.split('/').next().unwrap_or("");
            return Cow::Owned(format!(
                "https://drive.google.com/uc?export=download&id={}",
                file_id
            ));
        }
    }
    Cow::Borrowed(url)
}

/// Extracts readable text from an HTML body, skipping script and style
/// subtrees, and collapses whitespace runs to single spaces. Plain text
/// passes through unchanged apart from the whitespace collapse.
fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut pieces: Vec<&str> = Vec::new();

    for node in document.tree.nodes() {
        if let Node::Text(text) = node.value() {
            let in_markup = node.ancestors().any(|ancestor| match ancestor.value() {
                Node::Element(element) => {
                    element.name() == "script" || element.name() == "style"
                }
                _ => false,
            });
            if !in_markup {
                pieces.push(&text.text);
            }
        }
    }

    pieces
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("http://example.com/paper"));
        assert!(is_http_url("https://example.com/paper"));
        assert!(!is_http_url("ftp://example.com/paper"));
        assert!(!is_http_url("see https://example.com for details"));
        assert!(!is_http_url("plain project description"));
    }

    #[test]
    fn test_rewrite_drive_share_link() {
        let rewritten = rewrite_drive_url("https://drive.google.com/file/d/1AbC_x/view?usp=sharing");
        assert_eq!(
            rewritten,
            "https://drive.google.com/uc?export=download&id=1AbC_x"
        );
    }

    #[test]
    fn test_rewrite_leaves_other_urls_alone() {
        // the viewer pattern on a different host is not touched
        let other_host = "https://example.com/file/d/123/view";
        assert_eq!(rewrite_drive_url(other_host), other_host);

        // a drive link without the viewer pattern is not touched either
        let open_link = "https://drive.google.com/open?id=1AbC";
        assert_eq!(rewrite_drive_url(open_link), open_link);
    }

    #[test]
    fn test_extract_text_skips_script_and_style() {
        let html = "<html><head><style>body { color: red; }</style></head>\
                    <body><h1>Solar  Grid</h1><script>var x = 1;</script>\
                    <p>Monitoring   report</p></body></html>";
        assert_eq!(extract_text(html), "Solar Grid Monitoring report");
    }

    #[test]
    fn test_extract_text_passes_plain_text_through() {
        let text = extract_text("just a plain\n\nsubmission   body");
        assert_eq!(text, "just a plain submission body");
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("αβγδε", 3), "αβγ");
        assert_eq!(truncate_chars("short", 100), "short");
    }
}
