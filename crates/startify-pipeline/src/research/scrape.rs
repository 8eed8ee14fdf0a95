use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;

use crate::error::PipelineError;

const MAX_SOURCES_PER_QUERY: usize = 3;
const MAX_PARAGRAPHS: usize = 5;
const MAX_TEXT_CHARS: usize = 1000;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title regex"));
static PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<p\b[^>]*>(.*?)</p>").expect("valid paragraph regex"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<[^>]+>").expect("valid tags regex"));

/// Title and leading text of one reference document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedPage {
    pub url: String,
    pub title: String,
    pub text: String,
}

/// Placeholder retrieval step: every query resolves to the same fixed set of
/// reference documents. A search provider would slot in here.
pub struct ReferenceFetcher {
    client: Client,
    sources: Vec<String>,
}

impl ReferenceFetcher {
    /// # Errors
    ///
    /// Returns [`PipelineError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        sources: Vec<String>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, sources })
    }

    /// Fetch up to three sources for `query`. Failed and non-2xx sources are
    /// skipped; the rest keep their configured order.
    pub async fn fetch(&self, query: &str) -> Vec<ScrapedPage> {
        let fetches = self
            .sources
            .iter()
            .take(MAX_SOURCES_PER_QUERY)
            .map(|url| self.fetch_one(url));
        let pages: Vec<ScrapedPage> = futures::future::join_all(fetches)
            .await
            .into_iter()
            .flatten()
            .collect();
        tracing::debug!(query, pages = pages.len(), "reference pages fetched");
        pages
    }

    async fn fetch_one(&self, url: &str) -> Option<ScrapedPage> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url, error = %e, "reference fetch failed");
                return None;
            }
        };
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "reference fetch returned non-success");
            return None;
        }
        match response.text().await {
            Ok(html) => Some(parse_page(url, &html)),
            Err(e) => {
                tracing::warn!(url, error = %e, "reference body unreadable");
                None
            }
        }
    }
}

pub(crate) fn parse_page(url: &str, html: &str) -> ScrapedPage {
    let title = TITLE_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| clean_text(m.as_str()))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "No title".to_string());

    let text = PARAGRAPH_RE
        .captures_iter(html)
        .take(MAX_PARAGRAPHS)
        .filter_map(|c| c.get(1).map(|m| clean_text(m.as_str())))
        .collect::<Vec<_>>()
        .join(" ");

    ScrapedPage {
        url: url.to_string(),
        title,
        text: truncate_chars(&text, MAX_TEXT_CHARS),
    }
}

fn clean_text(input: &str) -> String {
    let no_tags = TAG_RE.replace_all(input, " ");
    no_tags.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn truncate_chars(input: &str, max: usize) -> String {
    input.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn parse_page_takes_title_and_first_five_paragraphs() {
        let html = "<html><head><title> Mobile  app </title></head><body>\
            <p>One <b>bold</b></p><p>Two</p><p>Three</p><p>Four</p><p>Five</p><p>Six</p>\
            </body></html>";
        let page = parse_page("https://x.test/a", html);
        assert_eq!(page.title, "Mobile app");
        assert_eq!(page.text, "One bold Two Three Four Five");
    }

    #[test]
    fn parse_page_without_title() {
        let page = parse_page("https://x.test/a", "<p>body</p>");
        assert_eq!(page.title, "No title");
        assert_eq!(page.text, "body");
    }

    #[test]
    fn parse_page_ignores_pre_and_param_tags() {
        let page = parse_page("u", "<pre>code</pre><param name=x><p>real</p>");
        assert_eq!(page.text, "real");
    }

    #[test]
    fn text_is_truncated_to_limit() {
        let long = format!("<p>{}</p>", "é".repeat(1500));
        let page = parse_page("u", &long);
        assert_eq!(page.text.chars().count(), MAX_TEXT_CHARS);
    }

    #[tokio::test]
    async fn fetch_skips_failures_and_keeps_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<title>A</title><p>alpha</p>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/b"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/c"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<title>C</title><p>gamma</p>"))
            .mount(&server)
            .await;

        let sources = ["a", "b", "c", "d"]
            .iter()
            .map(|p| format!("{}/{p}", server.uri()))
            .collect();
        let fetcher = ReferenceFetcher::new(sources, 5, "test-agent").unwrap();
        let pages = fetcher.fetch("grocery app competitors").await;

        let titles: Vec<_> = pages.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C"]);
        // Only the first three sources are consulted.
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 3);
    }
}
