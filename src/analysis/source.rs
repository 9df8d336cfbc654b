//! Food data source
//!
//! Fetches search and detail pages. Non-2xx responses are fatal and are not
//! retried here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Url;

use super::error::{AnalysisError, AnalysisResult};

/// Default data source host
pub const DEFAULT_SOURCE_URL: &str = "https://www.fatsecret.com.br";

const SEARCH_PATH: &str = "/calorias-nutrição/search";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Where search and detail pages come from
#[async_trait]
pub trait FoodSource: Send + Sync {
    /// Host that relative links on fetched pages resolve against
    fn base_url(&self) -> &str;

    /// HTML of the search results page for `query`
    async fn search(&self, query: &str) -> AnalysisResult<String>;

    /// HTML of a food detail page
    async fn fetch_page(&self, url: &str) -> AnalysisResult<String>;
}

/// Scrapes the live website
pub struct HttpFoodSource {
    base_url: String,
    http: reqwest::Client,
}

impl HttpFoodSource {
    /// Client for `base_url` with pt-BR headers and a request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AnalysisResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("pt-BR,pt;q=0.9,en;q=0.5"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
        );

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Search endpoint with `query` trimmed and encoded
    pub fn search_url(&self, query: &str) -> AnalysisResult<Url> {
        let endpoint = format!("{}{}", self.base_url, SEARCH_PATH);
        Url::parse_with_params(&endpoint, &[("q", query.trim())])
            .map_err(|e| AnalysisError::InvalidUrl(format!("{}: {}", endpoint, e)))
    }

    async fn get(&self, url: Url) -> AnalysisResult<String> {
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        tracing::debug!(url = %url, status = status.as_u16(), "Fetched page");

        if !status.is_success() {
            return Err(AnalysisError::Fetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl FoodSource for HttpFoodSource {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn search(&self, query: &str) -> AnalysisResult<String> {
        let url = self.search_url(query)?;
        self.get(url).await
    }

    async fn fetch_page(&self, url: &str) -> AnalysisResult<String> {
        let url = Url::parse(url).map_err(|e| AnalysisError::InvalidUrl(format!("{}: {}", url, e)))?;
        self.get(url).await
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header_regex, method, path_regex, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn test_search_url_encodes_query() {
        let source = HttpFoodSource::new("https://www.fatsecret.com.br/", Duration::from_secs(5)).unwrap();
        let url = source.search_url(" carne moída ").unwrap();
        assert_eq!(url.host_str(), Some("www.fatsecret.com.br"));
        assert_eq!(
            url.query_pairs().find(|(k, _)| k == "q").map(|(_, v)| v.into_owned()),
            Some("carne moída".to_string())
        );
        assert_eq!(source.base_url(), "https://www.fatsecret.com.br");
    }

    #[tokio::test]
    async fn test_invalid_detail_url() {
        let source = HttpFoodSource::new(DEFAULT_SOURCE_URL, Duration::from_secs(5)).unwrap();
        let err = source.fetch_page("not a url").await.unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_search_sends_browser_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"/search$"))
            .and(query_param("q", "arroz"))
            .and(header_regex("accept-language", r"^pt-BR"))
            .and(header_regex("user-agent", r"^Mozilla/5\.0 "))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>resultados</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let source = HttpFoodSource::new(server.uri(), Duration::from_secs(5)).unwrap();
        let html = source.search("arroz").await.unwrap();
        assert_eq!(html, "<html>resultados</html>");
    }

    #[tokio::test]
    async fn test_non_success_status_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"/search$"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"/carne-moida$"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let source = HttpFoodSource::new(server.uri(), Duration::from_secs(5)).unwrap();

        let err = source.search("arroz").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Fetch { status: 503, .. }));

        let detail = format!("{}/calorias-nutricao/generico/carne-moida", server.uri());
        let err = source.fetch_page(&detail).await.unwrap_err();
        match err {
            AnalysisError::Fetch { url, status } => {
                assert_eq!(status, 404);
                assert!(url.ends_with("/carne-moida"));
            }
            other => panic!("expected Fetch, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_detail_page_body_returned() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"/carne-moida$"))
            .and(header_regex("accept-language", r"^pt-BR"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Carne Moída</h1>"))
            .mount(&server)
            .await;

        let source = HttpFoodSource::new(server.uri(), Duration::from_secs(5)).unwrap();
        let detail = format!("{}/calorias-nutricao/generico/carne-moida", server.uri());
        assert_eq!(source.fetch_page(&detail).await.unwrap(), "<h1>Carne Moída</h1>");
    }
}
