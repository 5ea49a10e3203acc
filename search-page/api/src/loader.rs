use actix_web::http::StatusCode;
use reqwest::Url;
use search_page_model::prelude::*;

use crate::backend::SearchBackend;
use crate::Error;

/// Where visitors without a search term are sent.
pub const ROOT: &str = "/";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Number of results per page
    pub limit: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { limit: DEFAULT_LIMIT }
    }
}

/// The parameters of a search page URL.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageParams {
    /// The search term
    pub q: Option<String>,
    /// The (zero based) page number, as text
    pub p: Option<String>,
}

impl PageParams {
    /// Extract the parameters from a raw query string. If a parameter repeats, the first one wins.
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "q" if params.q.is_none() => params.q = Some(value.into_owned()),
                "p" if params.p.is_none() => params.p = Some(value.into_owned()),
                _ => {}
            }
        }
        params
    }

    pub fn from_url(url: &Url) -> Self {
        Self::from_query(url.query().unwrap_or_default())
    }
}

/// The result of loading a search page.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadOutcome {
    /// Send the visitor somewhere else, nothing gets rendered
    Redirect { status: StatusCode, location: String },
    /// Render the page with this data
    Data { payload: PageData },
}

impl LoadOutcome {
    fn redirect_to_root() -> Self {
        Self::Redirect {
            status: StatusCode::MOVED_PERMANENTLY,
            location: ROOT.to_string(),
        }
    }
}

/// Loads the data of the search results page.
#[derive(Clone, Debug, Default)]
pub struct SearchPageLoader {
    config: LoaderConfig,
}

impl SearchPageLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn limit(&self) -> usize {
        self.config.limit
    }

    /// Build the request for `page` of the results for `query`.
    pub fn request(&self, query: String, page: Option<&str>) -> Result<SearchRequest, Error> {
        let page_num = parse_page(page)?;
        SearchRequest::for_page(query, self.config.limit, page_num)
            .ok_or_else(|| Error::InvalidPage(page.unwrap_or_default().to_string()))
    }

    /// Load the page for `params`, using `backend` for the single call to the search service.
    pub async fn load<B>(&self, params: PageParams, backend: &B) -> Result<LoadOutcome, Error>
    where
        B: SearchBackend + ?Sized,
    {
        let Some(query) = params.q else {
            log::debug!("No search term, redirecting to {ROOT}");
            return Ok(LoadOutcome::redirect_to_root());
        };

        let request = self.request(query, params.p.as_deref())?;
        log::info!(
            "Searching for {:?} (offset: {}, limit: {})",
            request.query,
            request.offset,
            request.limit
        );

        let data = backend.search(&request).await?;

        Ok(LoadOutcome::Data {
            payload: PageData::from(data),
        })
    }

    pub async fn load_url<B>(&self, url: &Url, backend: &B) -> Result<LoadOutcome, Error>
    where
        B: SearchBackend + ?Sized,
    {
        self.load(PageParams::from_url(url), backend).await
    }
}

/// A missing or blank page is the first page, anything else must be a non-negative integer.
fn parse_page(page: Option<&str>) -> Result<usize, Error> {
    match page.map(str::trim) {
        None | Some("") => Ok(0),
        Some(value) => value
            .parse::<usize>()
            .map_err(|_| Error::InvalidPage(page.unwrap_or_default().to_string())),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::backend::mock::RecordingBackend;
    use serde_json::json;

    fn params(q: Option<&str>, p: Option<&str>) -> PageParams {
        PageParams {
            q: q.map(ToString::to_string),
            p: p.map(ToString::to_string),
        }
    }

    #[tokio::test]
    async fn missing_query_redirects() -> anyhow::Result<()> {
        let backend = RecordingBackend::new(json!({}));
        let outcome = SearchPageLoader::default()
            .load(params(None, Some("3")), &backend)
            .await?;

        assert_eq!(
            outcome,
            LoadOutcome::Redirect {
                status: StatusCode::MOVED_PERMANENTLY,
                location: "/".into(),
            }
        );
        assert!(backend.requests().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn missing_page_is_first_page() -> anyhow::Result<()> {
        let backend = RecordingBackend::new(json!({}));
        SearchPageLoader::default()
            .load(params(Some("rust async"), None), &backend)
            .await?;

        assert_eq!(
            backend.requests(),
            vec![r#"{"query":"rust async","limit":10,"offset":0}"#.to_string()]
        );
        Ok(())
    }

    #[tokio::test]
    async fn page_offsets() -> anyhow::Result<()> {
        let loader = SearchPageLoader::default();

        let backend = RecordingBackend::new(json!({}));
        loader.load(params(Some("foo"), Some("3")), &backend).await?;
        loader.load(params(Some("foo"), Some("0")), &backend).await?;

        assert_eq!(
            backend.requests(),
            vec![
                r#"{"query":"foo","limit":10,"offset":30}"#.to_string(),
                r#"{"query":"foo","limit":10,"offset":0}"#.to_string(),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn no_caching() -> anyhow::Result<()> {
        let loader = SearchPageLoader::default();
        let backend = RecordingBackend::new(json!({}));

        loader.load(params(Some("foo"), Some("2")), &backend).await?;
        loader.load(params(Some("foo"), Some("2")), &backend).await?;

        let requests = backend.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], requests[1]);
        Ok(())
    }

    #[tokio::test]
    async fn wraps_response() -> anyhow::Result<()> {
        let backend = RecordingBackend::new(json!({"results": [1, 2, 3]}));
        let outcome = SearchPageLoader::default()
            .load(params(Some("foo"), None), &backend)
            .await?;

        let payload = match outcome {
            LoadOutcome::Data { payload } => payload,
            other => panic!("expected data, got: {other:?}"),
        };
        assert_eq!(serde_json::to_value(payload)?, json!({"data": {"results": [1, 2, 3]}}));
        Ok(())
    }

    #[tokio::test]
    async fn backend_failure_propagates() {
        let backend = RecordingBackend::failing();
        let result = SearchPageLoader::default()
            .load(params(Some("foo"), None), &backend)
            .await;

        assert!(matches!(result, Err(Error::Serde(_))), "{result:?}");
        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test]
    async fn custom_page_size() -> anyhow::Result<()> {
        let backend = RecordingBackend::new(json!({}));
        SearchPageLoader::new(LoaderConfig { limit: 25 })
            .load(params(Some("foo"), Some("2")), &backend)
            .await?;

        assert_eq!(
            backend.requests(),
            vec![r#"{"query":"foo","limit":25,"offset":50}"#.to_string()]
        );
        Ok(())
    }

    #[tokio::test]
    async fn invalid_pages_are_rejected() {
        let loader = SearchPageLoader::default();
        let backend = RecordingBackend::new(json!({}));

        for page in ["abc", "-1", "1.5", "18446744073709551616", "1e3"] {
            let result = loader.load(params(Some("foo"), Some(page)), &backend).await;
            assert!(matches!(result, Err(Error::InvalidPage(_))), "{page}: {result:?}");
        }

        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn offset_overflow_is_rejected() {
        let backend = RecordingBackend::new(json!({}));
        let page = usize::MAX.to_string();
        let result = SearchPageLoader::default()
            .load(params(Some("foo"), Some(&page)), &backend)
            .await;

        assert!(matches!(result, Err(Error::InvalidPage(_))), "{result:?}");
        assert!(backend.requests().is_empty());
    }

    #[test]
    fn blank_page_is_first_page() {
        assert_eq!(parse_page(Some("")).ok(), Some(0));
        assert_eq!(parse_page(Some(" 4 ")).ok(), Some(4));
    }

    #[test]
    fn params_from_query() {
        assert_eq!(
            PageParams::from_query("q=hello+world&p=2"),
            params(Some("hello world"), Some("2"))
        );
        assert_eq!(PageParams::from_query("p=2"), params(None, Some("2")));
        assert_eq!(PageParams::from_query(""), params(None, None));
        // an empty search term is still a search term
        assert_eq!(PageParams::from_query("q="), params(Some(""), None));
        assert_eq!(PageParams::from_query("q=first&q=second"), params(Some("first"), None));
    }

    #[tokio::test]
    async fn load_from_url() -> anyhow::Result<()> {
        let backend = RecordingBackend::new(json!([]));
        let url = Url::parse("http://localhost:3000/search?q=caf%C3%A9&p=1")?;
        SearchPageLoader::default().load_url(&url, &backend).await?;

        assert_eq!(
            backend.requests(),
            vec![r#"{"query":"café","limit":10,"offset":10}"#.to_string()]
        );
        Ok(())
    }
}
