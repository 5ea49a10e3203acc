/// Default number of results per page.
pub const DEFAULT_LIMIT: usize = 10;

/// The request sent to the search service.
///
/// The field order is part of the wire format: `{"query":..,"limit":..,"offset":..}`.
#[derive(utoipa::ToSchema, serde::Deserialize, serde::Serialize, Debug, PartialEq, Eq, Clone)]
pub struct SearchRequest {
    /// Free-text search term
    pub query: String,
    /// Maximum number of results to return
    pub limit: usize,
    /// Number of results to skip
    pub offset: usize,
}

impl SearchRequest {
    /// Create a request for the (zero based) page `page`, using `limit` results per page.
    ///
    /// Returns `None` if the offset cannot be represented.
    pub fn for_page(query: impl Into<String>, limit: usize, page: usize) -> Option<Self> {
        let offset = limit.checked_mul(page)?;
        Some(Self {
            query: query.into(),
            limit,
            offset,
        })
    }
}
