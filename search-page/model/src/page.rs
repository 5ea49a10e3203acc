use serde_json::Value;

/// Data handed to the page renderer.
#[derive(utoipa::ToSchema, serde::Deserialize, serde::Serialize, Debug, PartialEq, Clone)]
pub struct PageData {
    /// The response of the search service, forwarded as is
    #[schema(value_type = Object)]
    pub data: Value,
}

impl From<Value> for PageData {
    fn from(data: Value) -> Self {
        Self { data }
    }
}
