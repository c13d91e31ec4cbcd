//! Response envelope shared by all endpoints

use serde::Serialize;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<FetchMeta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            pagination: None,
            meta: None,
        }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn with_meta(mut self, meta: FetchMeta) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// Caller-facing window metadata; `total_count` is the size of the filtered
/// collection, not the raw fetch count
#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: usize,
    pub total_count: usize,
    pub has_next: bool,
}

/// Session metadata describing how much was actually fetched and whether
/// limits were hit
#[derive(Debug, Clone, Default, Serialize)]
pub struct FetchMeta {
    pub total_fetched: usize,
    pub rate_limit_hit: bool,
    pub pages_fetched: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
