//! Uniform JSON envelopes wrapped around every response body.

use serde::Serialize;
use utoipa::ToSchema;

use crate::db::Pagination;
use crate::db::validation::Violation;

/// Success envelope carrying a single payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "Todo retrieved successfully")]
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

/// Success envelope without a payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "Todo deleted successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Failure envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = false)]
    pub success: bool,
    #[schema(example = "Todo not found")]
    pub message: String,
    #[schema(example = "Not Found")]
    pub error: String,
    /// Field violations, present only for validation failures
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Violation>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: error.into(),
            errors: Vec::new(),
        }
    }

    pub fn with_violations(mut self, violations: Vec<Violation>) -> Self {
        self.errors = violations;
        self
    }
}

/// Pagination metadata echoed back in the form the caller used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageMeta {
    /// Number of records matching the filter
    #[schema(example = 42)]
    pub total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 10)]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 0)]
    pub offset: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[schema(example = 5)]
    pub total_pages: u64,
}

impl PageMeta {
    pub fn new(pagination: &Pagination, total: u64) -> Self {
        let total_pages = pagination.total_pages(total);
        match *pagination {
            Pagination::Page { page, per_page } => Self {
                total,
                limit: None,
                offset: None,
                page: Some(page),
                per_page: Some(per_page),
                total_pages,
            },
            Pagination::Offset { limit, offset } => Self {
                total,
                limit: Some(limit),
                offset: Some(offset),
                page: None,
                per_page: None,
                total_pages,
            },
        }
    }
}

/// Success envelope for list endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "Todos retrieved successfully")]
    pub message: String,
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn ok(data: Vec<T>, meta: PageMeta, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            meta,
        }
    }
}
