//! Paging and sorting shared by every listing endpoint

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{book::Book, library::Library};
use crate::{
    config::PaginationConfig,
    error::{AppError, AppResult},
};

/// Raw `page`, `size` and `sort` query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page index (0-based)
    pub page: Option<i64>,
    /// Page size
    pub size: Option<i64>,
    /// Sort criteria, `property[,property...][,asc|desc]`; repeatable
    #[serde(default)]
    pub sort: Vec<String>,
}

/// Column a listing may be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
}

impl SortField {
    fn parse(property: &str) -> Option<Self> {
        match property.trim() {
            "id" => Some(SortField::Id),
            "nome" => Some(SortField::Name),
            _ => None,
        }
    }

    /// Column name in both catalog tables
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "nome",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Direction::Asc),
            "desc" => Some(Direction::Desc),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: Direction,
}

/// Resolved (offset, limit, sort) request, identical for every entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
    pub sort: Vec<SortOrder>,
}

impl PageRequest {
    pub fn new(page: i64, size: i64) -> Self {
        Self {
            page,
            size,
            sort: Vec::new(),
        }
    }

    pub fn with_sort(mut self, field: SortField, direction: Direction) -> Self {
        self.sort.push(SortOrder { field, direction });
        self
    }

    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    /// `ORDER BY` body built from whitelisted columns, always ending on `id`
    pub fn order_by_clause(&self) -> String {
        let mut parts: Vec<String> = self
            .sort
            .iter()
            .map(|s| format!("{} {}", s.field.column(), s.direction.as_sql()))
            .collect();
        if !self.sort.iter().any(|s| s.field == SortField::Id) {
            parts.push("id ASC".to_string());
        }
        parts.join(", ")
    }
}

impl PageParams {
    /// Apply defaults and bounds, and parse the sort expressions
    pub fn resolve(&self, config: &PaginationConfig) -> AppResult<PageRequest> {
        let max_size = config.max_size.max(1);
        let size = match self.size {
            Some(size) if size >= 1 => size.min(max_size),
            _ => config.default_size.clamp(1, max_size),
        };
        // Keeps `page * size` inside i64; such pages are empty anyway
        let page = self.page.unwrap_or(0).clamp(0, i64::MAX / size);

        let mut sort = Vec::new();
        for expr in &self.sort {
            let mut tokens: Vec<&str> = expr.split(',').filter(|t| !t.trim().is_empty()).collect();
            let direction = match tokens.last().and_then(|t| Direction::parse(t)) {
                Some(direction) => {
                    tokens.pop();
                    direction
                }
                None => Direction::Asc,
            };
            for token in tokens {
                let field = SortField::parse(token).ok_or_else(|| {
                    AppError::BadRequest(format!("Unknown sort property: {}", token.trim()))
                })?;
                sort.push(SortOrder { field, direction });
            }
        }

        Ok(PageRequest { page, size, sort })
    }
}

/// A bounded slice of a result set plus paging metadata
#[derive(Debug, Serialize, ToSchema)]
#[aliases(LibraryPage = Page<Library>, BookPage = Page<Book>)]
#[serde(rename_all = "camelCase")]
pub struct Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub content: Vec<T>,
    /// Number of rows across all pages
    pub total_elements: i64,
    pub total_pages: i64,
    /// Page index (0-based)
    pub number: i64,
    /// Requested page size
    pub size: i64,
    pub number_of_elements: i64,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(content: Vec<T>, total_elements: i64, request: &PageRequest) -> Self {
        let total_pages = if request.size > 0 {
            (total_elements + request.size - 1) / request.size
        } else {
            0
        };
        let number_of_elements = content.len() as i64;
        Self {
            empty: content.is_empty(),
            content,
            total_elements,
            total_pages,
            number: request.page,
            size: request.size,
            number_of_elements,
            first: request.page == 0,
            last: request.page.saturating_add(1) >= total_pages,
        }
    }

    /// Whether a following page holds more rows
    pub fn has_next(&self) -> bool {
        !self.last
    }
}
