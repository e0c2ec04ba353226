//! Pagination and ordering of user listings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_ROW_BOUND, SORTABLE_COLUMNS};
use crate::error::{DomainError, DomainResult};
use crate::user::UserRecord;

/// A resolved page request (both values are always at least 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    /// Parse raw query values, falling back to the defaults for any value
    /// that is empty, not an integer, or not positive.
    pub fn parse(page: &str, page_size: &str) -> Self {
        Self {
            page: parse_positive(page).unwrap_or(DEFAULT_PAGE_NUMBER),
            page_size: parse_positive(page_size).unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    /// Rows to skip before the page starts, capped at [`MAX_ROW_BOUND`]
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.page_size)
            .min(MAX_ROW_BOUND)
    }

    /// Rows in one page, capped at [`MAX_ROW_BOUND`]
    pub fn limit(&self) -> u64 {
        self.page_size.min(MAX_ROW_BOUND)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn parse_positive(raw: &str) -> Option<u64> {
    raw.parse::<i64>()
        .ok()
        .filter(|value| *value > 0)
        .map(|value| value as u64)
}

/// Column a user listing is ordered by.
///
/// A closed set: caller text is matched against it and never reaches a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    Id,
    Name,
    Surname,
    Patronymic,
    Age,
    Gender,
    Nationality,
}

impl SortColumn {
    /// Resolve an optional caller-supplied column name.
    ///
    /// `None` and the empty string select the default ordering.
    pub fn resolve(raw: Option<&str>) -> DomainResult<Self> {
        match raw {
            None | Some("") => Ok(Self::default()),
            Some(column) => column.parse(),
        }
    }

    /// Persisted column name
    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Id => "id",
            SortColumn::Name => "name",
            SortColumn::Surname => "surname",
            SortColumn::Patronymic => "patronymic",
            SortColumn::Age => "age",
            SortColumn::Gender => "gender",
            SortColumn::Nationality => "nationality",
        }
    }
}

impl FromStr for SortColumn {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortColumn::Id),
            "name" => Ok(SortColumn::Name),
            "surname" => Ok(SortColumn::Surname),
            "patronymic" => Ok(SortColumn::Patronymic),
            "age" => Ok(SortColumn::Age),
            "gender" => Ok(SortColumn::Gender),
            "nationality" => Ok(SortColumn::Nationality),
            other => Err(DomainError::validation(format!(
                "Cannot sort by '{}'. Must be one of: {}",
                other,
                SORTABLE_COLUMNS.join(", ")
            ))),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One page of users as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PaginatedUsers {
    pub users: Vec<UserRecord>,
    pub page: u64,
    #[serde(rename = "pageSize")]
    pub page_size: u64,
}

impl PaginatedUsers {
    /// Wrap the records fetched for `request`.
    pub fn new(users: Vec<UserRecord>, request: PageRequest) -> Self {
        Self {
            users,
            page: request.page,
            page_size: request.page_size,
        }
    }
}
