//! Query parameters, fetch options and filter criteria

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Default caller-facing page size
pub const DEFAULT_PER_PAGE: usize = 50;

/// Maximum caller-facing page size
pub const MAX_PER_PAGE: usize = 100;

/// Query parameters for the contributors endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContributorsQuery {
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<usize>,
    #[serde(default)]
    pub enhanced: Option<bool>,
    #[serde(default)]
    pub fetch_all: Option<bool>,
    #[serde(default)]
    pub max_pages: Option<u32>,
    #[serde(default)]
    pub force_complete: Option<bool>,
    #[serde(default)]
    pub min_contributions: Option<u64>,
    #[serde(default)]
    pub max_contributions: Option<u64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_order: Option<String>,
}

impl ContributorsQuery {
    /// Caller page, 1-based
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Caller page size, defaulted and capped
    pub fn per_page(&self) -> usize {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }
}

/// Options controlling one fetch session
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Augment base records with profile and activity statistics
    pub enhanced: bool,
    /// Drive pagination to exhaustion instead of a single page fetch
    pub fetch_all: bool,
    /// Page ceiling for the session; 0 means unlimited (up to the safety
    /// ceiling)
    pub max_pages: u32,
    /// Wait out quota exhaustion instead of returning a partial result
    pub force_complete: bool,
}

impl FetchOptions {
    pub fn from_query(query: &ContributorsQuery) -> Self {
        Self {
            enhanced: query.enhanced.unwrap_or(false),
            fetch_all: query.fetch_all.unwrap_or(false),
            max_pages: query.max_pages.unwrap_or(0),
            force_complete: query.force_complete.unwrap_or(false),
        }
    }
}

/// Sort key over the aggregated roster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Contributions,
    Name,
    RecentActivity,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contributions => write!(f, "contributions"),
            Self::Name => write!(f, "name"),
            Self::RecentActivity => write!(f, "recent_activity"),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contributions" => Ok(Self::Contributions),
            "name" => Ok(Self::Name),
            "recent_activity" => Ok(Self::RecentActivity),
            _ => Err(format!(
                "Invalid sort_by: {s}. Valid values are: contributions, name, recent_activity"
            )),
        }
    }
}

/// Sort direction; descending by default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(format!("Invalid sort_order: {s}. Valid values are: asc, desc")),
        }
    }
}

/// Caller-supplied filter and ordering criteria; every supplied predicate
/// must hold for a record to pass
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    /// Inclusive lower bound on contribution count
    pub min_contributions: Option<u64>,
    /// Inclusive upper bound on contribution count
    pub max_contributions: Option<u64>,
    /// Case-insensitive substring over the profile location
    pub location: Option<String>,
    /// Case-insensitive substring over the profile organization
    pub organization: Option<String>,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
}

impl FilterCriteria {
    /// Build criteria from query parameters; invalid sort values are a
    /// validation error surfaced before any fetch begins
    pub fn from_query(query: &ContributorsQuery) -> Result<Self, String> {
        let sort_key = match query.sort_by.as_deref() {
            Some(s) => s.parse()?,
            None => SortKey::default(),
        };
        let sort_direction = match query.sort_order.as_deref() {
            Some(s) => s.parse()?,
            None => SortDirection::default(),
        };

        Ok(Self {
            min_contributions: query.min_contributions,
            max_contributions: query.max_contributions,
            location: query.location.clone().filter(|s| !s.is_empty()),
            organization: query.company.clone().filter(|s| !s.is_empty()),
            sort_key,
            sort_direction,
        })
    }
}
