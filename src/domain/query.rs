//! List query state derived from URL parameters.
//!
//! [`QueryState`] is never stored: it is recomputed from the
//! [`QueryParamStore`] on every read, with defaults and validation taken from
//! the entity's [`ViewSchema`].

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::params::QueryParamStore;

pub const PAGE_KEY: &str = "page";
pub const LIMIT_KEY: &str = "limit";
pub const SORT_KEY: &str = "sort";
pub const DIR_KEY: &str = "dir";
pub const SEARCH_KEY: &str = "search";

/// Select-filter sentinel meaning "no filter applied".
pub const ALL: &str = "all";

pub const FROM_SUFFIX: &str = "_from";
pub const TO_SUFFIX: &str = "_to";

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }

    /// Parses `asc`/`desc` case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortDir::Asc),
            "desc" => Some(SortDir::Desc),
            _ => None,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}

impl Display for SortDir {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive date interval read from `<key>_from` / `<key>_to`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterKind {
    /// Enumerated options; `default` is usually [`ALL`].
    Select {
        options: Vec<FilterOption>,
        default: String,
    },
    DateRange,
    /// Free-form value rendered by the named template partial.
    Custom { renderer: String },
}

/// One filterable dimension of a list. The key doubles as the URL parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilterConfig {
    pub key: String,
    pub label: String,
    pub kind: FilterKind,
}

impl FilterConfig {
    /// Select filter with a leading "all" option used as the default.
    pub fn select(key: &str, label: &str, options: &[(&str, &str)]) -> Self {
        let options = std::iter::once(FilterOption {
            label: "Все".to_string(),
            value: ALL.to_string(),
        })
        .chain(options.iter().map(|(label, value)| FilterOption {
            label: label.to_string(),
            value: value.to_string(),
        }))
        .collect();

        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind: FilterKind::Select {
                options,
                default: ALL.to_string(),
            },
        }
    }

    pub fn date_range(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind: FilterKind::DateRange,
        }
    }

    pub fn custom(key: &str, label: &str, renderer: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind: FilterKind::Custom {
                renderer: renderer.to_string(),
            },
        }
    }

    pub fn from_key(&self) -> String {
        format!("{}{FROM_SUFFIX}", self.key)
    }

    pub fn to_key(&self) -> String {
        format!("{}{TO_SUFFIX}", self.key)
    }

    /// Whether `value` is one of the enumerated options. Non-select filters accept anything.
    pub fn accepts(&self, value: &str) -> bool {
        match &self.kind {
            FilterKind::Select { options, .. } => options.iter().any(|o| o.value == value),
            FilterKind::DateRange | FilterKind::Custom { .. } => true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SortOption {
    pub label: String,
    pub value: String,
}

/// Sortable fields of a list plus the field used when the URL names none.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SortConfig {
    pub fields: Vec<SortOption>,
    pub default_field: Option<String>,
    pub default_dir: SortDir,
}

impl SortConfig {
    pub fn new(default_field: &str, default_dir: SortDir, fields: &[(&str, &str)]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(label, value)| SortOption {
                    label: label.to_string(),
                    value: value.to_string(),
                })
                .collect(),
            default_field: Some(default_field.to_string()),
            default_dir,
        }
    }

    /// Returns `requested` when it is a known field, the default otherwise.
    pub fn resolve(&self, requested: Option<&str>) -> Option<String> {
        requested
            .map(str::trim)
            .filter(|value| self.fields.iter().any(|f| f.value == *value))
            .map(str::to_string)
            .or_else(|| self.default_field.clone())
    }
}

/// Static per-entity description of how URL parameters are interpreted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ViewSchema {
    pub default_page: usize,
    pub default_limit: usize,
    pub filters: Vec<FilterConfig>,
    pub sort: SortConfig,
}

impl Default for ViewSchema {
    fn default() -> Self {
        Self {
            default_page: DEFAULT_PAGE,
            default_limit: DEFAULT_LIMIT,
            filters: Vec::new(),
            sort: SortConfig::default(),
        }
    }
}

impl ViewSchema {
    pub fn new(filters: Vec<FilterConfig>, sort: SortConfig) -> Self {
        Self {
            filters,
            sort,
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit.max(1);
        self
    }

    pub fn filter(&self, key: &str) -> Option<&FilterConfig> {
        self.filters.iter().find(|f| f.key == key)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QueryState {
    pub page: usize,
    pub limit: usize,
    pub sort_field: Option<String>,
    pub sort_dir: SortDir,
    pub search: Option<String>,
    pub filters: BTreeMap<String, String>,
    pub date_ranges: BTreeMap<String, DateRange>,
}

impl QueryState {
    /// Recomputes the state from the store.
    ///
    /// Invalid or missing `page`/`limit` fall back to the schema defaults;
    /// select filters with unknown values fall back to their default.
    pub fn read(store: &QueryParamStore, schema: &ViewSchema) -> Self {
        let page = positive(store.get(PAGE_KEY)).unwrap_or(schema.default_page.max(1));
        let limit = positive(store.get(LIMIT_KEY)).unwrap_or(schema.default_limit.max(1));

        let sort_field = schema.sort.resolve(store.get(SORT_KEY).as_deref());
        let sort_dir = store
            .get(DIR_KEY)
            .and_then(|dir| SortDir::parse(&dir))
            .unwrap_or(schema.sort.default_dir);

        let search = non_empty(store.get(SEARCH_KEY));

        let mut filters = BTreeMap::new();
        let mut date_ranges = BTreeMap::new();
        for filter in &schema.filters {
            match &filter.kind {
                FilterKind::Select { default, .. } => {
                    let value = non_empty(store.get(&filter.key))
                        .filter(|value| filter.accepts(value))
                        .unwrap_or_else(|| default.clone());
                    filters.insert(filter.key.clone(), value);
                }
                FilterKind::Custom { .. } => {
                    if let Some(value) = non_empty(store.get(&filter.key)) {
                        filters.insert(filter.key.clone(), value);
                    }
                }
                FilterKind::DateRange => {
                    let range = DateRange {
                        from: date(store.get(&filter.from_key())),
                        to: date(store.get(&filter.to_key())),
                    };
                    if !range.is_empty() {
                        date_ranges.insert(filter.key.clone(), range);
                    }
                }
            }
        }

        Self {
            page,
            limit,
            sort_field,
            sort_dir,
            search,
            filters,
            date_ranges,
        }
    }

    /// Filter value, with the "all" sentinel reported as `None`.
    pub fn active_filter(&self, key: &str) -> Option<&str> {
        self.filters
            .get(key)
            .map(String::as_str)
            .filter(|value| *value != ALL)
    }

    /// Keys of filters that narrow the result set, date ranges included.
    pub fn active_filter_keys(&self) -> Vec<&str> {
        self.filters
            .iter()
            .filter(|(_, value)| value.as_str() != ALL)
            .map(|(key, _)| key.as_str())
            .chain(self.date_ranges.keys().map(String::as_str))
            .collect()
    }

    pub fn total_pages(&self, total_count: usize) -> usize {
        total_count.div_ceil(self.limit)
    }
}

fn positive(value: Option<String>) -> Option<usize> {
    value
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn date(value: Option<String>) -> Option<NaiveDate> {
    non_empty(value).and_then(|value| value.parse::<NaiveDate>().ok())
}
