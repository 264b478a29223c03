//! REST backend collaborator.
//!
//! Row providers and mutation services talk to the backend only through the
//! [`ApiClient`] trait so that tests can substitute a scripted client.

use std::future::Future;

use serde_json::Value;

use crate::domain::query::{ALL, FilterKind, QueryState, ViewSchema};
use crate::domain::query::{
    DIR_KEY, FROM_SUFFIX, LIMIT_KEY, PAGE_KEY, SEARCH_KEY, SORT_KEY, TO_SUFFIX,
};

pub mod envelope;
pub mod errors;
pub mod http;

pub use errors::{ApiError, ApiResult};

/// GET request against a paginated list endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListRequest {
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl ListRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
        }
    }

    /// Builds the conventional list parameters from the query state.
    ///
    /// Select filters set to the "all" sentinel are omitted and date ranges
    /// are split into `<key>_from` / `<key>_to`.
    pub fn from_query(path: impl Into<String>, query: &QueryState, schema: &ViewSchema) -> Self {
        let mut request = Self::new(path)
            .param(PAGE_KEY, query.page)
            .param(LIMIT_KEY, query.limit);

        if let Some(field) = &query.sort_field {
            request = request.param(SORT_KEY, field).param(DIR_KEY, query.sort_dir);
        }
        if let Some(search) = &query.search {
            request = request.param(SEARCH_KEY, search);
        }

        for filter in &schema.filters {
            match filter.kind {
                FilterKind::Select { .. } | FilterKind::Custom { .. } => {
                    if let Some(value) = query.filters.get(&filter.key)
                        && value != ALL
                    {
                        request = request.param(&filter.key, value);
                    }
                }
                FilterKind::DateRange => {
                    if let Some(range) = query.date_ranges.get(&filter.key) {
                        if let Some(from) = range.from {
                            request = request.param(format!("{}{FROM_SUFFIX}", filter.key), from);
                        }
                        if let Some(to) = range.to {
                            request = request.param(format!("{}{TO_SUFFIX}", filter.key), to);
                        }
                    }
                }
            }
        }

        request
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Renames a parameter for backends with different naming.
    pub fn rename(mut self, from: &str, to: &str) -> Self {
        for (key, _) in self.params.iter_mut().filter(|(key, _)| key == from) {
            *key = to.to_string();
        }
        self
    }

    pub fn without(mut self, key: &str) -> Self {
        self.params.retain(|(k, _)| k != key);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Post,
    Put,
    Patch,
    Delete,
}

/// Write request against a mutation endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct Mutation {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl Mutation {
    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Patch,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: None,
        }
    }
}

pub trait ApiClient: Send + Sync {
    /// Fetches a list endpoint and returns the raw JSON body.
    fn get_json(&self, request: &ListRequest) -> impl Future<Output = ApiResult<Value>> + Send;

    /// Sends a mutation; the response body is `Value::Null` when empty.
    fn send_json(&self, mutation: &Mutation) -> impl Future<Output = ApiResult<Value>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::{FilterConfig, SortConfig, SortDir};
    use crate::params::QueryParamStore;

    fn schema() -> ViewSchema {
        ViewSchema::new(
            vec![
                FilterConfig::select("status", "Статус", &[("Активные", "active")]),
                FilterConfig::date_range("scheduled", "Дата"),
                FilterConfig::custom("agentId", "Агент", "agent_picker"),
            ],
            SortConfig::new("scheduled_at", SortDir::Desc, &[("Дата", "scheduled_at")]),
        )
    }

    #[test]
    fn all_sentinel_is_not_sent() {
        let store = QueryParamStore::new("status=all");
        let query = QueryState::read(&store, &schema());

        let request = ListRequest::from_query("/appointments", &query, &schema());

        assert_eq!(request.get("status"), None);
        assert_eq!(request.get("page"), Some("1"));
        assert_eq!(request.get("limit"), Some("10"));
        assert_eq!(request.get("sort"), Some("scheduled_at"));
        assert_eq!(request.get("dir"), Some("desc"));
    }

    #[test]
    fn date_ranges_are_split_and_custom_filters_pass_through() {
        let store = QueryParamStore::new(
            "scheduled_from=2024-05-01&scheduled_to=2024-05-31&agentId=17&status=active&search=ivanov",
        );
        let query = QueryState::read(&store, &schema());

        let request =
            ListRequest::from_query("/appointments", &query, &schema()).rename("agentId", "agent_id");

        assert_eq!(request.get("scheduled_from"), Some("2024-05-01"));
        assert_eq!(request.get("scheduled_to"), Some("2024-05-31"));
        assert_eq!(request.get("scheduled"), None);
        assert_eq!(request.get("agent_id"), Some("17"));
        assert_eq!(request.get("agentId"), None);
        assert_eq!(request.get("status"), Some("active"));
        assert_eq!(request.get("search"), Some("ivanov"));
    }
}
