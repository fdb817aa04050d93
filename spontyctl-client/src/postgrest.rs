//! Typed request plumbing for the hosted PostgREST endpoint.
//!
//! Five verbs cover everything the API layer needs: list select,
//! single-object select, insert, insert-returning and update, plus RPC
//! for server-side functions. Filters are encoded as query string
//! operators (`id=eq.<uuid>`, `id=in.(a,b,c)`); a single-object read is
//! signalled with the PostgREST object Accept header.

use std::fmt::Display;

use reqwest::header::ACCEPT;
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::SpontyClient;

/// Accept value that makes PostgREST unwrap the row array into one
/// object and 406 when the filter does not match exactly one row.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Filter set for one request. Built left to right, applied as query
/// pairs in insertion order.
#[derive(Debug, Clone, Default)]
pub(crate) struct Query {
    pairs: Vec<(String, String)>,
    vacuous: bool,
}

impl Query {
    /// A read returning the given columns.
    pub fn select(columns: &str) -> Self {
        Self {
            pairs: vec![("select".to_string(), columns.to_string())],
            vacuous: false,
        }
    }

    /// A bare filter set, for updates.
    pub fn filter() -> Self {
        Self::default()
    }

    /// Equality filter on one column.
    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.pairs.push((column.to_string(), format!("eq.{value}")));
        self
    }

    /// Membership filter on one column. An empty id list can never
    /// match and is not valid `in.()` syntax, so it marks the whole
    /// query vacuous and the request is skipped.
    pub fn in_ids(mut self, column: &str, ids: &[Uuid]) -> Self {
        if ids.is_empty() {
            self.vacuous = true;
            return self;
        }
        let list = ids
            .iter()
            .map(Uuid::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.pairs.push((column.to_string(), format!("in.({list})")));
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_vacuous(&self) -> bool {
        self.vacuous
    }
}

async fn expect_success(operation: &'static str, response: Response) -> Result<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(ApiError::from_response(operation, response).await)
    }
}

async fn decode<T: DeserializeOwned>(operation: &'static str, response: Response) -> Result<T> {
    let response = expect_success(operation, response).await?;
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|source| ApiError::Decode {
        context: operation,
        source,
    })
}

impl SpontyClient {
    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url(), table)
    }

    /// List rows matching the filter. A vacuous query still demands a
    /// session; only the request itself is skipped.
    pub(crate) async fn rows<T: DeserializeOwned>(
        &self,
        table: &'static str,
        query: Query,
    ) -> Result<Vec<T>> {
        let token = self.access_token().await?;
        if query.is_vacuous() {
            debug!(table, "empty id filter, skipping request");
            return Ok(Vec::new());
        }
        let response = self
            .http()
            .get(self.table_url(table))
            .header("apikey", self.anon_key())
            .bearer_auth(&token)
            .query(query.pairs())
            .send()
            .await?;
        decode(table, response).await
    }

    /// Read exactly one row. Zero or many matches surface as an `Api`
    /// error from the backend.
    pub(crate) async fn row<T: DeserializeOwned>(
        &self,
        table: &'static str,
        query: Query,
    ) -> Result<T> {
        let token = self.access_token().await?;
        let response = self
            .http()
            .get(self.table_url(table))
            .header("apikey", self.anon_key())
            .bearer_auth(&token)
            .header(ACCEPT, SINGLE_OBJECT)
            .query(query.pairs())
            .send()
            .await?;
        decode(table, response).await
    }

    /// Insert one row or a batch, discarding the result rows.
    pub(crate) async fn insert<B: Serialize + ?Sized>(
        &self,
        table: &'static str,
        rows: &B,
    ) -> Result<()> {
        let token = self.access_token().await?;
        let response = self
            .http()
            .post(self.table_url(table))
            .header("apikey", self.anon_key())
            .bearer_auth(&token)
            .header("Prefer", "return=minimal")
            .json(rows)
            .send()
            .await?;
        expect_success(table, response).await?;
        Ok(())
    }

    /// Insert one row and read it back with its generated columns.
    pub(crate) async fn insert_returning<B, T>(&self, table: &'static str, row: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let token = self.access_token().await?;
        let response = self
            .http()
            .post(self.table_url(table))
            .header("apikey", self.anon_key())
            .bearer_auth(&token)
            .header("Prefer", "return=representation")
            .header(ACCEPT, SINGLE_OBJECT)
            .json(row)
            .send()
            .await?;
        decode(table, response).await
    }

    /// Patch all rows matching the filter.
    pub(crate) async fn update<B: Serialize + ?Sized>(
        &self,
        table: &'static str,
        query: Query,
        changes: &B,
    ) -> Result<()> {
        let token = self.access_token().await?;
        let response = self
            .http()
            .patch(self.table_url(table))
            .header("apikey", self.anon_key())
            .bearer_auth(&token)
            .query(query.pairs())
            .json(changes)
            .send()
            .await?;
        expect_success(table, response).await?;
        Ok(())
    }

    /// Call a server-side function.
    pub(crate) async fn rpc<P, T>(&self, function: &'static str, params: &P) -> Result<T>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let token = self.access_token().await?;
        let url = format!("{}/rest/v1/rpc/{}", self.base_url(), function);
        let response = self
            .http()
            .post(url)
            .header("apikey", self.anon_key())
            .bearer_auth(&token)
            .json(params)
            .send()
            .await?;
        decode(function, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_query_pairs() {
        let id = Uuid::nil();
        let query = Query::select("*").eq("user_id", id);
        assert_eq!(
            query.pairs(),
            &[
                ("select".to_string(), "*".to_string()),
                (
                    "user_id".to_string(),
                    "eq.00000000-0000-0000-0000-000000000000".to_string()
                ),
            ]
        );
        assert!(!query.is_vacuous());
    }

    #[test]
    fn test_in_filter_joins_ids() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let query = Query::select("*").in_ids("id", &[a, b]);
        let (_, value) = &query.pairs()[1];
        assert_eq!(value, &format!("in.({a},{b})"));
    }

    #[test]
    fn test_empty_in_filter_is_vacuous() {
        let query = Query::select("*").in_ids("id", &[]);
        assert!(query.is_vacuous());
    }

    #[test]
    fn test_filter_query_has_no_select() {
        let query = Query::filter().eq("id", Uuid::nil());
        assert_eq!(query.pairs().len(), 1);
        assert!(query.pairs()[0].1.starts_with("eq."));
    }

    #[test]
    fn test_eq_accepts_display_values() {
        let query = Query::filter().eq("status", "Pending");
        assert_eq!(query.pairs()[0].1, "eq.Pending");
    }
}
