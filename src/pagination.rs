//! Cursor pagination for the bins and boards listings.
//!
//! The listing endpoints answer either `{"results": [...], "page-token": "..."}`
//! or, on older deployments, a bare JSON array with no pagination metadata.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{FbError, Result};

pub const MAX_RESULTS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Bins,
    Boards,
}

impl CollectionKind {
    pub fn path(self) -> &'static str {
        match self {
            CollectionKind::Bins => "bins",
            CollectionKind::Boards => "boards",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CollectionKind::Bins => "bin",
            CollectionKind::Boards => "board",
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Page<T> {
    Paginated {
        items: Vec<T>,
        next_token: Option<String>,
    },
    Legacy {
        items: Vec<T>,
    },
}

impl<T: DeserializeOwned> Page<T> {
    /// An object with a non-null `results` field is a paginated page;
    /// anything else must be a bare array.
    pub fn parse(body: &str) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_str(body)?;

        if let Value::Object(map) = &value {
            if let Some(results) = map.get("results").filter(|r| !r.is_null()) {
                let items = Vec::<T>::deserialize(results)?;
                let next_token = map
                    .get("page-token")
                    .and_then(Value::as_str)
                    .filter(|token| !token.is_empty())
                    .map(str::to_owned);
                return Ok(Page::Paginated { items, next_token });
            }
        }

        let items = Vec::<T>::deserialize(value)?;
        Ok(Page::Legacy { items })
    }

    pub fn into_parts(self) -> (Vec<T>, Option<String>) {
        match self {
            Page::Paginated { items, next_token } => (items, next_token),
            Page::Legacy { items } => (items, None),
        }
    }
}

/// Fetches every page of a collection, in order.
///
/// `fetch_page` receives the page token to request (`None` for the first
/// page) and returns the raw response body. A failure on any page fails the
/// whole fetch; pages fetched so far are dropped.
pub async fn fetch_all<T, F, Fut>(kind: CollectionKind, mut fetch_page: F) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<String>>,
{
    let mut all = Vec::new();
    let mut token = None;
    let mut pages = 0usize;

    loop {
        let body = fetch_page(token.take()).await?;
        let page = Page::<T>::parse(&body).map_err(|source| FbError::Parse {
            what: kind.path(),
            source,
        })?;
        pages += 1;

        let (items, next_token) = page.into_parts();
        debug!(kind = kind.path(), page = pages, items = items.len(), "fetched page");
        all.extend(items);

        match next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    Ok(all)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::types::Bin;

    fn bin_ids(bins: &[Bin]) -> Vec<&str> {
        bins.iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn test_parse_paginated_page() {
        let page: Page<Bin> = Page::parse(
            r#"{"results": [{"_id": "bin1", "name": "Bin One"}], "page-token": "token123"}"#,
        )
        .unwrap();

        assert_eq!(
            page,
            Page::Paginated {
                items: vec![Bin {
                    id: "bin1".to_string(),
                    name: "Bin One".to_string()
                }],
                next_token: Some("token123".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_empty_token_means_last_page() {
        let page: Page<Bin> = Page::parse(r#"{"results": [], "page-token": ""}"#).unwrap();
        assert_eq!(page.into_parts(), (vec![], None));
    }

    #[test]
    fn test_parse_legacy_array() {
        let page: Page<Bin> = Page::parse(r#"[{"_id": "bin1", "name": "Bin One"}]"#).unwrap();
        assert!(matches!(page, Page::Legacy { ref items } if items.len() == 1));
    }

    #[test]
    fn test_parse_object_without_results_is_an_error() {
        assert!(Page::<Bin>::parse(r#"{"error": "nope"}"#).is_err());
        assert!(Page::<Bin>::parse(r#"{"results": null}"#).is_err());
        assert!(Page::<Bin>::parse("not json").is_err());
    }

    #[tokio::test]
    async fn test_fetch_all_follows_page_tokens() {
        let requests = RefCell::new(Vec::new());

        let bins: Vec<Bin> = fetch_all(CollectionKind::Bins, |token: Option<String>| {
            requests.borrow_mut().push(token.clone());
            let body = match token.as_deref() {
                None => r#"{"results": [{"_id": "bin1", "name": "Bin One"}, {"_id": "bin2", "name": "Bin Two"}], "page-token": "token123"}"#,
                Some("token123") => r#"{"results": [{"_id": "cx7oRn0CK1SoAMn0x", "name": "K+Dev.Doing"}, {"_id": "bin4", "name": "Bin Four"}], "page-token": "token456"}"#,
                Some("token456") => r#"{"results": [{"_id": "bin5", "name": "Bin Five"}]}"#,
                Some(other) => panic!("unexpected token {other}"),
            };
            async move { Ok::<_, FbError>(body.to_string()) }
        })
        .await
        .unwrap();

        assert_eq!(
            bin_ids(&bins),
            vec!["bin1", "bin2", "cx7oRn0CK1SoAMn0x", "bin4", "bin5"]
        );
        assert_eq!(
            *requests.borrow(),
            vec![None, Some("token123".to_string()), Some("token456".to_string())]
        );
    }

    #[tokio::test]
    async fn test_fetch_all_legacy_array_is_single_request() {
        let mut calls = 0;

        let bins: Vec<Bin> = fetch_all(CollectionKind::Bins, |_token| {
            calls += 1;
            async { Ok::<_, FbError>(r#"[{"_id": "bin1", "name": "A"}, {"_id": "bin2", "name": "B"}]"#.to_string()) }
        })
        .await
        .unwrap();

        assert_eq!(bin_ids(&bins), vec!["bin1", "bin2"]);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_fetch_all_error_on_later_page_discards_everything() {
        let result: Result<Vec<Bin>> = fetch_all(CollectionKind::Bins, |token: Option<String>| async move {
            match token {
                None => Ok(r#"{"results": [{"_id": "bin1", "name": "A"}], "page-token": "t2"}"#.to_string()),
                Some(_) => Err(FbError::ApiError {
                    status: 503,
                    message: "unavailable".to_string(),
                }),
            }
        })
        .await;

        assert!(matches!(result, Err(FbError::ApiError { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_fetch_all_parse_error_names_collection() {
        let result: Result<Vec<Bin>> =
            fetch_all(CollectionKind::Boards, |_token| async { Ok::<_, FbError>("<html>".to_string()) }).await;

        let err = result.unwrap_err();
        assert!(err.to_string().starts_with("failed to parse boards response"));
    }
}
