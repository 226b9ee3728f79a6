// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Result Materializer: raw hit payloads → typed records.
//!
//! Fail-fast over the whole batch. One malformed payload fails the call and
//! no partial list is returned, so a page never holds fewer records than
//! the engine matched in its window.

use serde::de::DeserializeOwned;

use crate::backend::Hit;
use crate::error::SearchError;

/// Deserialize every hit into `T`, preserving order.
pub fn materialize<T: DeserializeOwned>(hits: &[Hit]) -> Result<Vec<T>, SearchError> {
    hits.iter().map(materialize_one).collect()
}

/// Deserialize a single hit.
pub fn materialize_one<T: DeserializeOwned>(hit: &Hit) -> Result<T, SearchError> {
    serde_json::from_str(&hit.payload).map_err(|source| SearchError::Deserialization {
        hit_id: hit.id.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Title {
        title: String,
    }

    #[test]
    fn test_materialize_in_order() {
        let hits = vec![
            Hit::new("movie:2", r#"{"title":"Split"}"#),
            Hit::new("movie:1", r#"{"title":"Sing"}"#),
        ];
        let titles: Vec<Title> = materialize(&hits).unwrap();
        assert_eq!(
            titles,
            vec![Title { title: "Split".into() }, Title { title: "Sing".into() }]
        );
    }

    #[test]
    fn test_malformed_hit_fails_whole_batch() {
        let hits = vec![
            Hit::new("movie:1", r#"{"title":"Sing"}"#),
            Hit::new("movie:2", r#"{"title": 42}"#),
            Hit::new("movie:3", r#"{"title":"Moana"}"#),
        ];

        match materialize::<Title>(&hits) {
            Err(SearchError::Deserialization { hit_id, .. }) => assert_eq!(hit_id, "movie:2"),
            other => panic!("Expected Deserialization error, got {:?}", other),
        }
    }

    #[test]
    fn test_not_json_at_all() {
        let hits = vec![Hit::new("movie:9", "not json")];
        let err = materialize::<Title>(&hits).unwrap_err();
        assert!(err.to_string().starts_with("Failed to deserialize hit 'movie:9'"));
    }

    #[test]
    fn test_empty_batch() {
        let titles: Vec<Title> = materialize(&[]).unwrap();
        assert!(titles.is_empty());
    }
}
