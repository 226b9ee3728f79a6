// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Movie catalogue types.
//!
//! [`Movie`] is the record stored in the index. Attribute names match the
//! lowercase index fields; the column headings of the source dataset
//! (`Title`, `Runtime (Minutes)`, ...) are accepted as aliases. Missing
//! attributes take their default, attributes of the wrong type fail.
//!
//! [`MovieQueryFilter`] is the advanced-search request body:
//!
//! ```json
//! {
//!     "genericCriteria": "Avengers",
//!     "actors": "Chris Evans,Scarlett Johansson",
//!     "actorOperator": "AND",
//!     "genres": "Action,Sci-Fi",
//!     "genreOperator": "OR",
//!     "directors": "Joss Whedon, Anthony Russo",
//!     "releaseYearGTE": 2005,
//!     "metaRatingGTE": 70,
//!     "runtimeLTE": 160
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::search::{FilterCriteria, Operator};

/// One movie document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Movie {
    #[serde(rename = "movieId", skip_serializing_if = "Option::is_none")]
    pub movie_id: Option<String>,
    #[serde(alias = "Rank")]
    pub rank: i64,
    #[serde(alias = "Title")]
    pub title: String,
    #[serde(alias = "Genre")]
    pub genre: Vec<String>,
    #[serde(alias = "Description")]
    pub description: String,
    #[serde(alias = "Director")]
    pub director: String,
    #[serde(alias = "Actors")]
    pub actors: Vec<String>,
    #[serde(alias = "Year")]
    pub year: i64,
    #[serde(alias = "Runtime (Minutes)")]
    pub runtime: i64,
    #[serde(alias = "Rating")]
    pub rating: f64,
    #[serde(alias = "Votes")]
    pub votes: i64,
    #[serde(alias = "Revenue (Millions)")]
    pub revenue: f64,
    #[serde(alias = "Metascore")]
    pub metascore: i64,
}

/// Advanced search request. Multi-value attributes are comma separated.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MovieQueryFilter {
    pub generic_criteria: Option<String>,
    pub actors: Option<String>,
    pub actor_operator: Option<String>,
    pub directors: Option<String>,
    pub genres: Option<String>,
    pub genre_operator: Option<String>,
    #[serde(rename = "releaseYearGTE")]
    pub release_year_gte: Option<f64>,
    #[serde(rename = "releaseYearLTE")]
    pub release_year_lte: Option<f64>,
    #[serde(rename = "imdbRatingGTE")]
    pub imdb_rating_gte: Option<f64>,
    #[serde(rename = "imdbRatingLTE")]
    pub imdb_rating_lte: Option<f64>,
    #[serde(rename = "metaRatingGTE")]
    pub meta_rating_gte: Option<f64>,
    #[serde(rename = "metaRatingLTE")]
    pub meta_rating_lte: Option<f64>,
    #[serde(rename = "runtimeGTE")]
    pub runtime_gte: Option<f64>,
    #[serde(rename = "runtimeLTE")]
    pub runtime_lte: Option<f64>,
}

impl MovieQueryFilter {
    /// Translate into criteria over the movie field table.
    ///
    /// Order: free text, actors, directors, genres, rating, runtime,
    /// release year, metascore. Directors always combine with OR; a missing
    /// or unrecognized actor/genre operator means AND.
    pub fn to_criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::new();

        if let Some(text) = &self.generic_criteria {
            criteria = criteria.text(text.as_str());
        }

        criteria = criteria
            .set(
                "actors",
                split_values(self.actors.as_deref()),
                parse_operator(self.actor_operator.as_deref()),
            )
            .set("director", split_values(self.directors.as_deref()), Operator::Or)
            .set(
                "genre",
                split_values(self.genres.as_deref()),
                parse_operator(self.genre_operator.as_deref()),
            );

        criteria
            .range("rating", self.imdb_rating_gte, self.imdb_rating_lte)
            .range("runtime", self.runtime_gte, self.runtime_lte)
            .range("year", self.release_year_gte, self.release_year_lte)
            .range("metascore", self.meta_rating_gte, self.meta_rating_lte)
    }
}

/// Split a comma-separated list; blanks are dropped later by the criterion.
pub fn split_values(list: Option<&str>) -> Vec<&str> {
    list.map(|s| s.split(',').collect()).unwrap_or_default()
}

/// Lenient operator parsing; anything unrecognized is AND.
pub fn parse_operator(operator: Option<&str>) -> Operator {
    operator.and_then(|op| op.parse().ok()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{FieldRegistry, QueryCompiler};
    use std::sync::Arc;

    fn compile(filter: &MovieQueryFilter) -> String {
        QueryCompiler::new(Arc::new(FieldRegistry::movies()))
            .compile(&filter.to_criteria())
            .unwrap()
    }

    #[test]
    fn test_movie_primary_names() {
        let movie: Movie = serde_json::from_str(
            r#"{
                "movieId": "01H8X",
                "rank": 1,
                "title": "Guardians of the Galaxy",
                "genre": ["Action", "Adventure", "Sci-Fi"],
                "director": "James Gunn",
                "actors": ["Chris Pratt", "Vin Diesel"],
                "year": 2014,
                "runtime": 121,
                "rating": 8.1,
                "votes": 757074,
                "revenue": 333.13,
                "metascore": 76
            }"#,
        )
        .unwrap();

        assert_eq!(movie.movie_id.as_deref(), Some("01H8X"));
        assert_eq!(movie.genre.len(), 3);
        assert_eq!(movie.runtime, 121);
        assert_eq!(movie.description, "");
    }

    #[test]
    fn test_movie_alternate_names() {
        let movie: Movie = serde_json::from_str(
            r#"{
                "Rank": 2,
                "Title": "Prometheus",
                "Runtime (Minutes)": 124,
                "Revenue (Millions)": 126.46,
                "Metascore": 65
            }"#,
        )
        .unwrap();

        assert_eq!(movie.rank, 2);
        assert_eq!(movie.title, "Prometheus");
        assert_eq!(movie.runtime, 124);
        assert_eq!(movie.metascore, 65);
    }

    #[test]
    fn test_movie_names_are_case_sensitive() {
        let movie: Movie = serde_json::from_str(r#"{"TITLE": "Split"}"#).unwrap();
        assert_eq!(movie.title, "");
    }

    #[test]
    fn test_movie_wrong_type_fails() {
        assert!(serde_json::from_str::<Movie>(r#"{"year": "two thousand"}"#).is_err());
    }

    #[test]
    fn test_advanced_filter_full() {
        let filter: MovieQueryFilter = serde_json::from_str(
            r#"{
                "genericCriteria": "Avengers",
                "actors": "Chris Evans,Scarlett Johansson",
                "actorOperator": "AND",
                "genres": "Action,Sci-Fi",
                "genreOperator": "OR",
                "directors": "Joss Whedon, Anthony Russo",
                "releaseYearGTE": 2005,
                "imdbRatingGTE": 9,
                "imdbRatingLTE": 7,
                "metaRatingGTE": 70,
                "runtimeLTE": 160
            }"#,
        )
        .unwrap();

        assert_eq!(
            compile(&filter),
            "Avengers \
             @actors:{Chris Evans} @actors:{Scarlett Johansson} \
             @director:(Anthony Russo|Joss Whedon) \
             @genre:{Action|Sci\\-Fi} \
             @rating:[7 9] \
             @runtime:[-inf (160] \
             @year:[2005 inf] \
             @metascore:[70 inf]"
        );
    }

    #[test]
    fn test_operator_defaults_to_and() {
        let filter = MovieQueryFilter {
            genres: Some("Action,Adventure".into()),
            genre_operator: Some("sometimes".into()),
            ..Default::default()
        };
        assert_eq!(compile(&filter), "@genre:{Action} @genre:{Adventure}");
    }

    #[test]
    fn test_not_operator() {
        let filter = MovieQueryFilter {
            genres: Some("Adventure,Action".into()),
            genre_operator: Some("NOT".into()),
            ..Default::default()
        };
        assert_eq!(compile(&filter), "-@genre:{Action|Adventure}");
    }

    #[test]
    fn test_blank_filter_is_empty() {
        let filter = MovieQueryFilter {
            generic_criteria: Some("  ".into()),
            actors: Some(" , ".into()),
            ..Default::default()
        };
        assert!(filter.to_criteria().is_empty());
        assert_eq!(compile(&filter), "");
    }

    #[test]
    fn test_split_values() {
        assert_eq!(split_values(Some("a, b,,c")), vec!["a", " b", "", "c"]);
        assert!(split_values(None).is_empty());
    }
}
