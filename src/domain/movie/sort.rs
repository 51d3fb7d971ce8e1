use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::domain::{DomainError, MovieRecord};

/// Ordering options offered by the favorites listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    #[default]
    TitleAsc,
    TitleDesc,
    RatingAsc,
    RatingDesc,
}

impl SortMode {
    pub const ALL: [SortMode; 4] = [
        SortMode::TitleAsc,
        SortMode::TitleDesc,
        SortMode::RatingAsc,
        SortMode::RatingDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::TitleAsc => "title-asc",
            SortMode::TitleDesc => "title-desc",
            SortMode::RatingAsc => "rating-asc",
            SortMode::RatingDesc => "rating-desc",
        }
    }

    fn compare<M: MovieRecord>(&self, a: &M, b: &M) -> Ordering {
        match self {
            SortMode::TitleAsc => compare_titles(a.title(), b.title()),
            SortMode::TitleDesc => compare_titles(b.title(), a.title()),
            SortMode::RatingAsc => a.rating().total_cmp(&b.rating()),
            SortMode::RatingDesc => b.rating().total_cmp(&a.rating()),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| DomainError::InvalidSortMode(s.to_string()))
    }
}

/// Returns a sorted copy of `movies`.
///
/// Stable: records that compare equal keep their input order.
pub fn sort_movies<M: MovieRecord + Clone>(movies: &[M], mode: SortMode) -> Vec<M> {
    let mut sorted = movies.to_vec();
    sorted.sort_by(|a, b| mode.compare(a, b));
    sorted
}

/// Dictionary-style comparison: case and common diacritics are ignored
/// first, the raw text only breaks ties.
fn compare_titles(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(char::to_lowercase).map(fold_diacritic);
    let folded_b = b.chars().flat_map(char::to_lowercase).map(fold_diacritic);
    folded_a.cmp(folded_b).then_with(|| a.cmp(b))
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MovieSummary;

    fn movie(id: i64, title: &str, rating: f64) -> MovieSummary {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": title,
            "vote_average": rating,
        }))
        .unwrap()
    }

    fn ids(movies: &[MovieSummary]) -> Vec<i64> {
        movies.iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_rating_desc_is_stable_for_ties() {
        let movies = vec![
            movie(1, "A", 8.5),
            movie(2, "B", 7.5),
            movie(3, "C", 9.0),
            movie(4, "D", 9.0),
        ];

        let sorted = sort_movies(&movies, SortMode::RatingDesc);
        assert_eq!(ids(&sorted), vec![3, 4, 1, 2]);
    }

    #[test]
    fn test_rating_asc() {
        let movies = vec![movie(1, "A", 8.5), movie(2, "B", 7.5), movie(3, "C", 9.0)];
        assert_eq!(ids(&sort_movies(&movies, SortMode::RatingAsc)), vec![2, 1, 3]);
    }

    #[test]
    fn test_title_ignores_case_and_accents() {
        let movies = vec![
            movie(1, "Zodíaco", 1.0),
            movie(2, "ávatar", 1.0),
            movie(3, "Batman", 1.0),
            movie(4, "Árvore", 1.0),
        ];

        assert_eq!(ids(&sort_movies(&movies, SortMode::TitleAsc)), vec![4, 2, 3, 1]);
        assert_eq!(ids(&sort_movies(&movies, SortMode::TitleDesc)), vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_identical_titles_keep_input_order() {
        let movies = vec![movie(7, "Duna", 1.0), movie(3, "Duna", 2.0)];
        assert_eq!(ids(&sort_movies(&movies, SortMode::TitleAsc)), vec![7, 3]);
        assert_eq!(ids(&sort_movies(&movies, SortMode::TitleDesc)), vec![7, 3]);
    }

    #[test]
    fn test_sort_does_not_touch_input() {
        let movies = vec![movie(2, "B", 1.0), movie(1, "A", 2.0)];
        let _ = sort_movies(&movies, SortMode::TitleAsc);
        assert_eq!(ids(&movies), vec![2, 1]);
    }

    #[test]
    fn test_parse_sort_mode() {
        assert_eq!("rating-desc".parse::<SortMode>().unwrap(), SortMode::RatingDesc);
        assert!("popularity".parse::<SortMode>().is_err());
        for mode in SortMode::ALL {
            assert_eq!(mode.to_string().parse::<SortMode>().unwrap(), mode);
        }
    }
}
