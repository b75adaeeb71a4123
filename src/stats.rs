// Pure helpers over a collection: statistics, search and sorting.

use crate::model::{MovieDetails, Movies};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub struct RatingStats {
    pub average: f64,
    pub median: f64,
    pub best: (String, f64),
    pub worst: (String, f64),
}

/// Mean, median, best and worst rating. `None` for an empty collection.
///
/// Best and worst are the first movie, in collection order, holding the
/// highest/lowest rating.
pub fn rating_stats(movies: &Movies) -> Option<RatingStats> {
    let mut iter = movies.iter();
    let (first_title, first) = iter.next()?;
    let mut best = (first_title, first.rating);
    let mut worst = (first_title, first.rating);
    for (title, details) in iter {
        if details.rating > best.1 {
            best = (title, details.rating);
        }
        if details.rating < worst.1 {
            worst = (title, details.rating);
        }
    }

    let mut ratings: Vec<f64> = movies.values().map(|d| d.rating).collect();
    let average = ratings.iter().sum::<f64>() / ratings.len() as f64;
    ratings.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = ratings.len() / 2;
    let median = if ratings.len() % 2 == 0 {
        (ratings[mid - 1] + ratings[mid]) / 2.0
    } else {
        ratings[mid]
    };

    Some(RatingStats {
        average,
        median,
        best: (best.0.clone(), best.1),
        worst: (worst.0.clone(), worst.1),
    })
}

/// Movies whose title contains `term`, ignoring case.
pub fn search<'a>(movies: &'a Movies, term: &str) -> Vec<(&'a String, &'a MovieDetails)> {
    let needle = term.to_lowercase();
    movies
        .iter()
        .filter(|(title, _)| title.to_lowercase().contains(&needle))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// "A" or "D" in any case; `None` for anything else.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_uppercase().as_str() {
            "A" => Some(SortOrder::Ascending),
            "D" => Some(SortOrder::Descending),
            _ => None,
        }
    }
}

/// Movies ordered by rating. Equal ratings keep their collection order.
pub fn sorted_by_rating(movies: &Movies, order: SortOrder) -> Vec<(&String, &MovieDetails)> {
    let mut sorted: Vec<_> = movies.iter().collect();
    sorted.sort_by(|a, b| {
        let ord = a.1.rating.partial_cmp(&b.1.rating).unwrap_or(Ordering::Equal);
        match order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    });
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(entries: &[(&str, f64)]) -> Movies {
        entries
            .iter()
            .enumerate()
            .map(|(i, (title, rating))| {
                (
                    title.to_string(),
                    MovieDetails {
                        year: 2000 + i as i32,
                        rating: *rating,
                        poster_url: None,
                        imdb_id: format!("tt{}", i),
                    },
                )
            })
            .collect()
    }

    fn ratings(list: &[(&String, &MovieDetails)]) -> Vec<f64> {
        list.iter().map(|(_, d)| d.rating).collect()
    }

    #[test]
    fn stats_for_three_movies() {
        let movies = collection(&[("Low", 2.0), ("Mid", 5.0), ("High", 8.0)]);
        let stats = rating_stats(&movies).unwrap();
        assert_eq!(stats.average, 5.0);
        assert_eq!(stats.median, 5.0);
        assert_eq!(stats.best, ("High".to_string(), 8.0));
        assert_eq!(stats.worst, ("Low".to_string(), 2.0));
    }

    #[test]
    fn median_of_even_count_is_midpoint() {
        let movies = collection(&[("A", 9.0), ("B", 1.0), ("C", 4.0), ("D", 6.0)]);
        assert_eq!(rating_stats(&movies).unwrap().median, 5.0);
    }

    #[test]
    fn ties_go_to_first_encountered() {
        let movies = collection(&[("First", 7.0), ("Second", 7.0)]);
        let stats = rating_stats(&movies).unwrap();
        assert_eq!(stats.best.0, "First");
        assert_eq!(stats.worst.0, "First");
    }

    #[test]
    fn no_stats_for_empty_collection() {
        assert!(rating_stats(&Movies::new()).is_none());
    }

    #[test]
    fn search_ignores_case() {
        let movies = collection(&[("Spiderman", 7.3), ("Alien", 8.5), ("Batman Begins", 8.2)]);
        let titles: Vec<_> = search(&movies, "MAN").into_iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(titles, vec!["Spiderman", "Batman Begins"]);
        assert!(search(&movies, "zzz").is_empty());
    }

    #[test]
    fn sorts_both_ways() {
        let movies = collection(&[("A", 3.0), ("B", 9.0), ("C", 1.0)]);
        assert_eq!(ratings(&sorted_by_rating(&movies, SortOrder::Descending)), vec![9.0, 3.0, 1.0]);
        assert_eq!(ratings(&sorted_by_rating(&movies, SortOrder::Ascending)), vec![1.0, 3.0, 9.0]);
    }

    #[test]
    fn sort_is_stable() {
        let movies = collection(&[("A", 5.0), ("B", 5.0), ("C", 1.0)]);
        let titles: Vec<_> = sorted_by_rating(&movies, SortOrder::Descending)
            .into_iter()
            .map(|(t, _)| t.as_str())
            .collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[test]
    fn sort_order_parsing() {
        assert_eq!(SortOrder::parse("d"), Some(SortOrder::Descending));
        assert_eq!(SortOrder::parse(" A "), Some(SortOrder::Ascending));
        assert_eq!(SortOrder::parse("up"), None);
    }
}
