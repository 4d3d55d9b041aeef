//! Read-side views over the catalog: search, genre rows, similar titles.

use crate::model::Movie;
use std::cmp::Reverse;
use std::collections::HashSet;

pub const SIMILAR_LIMIT: usize = 10;
pub const POPULAR_LIMIT: usize = 20;

/// Case-insensitive substring match on the title. A blank query matches nothing.
pub fn search(movies: Vec<(u64, Movie)>, query: &str) -> Vec<(u64, Movie)> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    movies
        .into_iter()
        .filter(|(_, movie)| movie.title.to_lowercase().contains(&needle))
        .collect()
}

pub fn filter_by_genre(movies: &[(u64, Movie)], genre_id: u64) -> Vec<(u64, Movie)> {
    movies
        .iter()
        .filter(|(_, movie)| movie.has_genre(genre_id))
        .cloned()
        .collect()
}

fn genre_overlap(a: &Movie, b: &Movie) -> usize {
    a.genres
        .iter()
        .filter(|genre| b.has_genre(**genre))
        .collect::<HashSet<_>>()
        .len()
}

/// Titles sharing a genre with `target`, most shared genres first.
pub fn similar(
    target_id: u64,
    target: &Movie,
    movies: Vec<(u64, Movie)>,
    limit: usize,
) -> Vec<(u64, Movie)> {
    let mut scored = movies
        .into_iter()
        .filter(|(id, _)| *id != target_id)
        .map(|(id, movie)| (genre_overlap(target, &movie), id, movie))
        .filter(|(overlap, _, _)| *overlap > 0)
        .collect::<Vec<_>>();
    // Stable, so ties keep catalog order.
    scored.sort_by_key(|(overlap, _, _)| Reverse(*overlap));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, id, movie)| (id, movie))
        .collect()
}

pub fn trending(movies: Vec<(u64, Movie)>) -> Vec<(u64, Movie)> {
    movies.into_iter().filter(|(_, movie)| movie.trending).collect()
}

pub fn popular(mut movies: Vec<(u64, Movie)>, limit: usize) -> Vec<(u64, Movie)> {
    movies.sort_by(|(_, a), (_, b)| b.popularity.total_cmp(&a.popularity));
    movies.truncate(limit);
    movies
}
