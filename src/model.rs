use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub username: String,
    pub password_hash: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Movie,
    TvShow,
}

/// A movie or TV show in the catalog.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Movie {
    pub title: String,
    pub description: String,
    pub year: u16,
    /// 0.0 to 10.0
    pub rating: f32,
    pub genres: Vec<u64>,
    pub cast: Vec<String>,
    pub kind: MediaKind,
    /// Only set for TV shows.
    pub seasons: Option<u32>,
    pub poster_url: String,
    pub backdrop_url: String,
    pub video_url: String,
    pub trending: bool,
    pub popularity: f32,
}

impl Movie {
    pub fn has_genre(&self, genre_id: u64) -> bool {
        self.genres.contains(&genre_id)
    }
}

/// A stored value together with its id, as exposed over the API and to templates.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Record<T> {
    pub id: u64,
    #[serde(flatten)]
    pub item: T,
}

impl<T> From<(u64, T)> for Record<T> {
    fn from((id, item): (u64, T)) -> Self {
        Record { id, item }
    }
}

pub fn records<T>(entries: Vec<(u64, T)>) -> Vec<Record<T>> {
    entries.into_iter().map(Record::from).collect()
}
