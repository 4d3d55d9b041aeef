//! Demo catalog and users for an empty store.

use crate::database::*;
use crate::error::{Error, Result};
use crate::model::*;
use log::info;
use std::collections::HashMap;

const GENRES: &[&str] = &[
    "Action",
    "Comedy",
    "Drama",
    "Crime",
    "Sci-Fi",
    "Animation",
    "Thriller",
    "Fantasy",
    "Documentary",
    "Romance",
];

struct Title {
    title: &'static str,
    description: &'static str,
    year: u16,
    rating: f32,
    genres: &'static [&'static str],
    cast: &'static [&'static str],
    seasons: Option<u32>,
    trending: bool,
    popularity: f32,
}

const TITLES: &[Title] = &[
    Title {
        title: "The Godfather",
        description: "The aging patriarch of a crime dynasty transfers control to his reluctant son.",
        year: 1972,
        rating: 9.2,
        genres: &["Crime", "Drama"],
        cast: &["Marlon Brando", "Al Pacino", "James Caan"],
        seasons: None,
        trending: true,
        popularity: 95.0,
    },
    Title {
        title: "Goodfellas",
        description: "The rise and fall of a mob associate over three decades.",
        year: 1990,
        rating: 8.7,
        genres: &["Crime", "Drama"],
        cast: &["Robert De Niro", "Ray Liotta", "Joe Pesci"],
        seasons: None,
        trending: false,
        popularity: 81.0,
    },
    Title {
        title: "Heat",
        description: "A detective hunts a professional thief planning one last job.",
        year: 1995,
        rating: 8.3,
        genres: &["Action", "Crime", "Thriller"],
        cast: &["Al Pacino", "Robert De Niro", "Val Kilmer"],
        seasons: None,
        trending: true,
        popularity: 74.0,
    },
    Title {
        title: "Blade Runner 2049",
        description: "A young blade runner uncovers a secret that could plunge society into chaos.",
        year: 2017,
        rating: 8.0,
        genres: &["Sci-Fi", "Thriller", "Drama"],
        cast: &["Ryan Gosling", "Harrison Ford", "Ana de Armas"],
        seasons: None,
        trending: true,
        popularity: 88.0,
    },
    Title {
        title: "Arrival",
        description: "A linguist is recruited to communicate with visitors from another world.",
        year: 2016,
        rating: 7.9,
        genres: &["Sci-Fi", "Drama"],
        cast: &["Amy Adams", "Jeremy Renner", "Forest Whitaker"],
        seasons: None,
        trending: false,
        popularity: 69.0,
    },
    Title {
        title: "Spirited Away",
        description: "A girl wanders into a world ruled by gods, witches and spirits.",
        year: 2001,
        rating: 8.6,
        genres: &["Animation", "Fantasy"],
        cast: &["Rumi Hiiragi", "Miyu Irino"],
        seasons: None,
        trending: true,
        popularity: 84.0,
    },
    Title {
        title: "Toy Story",
        description: "A cowboy doll feels threatened when a space ranger becomes the new favourite toy.",
        year: 1995,
        rating: 8.3,
        genres: &["Animation", "Comedy"],
        cast: &["Tom Hanks", "Tim Allen"],
        seasons: None,
        trending: false,
        popularity: 77.0,
    },
    Title {
        title: "Mad Max: Fury Road",
        description: "A drifter and a rebel warrior flee across the desert from a tyrant.",
        year: 2015,
        rating: 8.1,
        genres: &["Action", "Sci-Fi"],
        cast: &["Tom Hardy", "Charlize Theron"],
        seasons: None,
        trending: true,
        popularity: 86.0,
    },
    Title {
        title: "The Grand Budapest Hotel",
        description: "A concierge and his lobby boy are framed for murder.",
        year: 2014,
        rating: 8.1,
        genres: &["Comedy", "Crime"],
        cast: &["Ralph Fiennes", "Tony Revolori"],
        seasons: None,
        trending: false,
        popularity: 66.0,
    },
    Title {
        title: "Before Sunrise",
        description: "Two strangers meet on a train and spend one night walking through Vienna.",
        year: 1995,
        rating: 8.1,
        genres: &["Romance", "Drama"],
        cast: &["Ethan Hawke", "Julie Delpy"],
        seasons: None,
        trending: false,
        popularity: 52.0,
    },
    Title {
        title: "Free Solo",
        description: "A climber attempts to scale El Capitan without a rope.",
        year: 2018,
        rating: 8.1,
        genres: &["Documentary"],
        cast: &["Alex Honnold"],
        seasons: None,
        trending: false,
        popularity: 48.0,
    },
    Title {
        title: "Breaking Bad",
        description: "A chemistry teacher turns to manufacturing methamphetamine.",
        year: 2008,
        rating: 9.5,
        genres: &["Crime", "Drama", "Thriller"],
        cast: &["Bryan Cranston", "Aaron Paul"],
        seasons: Some(5),
        trending: true,
        popularity: 97.0,
    },
    Title {
        title: "Stranger Things",
        description: "Kids in a small town face secret experiments and supernatural forces.",
        year: 2016,
        rating: 8.7,
        genres: &["Sci-Fi", "Fantasy", "Thriller"],
        cast: &["Millie Bobby Brown", "Winona Ryder", "David Harbour"],
        seasons: Some(4),
        trending: true,
        popularity: 93.0,
    },
    Title {
        title: "The Office",
        description: "A mockumentary about the employees of a paper company.",
        year: 2005,
        rating: 9.0,
        genres: &["Comedy"],
        cast: &["Steve Carell", "Rainn Wilson", "John Krasinski"],
        seasons: Some(9),
        trending: false,
        popularity: 89.0,
    },
    Title {
        title: "Planet Earth",
        description: "A survey of the planet's habitats and the life they support.",
        year: 2006,
        rating: 9.4,
        genres: &["Documentary"],
        cast: &["David Attenborough"],
        seasons: Some(1),
        trending: false,
        popularity: 58.0,
    },
    Title {
        title: "The Witcher",
        description: "A monster hunter struggles to find his place in a world of people.",
        year: 2019,
        rating: 8.0,
        genres: &["Action", "Fantasy", "Drama"],
        cast: &["Henry Cavill", "Anya Chalotra"],
        seasons: Some(3),
        trending: false,
        popularity: 79.0,
    },
];

const USERS: &[(&str, &str)] = &[("admin", "password"), ("demo", "demo")];

fn slug(title: &str) -> String {
    title
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c.to_ascii_lowercase())
            } else if c.is_whitespace() {
                Some('-')
            } else {
                None
            }
        })
        .collect()
}

fn movie(title: &Title, genre_ids: &HashMap<&str, u64>) -> Result<Movie> {
    let genres = title
        .genres
        .iter()
        .map(|name| {
            genre_ids
                .get(name)
                .copied()
                .ok_or_else(|| Error::Corrupt(format!("unknown genre {}", name)))
        })
        .collect::<Result<Vec<_>>>()?;
    let slug = slug(title.title);
    Ok(Movie {
        title: title.title.to_owned(),
        description: title.description.to_owned(),
        year: title.year,
        rating: title.rating,
        genres,
        cast: title.cast.iter().map(|name| name.to_string()).collect(),
        kind: if title.seasons.is_some() {
            MediaKind::TvShow
        } else {
            MediaKind::Movie
        },
        seasons: title.seasons,
        poster_url: format!("/media/posters/{}.jpg", slug),
        backdrop_url: format!("/media/backdrops/{}.jpg", slug),
        video_url: format!("/media/videos/{}.mp4", slug),
        trending: title.trending,
        popularity: title.popularity,
    })
}

/// Seeds genres, titles and users. Does nothing if the store already has genres.
pub fn seed(db: &sled::Db, bcrypt_cost: u32) -> Result<()> {
    if !db.genres()?.is_empty() {
        info!("Store already seeded");
        return Ok(());
    }
    let mut genre_ids = HashMap::new();
    for name in GENRES {
        let id = db.add_genre(&Genre {
            name: name.to_string(),
        })?;
        genre_ids.insert(*name, id);
    }
    for title in TITLES {
        db.add_movie(&movie(title, &genre_ids)?)?;
    }
    for (username, password) in USERS {
        db.add_user(&User {
            username: username.to_string(),
            password_hash: bcrypt::hash(password, bcrypt_cost)?,
        })?;
    }
    info!(
        "Seeded {} genres, {} titles and {} users",
        GENRES.len(),
        TITLES.len(),
        USERS.len()
    );
    Ok(())
}
