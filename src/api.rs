//! JSON endpoints under `/api`.

use crate::auth::require_user;
use crate::catalog;
use crate::database::*;
use crate::error::{Error, Result};
use crate::model::*;
use crate::slider::{LayoutMode, SliderLayout, Viewport};
use crate::Db;
use actix_identity::Identity;
use actix_web::{web, HttpResponse};
use log::debug;
use serde::Deserialize;
use serde_json::json;

fn movie_or_not_found(db: &sled::Db, id: u64) -> Result<Movie> {
    db.get_movie(id)?
        .ok_or_else(|| Error::NotFound(format!("movie {}", id)))
}

async fn list_movies(db: Db) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(records(db.movies()?)))
}

async fn trending(db: Db) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(records(catalog::trending(db.movies()?))))
}

async fn popular(db: Db) -> Result<HttpResponse> {
    let movies = catalog::popular(db.movies()?, catalog::POPULAR_LIMIT);
    Ok(HttpResponse::Ok().json(records(movies)))
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

async fn search(db: Db, query: web::Query<SearchQuery>) -> Result<HttpResponse> {
    let results = catalog::search(db.movies()?, &query.q);
    debug!("Search {:?}: {} results", query.q, results.len());
    Ok(HttpResponse::Ok().json(records(results)))
}

async fn by_genre(db: Db, genre_id: web::Path<u64>) -> Result<HttpResponse> {
    let genre_id = genre_id.into_inner();
    if db.get_genre(genre_id)?.is_none() {
        return Err(Error::NotFound(format!("genre {}", genre_id)));
    }
    Ok(HttpResponse::Ok().json(records(db.movies_by_genre(genre_id)?)))
}

async fn get_movie(db: Db, id: web::Path<u64>) -> Result<HttpResponse> {
    let id = id.into_inner();
    let movie = movie_or_not_found(&db, id)?;
    Ok(HttpResponse::Ok().json(Record::from((id, movie))))
}

async fn similar(db: Db, id: web::Path<u64>) -> Result<HttpResponse> {
    let id = id.into_inner();
    let movie = movie_or_not_found(&db, id)?;
    let similar = catalog::similar(id, &movie, db.movies()?, catalog::SIMILAR_LIMIT);
    Ok(HttpResponse::Ok().json(records(similar)))
}

async fn genres(db: Db) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(records(db.genres()?)))
}

/// Saved titles of `user_id`, skipping any that no longer exist.
pub fn my_list_movies(db: &sled::Db, user_id: u64) -> Result<Vec<(u64, Movie)>> {
    let mut movies = Vec::new();
    for movie_id in db.list(user_id)? {
        match db.get_movie(movie_id)? {
            Some(movie) => movies.push((movie_id, movie)),
            None => debug!("Saved title {} no longer exists", movie_id),
        }
    }
    Ok(movies)
}

async fn my_list(id: Identity, db: Db) -> Result<HttpResponse> {
    let (user_id, _user) = require_user(&id, &db)?;
    Ok(HttpResponse::Ok().json(records(my_list_movies(&db, user_id)?)))
}

async fn add_to_my_list(id: Identity, db: Db, movie_id: web::Path<u64>) -> Result<HttpResponse> {
    let (user_id, _user) = require_user(&id, &db)?;
    let movie_id = movie_id.into_inner();
    movie_or_not_found(&db, movie_id)?;
    let added = db.add_to_list(user_id, movie_id)?;
    Ok(HttpResponse::Ok().json(json!({ "added": added })))
}

async fn remove_from_my_list(
    id: Identity,
    db: Db,
    movie_id: web::Path<u64>,
) -> Result<HttpResponse> {
    let (user_id, _user) = require_user(&id, &db)?;
    let removed = db.remove_from_list(user_id, movie_id.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "removed": removed })))
}

#[derive(Deserialize)]
pub struct SliderQuery {
    #[serde(default)]
    pub items: usize,
    pub width: Option<u32>,
    #[serde(default)]
    pub mode: LayoutMode,
}

async fn slider(query: web::Query<SliderQuery>) -> HttpResponse {
    let width = query.width.unwrap_or(Viewport::default().width);
    let layout = SliderLayout::compute(width, query.items, query.mode);
    let breakpoints = Viewport { width, height: 0 }.breakpoints();
    HttpResponse::Ok().json(json!({
        "layout": layout,
        "breakpoints": breakpoints,
        "band": breakpoints.band(),
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/movies", web::get().to(list_movies))
            .route("/movies/trending", web::get().to(trending))
            .route("/movies/popular", web::get().to(popular))
            .route("/movies/search", web::get().to(search))
            .route("/movies/genre/{id}", web::get().to(by_genre))
            .route("/movies/{id}", web::get().to(get_movie))
            .route("/movies/{id}/similar", web::get().to(similar))
            .route("/genres", web::get().to(genres))
            .route("/my-list", web::get().to(my_list))
            .route("/my-list/{id}", web::put().to(add_to_my_list))
            .route("/my-list/{id}", web::delete().to(remove_from_my_list))
            .route("/slider", web::get().to(slider)),
    );
}
