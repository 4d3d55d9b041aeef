//! Server-rendered HTML pages.

use crate::api::{my_list_movies, SearchQuery};
use crate::auth::current_user;
use crate::catalog;
use crate::database::*;
use crate::error::{Error, Result};
use crate::model::*;
use crate::slider::{Breakpoints, LayoutMode, SliderLayout, Viewport};
use crate::{Db, Tera};
use actix_identity::Identity;
use actix_web::{http::header, web, HttpResponse};
use serde::{Deserialize, Serialize};

/// A carousel row, already split into slides for the requested viewport.
#[derive(Serialize, Debug)]
pub struct Row {
    pub title: String,
    pub link: Option<String>,
    pub layout: SliderLayout,
    pub slides: Vec<Vec<Record<Movie>>>,
}

impl Row {
    pub fn new(
        title: impl Into<String>,
        link: Option<String>,
        movies: Vec<(u64, Movie)>,
        viewport_width: u32,
        mode: LayoutMode,
    ) -> Self {
        let layout = SliderLayout::compute(viewport_width, movies.len(), mode);
        let items = records(movies);
        let slides = layout
            .slides()
            .map(|slide| items[layout.slide_items(slide)].to_vec())
            .collect();
        Row {
            title: title.into(),
            link,
            layout,
            slides,
        }
    }
}

#[derive(Deserialize)]
pub struct ViewportQuery {
    /// Viewport width reported by the client
    vw: Option<u32>,
}

impl ViewportQuery {
    fn width(&self) -> u32 {
        self.vw.unwrap_or(Viewport::default().width)
    }
}

fn render(tera: &tera::Tera, template: &str, ctx: &tera::Context) -> Result<HttpResponse> {
    let body = tera.render(template, ctx)?;
    Ok(HttpResponse::Ok().content_type("text/html").body(body))
}

/// Context shared by every page: the session user and the genre navigation.
fn base_context(id: &Identity, db: &sled::Db) -> Result<(tera::Context, Option<(u64, User)>)> {
    let mut ctx = tera::Context::new();
    let user = current_user(id, db)?;
    if let Some((_, user)) = &user {
        ctx.insert("username", &user.username);
    }
    ctx.insert("genres", &records(db.genres()?));
    Ok((ctx, user))
}

/// The width the slides were laid out for. The client reloads with its own
/// width when that falls in a different band.
fn insert_viewport(ctx: &mut tera::Context, width: u32) {
    let breakpoints = Breakpoints::for_width(width);
    ctx.insert("viewport_width", &width);
    ctx.insert("band", breakpoints.band());
    ctx.insert("breakpoints", &breakpoints);
}

fn movie_or_not_found(db: &sled::Db, id: u64) -> Result<Movie> {
    db.get_movie(id)?
        .ok_or_else(|| Error::NotFound(format!("movie {}", id)))
}

async fn index(
    id: Identity,
    tera: Tera,
    db: Db,
    query: web::Query<ViewportQuery>,
) -> Result<HttpResponse> {
    let (mut ctx, user) = base_context(&id, &db)?;
    let width = query.width();
    let movies = db.movies()?;

    let mut rows = vec![
        Row::new(
            "Trending Now",
            None,
            catalog::trending(movies.clone()),
            width,
            LayoutMode::Backdrop,
        ),
        Row::new(
            "Popular",
            None,
            catalog::popular(movies.clone(), catalog::POPULAR_LIMIT),
            width,
            LayoutMode::Poster,
        ),
    ];
    if let Some((user_id, _)) = user {
        let saved = my_list_movies(&db, user_id)?;
        if !saved.is_empty() {
            rows.push(Row::new(
                "My List",
                Some("/my-list".to_owned()),
                saved,
                width,
                LayoutMode::Poster,
            ));
        }
    }
    for (genre_id, genre) in db.genres()? {
        let in_genre = catalog::filter_by_genre(&movies, genre_id);
        if !in_genre.is_empty() {
            rows.push(Row::new(
                genre.name,
                Some(format!("/genre/{}", genre_id)),
                in_genre,
                width,
                LayoutMode::Poster,
            ));
        }
    }

    insert_viewport(&mut ctx, width);
    ctx.insert("rows", &rows);
    render(&tera, "index.html", &ctx)
}

async fn title(
    id: Identity,
    tera: Tera,
    db: Db,
    movie_id: web::Path<u64>,
    query: web::Query<ViewportQuery>,
) -> Result<HttpResponse> {
    let (mut ctx, user) = base_context(&id, &db)?;
    let movie_id = movie_id.into_inner();
    let movie = movie_or_not_found(&db, movie_id)?;

    let mut genre_names = Vec::new();
    for genre_id in &movie.genres {
        if let Some(genre) = db.get_genre(*genre_id)? {
            genre_names.push(Record::from((*genre_id, genre)));
        }
    }
    let in_list = match &user {
        Some((user_id, _)) => db.in_list(*user_id, movie_id)?,
        None => false,
    };
    let similar = catalog::similar(movie_id, &movie, db.movies()?, catalog::SIMILAR_LIMIT);

    ctx.insert("movie", &Record::from((movie_id, movie)));
    ctx.insert("movie_genres", &genre_names);
    ctx.insert("in_list", &in_list);
    insert_viewport(&mut ctx, query.width());
    ctx.insert(
        "similar",
        &Row::new(
            "More Like This",
            None,
            similar,
            query.width(),
            LayoutMode::Poster,
        ),
    );
    render(&tera, "title.html", &ctx)
}

async fn genre(id: Identity, tera: Tera, db: Db, genre_id: web::Path<u64>) -> Result<HttpResponse> {
    let (mut ctx, _user) = base_context(&id, &db)?;
    let genre_id = genre_id.into_inner();
    let genre = db
        .get_genre(genre_id)?
        .ok_or_else(|| Error::NotFound(format!("genre {}", genre_id)))?;
    ctx.insert("genre", &Record::from((genre_id, genre)));
    ctx.insert("movies", &records(db.movies_by_genre(genre_id)?));
    render(&tera, "genre.html", &ctx)
}

async fn search(
    id: Identity,
    tera: Tera,
    db: Db,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    let (mut ctx, _user) = base_context(&id, &db)?;
    ctx.insert("query", &query.q);
    ctx.insert("movies", &records(catalog::search(db.movies()?, &query.q)));
    render(&tera, "search.html", &ctx)
}

async fn my_list(id: Identity, tera: Tera, db: Db) -> Result<HttpResponse> {
    let (mut ctx, user) = base_context(&id, &db)?;
    let (user_id, _) = match user {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Found()
                .append_header((header::LOCATION, "/login"))
                .finish())
        }
    };
    ctx.insert("movies", &records(my_list_movies(&db, user_id)?));
    render(&tera, "my_list.html", &ctx)
}

async fn watch(id: Identity, tera: Tera, db: Db, movie_id: web::Path<u64>) -> Result<HttpResponse> {
    let (mut ctx, _user) = base_context(&id, &db)?;
    let movie_id = movie_id.into_inner();
    let movie = movie_or_not_found(&db, movie_id)?;
    ctx.insert("movie", &Record::from((movie_id, movie)));
    render(&tera, "watch.html", &ctx)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/title/{id}", web::get().to(title))
        .route("/genre/{id}", web::get().to(genre))
        .route("/search", web::get().to(search))
        .route("/my-list", web::get().to(my_list))
        .route("/watch/{id}", web::get().to(watch));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use actix_web::{http::StatusCode, test};

    async fn body_text<B: actix_web::body::MessageBody>(resp: actix_web::dev::ServiceResponse<B>) -> String {
        let body = test::read_body(resp).await;
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[actix_rt::test]
    async fn rows_are_split_into_slides() {
        let db = seeded_db();
        let movies = db.movies().unwrap();
        let row = Row::new("All", None, movies.clone(), 400, LayoutMode::Poster);
        assert_eq!(row.layout.items_per_page, 3);
        assert_eq!(row.slides.len(), 6);
        assert_eq!(row.slides[5].len(), 1);
        assert_eq!(
            row.slides.iter().map(Vec::len).sum::<usize>(),
            movies.len()
        );

        let empty = Row::new("Empty", None, Vec::new(), 1280, LayoutMode::Backdrop);
        assert_eq!(empty.slides.len(), 1);
        assert!(empty.slides[0].is_empty());
    }

    #[actix_rt::test]
    async fn index_renders_rows() {
        let app = test_app!(seeded_db());
        let req = test::TestRequest::get().uri("/?vw=400").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_text(resp).await;
        assert!(body.contains("Trending Now"));
        assert!(body.contains("Documentary"));
        assert!(!body.contains("My List</h2>"));
    }

    #[actix_rt::test]
    async fn index_reports_viewport_band() {
        let app = test_app!(seeded_db());
        let req = test::TestRequest::get().uri("/?vw=400").to_request();
        let body = body_text(test::call_service(&app, req).await).await;
        assert!(body.contains(r#"data-band="mobile""#));
        assert!(body.contains(r#"data-viewport-width="400""#));
        assert!(body.contains(r#"data-per-page="3""#));
        assert!(body.contains(r#"data-per-page="1""#));
        assert!(!body.contains(r#"data-per-page="5""#));

        let req = test::TestRequest::get().uri("/?vw=800").to_request();
        let body = body_text(test::call_service(&app, req).await).await;
        assert!(body.contains(r#"data-band="tablet""#));
        assert!(body.contains(r#"data-per-page="4""#));

        let req = test::TestRequest::get().uri("/").to_request();
        let body = body_text(test::call_service(&app, req).await).await;
        assert!(body.contains(r#"data-band="desktop""#));
        assert!(body.contains(r#"data-per-page="5""#));
    }

    #[actix_rt::test]
    async fn title_page() {
        let db = seeded_db();
        let godfather = movie_id(&db, "The Godfather");
        let app = test_app!(db);
        let req = test::TestRequest::get()
            .uri(&format!("/title/{}", godfather))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_text(resp).await;
        assert!(body.contains("Marlon Brando"));
        assert!(body.contains("Goodfellas"));

        let req = test::TestRequest::get().uri("/title/999999").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_rt::test]
    async fn search_page() {
        let app = test_app!(seeded_db());
        let req = test::TestRequest::get().uri("/search?q=GOD").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("The Godfather"));
    }

    #[actix_rt::test]
    async fn my_list_page_redirects_without_session() {
        let app = test_app!(seeded_db());
        let req = test::TestRequest::get().uri("/my-list").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers().get("location").unwrap(), "/login");
    }

    #[actix_rt::test]
    async fn my_list_row_on_index() {
        let db = seeded_db();
        let heat = movie_id(&db, "Heat");
        let (user_id, _) = db.get_user_by_username("demo").unwrap().unwrap();
        db.add_to_list(user_id, heat).unwrap();
        let app = test_app!(db);
        let cookie = login!(&app, "demo", "demo");

        let req = test::TestRequest::get().uri("/").cookie(cookie.clone()).to_request();
        let body = body_text(test::call_service(&app, req).await).await;
        assert!(body.contains("My List</h2>"));

        let req = test::TestRequest::get()
            .uri("/my-list")
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("Heat"));
    }

    #[actix_rt::test]
    async fn genre_and_watch_pages() {
        let db = seeded_db();
        let documentary = genre_id(&db, "Documentary");
        let free_solo = movie_id(&db, "Free Solo");
        let app = test_app!(db);

        let req = test::TestRequest::get()
            .uri(&format!("/genre/{}", documentary))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_text(resp).await;
        assert!(body.contains("Planet Earth"));
        assert!(!body.contains("Heat"));

        let req = test::TestRequest::get()
            .uri(&format!("/watch/{}", free_solo))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("free-solo.mp4"));
    }
}
