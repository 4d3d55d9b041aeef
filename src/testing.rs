//! Helpers shared by the HTTP tests.

use crate::database::*;
use crate::seed::seed;

/// Builds the full application around `$db` with the real templates.
macro_rules! test_app {
    ($db:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(crate::auth::identity_service(&[0u8; 32]))
                .app_data(actix_web::web::Data::new(crate::testing::templates()))
                .app_data(actix_web::web::Data::new($db))
                .configure(crate::routes),
        )
        .await
    };
}

/// Logs in through the form and returns the session cookie.
macro_rules! login {
    ($app:expr, $username:expr, $password:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri("/login")
            .set_form(&[("username", $username), ("password", $password)])
            .to_request();
        let resp = actix_web::test::call_service($app, req).await;
        resp.response()
            .cookies()
            .find(|cookie| cookie.name() == crate::auth::COOKIE_NAME)
            .expect("session cookie")
            .into_owned()
    }};
}

pub fn seeded_db() -> sled::Db {
    let db = sled::Config::new().temporary(true).open().unwrap();
    seed(&db, 4).unwrap();
    db
}

pub fn templates() -> tera::Tera {
    tera::Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*")).unwrap()
}

pub fn movie_id(db: &sled::Db, title: &str) -> u64 {
    db.movies()
        .unwrap()
        .into_iter()
        .find(|(_, movie)| movie.title == title)
        .map(|(id, _)| id)
        .unwrap()
}

pub fn genre_id(db: &sled::Db, name: &str) -> u64 {
    db.genres()
        .unwrap()
        .into_iter()
        .find(|(_, genre)| genre.name == name)
        .map(|(id, _)| id)
        .unwrap()
}
