#[cfg(test)]
#[macro_use]
mod testing;

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod model;
pub mod pages;
pub mod seed;
pub mod slider;

use actix_web::web;

pub type Tera = web::Data<tera::Tera>;
pub type Db = web::Data<sled::Db>;

/// Registers every page and API route.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::path_config())
        .app_data(error::query_config());
    api::configure(cfg);
    auth::configure(cfg);
    pages::configure(cfg);
}
