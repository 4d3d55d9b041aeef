use actix_web::{middleware::Logger, web, App, HttpServer};
use log::info;
use moviedeck::{auth, config::Config, routes, seed};
use std::io;

fn io_error<E: std::error::Error + Send + Sync + 'static>(err: E) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err)
}

#[actix_rt::main]
async fn main() -> io::Result<()> {
    let config = Config::from_env().map_err(io_error)?;

    std::env::set_var("RUST_BACKTRACE", "1");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log)).init();

    let db = config.open_db().map_err(io_error)?;
    if config.seed {
        seed::seed(&db, config.bcrypt_cost).map_err(io_error)?;
    }
    let tera = tera::Tera::new(&config.templates).map_err(io_error)?;

    let db = web::Data::new(db);
    let tera = web::Data::new(tera);
    let private_key = config.cookie_key.clone().into_bytes();

    info!("Listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(auth::identity_service(&private_key))
            .app_data(tera.clone())
            .app_data(db.clone())
            .configure(routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
