//! Mock login backed by seeded users and a signed session cookie.

use crate::database::UserDb;
use crate::error::{Error, Result};
use crate::model::User;
use crate::Tera;
use actix_identity::{CookieIdentityPolicy, Identity, IdentityService};
use actix_web::{http::header, web, HttpResponse};
use log::{debug, info};
use serde::{Deserialize, Serialize};

pub const COOKIE_NAME: &str = "auth-cookie";

pub fn identity_service(private_key: &[u8]) -> IdentityService<CookieIdentityPolicy> {
    IdentityService::new(
        CookieIdentityPolicy::new(private_key)
            .name(COOKIE_NAME)
            .secure(false),
    )
}

/// The logged in user, if any. A session naming an unknown user is treated as logged out.
pub fn current_user(id: &Identity, db: &sled::Db) -> Result<Option<(u64, User)>> {
    match id.identity() {
        Some(username) => {
            let user = db.get_user_by_username(&username)?;
            if user.is_none() {
                debug!("Session for unknown user: {}", username);
            }
            Ok(user)
        }
        None => Ok(None),
    }
}

pub fn require_user(id: &Identity, db: &sled::Db) -> Result<(u64, User)> {
    current_user(id, db)?.ok_or(Error::Unauthorized)
}

#[derive(Deserialize)]
pub struct LoginQuery {
    wrong_password: Option<String>,
    logout: Option<String>,
}

pub async fn login(tera: Tera, query: web::Query<LoginQuery>) -> Result<HttpResponse> {
    let mut ctx = tera::Context::new();
    ctx.insert("wrong_password", &query.wrong_password.is_some());
    ctx.insert("logged_out", &query.logout.is_some());
    let body = tera.render("login.html", &ctx)?;
    Ok(HttpResponse::Ok().content_type("text/html").body(body))
}

#[derive(Serialize, Deserialize)]
pub struct LoginParams {
    username: String,
    password: String,
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .append_header((header::LOCATION, location))
        .finish()
}

pub async fn login_post(
    params: web::Form<LoginParams>,
    id: Identity,
    db: crate::Db,
) -> Result<HttpResponse> {
    if let Some((_user_id, user)) = db.get_user_by_username(&params.username)? {
        if bcrypt::verify(&params.password, &user.password_hash)? {
            info!("User logged in: {}", user.username);
            id.remember(user.username);
            return Ok(redirect("/"));
        }
    }
    Ok(redirect("/login?wrong_password"))
}

pub async fn logout(id: Identity) -> HttpResponse {
    id.forget();
    redirect("/login?logout")
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::get().to(login))
        .route("/login", web::post().to(login_post))
        .route("/logout", web::get().to(logout));
}
