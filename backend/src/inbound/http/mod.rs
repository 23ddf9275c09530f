//! HTTP inbound adapter exposing the REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod items;
pub mod lists;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every API route on `cfg`.
///
/// Health probes are mounted separately because they need
/// [`health::HealthState`] rather than [`state::HttpState`].
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(users::register)
        .service(users::login)
        .service(lists::create_list)
        .service(lists::show_list)
        .service(lists::share_list)
        .service(items::create_item)
        .service(items::activate_item)
        .service(items::cancel_item)
        .service(items::complete_item)
        .service(items::update_item);
}
