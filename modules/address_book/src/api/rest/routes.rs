use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Extension, Router};

use crate::api::rest::handlers;
use crate::api::rest::rate_limit::{rate_limit_middleware, RouteRateLimiter};
use crate::domain::ports::Authenticator;
use crate::domain::service::Service;

pub const CONTACTS_PATH: &str = "/api/address_book";
pub const CONTACT_PATH: &str = "/api/address_book/{contact_id}";

/// Mount the contact routes onto `router`.
///
/// Every route resolves its owner through `authenticator`; when a limiter is
/// given each (method, route, client) triple gets its own bucket.
pub fn register_routes(
    router: Router,
    service: Arc<Service>,
    authenticator: Arc<dyn Authenticator>,
    rate_limiter: Option<RouteRateLimiter>,
) -> Router {
    let mut contacts = Router::new()
        .route(
            CONTACTS_PATH,
            get(handlers::list_contacts).post(handlers::create_contact),
        )
        .route(
            CONTACT_PATH,
            get(handlers::get_contact)
                .put(handlers::update_contact)
                .delete(handlers::delete_contact),
        );

    if let Some(limiter) = rate_limiter {
        contacts = contacts.route_layer(from_fn_with_state(limiter, rate_limit_middleware));
    }

    router.merge(
        contacts
            .layer(Extension(service))
            .layer(Extension(authenticator)),
    )
}
