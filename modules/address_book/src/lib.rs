//! Owner-scoped address book: contact CRUD, substring search and an
//! upcoming-birthdays window, exposed over REST and as an in-process client.

use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;

pub mod api;
pub mod config;
pub mod contract;
pub mod domain;
pub mod gateways;
pub mod infra;

pub use config::{AddressBookConfig, AuthConfig, RateLimitConfig};
pub use contract::{
    client::AddressBookApi,
    error::AddressBookError,
    model::{Contact, ContactFields, ContactId, ContactQuery, OwnerId},
};

use api::rest::rate_limit::RouteRateLimiter;
use domain::ports::{Authenticator, Clock, SystemClock};
use domain::service::Service;
use gateways::local::AddressBookLocalClient;
use infra::auth::jwt::JwtAuthenticator;
use infra::storage::sea_orm_repo::SeaOrmContactsRepository;

/// Wired address book module: service, authenticator and optional rate limiter.
pub struct AddressBook {
    service: Arc<Service>,
    authenticator: Arc<dyn Authenticator>,
    rate_limiter: Option<RouteRateLimiter>,
}

impl AddressBook {
    /// Build over an already migrated database using the wall clock.
    ///
    /// # Errors
    /// Returns an error if the rate limit settings are invalid.
    pub fn new(db: DatabaseConnection, config: &AddressBookConfig) -> anyhow::Result<Self> {
        Self::with_clock(db, config, Arc::new(SystemClock))
    }

    /// # Errors
    /// Returns an error if the rate limit settings are invalid.
    pub fn with_clock(
        db: DatabaseConnection,
        config: &AddressBookConfig,
        clock: Arc<dyn Clock>,
    ) -> anyhow::Result<Self> {
        if config.auth.uses_default_secret() {
            tracing::warn!(
                "auth.jwt_secret is not configured: bearer tokens are verified with the built-in default secret"
            );
        }

        let repo = Arc::new(SeaOrmContactsRepository::new(db));
        let service = Arc::new(Service::new(repo, clock, config.service_config()));
        let authenticator: Arc<dyn Authenticator> = Arc::new(JwtAuthenticator::new(&config.auth));

        let rate_limiter = match &config.rate_limit {
            Some(rl) => {
                tracing::info!(
                    requests = rl.requests,
                    per_seconds = rl.per_seconds,
                    "Contact routes are rate limited"
                );
                Some(RouteRateLimiter::from_config(rl)?)
            }
            None => None,
        };

        Ok(Self {
            service,
            authenticator,
            rate_limiter,
        })
    }

    pub fn service(&self) -> Arc<Service> {
        Arc::clone(&self.service)
    }

    /// In-process client for other components.
    pub fn client(&self) -> Arc<dyn AddressBookApi> {
        Arc::new(AddressBookLocalClient::new(self.service()))
    }

    /// REST routes under `/api/address_book`.
    pub fn router(&self) -> Router {
        api::rest::routes::register_routes(
            Router::new(),
            self.service(),
            Arc::clone(&self.authenticator),
            self.rate_limiter.clone(),
        )
    }
}
