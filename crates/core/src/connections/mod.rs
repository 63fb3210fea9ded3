//! Connections module - OAuth connection models, services, and traits.

mod connections_model;
mod connections_service;
mod connections_traits;

mod connections_service_tests;

pub use connections_model::{
    GoogleConnection, GoogleProfile, NewGoogleConnection, OauthCallbackOutcome, TokenSet,
    AUTHORIZATION_SCOPES,
};
pub use connections_service::ConnectionService;
pub use connections_traits::{
    ConnectionRepositoryTrait, ConnectionServiceTrait, OauthExchangeTrait,
};
