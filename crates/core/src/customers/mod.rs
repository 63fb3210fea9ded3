//! Customers module - advertiser-account registry models, services, traits.

mod customers_model;
mod customers_service;
mod customers_traits;

mod customers_service_tests;

pub use customers_model::{AdsCustomer, NewAdsCustomer};
pub use customers_service::CustomerService;
pub use customers_traits::{CustomerRepositoryTrait, CustomerServiceTrait};
