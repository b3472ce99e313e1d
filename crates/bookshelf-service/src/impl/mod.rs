//! Service implementations.

mod book_service_impl;
mod health_service_impl;

pub use book_service_impl::BookServiceImpl;
pub use health_service_impl::HealthServiceImpl;
