//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod banner_store;
mod logo_store;
mod news_store;
mod point_store;

pub use banner_store::BannerStore;
pub use logo_store::LogoStore;
pub use news_store::{NewArticle, NewsStore, NewsUpdate};
pub use point_store::{NewPoint, PointStore, PointUpdate};
