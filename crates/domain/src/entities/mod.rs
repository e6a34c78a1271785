//! Domain entities - Objects with identity and lifecycle

mod banner;
mod news;
mod point;

pub use banner::{Banner, DEFAULT_BANNER_CAPTION, Logo};
pub use news::NewsArticle;
pub use point::{Point, RiskCategory};
