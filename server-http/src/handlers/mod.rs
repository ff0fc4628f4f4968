pub mod health;
pub mod items;

pub use health::health_check;
pub use items::{get_items_cached, get_items_uncached};
