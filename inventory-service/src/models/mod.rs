mod item;

pub use item::{Item, ItemResponse};
