mod catalog;
mod persistence;

pub use catalog::RecipeCatalog;
pub use persistence::{load_catalog, load_plan, load_recipes, save_plan};
