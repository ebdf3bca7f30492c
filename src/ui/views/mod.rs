mod catalog;

pub use catalog::CatalogView;
