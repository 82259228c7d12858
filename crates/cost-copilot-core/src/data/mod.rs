pub mod cache;
pub mod loader;

pub use cache::DatasetCache;
pub use loader::{
    load_bom_csv, load_dataset_json, load_rates_csv, validate_dataset, DataSource, Dataset,
};
