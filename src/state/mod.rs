mod catalog;
mod persistence;

pub use catalog::Catalog;
pub use persistence::{
    load_catalog, load_plan, load_profile, parse_catalog_json, save_plan, save_profile,
    write_week_csv,
};
