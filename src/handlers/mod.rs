pub mod analytics;

pub use analytics::{analytics_page, dashboard_data, page_views_json, raw_page, JsonDumpQuery};
