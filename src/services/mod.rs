pub mod analytics;
pub mod seed_data;
