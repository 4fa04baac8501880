pub mod file_config_adapter;
pub mod csv_feed_adapter;
