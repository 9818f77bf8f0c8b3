pub mod db_init;
pub mod moralis;
pub mod notifier;

pub mod alert_store;
pub mod change_detector;
pub mod price_store;
pub mod swap_service;
pub mod tracker;
