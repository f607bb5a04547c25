pub mod fetch_service;
pub mod store_service;
pub mod update_service;
