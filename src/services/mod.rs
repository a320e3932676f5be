pub mod account_service;
pub mod admin_service;
pub mod auth_service;
pub mod library_service;
pub mod mix_service;
pub mod review_service;
pub mod track_service;
