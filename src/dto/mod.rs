pub mod account;
pub mod admin;
pub mod auth;
pub mod library;
pub mod mixes;
pub mod reviews;
pub mod tracks;
