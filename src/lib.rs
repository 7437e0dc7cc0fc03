pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod graphql;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod search;
pub mod services;
pub mod validation;
