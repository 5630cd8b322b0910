pub mod abstract_trait;
pub mod domain;
pub mod errors;
pub mod gateway;
pub mod model;
pub mod repository;
pub mod service;
pub mod utils;
pub mod config;

