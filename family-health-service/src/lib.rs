//! Family health records service: people, pets, their health records and an
//! assistant that answers questions over them.

pub mod config;
pub mod dtos;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
