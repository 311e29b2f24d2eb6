//! Quoting storefront backend for a uniform manufacturer: catalog, session
//! cart, PDF quotes, customer accounts and an admin back-office.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod leads;
pub mod middleware;
pub mod models;
pub mod notify;
pub mod quote;
pub mod response;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod whatsapp;
