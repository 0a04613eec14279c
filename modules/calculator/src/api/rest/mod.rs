//! REST layer for the calculator module

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod openapi;
pub mod page;
pub mod routes;
