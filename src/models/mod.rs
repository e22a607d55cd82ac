//! Core data models for Livraria
//!
//! This module contains the catalog records and their identifiers.

pub mod book;
pub mod ids;

pub use book::{validate_price, Book, BookValidationError, NewBook};
pub use ids::BookId;
