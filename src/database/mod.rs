/*!
 * Database module for read access to the ENEM question store.
 *
 * This module provides SQLite-based access to:
 * - Questions with their optional discipline and language
 * - Alternatives and attached files of each question
 * - Discipline, language and year enumerations
 */

pub mod schema;
pub mod connection;
pub mod query;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::DatabaseConnection;
pub use repository::Repository;
