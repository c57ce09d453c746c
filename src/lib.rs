/*!
 * # enem-api - ENEM question catalog over HTTP
 *
 * A read-only service over a SQLite store of ENEM exam questions.
 *
 * ## Features
 *
 * - Filter questions by year, discipline and language
 * - Fixed-order pagination (year descending, index ascending)
 * - Single question lookup and uniform random draw
 * - Year, discipline and language enumerations
 * - Command-line viewing and JSON export of questions
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `database`: SQLite access to the question store:
 *   - `database::connection`: Shared connection handle
 *   - `database::schema`: Catalog tables and verification
 *   - `database::query`: Filter to SQL translation
 *   - `database::repository`: Query execution and hydration
 *   - `database::models`: Catalog entities and page types
 * - `store`: The `QuestionStore` trait used by the HTTP layer
 * - `server`: axum routes, handlers and error mapping
 * - `display`: Terminal rendering of questions
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![cfg_attr(test, allow(non_snake_case))]

// Public modules
pub mod app_config;
pub mod database;
pub mod display;
pub mod errors;
pub mod server;
pub mod store;

// Re-export main types for easier usage
pub use app_config::Config;
pub use database::models::{
    Alternative, LabeledValue, Pagination, Question, QuestionFilter, QuestionPage,
};
pub use database::{DatabaseConnection, Repository};
pub use errors::{ApiError, FilterError};
pub use store::QuestionStore;
