//! Warehouse access
//!
//! The enrichment pipeline needs two things from the warehouse: run a SQL
//! query and get the rows back as a DataFrame, and upload a small DataFrame
//! as a named table. `WarehouseClient` captures exactly that; `SqlApiClient`
//! implements it over the platform's SQL API.

mod client;
mod dataframe;
mod error;

pub use client::{SqlApiClient, WarehouseClient};
pub use dataframe::{dataframe_from_rows, rows_from_dataframe};
pub use error::ClientError;
