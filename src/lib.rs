pub mod api;
pub mod db;
pub mod serde_utils;
