pub mod api;
pub mod buildings;
pub mod config;
pub mod db;
