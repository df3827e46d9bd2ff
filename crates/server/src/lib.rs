//! HTTP transport, persistence and identity for the talent-match service.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod repository;
