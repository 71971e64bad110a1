pub mod config;
pub mod db;
pub mod domain;
pub mod entity;
pub mod error;
pub mod repository;
