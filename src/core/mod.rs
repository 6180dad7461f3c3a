//! Core application module
//!
//! This module contains:
//! - Application entry point and Cosmic Application implementation
//! - Navigation routes

pub mod app;
pub mod route;
