//! Request handlers

pub mod components;
