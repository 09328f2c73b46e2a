//! Quaderno: a small blog server with a browser page, a five-endpoint
//! JSON API, and two-tier post storage (Postgres primary, in-memory
//! fallback).

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
