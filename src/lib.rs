//! Resume Fit Scoring Service
//!
//! This library provides the core of the resume-fit service, which scores
//! how well an uploaded resume matches a job description. Uploads are
//! analysed asynchronously: text is extracted, chunked and embedded, scored
//! by cosine similarity against the job description, and explained by an
//! LLM-written summary. Callers poll an in-memory job store for the result.

pub mod app_state;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
