// file: src/client/mod.rs
// description: GROBID API client module exports
// reference: internal module structure

pub mod grobid;

pub use grobid::GrobidClient;
