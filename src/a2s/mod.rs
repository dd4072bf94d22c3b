// src/a2s/mod.rs
pub mod client;
pub mod packet;

pub use client::{A2sClient, ServerQuery};
