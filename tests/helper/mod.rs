//! Test helper utilities

#![allow(dead_code, unused_imports)]

mod gitlab;
mod http;

pub use gitlab::*;
pub use http::*;
