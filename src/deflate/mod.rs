//! DEFLATE (RFC 1951) decoder: block dispatch and the length/distance
//! tables it decodes against.

pub mod engine;
pub mod tables;

pub use engine::inflate;
