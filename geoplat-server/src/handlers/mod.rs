pub mod clicks;
pub mod geo;
pub mod trends;
