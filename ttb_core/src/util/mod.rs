pub mod arena;
pub mod data;
pub mod iter;
