pub mod point;
pub mod point_store;
pub mod theme;
