pub mod copy;
pub mod list;
pub mod model;
