pub mod create;
pub mod model;
