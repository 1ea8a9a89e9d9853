pub mod constants;
pub mod frame;
pub mod label_map;
pub mod recognition;
