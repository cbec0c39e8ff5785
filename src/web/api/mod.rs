pub mod error;
pub mod predict;
pub mod track;
