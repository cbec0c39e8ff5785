mod position;

pub use position::{current_position, TrackPosition};
