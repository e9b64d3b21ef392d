pub mod focus;
pub mod habit;
pub mod note;
pub mod quote;
pub mod stats;
pub mod video;
