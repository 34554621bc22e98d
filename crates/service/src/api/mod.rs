pub mod canvas;
pub mod health;
pub mod index;

pub use canvas::{download_canvas, retrieve_canvas, save_canvas};
pub use health::health_check;
pub use index::index;
