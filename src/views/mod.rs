// Server-rendered views for human inspection of captured requests

pub mod detail_header;
pub mod renderer;

pub use detail_header::{format_locale_timestamp, DetailHeader};
pub use renderer::Renderer;
