pub mod ecosystem_loader;
pub mod media_loader;
pub mod stream_runner;

pub use media_loader::load_media;
pub use stream_runner::run_forever;
