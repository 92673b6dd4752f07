pub mod ecosystem;
pub mod media;
pub mod root;

pub use ecosystem::{Ecosystem, Preset};
pub use media::MediaLibrary;
pub use root::{RootResponse, DEFAULT_MESSAGE, DEFAULT_STATIC_FILE};
