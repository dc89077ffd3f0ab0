pub mod document;
pub mod encryption;
#[cfg(not(target_arch = "wasm32"))]
pub mod file;
pub mod format;
pub mod http;
pub mod memory;
pub mod traits;
