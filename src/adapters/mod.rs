// Adapters - External system implementations

pub mod chunks_dir;
pub mod inference_http;
pub mod inference_replay;
pub mod store_json;
pub mod store_memory;
pub mod toml_config;

// Re-export adapters
pub use chunks_dir::DirectoryChunkSource;
pub use inference_http::HttpInferenceAdapter;
pub use inference_replay::ReplayInferenceAdapter;
pub use store_json::JsonFileProjectStore;
pub use store_memory::MemoryProjectStore;
pub use toml_config::TomlConfigAdapter;
