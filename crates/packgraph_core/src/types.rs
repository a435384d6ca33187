pub use self::asset::*;
pub use self::config::*;
pub use self::dependency::*;
pub use self::dev_dep::*;
pub use self::environment::*;
pub use self::file_event::*;
pub use self::target::*;
pub use self::transformer_request::*;

mod asset;
mod config;
mod dependency;
mod dev_dep;
mod environment;
mod file_event;
mod target;
mod transformer_request;

pub type JSONObject = serde_json::value::Map<String, serde_json::Value>;
