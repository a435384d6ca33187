pub use self::build_runner::*;
pub use self::work::*;

mod build_runner;
mod work;
