pub mod load;
pub mod model;
pub mod template;

pub use load::{load_config, load_config_from};
pub use model::Config;
