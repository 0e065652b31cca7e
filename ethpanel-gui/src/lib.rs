pub mod app;
pub mod args;
pub mod code;
pub mod dir;
pub mod logger;
pub mod provider;
pub mod utils;

use ethpanel::Version;

pub const VERSION: Version = Version {
    major: 0,
    minor: 1,
    patch: 0,
};
