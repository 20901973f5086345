mod user_profile;

pub use user_profile::*;
