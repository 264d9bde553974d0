pub mod mixins;
pub mod profile;
pub mod user;

pub use mixins::Timestamps;
pub use profile::Profile;
pub use user::{Role, User};
