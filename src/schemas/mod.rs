use serde::{Deserialize, Deserializer};

pub mod profiles;
pub mod users;

pub use profiles::{ProfileCreate, ProfileResponse, ProfileUpdate};
pub use users::{UserCreate, UserResponse, UserUpdate};

/// Keeps an explicit `null` apart from a missing field on partial updates.
/// Pair with `#[serde(default)]` so absence stays `None`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
