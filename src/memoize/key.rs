//! Cache key derivation for memoized calls.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::Result;

// == Memoize Key ==
/// `owner-operation-discriminator`, where the discriminator is an explicit key
/// or the SHA-256 of the JSON-serialized arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoizeKey(String);

impl MemoizeKey {
    /// Derives the key for one call.
    ///
    /// Arguments are only serialized when no explicit key is given; a
    /// serialization failure is returned as an error rather than
    /// degrading to a cache miss.
    pub fn derive<A>(owner: &str, operation: &str, explicit: Option<&str>, args: &A) -> Result<Self>
    where
        A: Serialize + ?Sized,
    {
        let discriminator = match explicit {
            Some(key) => key.to_string(),
            None => args_digest(args)?,
        };
        Ok(Self(format!("{}-{}-{}", owner, operation, discriminator)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MemoizeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Short type name of `O`, usable as the owner part of a key.
///
/// Generic parameters and module paths are dropped, so `app::UserRepo<Db>`
/// becomes `UserRepo`.
pub fn type_owner<O: ?Sized>() -> &'static str {
    let full = std::any::type_name::<O>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Full-length lowercase hex SHA-256 of the serialized arguments.
pub fn args_digest<A>(args: &A) -> Result<String>
where
    A: Serialize + ?Sized,
{
    let bytes = serde_json::to_vec(args)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}
