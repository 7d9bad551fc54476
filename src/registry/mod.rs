//! Registry of frequently used repositories

pub mod record;
pub mod store;

pub use record::{repo_name_from_url, RepoRecord};
pub use store::{upsert, RepoRegistryStore};
