pub mod api;
pub mod error;
pub mod http;
pub mod store;

pub use api::{Page, TodoApi};
pub use error::{ApiError, SyncError};
pub use http::HttpApi;
pub use store::{Resource, Store};

/// How a mutation treats local state when the server call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// Local state changes only after the server confirms the write.
    Pessimistic,
    /// The attempted change is applied locally even when the server call
    /// fails, then the error is returned.
    MergeOnFailure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
    Delete,
}

impl Mutation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    pub fn policy(&self) -> WritePolicy {
        match self {
            Self::Create | Self::Delete => WritePolicy::Pessimistic,
            Self::Update => WritePolicy::MergeOnFailure,
        }
    }
}
