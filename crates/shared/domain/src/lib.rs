//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! users as submitted, the attributes derived for them, persisted records,
//! and the pagination/ordering rules of the listing.

pub mod constants;
pub mod error;
pub mod pagination;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use pagination::{PageRequest, PaginatedUsers, SortColumn};
pub use user::{parse_user_id, AttributeSet, User, UserFields, UserRecord};
