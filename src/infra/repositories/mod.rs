//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod case_repository;
pub mod entities;
mod upload_repository;
mod user_repository;

pub use case_repository::{CaseRepository, CaseStore};
pub use upload_repository::{UploadRepository, UploadStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for unit tests
#[cfg(any(test, feature = "test-utils"))]
pub use case_repository::MockCaseRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use upload_repository::MockUploadRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
