//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services use Unit of Work pattern for centralized repository
//! access and transaction management.

mod cases;
pub mod container;
mod lifecycle;
mod personal;
mod transfer;
mod users;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use cases::{CaseManager, CaseService};
pub use lifecycle::{LifecycleManager, UserDeletion, UserLifecycleService};
pub use personal::{PersonalFileManager, PersonalFileService};
pub use transfer::{BulkTransfer, CaseAssignment, CaseTransferService, TransferEngine};
pub use users::{UserDirectory, UserDirectoryService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
