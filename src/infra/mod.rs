//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and repositories
//! - Object storage for uploaded files
//! - Unit of Work for transaction management

pub mod db;
pub mod repositories;
pub mod storage;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    CaseRepository, CaseStore, UploadRepository, UploadStore, UserRepository, UserStore,
};
pub use storage::{HttpObjectStore, MemoryObjectStore, ObjectStore};
pub use unit_of_work::{
    Persistence, TransactionContext, TxCaseRepository, TxNoteRepository, TxUploadRepository,
    TxUserRepository, UnitOfWork,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockCaseRepository, MockUploadRepository, MockUserRepository};
#[cfg(any(test, feature = "test-utils"))]
pub use storage::MockObjectStore;
