//! Service container - centralized service access.

use std::sync::Arc;

use super::{
    CaseService, CaseTransferService, PersonalFileService, UserDirectoryService,
    UserLifecycleService,
};
use crate::infra::{ObjectStore, Persistence};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get personal file service
    fn personal_files(&self) -> Arc<dyn PersonalFileService>;

    /// Get case transfer service
    fn transfers(&self) -> Arc<dyn CaseTransferService>;

    /// Get user lifecycle service
    fn lifecycle(&self) -> Arc<dyn UserLifecycleService>;

    /// Get case service
    fn cases(&self) -> Arc<dyn CaseService>;

    /// Get user directory service
    fn users(&self) -> Arc<dyn UserDirectoryService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    personal_files: Arc<dyn PersonalFileService>,
    transfers: Arc<dyn CaseTransferService>,
    lifecycle: Arc<dyn UserLifecycleService>,
    cases: Arc<dyn CaseService>,
    users: Arc<dyn UserDirectoryService>,
}

impl Services {
    pub fn new(
        personal_files: Arc<dyn PersonalFileService>,
        transfers: Arc<dyn CaseTransferService>,
        lifecycle: Arc<dyn UserLifecycleService>,
        cases: Arc<dyn CaseService>,
        users: Arc<dyn UserDirectoryService>,
    ) -> Self {
        Self {
            personal_files,
            transfers,
            lifecycle,
            cases,
            users,
        }
    }

    /// Wire every service over one Unit of Work and object store
    pub fn from_connection(db: sea_orm::DatabaseConnection, store: Arc<dyn ObjectStore>) -> Self {
        use super::{CaseManager, LifecycleManager, PersonalFileManager, TransferEngine, UserDirectory};

        let uow = Arc::new(Persistence::new(db));

        Self {
            personal_files: Arc::new(PersonalFileManager::new(uow.clone(), store.clone())),
            transfers: Arc::new(TransferEngine::new(uow.clone())),
            lifecycle: Arc::new(LifecycleManager::new(uow.clone(), store.clone())),
            cases: Arc::new(CaseManager::new(uow.clone(), store)),
            users: Arc::new(UserDirectory::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn personal_files(&self) -> Arc<dyn PersonalFileService> {
        self.personal_files.clone()
    }

    fn transfers(&self) -> Arc<dyn CaseTransferService> {
        self.transfers.clone()
    }

    fn lifecycle(&self) -> Arc<dyn UserLifecycleService> {
        self.lifecycle.clone()
    }

    fn cases(&self) -> Arc<dyn CaseService> {
        self.cases.clone()
    }

    fn users(&self) -> Arc<dyn UserDirectoryService> {
        self.users.clone()
    }
}
