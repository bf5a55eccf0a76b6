//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, ObjectStore};
use crate::services::{
    CaseService, CaseTransferService, PersonalFileService, ServiceContainer, Services,
    UserDirectoryService, UserLifecycleService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Personal file service
    pub personal_files: Arc<dyn PersonalFileService>,
    /// Case transfer service
    pub transfers: Arc<dyn CaseTransferService>,
    /// User lifecycle service
    pub lifecycle: Arc<dyn UserLifecycleService>,
    /// Case service
    pub case_service: Arc<dyn CaseService>,
    /// User directory service
    pub user_directory: Arc<dyn UserDirectoryService>,
    /// Database connection
    pub database: Arc<Database>,
    /// Application configuration
    pub config: Config,
}

impl AppState {
    /// Create application state from database, object store and config.
    pub fn from_config(database: Arc<Database>, store: Arc<dyn ObjectStore>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), store);

        Self {
            personal_files: container.personal_files(),
            transfers: container.transfers(),
            lifecycle: container.lifecycle(),
            case_service: container.cases(),
            user_directory: container.users(),
            database,
            config,
        }
    }

    /// Create new application state with manually injected services.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        personal_files: Arc<dyn PersonalFileService>,
        transfers: Arc<dyn CaseTransferService>,
        lifecycle: Arc<dyn UserLifecycleService>,
        case_service: Arc<dyn CaseService>,
        user_directory: Arc<dyn UserDirectoryService>,
        database: Arc<Database>,
        config: Config,
    ) -> Self {
        Self {
            personal_files,
            transfers,
            lifecycle,
            case_service,
            user_directory,
            database,
            config,
        }
    }
}
