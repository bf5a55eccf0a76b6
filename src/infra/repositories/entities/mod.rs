//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod case;
pub mod hearing;
pub mod note;
pub mod personal_info;
pub mod petitioner;
pub mod respondent;
pub mod upload;
pub mod user;

// Re-exports for public API convenience
#[allow(unused_imports)]
pub use case::{ActiveModel as CaseActiveModel, Entity as CaseEntity, Model as CaseModel};
#[allow(unused_imports)]
pub use upload::{ActiveModel as UploadActiveModel, Entity as UploadEntity, Model as UploadModel};
#[allow(unused_imports)]
pub use user::{ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel};
