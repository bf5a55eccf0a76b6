//! Core domain entities and data transfer objects.

mod case;
mod note;
mod upload;
mod user;

pub use case::{Case, CaseResponse};
pub use note::Note;
pub use upload::{Upload, UploadResponse};
pub use user::{Actor, PersonalInfo, User, UserResponse, UserRole, UserWithInfo};
