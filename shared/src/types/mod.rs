pub mod client_config;
pub mod json_error;
pub mod login;
pub mod register;
pub mod task;
pub mod user;

pub use self::json_error::ErrorBody;
pub use self::login::{LoginData, LoginResponse};
pub use self::register::{RegistrationData, RegistrationResponse};
pub use self::task::{ImageUpload, Task, TaskDraft, TaskImage, TaskStatus};
pub use self::user::{Role, SessionUser, User};
