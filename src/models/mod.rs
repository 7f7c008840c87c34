pub mod event;
pub mod event_role;
pub mod notification;
pub mod place;
pub mod privilege;
pub mod recovery_token;
pub mod registration_request;
pub mod role;
pub mod task;
pub mod user;

pub use event::{Event, EventFilter, EventFormat, EventStatus, NewEvent};
pub use event_role::EventUserRole;
pub use notification::Notification;
pub use place::Place;
pub use privilege::Privilege;
pub use recovery_token::RecoveryToken;
pub use registration_request::{RegistrationRequest, RegistrationStatus};
pub use role::{Role, RoleType};
pub use task::{NewTask, Task, TaskDetails, TaskStatus};
pub use user::{User, UserWithRole};
