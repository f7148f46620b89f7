mod action_event;
mod action_kind;
mod guid;
mod notification;

pub use action_event::{ActionData, ActionEvent, EntityRef, USER_ENTITY_TYPE};
pub use action_kind::ActionKind;
pub use guid::Guid;
pub use notification::{Notification, NotificationType};
