//! Content entities mirrored from remote tables.

mod category;
mod event;
mod person;
mod record;
mod resource;
mod user;

pub use category::{Category, CategoryDraft, CategoryPatch};
pub use event::{Event, EventDraft, EventPatch};
pub use person::{Person, PersonDraft, PersonPatch};
pub use record::{Draft, Patch, Record, RecordId};
pub use resource::{MediaType, Resource, ResourceDraft, ResourcePatch};
pub use user::{NewUser, User, UserDraft, UserPatch, UserRole, UserStatus};
