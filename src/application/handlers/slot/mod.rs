//! Slot command and query handlers.

mod add_slot;
mod list_slots;
mod remove_slot;
mod update_slot;

pub use add_slot::{AddSlotCommand, AddSlotHandler};
pub use list_slots::{ListSlotsHandler, ListSlotsQuery};
pub use remove_slot::{RemoveSlotCommand, RemoveSlotHandler, RemoveSlotResult};
pub use update_slot::{UpdateSlotCommand, UpdateSlotHandler};
