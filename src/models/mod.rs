pub mod choices;
pub mod schedule;
pub mod user_state;

pub use choices::{ConfirmAction, DeleteChoice, TimeChoice};
pub use schedule::{ClassDay, ClassTime, ScheduleEntry};
pub use user_state::{DialogueStep, UserState};
