pub mod count;
pub mod event;
pub mod misc;

pub use count::handle_count;
pub use event::handle_event;
pub use misc::handle_completions;
