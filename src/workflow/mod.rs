//! The upload → select → generate → display workflow as explicit state plus
//! a single reducer.

pub mod event;
pub mod reducer;
pub mod state;

pub use event::{Effect, Event, Transition};
pub use reducer::{
    generate_failure, generate_start, generate_success, reduce, reject_upload, select_room_type,
    upload,
};
pub use state::{GeneratorPhase, Stage, WorkflowState};
