//! Task hierarchy model shared by the outline codec, the sync engine,
//! and the remote client

pub mod model;

pub use model::{Task, TaskList, TaskStatus};
