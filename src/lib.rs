//! mdtasks library - outline codec, reconciliation engine, and the
//! Google Tasks client behind the `mdtasks` binary

pub mod cli;
pub mod markdown;
pub mod remote;
pub mod sync;
pub mod task;
