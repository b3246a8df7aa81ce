//! Per-target artifact emitters.

pub mod golang;
pub mod typescript;

pub use golang::GoServerEmitter;
pub use typescript::TypeScriptEmitter;
