// App layer: user-facing flows built on top of the engine.

pub mod session;

pub use session::InteractiveSession;
