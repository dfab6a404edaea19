mod runner;
mod template;

pub use runner::{CommandObserver, ProcessRunner, TracingObserver, NO_EXIT_CODE};
pub use template::{CommandTemplate, CommandTemplates, Invocation, Placeholder};
