mod model;

pub use model::{Error, ExitCode, MachineError, Result};
