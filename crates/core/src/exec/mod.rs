//! External command execution.
//!
//! Every external program the pipeline touches (transfer tools, ownership and
//! permission fix-ups, the work command) goes through the [`CommandExecutor`]
//! trait. The only thing callers observe is the exit code, which keeps the
//! stages testable with [`crate::testing::MockExecutor`].
//!
//! # Example
//!
//! ```ignore
//! use stager_core::exec::{CommandExecutor, CommandSpec, ProcessExecutor};
//!
//! let executor = ProcessExecutor::new();
//! let spec = CommandSpec::new("wc")
//!     .arg("fileA")
//!     .current_dir("/scratch")
//!     .stdout_to("/scratch/out.txt");
//!
//! let outcome = executor.run(&spec).await?;
//! assert!(outcome.success());
//! ```

mod error;
mod process;
mod traits;
mod types;

pub use error::ExecError;
pub use process::ProcessExecutor;
pub use traits::CommandExecutor;
pub use types::{CommandSpec, ExitOutcome, Redirect};
