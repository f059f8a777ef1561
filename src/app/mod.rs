// Application layer: wires adapters and the resolver together for the binaries.

pub mod session;

pub use session::{cancel_on_ctrl_c, print_outcome, run_batch, run_resolution, SessionOutcome};
