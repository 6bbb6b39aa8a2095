pub mod intake;
pub mod poller;
pub mod recorder;

pub use intake::FileOutcome;
pub use poller::{PassSummary, Poller, PollerOptions, PollerState, RunSummary};
pub use recorder::ProcessRecorder;
