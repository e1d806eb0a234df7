//! gridbench-sched — scheduler commands over a narrow execution seam.
//!
//! `SchedulerClient` knows how to talk to the three supported job
//! schedulers (slurm, sge, torque): build a submit command sized to a
//! node target, extract the job id from the submission output, and count
//! the currently provisioned compute nodes from the scheduler's listing
//! command. All execution goes through the `CommandTransport` trait; the
//! stock `LocalTransport` runs `sh -c` locally, optionally behind a
//! caller-supplied wrapper argv (an `ssh head-node` prefix makes the
//! remote hop someone else's problem).
//!
//! The client implements `SchedulerStateSource`, so it plugs straight
//! into the scaling watcher.

pub mod client;
pub mod error;
pub mod parse;
pub mod transport;

pub use client::{JobId, JobRequest, SchedulerClient, SchedulerKind};
pub use error::{SchedError, SchedResult, TransportError};
pub use transport::{CommandOutput, CommandTransport, LocalTransport};
