//! Scheduler client — job submission and node counting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use gridbench_watch::{SchedulerStateSource, TransientQueryError};

use crate::error::{SchedError, SchedResult};
use crate::parse;
use crate::transport::{CommandOutput, CommandTransport};

/// The job schedulers gridbench can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerKind {
    #[default]
    Slurm,
    Sge,
    Torque,
}

impl fmt::Display for SchedulerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchedulerKind::Slurm => "slurm",
            SchedulerKind::Sge => "sge",
            SchedulerKind::Torque => "torque",
        };
        f.write_str(name)
    }
}

impl FromStr for SchedulerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "slurm" => Ok(SchedulerKind::Slurm),
            "sge" => Ok(SchedulerKind::Sge),
            "torque" => Ok(SchedulerKind::Torque),
            other => Err(format!("unknown scheduler kind: {other}")),
        }
    }
}

/// An accepted job's scheduler-assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A job to submit, sized to the scaling target.
///
/// Node-count schedulers (slurm, torque) take `nodes`; sge sizes by
/// `slots` instead.
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub command: String,
    pub nodes: Option<u32>,
    pub slots: Option<u32>,
}

impl JobRequest {
    /// Build a request that forces the scheduler to provision `target`
    /// compute nodes for `command`.
    pub fn sized_for(
        kind: SchedulerKind,
        command: impl Into<String>,
        target: u32,
        slots_per_node: u32,
    ) -> Self {
        let command = command.into();
        match kind {
            SchedulerKind::Sge => Self {
                command,
                nodes: None,
                slots: Some(target * slots_per_node),
            },
            SchedulerKind::Slurm | SchedulerKind::Torque => Self {
                command,
                nodes: Some(target),
                slots: None,
            },
        }
    }
}

/// Drives one scheduler through a [`CommandTransport`].
pub struct SchedulerClient<T> {
    kind: SchedulerKind,
    transport: T,
}

impl<T: CommandTransport> SchedulerClient<T> {
    pub fn new(kind: SchedulerKind, transport: T) -> Self {
        Self { kind, transport }
    }

    pub fn kind(&self) -> SchedulerKind {
        self.kind
    }

    /// Submit a job and return its scheduler-assigned id.
    pub async fn submit(&mut self, job: &JobRequest) -> SchedResult<JobId> {
        let command = self.submit_command(job);
        debug!(%command, "submitting job");
        let out = self.run_checked(&command).await?;

        let id = match self.kind {
            SchedulerKind::Slurm => parse::parse_slurm_submit(&out.stdout)?,
            SchedulerKind::Sge => parse::parse_sge_submit(&out.stdout)?,
            SchedulerKind::Torque => parse::parse_torque_submit(&out.stdout)?,
        };
        let id = JobId(id);
        info!(job_id = %id, scheduler = %self.kind, "job submitted");
        Ok(id)
    }

    /// Current number of provisioned compute nodes.
    pub async fn node_count(&mut self) -> SchedResult<u32> {
        let command = self.node_count_command();
        let out = self.run_checked(command).await?;
        match self.kind {
            SchedulerKind::Slurm => parse::parse_sinfo_node_count(&out.stdout),
            SchedulerKind::Sge => parse::parse_qhost_node_count(&out.stdout),
            SchedulerKind::Torque => parse::parse_pbsnodes_node_count(&out.stdout),
        }
    }

    /// Fetch a file's content through the transport (for log scanning).
    pub async fn read_file(&mut self, path: &str) -> SchedResult<String> {
        let out = self.run_checked(&format!("cat '{path}'")).await?;
        Ok(out.stdout)
    }

    fn submit_command(&self, job: &JobRequest) -> String {
        match self.kind {
            SchedulerKind::Slurm => {
                let mut command = format!("sbatch --wrap '{}'", job.command);
                if let Some(nodes) = job.nodes {
                    command.push_str(&format!(" -N {nodes}"));
                }
                command
            }
            SchedulerKind::Sge => {
                let mut command = format!("echo '{}' | qsub -b y", job.command);
                if let Some(slots) = job.slots {
                    command.push_str(&format!(" -pe mpi {slots}"));
                }
                command
            }
            SchedulerKind::Torque => {
                let mut command = format!("echo '{}' | qsub", job.command);
                if let Some(nodes) = job.nodes {
                    command.push_str(&format!(" -l nodes={nodes}"));
                }
                command
            }
        }
    }

    fn node_count_command(&self) -> &'static str {
        match self.kind {
            SchedulerKind::Slurm => "sinfo -h -o %D",
            SchedulerKind::Sge => "qhost",
            SchedulerKind::Torque => "pbsnodes",
        }
    }

    async fn run_checked(&mut self, command: &str) -> SchedResult<CommandOutput> {
        let out = self.transport.run(command).await?;
        if out.exit_code != 0 {
            return Err(SchedError::CommandFailed {
                command: command.to_string(),
                code: out.exit_code,
                stderr: out.stderr,
            });
        }
        Ok(out)
    }
}

impl<T: CommandTransport> SchedulerStateSource for SchedulerClient<T> {
    async fn compute_node_count(&mut self) -> Result<u32, TransientQueryError> {
        self.node_count()
            .await
            .map_err(|e| TransientQueryError::new(e.to_string()))
    }
}
