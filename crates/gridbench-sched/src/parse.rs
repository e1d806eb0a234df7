//! Parsers for scheduler command output.
//!
//! Pure functions over captured stdout, one pair per scheduler: extract
//! the job id from a submission message, and count provisioned compute
//! nodes from the listing command. Keeping these free of I/O makes them
//! testable against canned output verbatim from real clusters.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{SchedError, SchedResult};

static SLURM_SUBMIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Submitted batch job (\d+)").unwrap());

static SGE_SUBMIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Your job(?:-array)? (\d+)").unwrap());

static TORQUE_SUBMIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)(?:\.\S+)?\s*$").unwrap());

/// Extract the job id from `sbatch` output
/// (`Submitted batch job 42`).
pub fn parse_slurm_submit(stdout: &str) -> SchedResult<String> {
    capture_first(&SLURM_SUBMIT_RE, stdout)
}

/// Extract the job id from `qsub` output on sge
/// (`Your job 42 ("sleep 60") has been submitted`).
pub fn parse_sge_submit(stdout: &str) -> SchedResult<String> {
    capture_first(&SGE_SUBMIT_RE, stdout)
}

/// Extract the job id from `qsub` output on torque, which prints the
/// bare full job id (`42.head-node`) on a line of its own.
pub fn parse_torque_submit(stdout: &str) -> SchedResult<String> {
    stdout
        .lines()
        .find_map(|line| TORQUE_SUBMIT_RE.captures(line))
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| SchedError::UnparseableSubmit(stdout.to_string()))
}

fn capture_first(re: &Regex, stdout: &str) -> SchedResult<String> {
    re.captures(stdout)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| SchedError::UnparseableSubmit(stdout.to_string()))
}

/// Sum the per-partition node counts printed by `sinfo -h -o %D`.
///
/// One number per partition row; an empty listing means zero nodes.
pub fn parse_sinfo_node_count(stdout: &str) -> SchedResult<u32> {
    let mut total = 0u32;
    for line in stdout.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let count: u32 = line.parse().map_err(|_| {
            SchedError::UnparseableCount(format!("unexpected sinfo row {line:?}"))
        })?;
        total += count;
    }
    Ok(total)
}

/// Count execution hosts in `qhost` output.
///
/// Skips the two header lines and the `global` pseudo-host; every
/// remaining non-empty row is one compute host.
pub fn parse_qhost_node_count(stdout: &str) -> SchedResult<u32> {
    let mut count = 0u32;
    for line in stdout.lines() {
        let line = line.trim_end();
        if line.is_empty() || line.starts_with("HOSTNAME") || line.starts_with('-') {
            continue;
        }
        let Some(hostname) = line.split_whitespace().next() else {
            continue;
        };
        if hostname == "global" {
            continue;
        }
        count += 1;
    }
    Ok(count)
}

/// Count usable nodes in `pbsnodes` stanza output.
///
/// Stanzas are separated by blank lines; the first line is the hostname
/// and an indented `state = ...` attribute follows. Nodes whose state
/// contains `down` or `offline` are excluded.
pub fn parse_pbsnodes_node_count(stdout: &str) -> SchedResult<u32> {
    let mut count = 0u32;
    for stanza in stdout.split("\n\n") {
        let stanza = stanza.trim();
        if stanza.is_empty() {
            continue;
        }
        let Some(state) = stanza.lines().find_map(|line| {
            line.trim().strip_prefix("state =").map(str::trim)
        }) else {
            continue;
        };
        if state.contains("down") || state.contains("offline") {
            continue;
        }
        count += 1;
    }
    Ok(count)
}
