//! Documents delivered by the external polling layer.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use crate::job::{JobId, JobInfo, JobState, RUNNING_JOB};
use crate::rankspec::RankSpec;
use crate::state::HardwareState;

/// One row of a full inventory snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStateRecord {
    pub lctn: String,
    pub state: HardwareState,
}

/// A rank-indexed state delta against one hwtype, the rankspec characters are state codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankSpecUpdate {
    pub hwtype: String,
    pub rankspec: RankSpec,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub jobid: JobId,
    #[serde(default)]
    pub jobname: String,
    pub state: JobState,
    #[serde(default)]
    pub bsn: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub starttimestamp: Option<String>,
    #[serde(default)]
    pub endtimestamp: Option<String>,
    #[serde(default)]
    pub exitstatus: Option<Value>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub numnodes: Option<usize>,
    #[serde(default)]
    pub nodes: Option<String>,
    #[serde(default)]
    pub wlmjobstate: Option<String>,
    #[serde(default)]
    pub jobacctinfo: Option<Value>,
}

impl JobRecord {
    /// Active records without a workload-manager state are reported as running.
    pub fn into_parts(self) -> (JobId, JobInfo) {
        let wlm_state = match (self.wlmjobstate, self.state.is_terminal()) {
            (Some(wlm_state), _) => Some(wlm_state),
            (None, false) => Some(RUNNING_JOB.to_string()),
            (None, true) => None,
        };

        let info = JobInfo {
            name: self.jobname,
            state: self.state,
            wlm_state,
            user: self.username,
            bsn: self.bsn,
            start_time: self.starttimestamp,
            end_time: self.endtimestamp,
            exit_status: self.exitstatus.map(value_to_text),
            reported_nodes: self.numnodes,
            nodes: self.nodes.unwrap_or_default(),
            accounting: self.jobacctinfo.map(value_to_text),
        };

        (self.jobid, info)
    }
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

/// Everything one poll cycle delivered.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Feed {
    pub node_states: Vec<NodeStateRecord>,
    pub rankspec_updates: Vec<RankSpecUpdate>,
    pub jobs: Vec<JobRecord>,
}
