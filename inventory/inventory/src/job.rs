use std::cell::RefCell;
use std::fmt::{Display, Formatter};
use std::rc::Rc;
use std::str::FromStr;

use indexmap::IndexMap;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use tracing::{debug, info, warn};

use crate::color::Color;
use crate::hardware_set::{HardwareSet, InventoryError, RackSet};
use crate::rankspec::RankSpec;
use crate::state::StateError;

pub type JobHandle = Rc<RefCell<Job>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawJobId", into = "String")]
pub struct JobId(String);

impl JobId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Workload managers report ids as either strings or numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawJobId {
    Text(String),
    Number(u64),
}

impl From<RawJobId> for JobId {
    fn from(value: RawJobId) -> Self {
        match value {
            RawJobId::Text(text) => Self(text),
            RawJobId::Number(number) => Self(number.to_string()),
        }
    }
}

impl From<JobId> for String {
    fn from(value: JobId) -> Self {
        value.0
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Display for JobId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Job state code.  `T` is terminal, unknown codes are carried as-is and treated as non-terminal.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub enum JobState {
    Booting,
    #[default]
    Running,
    Terminated,
    Other(char),
}

impl JobState {
    pub fn code(&self) -> char {
        match self {
            JobState::Booting => 'B',
            JobState::Running => 'S',
            JobState::Terminated => 'T',
            JobState::Other(code) => *code,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Terminated)
    }
}

impl From<char> for JobState {
    fn from(code: char) -> Self {
        match code {
            'B' => JobState::Booting,
            'S' => JobState::Running,
            'T' => JobState::Terminated,
            other => JobState::Other(other),
        }
    }
}

impl FromStr for JobState {
    type Err = StateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(code), None) => Ok(JobState::from(code)),
            _ => Err(StateError::InvalidCode(value.to_string())),
        }
    }
}

impl Display for JobState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Attributes of a job as last reported, replaced wholesale on every update.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct JobInfo {
    pub name: String,
    pub state: JobState,
    /// workload-manager state tag, e.g. `COMPLETED`, selects the terminal color
    pub wlm_state: Option<String>,
    pub user: String,
    pub bsn: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub exit_status: Option<String>,
    /// node count as reported, see [`Job::node_count`] for the resolved count
    pub reported_nodes: Option<usize>,
    /// whitespace separated node locations
    pub nodes: String,
    pub accounting: Option<String>,
}

#[derive(Debug)]
pub struct Job {
    id: JobId,
    info: JobInfo,
    rankspec: Option<RankSpec>,
    rackset: RackSet,
    node_count: usize,
    color: Option<Color>,
}

impl Job {
    /// Resolves the rankspec against the compute bucket of `hardware` to find the racks the job touches.
    ///
    /// The rackset is not updated afterwards.
    pub fn new(
        id: JobId,
        info: JobInfo,
        rankspec: Option<RankSpec>,
        hardware: &HardwareSet,
    ) -> Result<Self, InventoryError> {
        let (rackset, node_count) = match &rankspec {
            Some(spec) => {
                let nodes = hardware.resolve_ranks(&hardware.options().compute_type, spec)?;
                let rackset = hardware.rackset(
                    nodes
                        .iter()
                        .map(|(key, _value)| *key),
                );
                (rackset, nodes.len())
            }
            None => (RackSet::new(), 0),
        };

        Ok(Self {
            id,
            info,
            rankspec,
            rackset,
            node_count,
            color: None,
        })
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn info(&self) -> &JobInfo {
        &self.info
    }

    pub fn rankspec(&self) -> Option<&RankSpec> {
        self.rankspec.as_ref()
    }

    pub fn rackset(&self) -> &RackSet {
        &self.rackset
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn is_terminal(&self) -> bool {
        self.info.state.is_terminal()
    }
}

pub const RUNNING_JOB: &str = "running job";

/// Colors for terminal jobs, keyed by workload-manager state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobPalette(IndexMap<String, Color>);

impl Default for JobPalette {
    fn default() -> Self {
        Self(IndexMap::from([
            (RUNNING_JOB.to_string(), Color::rgb(0xf5, 0xf9, 0x10)),
            ("COMPLETED".to_string(), Color::rgb(0x2f, 0xaf, 0x51)),
            ("NODE_FAIL".to_string(), Color::rgb(0xfa, 0x20, 0x26)),
            ("TIMEOUT".to_string(), Color::rgb(0x18, 0x18, 0x96)),
            ("FAILED".to_string(), Color::rgb(0xfa, 0x20, 0x26)),
            ("CANCELLED".to_string(), Color::rgb(0x18, 0x18, 0x96)),
        ]))
    }
}

impl JobPalette {
    /// `None`, with a warning, for unknown or missing tags.
    pub fn color_for(&self, wlm_state: Option<&str>) -> Option<Color> {
        let color = wlm_state.and_then(|tag| self.0.get(tag).copied());
        if color.is_none() {
            warn!("No job color for workload-manager state. wlm_state: {:?}", wlm_state);
        }
        color
    }
}

/// Outcome of applying a job record.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum JobUpdate {
    /// first sighting of the job
    Added,
    /// no job with the id
    Unknown,
    /// the job was already terminal, nothing changed
    Ignored,
    Updated,
    /// the job transitioned into the terminal state
    Terminated,
}

/// All known jobs, active and terminal.  Terminal jobs are kept for history.
pub struct JobSet {
    jobs: IndexMap<JobId, JobHandle>,
    palette: JobPalette,
    rng: SmallRng,
}

impl JobSet {
    pub fn new(palette: JobPalette) -> Self {
        Self::with_rng(palette, SmallRng::from_os_rng())
    }

    /// Seeded constructor, for repeatable colors.
    pub fn with_rng(palette: JobPalette, rng: SmallRng) -> Self {
        Self {
            jobs: IndexMap::new(),
            palette,
            rng,
        }
    }

    pub fn palette(&self) -> &JobPalette {
        &self.palette
    }

    /// Adds, or replaces, a job and assigns its display color.
    pub fn add_job(&mut self, mut job: Job) -> JobHandle {
        job.color = match job.is_terminal() {
            true => self
                .palette
                .color_for(job.info.wlm_state.as_deref()),
            false => Some(self.random_color()),
        };
        info!(
            "Job added. job: '{}', state: {}, nodes: {}, color: {:?}",
            job.id, job.info.state, job.node_count, job.color
        );

        let id = job.id.clone();
        let handle = Rc::new(RefCell::new(job));
        if let Some(previous) = self.jobs.insert(id, handle.clone()) {
            warn!("Job replaced. job: '{}'", previous.borrow().id);
        }
        handle
    }

    /// Replaces the info of a non-terminal job.  A job entering the terminal state gets its palette color.
    pub fn update_job(&mut self, id: &JobId, info: JobInfo) -> JobUpdate {
        let Some(handle) = self.jobs.get(id) else {
            return JobUpdate::Unknown;
        };
        let mut job = handle.borrow_mut();
        if job.is_terminal() {
            debug!("Ignoring update of terminal job. job: '{}'", id);
            return JobUpdate::Ignored;
        }

        job.info = info;
        if !job.is_terminal() {
            return JobUpdate::Updated;
        }

        job.color = self
            .palette
            .color_for(job.info.wlm_state.as_deref());
        info!("Job terminated. job: '{}', color: {:?}", id, job.color);
        JobUpdate::Terminated
    }

    /// Stops tracking a job.  Nodes still assigned to it are released.
    pub fn remove_job(&mut self, id: &JobId, hardware: &mut HardwareSet) -> Option<JobHandle> {
        let handle = self.jobs.shift_remove(id)?;
        handle.borrow_mut().color = None;
        let released = hardware.unassign_job(&handle);
        info!("Job removed. job: '{}', released_nodes: {}", id, released);
        Some(handle)
    }

    pub fn get_job_by_id(&self, id: &JobId) -> Option<&JobHandle> {
        self.jobs.get(id)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &JobHandle> {
        self.jobs.values()
    }

    pub fn active_jobs(&self) -> impl Iterator<Item = &JobHandle> {
        self.jobs
            .values()
            .filter(|job| !job.borrow().is_terminal())
    }

    fn random_color(&mut self) -> Color {
        Color::rgb(
            self.rng.random_range(50..250),
            self.rng.random_range(50..250),
            self.rng.random_range(50..200),
        )
    }
}
