use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info, warn};

use crate::feed::{Feed, JobRecord, NodeStateRecord, RankSpecUpdate};
use crate::hardware_set::{HardwareSet, InventoryError, RackSet};
use crate::job::{Job, JobHandle, JobId, JobSet, JobUpdate};
use crate::rankspec::demo_rankspec;

/// Result of applying a batch of feed records.  Failed records are skipped, not fatal.
#[derive(Debug, Default)]
pub struct FeedReport {
    pub applied: usize,
    pub errors: Vec<InventoryError>,
}

impl FeedReport {
    fn record<T>(&mut self, result: Result<T, InventoryError>) {
        match result {
            Ok(_) => self.applied += 1,
            Err(error) => {
                warn!("Feed record skipped. error: {}", error);
                self.errors.push(error);
            }
        }
    }
}

/// The inventory and the jobs of one viewer session.
///
/// Every operation notifies the inventory observers once its mutation is complete.
pub struct Session {
    hardware: HardwareSet,
    jobs: JobSet,
    rng: SmallRng,
}

impl Session {
    pub fn new(hardware: HardwareSet, jobs: JobSet) -> Self {
        Self {
            hardware,
            jobs,
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Seeds the generator used for demo rankspecs.
    pub fn with_rng(mut self, rng: SmallRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn hardware(&self) -> &HardwareSet {
        &self.hardware
    }

    pub fn hardware_mut(&mut self) -> &mut HardwareSet {
        &mut self.hardware
    }

    pub fn jobs(&self) -> &JobSet {
        &self.jobs
    }

    /// Applies a full snapshot of element states.  Unknown locations are reported and skipped.
    pub fn update_node_states(&mut self, records: &[NodeStateRecord]) -> FeedReport {
        let report = self.apply_node_states(records);
        self.hardware.notify_observers(None);
        report
    }

    fn apply_node_states(&mut self, records: &[NodeStateRecord]) -> FeedReport {
        let mut report = FeedReport::default();
        for record in records {
            report.record(
                self.hardware
                    .change_state_by_location(&record.lctn, record.state),
            );
        }
        info!("Node states applied. applied: {}, skipped: {}", report.applied, report.errors.len());
        report
    }

    /// Applies a rank-indexed state delta.
    pub fn apply_rankspec_update(&mut self, update: &RankSpecUpdate) -> Result<usize, InventoryError> {
        let count = self
            .hardware
            .change_state_from_rankspec(&update.hwtype, &update.rankspec)?;
        self.hardware.notify_observers(None);
        Ok(count)
    }

    /// Creates or updates a job from a job feed record.
    ///
    /// Active jobs occupy their nodes, a job entering the terminal state releases them.  Only the racks the
    /// job touches are redrawn.
    pub fn update_job(&mut self, record: JobRecord) -> Result<JobUpdate, InventoryError> {
        let (update, rackset) = self.apply_job_record(record)?;
        if let Some(rackset) = rackset {
            self.hardware
                .notify_observers(Some(&rackset));
        }
        Ok(update)
    }

    fn apply_job_record(&mut self, record: JobRecord) -> Result<(JobUpdate, Option<RackSet>), InventoryError> {
        let (id, info) = record.into_parts();

        if let Some(handle) = self.jobs.get_job_by_id(&id).cloned() {
            let update = self.jobs.update_job(&id, info);
            let rackset = match update {
                JobUpdate::Terminated => {
                    self.hardware.unassign_job(&handle);
                    Some(handle.borrow().rackset().clone())
                }
                _ => None,
            };
            return Ok((update, rackset));
        }

        let mut rankspec = self
            .hardware
            .locations_to_rankspec(&info.nodes);
        if rankspec.is_none() && self.hardware.options().demo_rankspecs {
            let demo = demo_rankspec(&mut self.rng);
            debug!("Using demo rankspec. job: '{}', rankspec: '{}'", id, demo);
            rankspec = Some(demo);
        }

        let job = Job::new(id, info, rankspec, &self.hardware)?;
        let handle = self.jobs.add_job(job);
        if !handle.borrow().is_terminal() {
            self.hardware.assign_job(&handle);
        }
        let rackset = handle.borrow().rackset().clone();

        Ok((JobUpdate::Added, Some(rackset)))
    }

    /// Applies everything a poll cycle delivered, then notifies once with a full redraw.
    pub fn apply_feed(&mut self, feed: Feed) -> FeedReport {
        let mut report = self.apply_node_states(&feed.node_states);

        for update in &feed.rankspec_updates {
            report.record(
                self.hardware
                    .change_state_from_rankspec(&update.hwtype, &update.rankspec),
            );
        }
        for record in feed.jobs {
            report.record(self.apply_job_record(record));
        }

        info!(
            "Feed applied. applied: {}, skipped: {}, jobs: {}",
            report.applied,
            report.errors.len(),
            self.jobs.len()
        );
        self.hardware.notify_observers(None);
        report
    }

    /// Selects, or deselects, an element and everything below it.
    pub fn highlight_location(&mut self, location: &str, selected: bool) -> Result<(), InventoryError> {
        let key = self.hardware.require_location(location)?;
        self.hardware
            .change_selected_content(key, selected);

        match self.hardware.rack_of(key) {
            Some(rack) => self
                .hardware
                .notify_observers(Some(&RackSet::from([rack]))),
            None => self.hardware.notify_observers(None),
        }
        Ok(())
    }

    /// Selects, or deselects, the nodes a job occupies.
    pub fn highlight_job(&mut self, id: &JobId, selected: bool) -> Result<usize, InventoryError> {
        let handle = self.require_job(id)?;
        let job = handle.borrow();
        let count = match selected {
            true => self.hardware.select_job(&job),
            false => self.hardware.unselect_job(&job),
        };
        self.hardware
            .notify_observers(Some(job.rackset()));
        Ok(count)
    }

    /// Stops tracking a job and releases its nodes.
    pub fn retire_job(&mut self, id: &JobId) -> Result<JobHandle, InventoryError> {
        let handle = self
            .jobs
            .remove_job(id, &mut self.hardware)
            .ok_or_else(|| InventoryError::UnknownJob(id.to_string()))?;
        self.hardware
            .notify_observers(Some(handle.borrow().rackset()));
        Ok(handle)
    }

    fn require_job(&self, id: &JobId) -> Result<JobHandle, InventoryError> {
        self.jobs
            .get_job_by_id(id)
            .cloned()
            .ok_or_else(|| {
                warn!("Unknown job. job: '{}'", id);
                InventoryError::UnknownJob(id.to_string())
            })
    }
}
