use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Index;
use std::rc::Rc;

use indexmap::IndexMap;
use slotmap::SlotMap;
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::element::{ElementKey, HardwareElement, RackCounters};
use crate::job::{Job, JobHandle};
use crate::layout::{HardwareDefinition, LayoutError, LayoutView};
use crate::options::InventoryOptions;
use crate::rankspec::{RankSpec, RankSpecError};
use crate::state::{HardwareState, StateError};

/// Rack-level elements affected by a change.
pub type RackSet = BTreeSet<ElementKey>;

pub const ROOT_LOCATION: &str = "system";
pub const ROOT_HWTYPE: &str = "floor";

pub trait InventoryObserver {
    /// Called after a mutation completes.  `change` is `None` when anything may have changed, otherwise it
    /// holds the racks that changed.
    fn observed_change(&mut self, source: &HardwareSet, change: Option<&RackSet>);
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("Unknown location. location: '{0}'")]
    UnknownLocation(String),
    #[error("Unknown job. job: '{0}'")]
    UnknownJob(String),
    #[error("Duplicate location. location: '{0}'")]
    DuplicateLocation(String),
    #[error("Rank out of range. hwtype: '{hwtype}', rank: {rank}, len: {len}")]
    RankOutOfRange { hwtype: String, rank: usize, len: usize },
    #[error(transparent)]
    RankSpec(#[from] RankSpecError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Owns the hardware tree and indexes it by location and by (hwtype, rank).
///
/// The tree is rooted at a synthetic `system` element; its direct children are the racks.  Elements are
/// never removed.
pub struct HardwareSet {
    elements: SlotMap<ElementKey, HardwareElement>,
    locations: IndexMap<String, ElementKey>,
    hwtypes: IndexMap<String, Vec<ElementKey>>,
    observers: Vec<Rc<RefCell<dyn InventoryObserver>>>,
    root: ElementKey,
    options: InventoryOptions,
}

impl HardwareSet {
    pub fn new(options: InventoryOptions) -> Self {
        let mut hardware = Self {
            elements: SlotMap::with_key(),
            locations: IndexMap::new(),
            hwtypes: IndexMap::new(),
            observers: vec![],
            root: ElementKey::default(),
            options,
        };

        let root = HardwareElement::new(ROOT_LOCATION, ROOT_HWTYPE, HardwareState::Active);
        hardware.root = hardware.register(root);
        hardware
    }

    /// Builds the inventory described by a layout view.
    ///
    /// Each floor placement becomes a rack below the root, each definition's content is expanded
    /// recursively with locations of the form `<parent>-<name>`.
    pub fn from_layout(view: &LayoutView, options: InventoryOptions) -> Result<Self, InventoryError> {
        view.validate()?;

        let mut hardware = Self::new(options);
        for item in &view.floor.content {
            let definition = view.definition(&item.definition)?;
            let hwtype = definition.hwtype(&item.definition);

            let rack = hardware.add_hw(HardwareElement::new(&item.name, hwtype, HardwareState::Active))?;
            hardware.add_content(hardware.root, rack);
            hardware.add_definition_content(view, rack, definition)?;
        }

        info!(
            "Inventory built. racks: {}, elements: {}, hwtypes: {}",
            hardware.racks().len(),
            hardware.len(),
            hardware.hwtypes.len()
        );
        Ok(hardware)
    }

    fn add_definition_content(
        &mut self,
        view: &LayoutView,
        parent: ElementKey,
        definition: &HardwareDefinition,
    ) -> Result<(), InventoryError> {
        let mut content: Vec<_> = definition.content.iter().collect();
        if self.options.sort_content {
            content.sort_by(|a, b| a.name.cmp(&b.name));
        }

        for item in content {
            let child_definition = view.definition(&item.definition)?;
            let hwtype = child_definition.hwtype(&item.definition);
            let location = format!("{}-{}", self.elements[parent].location, item.name);
            let state = match self.options.is_initially_missing(hwtype) {
                true => HardwareState::Missing,
                false => HardwareState::Active,
            };

            let child = self.add_hw(HardwareElement::new(location, hwtype, state))?;
            self.add_content(parent, child);
            self.add_definition_content(view, child, child_definition)?;
        }

        Ok(())
    }

    pub fn options(&self) -> &InventoryOptions {
        &self.options
    }

    pub fn root(&self) -> ElementKey {
        self.root
    }

    /// Number of elements, the root included.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        // the root is always present
        self.elements.len() == 1
    }

    pub fn get(&self, key: ElementKey) -> Option<&HardwareElement> {
        self.elements.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementKey, &HardwareElement)> {
        self.elements.iter()
    }

    /// The rack-level elements, in placement order.
    pub fn racks(&self) -> &[ElementKey] {
        &self.elements[self.root].content
    }

    /// Registers a detached element in both indices.  The element's `hwrank` is the number of elements of
    /// the same hwtype registered before it.
    pub fn add_hw(&mut self, element: HardwareElement) -> Result<ElementKey, InventoryError> {
        if self
            .locations
            .contains_key(element.location())
        {
            return Err(InventoryError::DuplicateLocation(element.location().to_string()));
        }
        Ok(self.register(element))
    }

    fn register(&mut self, mut element: HardwareElement) -> ElementKey {
        let location = element.location.clone();
        let hwtype = element.hwtype.clone();

        let bucket = self.hwtypes.entry(hwtype).or_default();
        element.hwrank = bucket.len();
        let key = self.elements.insert(element);
        bucket.push(key);
        self.locations.insert(location, key);

        key
    }

    /// Attaches a registered, detached `child` below `parent`.
    ///
    /// A child of the root becomes a rack with zeroed counters, any other child belongs to its parent's
    /// rack.  The child's state is then applied from scratch so the rack counters include it.
    ///
    /// Panics if the child is already attached or the parent is not part of the tree.
    pub fn add_content(&mut self, parent: ElementKey, child: ElementKey) {
        assert!(
            child != self.root && self.elements[child].parent.is_none(),
            "Element is already attached. location: '{}'",
            self.elements[child].location
        );
        let rack = self.rack_of(parent).unwrap_or(child);

        self.elements[parent].content.push(child);

        let element = &mut self.elements[child];
        element.parent = Some(parent);
        element.rack = Some(rack);
        if rack == child {
            element.counters = Some(RackCounters::default());
        }
        let state = element.state.take();
        let selected = std::mem::take(&mut element.selected);

        if let Some(state) = state {
            self.change_state(child, state);
        }
        if selected {
            self.change_selected(child, true);
        }
    }

    /// The rack an element belongs to, `None` for the root.
    ///
    /// Panics for an element that is not attached to the tree.
    pub fn rack_of(&self, key: ElementKey) -> Option<ElementKey> {
        if key == self.root {
            return None;
        }
        match self.elements[key].rack {
            Some(rack) => Some(rack),
            None => panic!(
                "Element is not attached to a rack. location: '{}'",
                self.elements[key].location
            ),
        }
    }

    fn counters_mut(&mut self, rack: ElementKey) -> &mut RackCounters {
        let element = &mut self.elements[rack];
        match element.counters.as_mut() {
            Some(counters) => counters,
            None => panic!("Rack has no counters. location: '{}'", element.location),
        }
    }

    /// The racks of the given elements.  The root has no rack and is left out.
    pub fn rackset<I>(&self, keys: I) -> RackSet
    where
        I: IntoIterator<Item = ElementKey>,
    {
        keys.into_iter()
            .filter_map(|key| self.rack_of(key))
            .collect()
    }

    /// Pre-order walk of the element and all of its descendants.
    pub fn subtree(&self, key: ElementKey) -> Vec<ElementKey> {
        let mut keys = vec![];
        let mut stack = vec![key];
        while let Some(key) = stack.pop() {
            keys.push(key);
            stack.extend(
                self.elements[key]
                    .content
                    .iter()
                    .rev(),
            );
        }
        keys
    }

    pub fn change_state(&mut self, key: ElementKey, state: HardwareState) {
        let old = self.elements[key].state.replace(state);
        if old == Some(state) {
            return;
        }
        trace!(
            "State changed. location: '{}', old: {:?}, new: {}",
            self.elements[key].location, old, state
        );

        if let Some(rack) = self.rack_of(key) {
            self.counters_mut(rack)
                .track_state(old, state);
        }
    }

    /// Sets or clears the job occupying an element.  Display colors are the job set's concern.
    pub fn change_job(&mut self, key: ElementKey, job: Option<&JobHandle>) {
        self.elements[key].job = job.map(Rc::downgrade);
    }

    /// Sets the element's own selection flag, descendants are unaffected.
    pub fn change_selected(&mut self, key: ElementKey, selected: bool) {
        let element = &mut self.elements[key];
        if element.selected == selected {
            return;
        }
        element.selected = selected;

        if let Some(rack) = self.rack_of(key) {
            self.counters_mut(rack)
                .track_selected(selected);
        }
    }

    /// Sets the selection flag of the element and all of its descendants.
    pub fn change_selected_content(&mut self, key: ElementKey, selected: bool) {
        for key in self.subtree(key) {
            self.change_selected(key, selected);
        }
    }

    pub fn get_by_location(&self, location: &str) -> Option<ElementKey> {
        self.locations.get(location).copied()
    }

    /// Like [`HardwareSet::get_by_location`], but a miss is an error.
    pub fn require_location(&self, location: &str) -> Result<ElementKey, InventoryError> {
        self.get_by_location(location)
            .ok_or_else(|| {
                warn!("Unknown location. location: '{}'", location);
                InventoryError::UnknownLocation(location.to_string())
            })
    }

    pub fn get_by_type_rank(&self, hwtype: &str, rank: usize) -> Option<ElementKey> {
        self.elements_of_type(hwtype)
            .get(rank)
            .copied()
    }

    /// Elements of a hwtype in rank order, empty for unknown hwtypes.
    pub fn elements_of_type(&self, hwtype: &str) -> &[ElementKey] {
        self.hwtypes
            .get(hwtype)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn hwtypes(&self) -> impl Iterator<Item = &str> {
        self.hwtypes.keys().map(String::as_str)
    }

    pub fn add_observer(&mut self, observer: Rc<RefCell<dyn InventoryObserver>>) {
        self.observers.push(observer);
    }

    /// Synchronously calls every observer, in registration order.
    pub fn notify_observers(&self, change: Option<&RackSet>) {
        debug!(
            "Notifying observers. observers: {}, racks: {}",
            self.observers.len(),
            change.map_or("all".to_string(), |racks| racks.len().to_string())
        );
        for observer in &self.observers {
            observer
                .borrow_mut()
                .observed_change(self, change);
        }
    }

    /// Resolves the marked ranks of a rankspec against the hwtype's bucket, keeping the payload character.
    pub fn resolve_ranks(&self, hwtype: &str, spec: &RankSpec) -> Result<Vec<(ElementKey, char)>, InventoryError> {
        let bucket = self.elements_of_type(hwtype);
        spec.ranks()
            .map(|(rank, value)| {
                bucket
                    .get(rank)
                    .map(|key| (*key, value))
                    .ok_or_else(|| InventoryError::RankOutOfRange {
                        hwtype: hwtype.to_string(),
                        rank,
                        len: bucket.len(),
                    })
            })
            .collect()
    }

    /// Applies a compact state feed, each marked rank's character is a state code.
    ///
    /// Returns 0 when there is no hardware of the hwtype.  The whole spec is checked before anything changes.
    pub fn change_state_from_rankspec(&mut self, hwtype: &str, spec: &RankSpec) -> Result<usize, InventoryError> {
        if !self.hwtypes.contains_key(hwtype) {
            debug!("No hardware for rankspec update. hwtype: '{}'", hwtype);
            return Ok(0);
        }

        let changes = self
            .resolve_ranks(hwtype, spec)?
            .into_iter()
            .map(|(key, code)| HardwareState::try_from(code).map(|state| (key, state)))
            .collect::<Result<Vec<_>, _>>()?;

        for (key, state) in &changes {
            self.change_state(*key, *state);
        }
        debug!("Rankspec state update applied. hwtype: '{}', count: {}", hwtype, changes.len());

        Ok(changes.len())
    }

    /// Applies one record of a snapshot state feed.
    pub fn change_state_by_location(&mut self, location: &str, state: HardwareState) -> Result<ElementKey, InventoryError> {
        let key = self.require_location(location)?;
        self.change_state(key, state);
        Ok(key)
    }

    /// Encodes whitespace separated compute-element locations as a rankspec.
    ///
    /// Unknown locations and locations of other hwtypes are skipped, node lists may name decommissioned or
    /// renamed nodes.
    pub fn locations_to_rankspec(&self, locations: &str) -> Option<RankSpec> {
        let ranks = locations
            .split_whitespace()
            .filter_map(|location| {
                let Some(key) = self.get_by_location(location) else {
                    debug!("Skipping unknown location. location: '{}'", location);
                    return None;
                };
                let element = &self.elements[key];
                if element.hwtype != self.options.compute_type {
                    debug!(
                        "Skipping location of another hwtype. location: '{}', hwtype: '{}'",
                        location, element.hwtype
                    );
                    return None;
                }
                Some(element.hwrank)
            });

        RankSpec::from_ranks(ranks)
    }

    /// Compute elements covered by the job's rankspec.  Ranks beyond the bucket are ignored.
    pub fn job_nodes(&self, job: &Job) -> Vec<ElementKey> {
        let Some(spec) = job.rankspec() else {
            return vec![];
        };
        let bucket = self.elements_of_type(&self.options.compute_type);
        spec.ranks()
            .filter_map(|(rank, _value)| bucket.get(rank).copied())
            .collect()
    }

    /// Points the job's nodes at the job.  Returns the number of nodes.
    pub fn assign_job(&mut self, job: &JobHandle) -> usize {
        let nodes = self.job_nodes(&job.borrow());
        for key in &nodes {
            self.change_job(*key, Some(job));
        }
        nodes.len()
    }

    /// Clears the job from every compute element still pointing at it.  Returns the number of nodes.
    pub fn unassign_job(&mut self, job: &JobHandle) -> usize {
        let nodes: Vec<_> = self
            .elements_of_type(&self.options.compute_type)
            .iter()
            .copied()
            .filter(|key| self.elements[*key].is_assigned_to(job))
            .collect();
        for key in &nodes {
            self.change_job(*key, None);
        }
        nodes.len()
    }

    pub fn select_job(&mut self, job: &Job) -> usize {
        self.set_job_selected(job, true)
    }

    pub fn unselect_job(&mut self, job: &Job) -> usize {
        self.set_job_selected(job, false)
    }

    fn set_job_selected(&mut self, job: &Job, selected: bool) -> usize {
        let nodes = self.job_nodes(job);
        for key in &nodes {
            self.change_selected(*key, selected);
        }
        nodes.len()
    }

    /// Number of elements of a hwtype in each state.
    pub fn state_counts(&self, hwtype: &str) -> BTreeMap<HardwareState, usize> {
        let mut counts = BTreeMap::new();
        for key in self.elements_of_type(hwtype) {
            if let Some(state) = self.elements[*key].state {
                *counts.entry(state).or_default() += 1;
            }
        }
        counts
    }
}

impl Index<ElementKey> for HardwareSet {
    type Output = HardwareElement;

    fn index(&self, key: ElementKey) -> &Self::Output {
        &self.elements[key]
    }
}
