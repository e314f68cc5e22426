use std::cell::RefCell;
use std::rc::{Rc, Weak};

use slotmap::new_key_type;

use crate::job::{Job, JobHandle};
use crate::state::HardwareState;

new_key_type! {
    /// Stable key of a [`HardwareElement`] inside its owning [`crate::HardwareSet`].
    pub struct ElementKey;
}

/// Per-rack aggregates, only present on rack-level elements.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct RackCounters {
    /// elements of the rack (the rack included) in [`HardwareState::Error`]
    pub errors: usize,
    /// elements of the rack (the rack included) in [`HardwareState::Missing`]
    pub missing: usize,
    /// selected elements of the rack (the rack included)
    pub selected: usize,
}

impl RackCounters {
    pub fn needs_attention(&self) -> bool {
        self.errors + self.missing > 0
    }

    pub(crate) fn track_state(&mut self, old: Option<HardwareState>, new: HardwareState) {
        if old == Some(new) {
            return;
        }

        match old {
            Some(HardwareState::Error) => self.errors -= 1,
            Some(HardwareState::Missing) => self.missing -= 1,
            _ => {}
        }
        match new {
            HardwareState::Error => self.errors += 1,
            HardwareState::Missing => self.missing += 1,
            _ => {}
        }
    }

    pub(crate) fn track_selected(&mut self, selected: bool) {
        match selected {
            true => self.selected += 1,
            false => self.selected -= 1,
        }
    }
}

/// A node of the hardware tree.
///
/// Elements are created detached and become part of the tree when registered with
/// [`crate::HardwareSet::add_hw`] and attached with [`crate::HardwareSet::add_content`].  All mutation goes
/// through the owning set so the rack counters stay consistent.
#[derive(Debug)]
pub struct HardwareElement {
    pub(crate) location: String,
    pub(crate) hwtype: String,
    pub(crate) state: Option<HardwareState>,
    pub(crate) selected: bool,
    pub(crate) job: Option<Weak<RefCell<Job>>>,
    pub(crate) parent: Option<ElementKey>,
    pub(crate) rack: Option<ElementKey>,
    pub(crate) content: Vec<ElementKey>,
    pub(crate) hwrank: usize,
    pub(crate) counters: Option<RackCounters>,
}

impl HardwareElement {
    pub fn new(location: impl Into<String>, hwtype: impl Into<String>, state: HardwareState) -> Self {
        Self {
            location: location.into(),
            hwtype: hwtype.into(),
            state: Some(state),
            selected: false,
            job: None,
            parent: None,
            rack: None,
            content: vec![],
            hwrank: 0,
            counters: None,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn hwtype(&self) -> &str {
        &self.hwtype
    }

    /// `None` only while the element is detached.
    pub fn state(&self) -> Option<HardwareState> {
        self.state
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// The job occupying this element, if it is still tracked.
    pub fn job(&self) -> Option<JobHandle> {
        self.job
            .as_ref()
            .and_then(Weak::upgrade)
    }

    pub(crate) fn is_assigned_to(&self, job: &JobHandle) -> bool {
        self.job
            .as_ref()
            .is_some_and(|weak| weak.ptr_eq(&Rc::downgrade(job)))
    }

    pub fn parent(&self) -> Option<ElementKey> {
        self.parent
    }

    pub fn rack(&self) -> Option<ElementKey> {
        self.rack
    }

    pub fn content(&self) -> &[ElementKey] {
        &self.content
    }

    pub fn hwrank(&self) -> usize {
        self.hwrank
    }

    pub fn counters(&self) -> Option<&RackCounters> {
        self.counters.as_ref()
    }

    pub fn is_rack(&self) -> bool {
        self.counters.is_some()
    }

    /// True for racks with any element in error or missing.
    pub fn needs_attention(&self) -> bool {
        self.counters
            .as_ref()
            .is_some_and(RackCounters::needs_attention)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(None, HardwareState::Error, RackCounters { errors: 1, missing: 0, selected: 0 })]
    #[case(None, HardwareState::Missing, RackCounters { errors: 0, missing: 1, selected: 0 })]
    #[case(None, HardwareState::Active, RackCounters { errors: 0, missing: 0, selected: 0 })]
    #[case(Some(HardwareState::Error), HardwareState::Missing, RackCounters { errors: 0, missing: 2, selected: 0 })]
    #[case(Some(HardwareState::Missing), HardwareState::Active, RackCounters { errors: 1, missing: 0, selected: 0 })]
    #[case(Some(HardwareState::Error), HardwareState::Error, RackCounters { errors: 1, missing: 1, selected: 0 })]
    fn test_track_state(
        #[case] old: Option<HardwareState>,
        #[case] new: HardwareState,
        #[case] expected: RackCounters,
    ) {
        // given
        let mut counters = match old {
            // one element in each counted state, the changing element included
            Some(_) => RackCounters {
                errors: 1,
                missing: 1,
                selected: 0,
            },
            None => RackCounters::default(),
        };

        // when
        counters.track_state(old, new);

        // then
        assert_eq!(counters, expected);
    }
}
