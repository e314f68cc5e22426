
use crate::hardware_set::HardwareSet;
use crate::options::InventoryOptions;
use crate::testing::compute_layout;

pub(crate) fn compute_hardware(racks: &[&str]) -> HardwareSet {
    HardwareSet::from_layout(&compute_layout(racks), InventoryOptions::default()).unwrap()
}

pub(crate) fn key(hardware: &HardwareSet, location: &str) -> crate::ElementKey {
    hardware
        .get_by_location(location)
        .unwrap()
}
