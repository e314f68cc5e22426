use indexmap::IndexMap;
use inventory::{Color, HardwareState};
use serde::{Deserialize, Serialize};

/// Colors used to draw a floor.
///
/// State colors are looked up by hwtype then state, anything without an entry is drawn in the
/// `fallback` color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ViewPalette {
    pub rack_background: Color,
    pub rack_border: Color,
    pub rack_label: Color,
    /// rack label color when component labels are shown
    pub rack_dim_label: Color,
    pub component_label: Color,
    pub selected: Color,
    pub fallback: Color,
    pub states: IndexMap<String, IndexMap<HardwareState, Color>>,
}

impl Default for ViewPalette {
    fn default() -> Self {
        let compute_node = IndexMap::from([
            (HardwareState::Missing, Color::rgb(0x00, 0x0d, 0x1a)),
            (HardwareState::Active, Color::rgb(0xcc, 0xe5, 0xff)),
            (HardwareState::Error, Color::RED),
            (HardwareState::Service, Color::VIOLET),
            (HardwareState::Bios, Color::rgb(0x00, 0x4d, 0x99)),
            (HardwareState::Discovered, Color::rgb(0x00, 0x73, 0xe6)),
            (HardwareState::IpAssigned, Color::rgb(0x33, 0x99, 0xff)),
            (HardwareState::Loading, Color::rgb(0x66, 0xcc, 0xff)),
            (HardwareState::KernelBoot, Color::rgb(0xaa, 0xdd, 0xff)),
        ]);

        let mut states = IndexMap::from([("compute-node".to_string(), compute_node)]);
        for (hwtype, active) in [
            ("dense-swblade", Color::rgb(0xff, 0xd9, 0xb3)),
            ("dense-rectifier", Color::rgb(0xff, 0xd9, 0xb3)),
            ("dense-cmm", Color::rgb(0xff, 0xbf, 0xbf)),
            ("compute-chassis", Color::rgb(0xf5, 0xf5, 0xf5)),
            ("service-chassis", Color::rgb(0xf5, 0xf5, 0xf5)),
            ("chassis-power-supply", Color::rgb(0xff, 0xbf, 0xbf)),
            ("compute-fan", Color::rgb(0xdf, 0x9f, 0x9f)),
            ("compute-opa-hfi", Color::rgb(0xff, 0xd9, 0xb3)),
            ("vCDU", Color::rgb(0xee, 0xee, 0xee)),
            ("io-node", Color::rgb(0xcc, 0xe5, 0xff)),
            ("storage-drawer", Color::rgb(0xff, 0xbf, 0xbf)),
            ("opa-dcs", Color::rgb(0xff, 0xd9, 0xb3)),
            ("subnet-sn", Color::rgb(0xcc, 0xe5, 0xff)),
            ("eth-switch", Color::rgb(0xff, 0xd9, 0xb3)),
            ("opa-switch", Color::rgb(0xff, 0xd9, 0xb3)),
            ("service-node", Color::rgb(0xcc, 0xe5, 0xff)),
            ("dense-service-node", Color::rgb(0xcc, 0xe5, 0xff)),
            ("frontend-node", Color::rgb(0xcc, 0xe5, 0xff)),
        ] {
            states.insert(hwtype.to_string(), IndexMap::from([(HardwareState::Active, active)]));
        }

        Self {
            rack_background: Color::rgb(0xfb, 0xfb, 0xfb),
            rack_border: Color::rgb(0xdd, 0xdd, 0xdd),
            rack_label: Color::rgba(0, 0, 0, 0.12),
            rack_dim_label: Color::rgba(0, 0, 0, 0.07),
            component_label: Color::GRAY,
            selected: Color::GREEN,
            fallback: Color::rgb(0xe0, 0xe0, 0xe0),
            states,
        }
    }
}

impl ViewPalette {
    pub fn state_color(&self, hwtype: &str, state: Option<HardwareState>) -> Color {
        state
            .and_then(|state| {
                self.states
                    .get(hwtype)
                    .and_then(|colors| colors.get(&state))
            })
            .copied()
            .unwrap_or(self.fallback)
    }
}
