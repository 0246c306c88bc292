//! Canonical object names
//!
//! Only some meshes are named targets in the game. Animated objects occupy a
//! run of consecutive indices, one per frame, and get a `_f<frame>` suffix.

/// A run of mesh indices sharing a base name
struct NameRange {
    first: usize,
    last: usize,
    name: &'static str,
}

impl NameRange {
    const fn new(first: usize, last: usize, name: &'static str) -> Self {
        Self { first, last, name }
    }

    /// Name of `index` if it falls in this range
    ///
    /// `first == last` names a single object. `first > last` names exactly
    /// two frames, with frame 0 stored at the higher index. Otherwise frames
    /// are numbered from `first`.
    fn name_for(&self, index: usize) -> Option<String> {
        use std::cmp::Ordering;

        let frame = match self.first.cmp(&self.last) {
            Ordering::Equal => {
                return (index == self.first).then(|| self.name.to_string());
            }
            Ordering::Greater if index == self.first => 0,
            Ordering::Greater if index == self.last => 1,
            Ordering::Greater => return None,
            Ordering::Less if (self.first..=self.last).contains(&index) => index - self.first,
            Ordering::Less => return None,
        };
        Some(format!("{}_f{}", self.name, frame))
    }
}

/// Named mesh objects in index order; the first matching entry wins
const MESH_NAMES: &[NameRange] = &[
    NameRange::new(1, 1, "guard_tower_1"),
    NameRange::new(4, 5, "guard_tower_top"),
    NameRange::new(6, 6, "guard_tower_2"),
    NameRange::new(14, 14, "processing_factory"),
    NameRange::new(15, 7, "obelisk_1"),
    NameRange::new(22, 22, "saucer_1"),
    NameRange::new(23, 23, "simtaal_quak_1"),
    NameRange::new(24, 24, "simtaal_quak_2"),
    NameRange::new(25, 25, "simtaal_quak_3"),
    NameRange::new(26, 26, "snail_rider"),
    NameRange::new(31, 31, "saucer_2"),
    NameRange::new(36, 35, "rakonan_barftub"),
    NameRange::new(40, 42, "ground_wasp"),
    NameRange::new(44, 46, "tilexu_floater"),
    NameRange::new(55, 55, "silicon_vat"),
    NameRange::new(56, 56, "static_release"),
    NameRange::new(57, 57, "ground_scanner"),
    NameRange::new(58, 61, "pumping_station"),
    NameRange::new(62, 65, "seismic_hammer"),
    NameRange::new(66, 69, "krypton_breather"),
    NameRange::new(70, 70, "ground_transport_1"),
    NameRange::new(71, 71, "ground_transport_2"),
    NameRange::new(72, 74, "wind_generator_1"),
    NameRange::new(75, 78, "wind_generator_2"),
    NameRange::new(80, 87, "rakonan_gomjabba"),
    NameRange::new(88, 95, "proton_flapper"),
    NameRange::new(96, 103, "electron_grinder"),
    NameRange::new(104, 111, "wave_generator"),
    NameRange::new(112, 119, "postal_teleport"),
    NameRange::new(120, 127, "climatic_ticker"),
    NameRange::new(128, 135, "weirding_flasher"),
    NameRange::new(136, 143, "aldebran_linkbat"),
    NameRange::new(144, 151, "argon_storehouse"),
    NameRange::new(152, 159, "thermal_riser"),
    NameRange::new(166, 167, "obelisk_2"),
    NameRange::new(181, 187, "snailherd"),
    NameRange::new(192, 199, "lhaktal_gourd"),
];

/// Name of flat object `index`
pub fn flat_name(index: usize) -> String {
    format!("flat_{}", index)
}

/// Name of mesh object `index`
pub fn mesh_name(index: usize) -> String {
    MESH_NAMES
        .iter()
        .find_map(|range| range.name_for(index))
        .unwrap_or_else(|| format!("apocalypse_{}", index))
}
