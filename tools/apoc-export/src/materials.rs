//! Material names for RISC OS palette colours
//!
//! Primitives carry a colour number from the 256-colour RISC OS palette. Bits
//! 2 to 7 select one of 64 base colours (two bits each of red, green and
//! blue) and bits 0 to 1 add a grey tint that brightens all three channels.

use apoc_geometry::Primitive;

/// Number of base colours in the palette
pub const BASE_COLOURS: usize = 64;

/// Number of tints of each base colour
pub const TINTS: u8 = 4;

/// Names of the base colours, indexed by `colour / 4`
///
/// The hue comes from the strongest channels; weaker non-zero channels are
/// appended with their level.
const BASE_COLOUR_NAMES: [&str; BASE_COLOURS] = [
    "black",
    "dark_red",
    "dark_blue",
    "dark_magenta",
    "red",
    "bright_red",
    "red_b1",
    "bright_red_b1",
    "dark_green",
    "dark_yellow",
    "dark_cyan",
    "dark_grey",
    "red_g1",
    "bright_red_g1",
    "red_g1_b1",
    "bright_red_g1_b1",
    "green",
    "green_r1",
    "green_b1",
    "green_r1_b1",
    "yellow",
    "bright_red_g2",
    "yellow_b1",
    "bright_red_g2_b1",
    "bright_green",
    "bright_green_r1",
    "bright_green_b1",
    "bright_green_r1_b1",
    "bright_green_r2",
    "bright_yellow",
    "bright_green_r2_b1",
    "bright_yellow_b1",
    "blue",
    "blue_r1",
    "bright_blue",
    "bright_blue_r1",
    "magenta",
    "bright_red_b2",
    "bright_blue_r2",
    "bright_magenta",
    "blue_g1",
    "blue_r1_g1",
    "bright_blue_g1",
    "bright_blue_r1_g1",
    "magenta_g1",
    "bright_red_g1_b2",
    "bright_blue_r2_g1",
    "bright_magenta_g1",
    "cyan",
    "cyan_r1",
    "bright_blue_g2",
    "bright_blue_r1_g2",
    "light_grey",
    "bright_red_g2_b2",
    "bright_blue_r2_g2",
    "bright_magenta_g2",
    "bright_green_b2",
    "bright_green_r1_b2",
    "bright_cyan",
    "bright_cyan_r1",
    "bright_green_r2_b2",
    "bright_yellow_b2",
    "bright_cyan_r2",
    "white",
];

/// Name of the base colour of palette entry `colour`
pub fn base_colour_name(colour: u8) -> &'static str {
    BASE_COLOUR_NAMES[usize::from(colour / TINTS)]
}

/// 24-bit RGB value of palette entry `colour`
#[cfg(test)]
fn palette_rgb(colour: u8) -> [u8; 3] {
    let bit = |n: u8| (colour >> n) & 1;
    let tint = colour & 3;
    let red = (bit(4) << 1) | bit(2);
    let green = (bit(6) << 1) | bit(5);
    let blue = (bit(7) << 1) | bit(3);

    // Each channel is a 4-bit value: two colour bits above the two tint bits
    [red, green, blue].map(|level| ((level << 2) | tint) * 0x11)
}

/// Successive colours for highlighting individual primitives
///
/// Steps through every fourth palette entry so neighbouring primitives get
/// different base colours.
#[derive(Debug, Default, Clone)]
pub struct FalseColours {
    next: usize,
}

impl FalseColours {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_colour(&mut self) -> u8 {
        let colour = (self.next * usize::from(TINTS)) % 256;
        self.next += 1;
        colour as u8
    }
}

/// Chooses the material name for each primitive
#[derive(Debug, Clone)]
pub struct MaterialNamer {
    human_readable: bool,
    false_colours: Option<FalseColours>,
}

impl MaterialNamer {
    pub fn new(human_readable: bool, false_colour: bool) -> Self {
        Self {
            human_readable,
            false_colours: false_colour.then(FalseColours::new),
        }
    }

    /// Material for `primitive`, advancing the false colour sequence if enabled
    pub fn material_for(&mut self, primitive: &Primitive) -> String {
        let colour = match &mut self.false_colours {
            Some(false_colours) => false_colours.next_colour(),
            None => primitive.colour(),
        };
        self.material_name(colour)
    }

    pub fn material_name(&self, colour: u8) -> String {
        if self.human_readable {
            format!("{}_{}", base_colour_name(colour), colour % TINTS)
        } else {
            format!("riscos_{}", colour)
        }
    }
}
