use terrain_core::WorldPoint;

/// What a pointer press does.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EditorTool {
    /// Brush strokes add or delete tiles.
    #[default]
    Tiles,
    /// Paints the selected path index onto flat tops.
    Paths,
    /// Drops the selected prop.
    Props,
}

/// A pointer press over the terrain, already projected onto the ground plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerEvent {
    pub point: WorldPoint,
    /// Shift held: tile strokes delete.
    pub shift: bool,
}

impl PointerEvent {
    pub const fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            point: WorldPoint::new(x, y, z),
            shift: false,
        }
    }

    pub const fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tools_parse_case_insensitively() {
        assert_eq!("PATHS".parse::<EditorTool>().unwrap(), EditorTool::Paths);
        assert_eq!(EditorTool::Props.to_string(), "props");
        assert!("brush".parse::<EditorTool>().is_err());
    }
}
