/// Render layer. Controls draw order.
///
/// Layers are drawn back-to-front. Within a layer the host draws the layer's
/// vector geometry first, then its sprites in spawn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum RenderLayer {
    /// Full-screen art and large static plates.
    Backdrop = 0,
    Board = 1,
    #[default]
    Wheel = 2,
    /// Transient flying pieces.
    Effects = 3,
    /// Readouts, hints and guides above the play area.
    Overlay = 4,
    UI = 5,
}

impl RenderLayer {
    /// Total number of render layers.
    pub const COUNT: usize = 6;

    /// All layers, back to front.
    pub const ALL: [RenderLayer; Self::COUNT] = [
        Self::Backdrop,
        Self::Board,
        Self::Wheel,
        Self::Effects,
        Self::Overlay,
        Self::UI,
    ];

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Slot index for per-layer arrays.
    pub fn index(self) -> usize {
        self as usize
    }
}
