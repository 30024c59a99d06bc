//! Primary and secondary block records.

/// Read access shared by every block collection.
///
/// Binning, the file writers and the hang-up estimators only need volume,
/// shape and joint count, so they accept any `Block`.
pub trait Block {
    /// Volume (m³).
    fn volume(&self) -> f64;
    /// Shape factor, `>= 1`.
    fn omega(&self) -> f64;
    /// Number of joints that do not fully cut the block.
    fn joints_inside(&self) -> u32;
}

/// An in-situ block bounded by three joint sets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrimaryBlock {
    /// Volume (m³), `> 0`.
    pub volume: f64,
    /// Shape factor, `>= 1`.
    pub omega: f64,
    /// Number of non-cutting joints inside the block.
    pub joints_inside: u32,
    /// Surface area (m²).
    pub area: f64,
    /// Longest dimension (m).
    pub lambda_max: f64,
}

/// A block produced by secondary fragmentation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SecondaryBlock {
    /// Volume (m³).
    pub volume: f64,
    /// Shape factor, `>= 1`.
    pub omega: f64,
    /// Joints inherited from the parent primary block.
    pub joints_inside: u32,
}

impl Block for PrimaryBlock {
    fn volume(&self) -> f64 {
        self.volume
    }

    fn omega(&self) -> f64 {
        self.omega
    }

    fn joints_inside(&self) -> u32 {
        self.joints_inside
    }
}

impl Block for SecondaryBlock {
    fn volume(&self) -> f64 {
        self.volume
    }

    fn omega(&self) -> f64 {
        self.omega
    }

    fn joints_inside(&self) -> u32 {
        self.joints_inside
    }
}

impl From<&PrimaryBlock> for SecondaryBlock {
    fn from(b: &PrimaryBlock) -> Self {
        Self {
            volume: b.volume,
            omega: b.omega,
            joints_inside: b.joints_inside,
        }
    }
}

/// Total volume of a block collection.
pub fn total_volume<B: Block>(blocks: &[B]) -> f64 {
    blocks.iter().map(Block::volume).sum()
}
