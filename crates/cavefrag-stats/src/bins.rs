//! Logarithmic volume bins.

/// Number of volume classes.
pub const BIN_COUNT: usize = 20;

/// log10 of the lower edge of the first bin (0.01 m³).
const FIRST_EXPONENT: f64 = -2.0;
/// Bin width in decades.
const DECADE_STEP: f64 = 0.25;

/// A half-open volume interval `[lo, hi)` in m³.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VolumeBin {
    /// Inclusive lower edge.
    pub lo: f64,
    /// Exclusive upper edge.
    pub hi: f64,
}

impl VolumeBin {
    /// Whether `volume` falls inside this bin.
    pub fn contains(&self, volume: f64) -> bool {
        self.lo <= volume && volume < self.hi
    }
}

/// The 20 quarter-decade bins spanning `[10⁻², 10³)`.
pub fn log_bins() -> [VolumeBin; BIN_COUNT] {
    let mut bins = [VolumeBin { lo: 0.0, hi: 0.0 }; BIN_COUNT];
    let mut x = FIRST_EXPONENT;
    for bin in &mut bins {
        *bin = VolumeBin {
            lo: 10f64.powf(x),
            hi: 10f64.powf(x + DECADE_STEP),
        };
        x += DECADE_STEP;
    }
    bins
}

/// Index of the bin holding `volume`.
///
/// Volumes beyond the last bin land in the last bin; volumes below the
/// first bin (or NaN) land in the first.
pub fn bin_index(bins: &[VolumeBin; BIN_COUNT], volume: f64) -> usize {
    match bins.iter().position(|b| b.contains(volume)) {
        Some(i) => i,
        None if volume >= bins[BIN_COUNT - 1].lo => BIN_COUNT - 1,
        None => 0,
    }
}
