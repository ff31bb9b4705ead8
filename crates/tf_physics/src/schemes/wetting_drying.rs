// crates/tf_physics/src/schemes/wetting_drying.rs

//! Wet/dry handling
//!
//! After every stage a negative depth is clamped to zero together with its
//! momentum, and cells at or below `h_dry` lose their momentum. Clamping is
//! a physical correction, not an error; the engine counts it in
//! [`CorrectionReport`]. Non-finite values are left untouched so the
//! instability check still sees them.

use crate::state::FlowState;

/// Cell wet/dry state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WetState {
    /// h <= h_dry
    Dry,
    /// h > h_dry
    Wet,
}

impl WetState {
    /// Is dry
    #[inline]
    pub fn is_dry(self) -> bool {
        matches!(self, Self::Dry)
    }
}

/// What a correction pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CorrectionReport {
    /// Cells whose negative depth was clamped to zero
    pub clamped: usize,
    /// Dry cells whose momentum was zeroed
    pub drained: usize,
    /// Volume per unit area added by clamping, `Σ -h` over clamped cells
    pub added_depth: f64,
}

impl CorrectionReport {
    /// Accumulate another pass
    pub fn merge(&mut self, other: CorrectionReport) {
        self.clamped += other.clamped;
        self.drained += other.drained;
        self.added_depth += other.added_depth;
    }
}

/// Wet/dry handler
#[derive(Debug, Clone, Copy)]
pub struct WettingDrying {
    h_dry: f64,
}

impl WettingDrying {
    /// Create with dry threshold
    pub fn new(h_dry: f64) -> Self {
        Self { h_dry }
    }

    /// Classify one depth
    #[inline]
    pub fn classify(&self, h: f64) -> WetState {
        if h <= self.h_dry {
            WetState::Dry
        } else {
            WetState::Wet
        }
    }

    /// Count dry cells
    pub fn count_dry(&self, state: &FlowState) -> usize {
        state.h.iter().filter(|&&h| self.classify(h).is_dry()).count()
    }

    /// Clamp negative depths and drain dry cells in place
    pub fn correct(&self, state: &mut FlowState) -> CorrectionReport {
        let mut report = CorrectionReport::default();
        for i in 0..state.len() {
            let h = state.h[i];
            if !h.is_finite() {
                continue;
            }
            if h < 0.0 {
                report.clamped += 1;
                report.added_depth -= h;
                state.h[i] = 0.0;
                state.hu[i] = 0.0;
                state.hv[i] = 0.0;
            } else if h <= self.h_dry
                && state.hu[i].is_finite()
                && state.hv[i].is_finite()
                && (state.hu[i] != 0.0 || state.hv[i] != 0.0)
            {
                report.drained += 1;
                state.hu[i] = 0.0;
                state.hv[i] = 0.0;
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        let wd = WettingDrying::new(1e-6);
        assert!(wd.classify(0.0).is_dry());
        assert!(wd.classify(1e-6).is_dry());
        assert_eq!(wd.classify(1e-3), WetState::Wet);
    }

    #[test]
    fn test_correct() {
        let wd = WettingDrying::new(1e-6);
        let mut s = FlowState::from_components(
            vec![-0.01, 1e-8, 1.0, f64::NAN],
            vec![1.0, 2.0, 3.0, 4.0],
            vec![1.0, 2.0, 3.0, 4.0],
        )
        .unwrap();
        let report = wd.correct(&mut s);
        assert_eq!(report.clamped, 1);
        assert_eq!(report.drained, 1);
        assert!((report.added_depth - 0.01).abs() < 1e-15);
        assert_eq!(s.h[0], 0.0);
        assert_eq!((s.hu[0], s.hv[0]), (0.0, 0.0));
        assert_eq!((s.hu[1], s.hv[1]), (0.0, 0.0));
        assert_eq!(s.hu[2], 3.0);
        // NaN is not a depth to fix
        assert!(s.h[3].is_nan());
        assert_eq!(s.hu[3], 4.0);
        assert_eq!(wd.count_dry(&s), 2);
    }

    #[test]
    fn test_correct_leaves_non_finite_alone() {
        let wd = WettingDrying::new(1e-6);
        let mut s = FlowState::from_components(
            vec![f64::NEG_INFINITY, 0.0, 1e-8, f64::INFINITY],
            vec![1.0, f64::NAN, 2.0, 5.0],
            vec![1.0, 0.0, f64::INFINITY, 5.0],
        )
        .unwrap();
        let report = wd.correct(&mut s);
        assert_eq!(report, CorrectionReport::default());
        assert_eq!(s.h[0], f64::NEG_INFINITY);
        assert_eq!(s.hu[0], 1.0);
        assert!(s.hu[1].is_nan());
        assert_eq!((s.hu[2], s.hv[2]), (2.0, f64::INFINITY));
        assert_eq!(s.h[3], f64::INFINITY);
    }
}
