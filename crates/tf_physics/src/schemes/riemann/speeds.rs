// crates/tf_physics/src/schemes/riemann/speeds.rs

//! Signal speed estimates for two-wave solvers
//!
//! All estimates work on normal velocities and celerities `c = sqrt(g h)`
//! of the two face states.
//!
//! ```text
//! Rusanov:   s_R = -s_L = max(|un_L| + c_L, |un_R| + c_R)
//! Davis:     s_L = min(un_L - c_L, un_R - c_R),  s_R = max(un_L + c_L, un_R + c_R)
//! Einfeldt:  Davis bounds widened by û ∓ ĉ, with Roe average û and ĉ = sqrt(g (h_L + h_R) / 2)
//! ```

use tf_config::WaveSpeedKind;

/// Left and right signal speeds
pub(crate) fn estimate(kind: WaveSpeedKind, gravity: f64, h_l: f64, un_l: f64, h_r: f64, un_r: f64) -> (f64, f64) {
    let c_l = (gravity * h_l.max(0.0)).sqrt();
    let c_r = (gravity * h_r.max(0.0)).sqrt();
    match kind {
        WaveSpeedKind::Rusanov => {
            let s = (un_l.abs() + c_l).max(un_r.abs() + c_r);
            (-s, s)
        }
        WaveSpeedKind::Davis => ((un_l - c_l).min(un_r - c_r), (un_l + c_l).max(un_r + c_r)),
        WaveSpeedKind::Einfeldt => einfeldt(gravity, h_l, h_r, un_l, un_r, c_l, c_r),
    }
}

/// Einfeldt speeds from Roe averages; needs `h_l + h_r > 0`
#[inline]
pub(crate) fn einfeldt(gravity: f64, h_l: f64, h_r: f64, un_l: f64, un_r: f64, c_l: f64, c_r: f64) -> (f64, f64) {
    let sqrt_l = h_l.max(0.0).sqrt();
    let sqrt_r = h_r.max(0.0).sqrt();
    let u_roe = (sqrt_l * un_l + sqrt_r * un_r) / (sqrt_l + sqrt_r);
    let c_roe = (0.5 * gravity * (h_l + h_r)).sqrt();
    ((un_l - c_l).min(u_roe - c_roe), (un_r + c_r).max(u_roe + c_roe))
}
