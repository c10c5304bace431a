//! Pure-Rust Albers equal-area conic projection (Snyder 1987, USGS formulas).
//!
//! Ellipsoidal form, so areas measured in projected metres match ground area.
//! No external C dependencies (no libproj).

use super::{require_finite, Projection};
use crate::crs::CRS;
use crate::error::{Error, Result};
use std::f64::consts::{FRAC_PI_2, PI};

// ── GRS80 ellipsoid constants ───────────────────────────────────────────

const GRS80_A: f64 = 6_378_137.0; // semi-major axis (m)
const GRS80_F: f64 = 1.0 / 298.257_222_101; // flattening

const MAX_ITERATIONS: usize = 25;
const CONVERGENCE: f64 = 1e-12;
/// Slack allowed on |q| before an inverse input is declared off the ellipsoid
const Q_TOLERANCE: f64 = 1e-9;

/// Albers equal-area conic on an ellipsoid.
#[derive(Debug, Clone)]
pub struct AlbersEqualArea {
    crs: CRS,
    a: f64,
    e: f64,
    e2: f64,
    lon0: f64,
    false_easting: f64,
    false_northing: f64,
    n: f64,
    c: f64,
    rho0: f64,
    /// q at the pole, bounding every valid q
    qp: f64,
}

impl AlbersEqualArea {
    /// Build a projection from origin and standard parallels in degrees.
    ///
    /// Fails when the standard parallels are symmetric about the equator
    /// (the cone degenerates) or any angle is out of range.
    pub fn new(
        lat0_deg: f64,
        lon0_deg: f64,
        lat1_deg: f64,
        lat2_deg: f64,
        false_easting: f64,
        false_northing: f64,
        crs: CRS,
    ) -> Result<Self> {
        for (name, v) in [
            ("lat_0", lat0_deg),
            ("lat_1", lat1_deg),
            ("lat_2", lat2_deg),
        ] {
            if !v.is_finite() || v.abs() > 90.0 {
                return Err(Error::invalid_f64(name, v, "latitude must be within [-90, 90]"));
            }
        }
        if !lon0_deg.is_finite() || lon0_deg.abs() > 180.0 {
            return Err(Error::invalid_f64("lon_0", lon0_deg, "longitude must be within [-180, 180]"));
        }

        let n = cone_constant(lat1_deg.to_radians(), lat2_deg.to_radians());
        if n.abs() < 1e-10 {
            return Err(Error::invalid_f64(
                "lat_1",
                lat1_deg,
                "standard parallels must not be symmetric about the equator",
            ));
        }

        Ok(Self::build(
            lat0_deg,
            lon0_deg,
            lat1_deg,
            lat2_deg,
            false_easting,
            false_northing,
            crs,
        ))
    }

    fn build(
        lat0_deg: f64,
        lon0_deg: f64,
        lat1_deg: f64,
        lat2_deg: f64,
        false_easting: f64,
        false_northing: f64,
        crs: CRS,
    ) -> Self {
        let a = GRS80_A;
        let e2 = grs80_e2();
        let e = e2.sqrt();

        let (phi0, phi1, phi2) = (
            lat0_deg.to_radians(),
            lat1_deg.to_radians(),
            lat2_deg.to_radians(),
        );

        let n = cone_constant(phi1, phi2);
        let m1 = m_fn(phi1, e2);
        let q0 = q_fn(phi0, e, e2);
        let q1 = q_fn(phi1, e, e2);

        let c = m1 * m1 + n * q1; // eq. 14-13
        let rho0 = a * (c - n * q0).max(0.0).sqrt() / n; // eq. 14-12a

        Self {
            crs,
            a,
            e,
            e2,
            lon0: lon0_deg.to_radians(),
            false_easting,
            false_northing,
            n,
            c,
            rho0,
            qp: q_fn(FRAC_PI_2, e, e2),
        }
    }

    /// NAD83 / Conus Albers (EPSG:5070)
    pub fn conus() -> Self {
        Self::build(23.0, -96.0, 29.5, 45.5, 0.0, 0.0, CRS::conus_albers())
    }

    fn domain_error(&self, x: f64, y: f64, reason: &'static str) -> Error {
        Error::ProjectionDomain {
            projection: self.name(),
            x,
            y,
            reason,
        }
    }

    /// Latitude from authalic q by Newton iteration (Snyder eq. 3-16).
    fn phi_from_q(&self, q: f64, x: f64, y: f64) -> Result<f64> {
        if (q.abs() - self.qp).abs() <= Q_TOLERANCE {
            return Ok(FRAC_PI_2.copysign(q));
        }

        let mut phi = (q / 2.0).asin();
        for _ in 0..MAX_ITERATIONS {
            let sin_phi = phi.sin();
            let cos_phi = phi.cos();
            let com = 1.0 - self.e2 * sin_phi * sin_phi;
            let es = self.e * sin_phi;
            let delta = com * com / (2.0 * cos_phi)
                * (q / (1.0 - self.e2) - sin_phi / com
                    + ((1.0 - es) / (1.0 + es)).ln() / (2.0 * self.e));
            phi += delta;
            if delta.abs() < CONVERGENCE {
                return Ok(phi);
            }
        }
        Err(self.domain_error(x, y, "inverse latitude did not converge"))
    }
}

impl Projection for AlbersEqualArea {
    fn name(&self) -> &'static str {
        "Albers equal-area"
    }

    fn planar_crs(&self) -> CRS {
        self.crs.clone()
    }

    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        require_finite(self.name(), lon, lat)?;
        if lat.abs() > 90.0 {
            return Err(self.domain_error(lon, lat, "latitude outside [-90, 90]"));
        }
        if lon.abs() > 180.0 {
            return Err(self.domain_error(lon, lat, "longitude outside [-180, 180]"));
        }

        let q = q_fn(lat.to_radians(), self.e, self.e2);
        let radicand = self.c - self.n * q;
        if radicand < 0.0 {
            return Err(self.domain_error(lon, lat, "point lies beyond the cone apex"));
        }

        let rho = self.a * radicand.sqrt() / self.n; // eq. 14-12
        let theta = self.n * wrap_pi(lon.to_radians() - self.lon0); // eq. 14-4

        let x = rho * theta.sin() + self.false_easting;
        let y = self.rho0 - rho * theta.cos() + self.false_northing;
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        require_finite(self.name(), x, y)?;

        let mut dx = x - self.false_easting;
        let mut dy = self.rho0 - (y - self.false_northing);
        // eq. 14-10: for a southern cone, flip signs before atan2
        if self.n < 0.0 {
            dx = -dx;
            dy = -dy;
        }
        let rho = dx.hypot(dy);
        let theta = dx.atan2(dy);

        let rn = rho * self.n / self.a;
        let q = (self.c - rn * rn) / self.n; // eq. 14-19
        if q.abs() > self.qp + Q_TOLERANCE {
            return Err(self.domain_error(x, y, "point lies outside the projected ellipsoid"));
        }

        let phi = self.phi_from_q(q.clamp(-self.qp, self.qp), x, y)?;
        let lambda = wrap_pi(self.lon0 + theta / self.n); // eq. 14-9
        Ok((lambda.to_degrees(), phi.to_degrees()))
    }
}

// ── Snyder helper functions ─────────────────────────────────────────────

fn grs80_e2() -> f64 {
    2.0 * GRS80_F - GRS80_F * GRS80_F
}

/// Snyder eq. 14-14; a single standard parallel collapses to sin(phi1)
fn cone_constant(phi1: f64, phi2: f64) -> f64 {
    if (phi1 - phi2).abs() < 1e-10 {
        return phi1.sin();
    }
    let e2 = grs80_e2();
    let e = e2.sqrt();
    let m1 = m_fn(phi1, e2);
    let m2 = m_fn(phi2, e2);
    (m1 * m1 - m2 * m2) / (q_fn(phi2, e, e2) - q_fn(phi1, e, e2))
}

/// Snyder eq. 14-15
fn m_fn(phi: f64, e2: f64) -> f64 {
    let s = phi.sin();
    phi.cos() / (1.0 - e2 * s * s).sqrt()
}

/// Snyder eq. 3-12 (authalic q)
fn q_fn(phi: f64, e: f64, e2: f64) -> f64 {
    let s = phi.sin();
    let es = e * s;
    (1.0 - e2) * (s / (1.0 - e2 * s * s) - ((1.0 - es) / (1.0 + es)).ln() / (2.0 * e))
}

/// Wrap an angle in radians into [-π, π].
fn wrap_pi(angle: f64) -> f64 {
    if (-PI..=PI).contains(&angle) {
        angle
    } else {
        (angle + PI).rem_euclid(2.0 * PI) - PI
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
