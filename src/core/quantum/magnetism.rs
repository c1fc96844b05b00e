//! Toy lattice magnetism.
//!
//! A `MagneticHamiltonian` is a lattice plus a flat list of interaction
//! terms. `evolve` runs a damped precession of classical unit spins with
//! optional thermal noise and records magnetization, energy and the final
//! spin–spin correlations. The numbers look plausible; they are not a
//! physics result.

use std::collections::BTreeSet;

use rand::Rng;
use rand_distr::{Distribution, Normal, UnitSphere};
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SingularisError};
use crate::debug_log;

pub type Vec3 = [f64; 3];

pub const MAX_STEPS: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LatticeKind {
    Chain,
    Square,
    Triangular,
    Honeycomb,
}

impl std::str::FromStr for LatticeKind {
    type Err = SingularisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "chain" | "1d" => Ok(LatticeKind::Chain),
            "square" => Ok(LatticeKind::Square),
            "triangular" => Ok(LatticeKind::Triangular),
            "honeycomb" | "hexagonal" => Ok(LatticeKind::Honeycomb),
            other => Err(SingularisError::invalid_operation(&format!("unknown lattice '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Site {
    pub index: usize,
    pub position: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lattice {
    pub kind: LatticeKind,
    pub width: usize,
    pub height: usize,
    pub periodic: bool,
    pub sites: Vec<Site>,
    pub bonds: Vec<(usize, usize)>,
}

impl Lattice {
    /// Number of sites `build` would create, without allocating any.
    pub fn site_count(kind: LatticeKind, width: usize, height: usize) -> Result<usize> {
        let height = if kind == LatticeKind::Chain { 1 } else { height };
        if width == 0 || height == 0 {
            return Err(SingularisError::simulation("lattice needs at least one site in each direction"));
        }
        width
            .checked_mul(height)
            .ok_or_else(|| SingularisError::simulation(&format!("lattice {}x{} is too large", width, height)))
    }

    /// A chain ignores `height`. Honeycomb uses the brick-wall layout.
    pub fn build(kind: LatticeKind, width: usize, height: usize, periodic: bool) -> Result<Self> {
        let count = Self::site_count(kind, width, height)?;
        let height = if kind == LatticeKind::Chain { 1 } else { height };
        let index = |x: usize, y: usize| y * width + x;
        let mut sites = Vec::with_capacity(count);
        for y in 0..height {
            for x in 0..width {
                let position = match kind {
                    LatticeKind::Triangular => [x as f64 + 0.5 * y as f64, y as f64 * 3f64.sqrt() / 2.0],
                    _ => [x as f64, y as f64],
                };
                sites.push(Site { index: index(x, y), position });
            }
        }

        let mut bonds: BTreeSet<(usize, usize)> = BTreeSet::new();
        let mut link = |a: usize, b: usize| {
            if a != b {
                bonds.insert((a.min(b), a.max(b)));
            }
        };
        // neighbour in +x / +y, wrapping when periodic
        let step = |v: usize, len: usize| -> Option<usize> {
            if v + 1 < len {
                Some(v + 1)
            } else if periodic && len > 2 {
                Some(0)
            } else {
                None
            }
        };
        for y in 0..height {
            for x in 0..width {
                let here = index(x, y);
                if let Some(nx) = step(x, width) {
                    link(here, index(nx, y));
                }
                let vertical = match kind {
                    LatticeKind::Chain => false,
                    LatticeKind::Honeycomb => (x + y) % 2 == 0,
                    LatticeKind::Square | LatticeKind::Triangular => true,
                };
                if vertical {
                    if let Some(ny) = step(y, height) {
                        link(here, index(x, ny));
                    }
                }
                if kind == LatticeKind::Triangular {
                    if let (Some(nx), Some(ny)) = (step(x, width), step(y, height)) {
                        link(here, index(nx, ny));
                    }
                }
            }
        }

        Ok(Self { kind, width, height, periodic, sites, bonds: bonds.into_iter().collect() })
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InteractionKind {
    Heisenberg,
    DzyaloshinskiiMoriya,
    Zeeman,
    Anisotropy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionTerm {
    pub kind: InteractionKind,
    pub strength: f64,
    pub sites: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis: Option<Vec3>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HamiltonianParams {
    pub lattice: LatticeKind,
    pub width: usize,
    pub height: usize,
    pub periodic: bool,
    /// Exchange J; positive is ferromagnetic.
    pub exchange: f64,
    /// Easy-axis anisotropy along z.
    pub anisotropy: f64,
    pub dm_strength: f64,
    pub field: Vec3,
}

impl Default for HamiltonianParams {
    fn default() -> Self {
        Self {
            lattice: LatticeKind::Square,
            width: 4,
            height: 4,
            periodic: true,
            exchange: 1.0,
            anisotropy: 0.0,
            dm_strength: 0.0,
            field: [0.0, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MagneticHamiltonian {
    pub lattice: Lattice,
    pub terms: Vec<InteractionTerm>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvolutionParams {
    pub steps: usize,
    pub dt: f64,
    pub temperature: f64,
    pub damping: f64,
}

impl Default for EvolutionParams {
    fn default() -> Self {
        Self { steps: 100, dt: 0.05, temperature: 0.0, damping: 0.1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvolutionResult {
    pub times: Vec<f64>,
    pub magnetization: Vec<Vec3>,
    pub energy: Vec<f64>,
    /// `s_i · s_j` of the final configuration.
    pub correlations: Vec<Vec<f64>>,
    pub final_spins: Vec<Vec3>,
}

impl MagneticHamiltonian {
    pub fn build(params: &HamiltonianParams, max_sites: usize) -> Result<Self> {
        let count = Lattice::site_count(params.lattice, params.width, params.height)?;
        if count > max_sites {
            return Err(SingularisError::simulation(&format!("lattice has {} sites, limit is {}", count, max_sites)));
        }
        let lattice = Lattice::build(params.lattice, params.width, params.height, params.periodic)?;

        let mut terms = Vec::new();
        for &(a, b) in &lattice.bonds {
            if params.exchange != 0.0 {
                terms.push(InteractionTerm {
                    kind: InteractionKind::Heisenberg,
                    strength: params.exchange,
                    sites: vec![a, b],
                    axis: None,
                });
            }
            if params.dm_strength != 0.0 {
                terms.push(InteractionTerm {
                    kind: InteractionKind::DzyaloshinskiiMoriya,
                    strength: params.dm_strength,
                    sites: vec![a, b],
                    axis: Some([0.0, 0.0, 1.0]),
                });
            }
        }
        let field_strength = norm(params.field);
        for site in &lattice.sites {
            if field_strength > 0.0 {
                terms.push(InteractionTerm {
                    kind: InteractionKind::Zeeman,
                    strength: field_strength,
                    sites: vec![site.index],
                    axis: Some(scale(params.field, 1.0 / field_strength)),
                });
            }
            if params.anisotropy != 0.0 {
                terms.push(InteractionTerm {
                    kind: InteractionKind::Anisotropy,
                    strength: params.anisotropy,
                    sites: vec![site.index],
                    axis: Some([0.0, 0.0, 1.0]),
                });
            }
        }
        debug_log!(
            "magnetism: {:?} {}x{} -> {} sites, {} bonds, {} terms",
            params.lattice, lattice.width, lattice.height, lattice.len(), lattice.bonds.len(), terms.len()
        );
        Ok(Self { lattice, terms })
    }

    pub fn energy(&self, spins: &[Vec3]) -> f64 {
        self.terms
            .iter()
            .map(|t| match t.kind {
                InteractionKind::Heisenberg => -t.strength * dot(spins[t.sites[0]], spins[t.sites[1]]),
                InteractionKind::DzyaloshinskiiMoriya => {
                    let d = t.axis.unwrap_or([0.0, 0.0, 1.0]);
                    -t.strength * dot(d, cross(spins[t.sites[0]], spins[t.sites[1]]))
                }
                InteractionKind::Zeeman => {
                    let axis = t.axis.unwrap_or([0.0, 0.0, 1.0]);
                    -t.strength * dot(axis, spins[t.sites[0]])
                }
                InteractionKind::Anisotropy => {
                    let axis = t.axis.unwrap_or([0.0, 0.0, 1.0]);
                    let p = dot(axis, spins[t.sites[0]]);
                    -t.strength * p * p
                }
            })
            .sum()
    }

    /// Minus the energy gradient at every site.
    fn effective_fields(&self, spins: &[Vec3]) -> Vec<Vec3> {
        let mut fields = vec![[0.0; 3]; spins.len()];
        for t in &self.terms {
            match t.kind {
                InteractionKind::Heisenberg => {
                    let (a, b) = (t.sites[0], t.sites[1]);
                    fields[a] = add(fields[a], scale(spins[b], t.strength));
                    fields[b] = add(fields[b], scale(spins[a], t.strength));
                }
                InteractionKind::DzyaloshinskiiMoriya => {
                    let (a, b) = (t.sites[0], t.sites[1]);
                    let d = t.axis.unwrap_or([0.0, 0.0, 1.0]);
                    // E = -D d·(s_a × s_b)
                    fields[a] = add(fields[a], scale(cross(spins[b], d), t.strength));
                    fields[b] = add(fields[b], scale(cross(d, spins[a]), t.strength));
                }
                InteractionKind::Zeeman => {
                    let i = t.sites[0];
                    fields[i] = add(fields[i], scale(t.axis.unwrap_or([0.0, 0.0, 1.0]), t.strength));
                }
                InteractionKind::Anisotropy => {
                    let i = t.sites[0];
                    let axis = t.axis.unwrap_or([0.0, 0.0, 1.0]);
                    fields[i] = add(fields[i], scale(axis, 2.0 * t.strength * dot(axis, spins[i])));
                }
            }
        }
        fields
    }

    /// Random unit spins, then `steps` damped precession updates.
    pub fn evolve<R: Rng + ?Sized>(&self, params: &EvolutionParams, rng: &mut R) -> Result<EvolutionResult> {
        if params.steps > MAX_STEPS {
            return Err(SingularisError::simulation(&format!("steps must be <= {}", MAX_STEPS)));
        }
        if !(params.dt > 0.0 && params.dt.is_finite()) {
            return Err(SingularisError::simulation("dt must be positive"));
        }
        if !(params.temperature >= 0.0 && params.temperature.is_finite()) {
            return Err(SingularisError::simulation("temperature must be non-negative"));
        }
        let sigma = (2.0 * params.damping.abs() * params.temperature * params.dt).sqrt();
        let noise = Normal::new(0.0, sigma)
            .map_err(|e| SingularisError::simulation(&format!("noise distribution: {}", e)))?;

        let mut spins: Vec<Vec3> = (0..self.lattice.len()).map(|_| UnitSphere.sample(rng)).collect();
        let mut result = EvolutionResult {
            times: Vec::with_capacity(params.steps + 1),
            magnetization: Vec::with_capacity(params.steps + 1),
            energy: Vec::with_capacity(params.steps + 1),
            correlations: Vec::new(),
            final_spins: Vec::new(),
        };
        self.record(&mut result, 0.0, &spins);

        for step in 1..=params.steps {
            let fields = self.effective_fields(&spins);
            for (s, h) in spins.iter_mut().zip(fields.iter()) {
                let precession = scale(cross(*s, *h), -1.0);
                let damping = scale(cross(*s, cross(*s, *h)), -params.damping);
                let mut next = add(*s, scale(add(precession, damping), params.dt));
                if sigma > 0.0 {
                    next = add(next, [noise.sample(rng), noise.sample(rng), noise.sample(rng)]);
                }
                let n = norm(next);
                if n > 1e-12 {
                    *s = scale(next, 1.0 / n);
                }
            }
            self.record(&mut result, step as f64 * params.dt, &spins);
        }

        result.correlations = spins
            .iter()
            .map(|a| spins.iter().map(|b| dot(*a, *b)).collect())
            .collect();
        result.final_spins = spins;
        Ok(result)
    }

    fn record(&self, result: &mut EvolutionResult, t: f64, spins: &[Vec3]) {
        let n = spins.len().max(1) as f64;
        let total = spins.iter().fold([0.0; 3], |acc, s| add(acc, *s));
        result.times.push(t);
        result.magnetization.push(scale(total, 1.0 / n));
        result.energy.push(self.energy(spins));
    }
}

fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [a[1] * b[2] - a[2] * b[1], a[2] * b[0] - a[0] * b[2], a[0] * b[1] - a[1] * b[0]]
}

fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn scale(a: Vec3, k: f64) -> Vec3 {
    [a[0] * k, a[1] * k, a[2] * k]
}

pub fn norm(a: Vec3) -> f64 {
    dot(a, a).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_lattice_bond_counts() {
        let open = Lattice::build(LatticeKind::Square, 3, 3, false).unwrap();
        assert_eq!(open.len(), 9);
        assert_eq!(open.bonds.len(), 12);
        let periodic = Lattice::build(LatticeKind::Square, 3, 3, true).unwrap();
        assert_eq!(periodic.bonds.len(), 18);
    }

    #[test]
    fn chain_ignores_height() {
        let chain = Lattice::build(LatticeKind::Chain, 5, 7, true).unwrap();
        assert_eq!(chain.len(), 5);
        assert_eq!(chain.bonds.len(), 5);
    }

    #[test]
    fn triangular_has_diagonals() {
        let tri = Lattice::build(LatticeKind::Triangular, 3, 3, false).unwrap();
        assert_eq!(tri.bonds.len(), 12 + 4);
    }

    #[test]
    fn lattice_kind_parsing() {
        assert_eq!("Honeycomb".parse::<LatticeKind>().unwrap(), LatticeKind::Honeycomb);
        assert!("kagome".parse::<LatticeKind>().is_err());
    }

    #[test]
    fn terms_follow_parameters() {
        let params = HamiltonianParams {
            lattice: LatticeKind::Chain,
            width: 4,
            periodic: false,
            field: [0.0, 0.0, 2.0],
            ..Default::default()
        };
        let h = MagneticHamiltonian::build(&params, 100).unwrap();
        let count = |k: InteractionKind| h.terms.iter().filter(|t| t.kind == k).count();
        assert_eq!(count(InteractionKind::Heisenberg), 3);
        assert_eq!(count(InteractionKind::Zeeman), 4);
        assert_eq!(count(InteractionKind::DzyaloshinskiiMoriya), 0);
    }

    #[test]
    fn aligned_ferromagnet_energy() {
        let params = HamiltonianParams { lattice: LatticeKind::Chain, width: 3, periodic: false, ..Default::default() };
        let h = MagneticHamiltonian::build(&params, 100).unwrap();
        let spins = vec![[0.0, 0.0, 1.0]; 3];
        assert!((h.energy(&spins) + 2.0).abs() < 1e-12);
    }
}
