use serde::{Deserialize, Serialize};

/// Largest magnitude any single coefficient may take.
pub const MAX_COEFFICIENT: i32 = 10_000;

/// Upper bound on `Σ |raw_i|` over the six components: material 64, mobility 64,
/// corners 4, parity 1, stability 112, frontier 64.
pub const MAX_RAW_SUM: i64 = 64 + 64 + 4 + 1 + 112 + 64;

#[derive(Debug, thiserror::Error)]
pub enum CoefficientError {
    #[error("coefficient set '{0}' has no phases")]
    Empty(String),
    #[error("{component} has {len} entries, expected {expected}")]
    LengthMismatch { component: &'static str, len: usize, expected: usize },
    #[error("invalid phase bands {0:?}: bounds must increase strictly and end at 65")]
    InvalidBands(Vec<u32>),
    #[error("{component}[{phase}] = {value} is outside ±10000")]
    OutOfRange { component: &'static str, phase: usize, value: i32 },
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
    #[error("bad coefficient json: {0}")]
    Json(#[from] serde_json::Error),
}

/// The six evaluation components, in the order their weights are stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    Material,
    Mobility,
    Corners,
    Parity,
    Stability,
    Frontier,
}

impl Component {
    pub const ALL: [Component; 6] = [
        Component::Material,
        Component::Mobility,
        Component::Corners,
        Component::Parity,
        Component::Stability,
        Component::Frontier,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Component::Material => "material",
            Component::Mobility => "mobility",
            Component::Corners => "corners",
            Component::Parity => "parity",
            Component::Stability => "stability",
            Component::Frontier => "frontier",
        }
    }
}

/// Ascending exclusive upper bounds on the occupied-cell count. Band `i`
/// covers counts below `bounds[i]` and at or above `bounds[i-1]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhaseBands(Vec<u32>);

impl PhaseBands {
    /// Early below 20 discs, late from 59.
    pub fn three() -> Self { Self(vec![20, 59, 65]) }

    /// Each of the three bands split in two.
    pub fn six() -> Self { Self(vec![12, 20, 40, 59, 62, 65]) }

    pub fn new(bounds: Vec<u32>) -> Result<Self, CoefficientError> {
        let b = Self(bounds);
        b.validate()?;
        Ok(b)
    }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn bounds(&self) -> &[u32] { &self.0 }

    pub fn validate(&self) -> Result<(), CoefficientError> {
        let ok = self.0.first().map_or(false, |&f| f > 0)
            && self.0.last() == Some(&65)
            && self.0.windows(2).all(|w| w[0] < w[1]);
        if ok { Ok(()) } else { Err(CoefficientError::InvalidBands(self.0.clone())) }
    }

    /// Band index for a board with `occupied` discs.
    #[inline]
    pub fn phase_of(&self, occupied: u32) -> usize {
        self.0.iter().position(|&b| occupied < b).unwrap_or(self.0.len().saturating_sub(1))
    }
}

impl Default for PhaseBands {
    fn default() -> Self { Self::six() }
}

/// A named, versioned set of phase-indexed weights for the six components.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvaluationCoefficients {
    pub name: String,
    #[serde(default)]
    pub version: u32,
    pub material: Vec<i32>,
    pub mobility: Vec<i32>,
    pub corners: Vec<i32>,
    pub parity: Vec<i32>,
    pub stability: Vec<i32>,
    pub frontier: Vec<i32>,
    #[serde(default)]
    pub bands: PhaseBands,
}

impl EvaluationCoefficients {
    pub fn component(&self, c: Component) -> &[i32] {
        match c {
            Component::Material => &self.material,
            Component::Mobility => &self.mobility,
            Component::Corners => &self.corners,
            Component::Parity => &self.parity,
            Component::Stability => &self.stability,
            Component::Frontier => &self.frontier,
        }
    }

    pub fn phases(&self) -> usize { self.bands.len() }

    pub fn validate(&self) -> Result<(), CoefficientError> {
        let expected = self.bands.len();
        if expected == 0 || self.material.is_empty() { return Err(CoefficientError::Empty(self.name.clone())); }
        self.bands.validate()?;
        for c in Component::ALL {
            let w = self.component(c);
            if w.len() != expected {
                return Err(CoefficientError::LengthMismatch { component: c.name(), len: w.len(), expected });
            }
            if let Some((phase, &value)) = w.iter().enumerate().find(|(_, v)| v.abs() > MAX_COEFFICIENT) {
                return Err(CoefficientError::OutOfRange { component: c.name(), phase, value });
            }
        }
        Ok(())
    }

    /// Weights of all six components for a board with `occupied` discs.
    /// Assumes `validate` has passed.
    #[inline]
    pub fn weights_for(&self, occupied: u32) -> [i32; 6] {
        let p = self.bands.phase_of(occupied);
        [self.material[p], self.mobility[p], self.corners[p], self.parity[p], self.stability[p], self.frontier[p]]
    }

    /// Largest heuristic magnitude reachable with any validated bundle.
    pub const fn heuristic_bound() -> i64 { MAX_COEFFICIENT as i64 * MAX_RAW_SUM }

    /// Stable digest of the weights and bands. Two bundles that score every
    /// position identically share a fingerprint even if their names differ.
    pub fn fingerprint(&self) -> u64 {
        let mut h = splitmix64(0x0E11_0C0E_FF1C_1E57 ^ self.bands.len() as u64);
        for &b in self.bands.bounds() { h = splitmix64(h ^ b as u64); }
        for c in Component::ALL {
            h = splitmix64(h ^ 0xC0);
            for &v in self.component(c) { h = splitmix64(h ^ (v as u32 as u64)); }
        }
        h
    }

    pub fn from_json(text: &str) -> Result<Self, CoefficientError> {
        let c: Self = serde_json::from_str(text)?;
        c.validate()?;
        Ok(c)
    }

    pub fn to_json(&self) -> Result<String, CoefficientError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Re-buckets a six-phase bundle under the three-band rule using the
    /// first entry of each pair.
    pub fn collapsed_to_three(&self) -> Self {
        let pick = |v: &Vec<i32>| -> Vec<i32> { v.iter().step_by(2).copied().collect() };
        Self {
            name: format!("{}-3", self.name),
            version: self.version,
            material: pick(&self.material),
            mobility: pick(&self.mobility),
            corners: pick(&self.corners),
            parity: pick(&self.parity),
            stability: pick(&self.stability),
            frontier: pick(&self.frontier),
            bands: PhaseBands::three(),
        }
    }
}

impl Default for EvaluationCoefficients {
    fn default() -> Self { v7() }
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

type Row = [i32; 6];

fn bundle(name: &str, version: u32, rows: [Row; 6]) -> EvaluationCoefficients {
    let [material, mobility, corners, parity, stability, frontier] = rows;
    EvaluationCoefficients {
        name: name.to_string(),
        version,
        material: material.to_vec(),
        mobility: mobility.to_vec(),
        corners: corners.to_vec(),
        parity: parity.to_vec(),
        stability: stability.to_vec(),
        frontier: frontier.to_vec(),
        bands: PhaseBands::six(),
    }
}

pub fn v1() -> EvaluationCoefficients {
    bundle("V1", 1, [
        [0, 0, 1, 1, 50, 50],
        [0, 0, 2, 2, 10, 10],
        [100, 100, 100, 100, 100, 100],
        [0, 0, 10, 10, 50, 50],
        [0, 0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0, 0],
    ])
}

pub fn v2() -> EvaluationCoefficients {
    bundle("V2", 2, [
        [5, 5, 24, 24, 44, 44],
        [7, 7, 18, 18, 17, 17],
        [112, 112, 76, 76, 47, 47],
        [10, 10, 0, 0, 97, 97],
        [0, 0, 2, 2, 8, 8],
        [0, 0, 9, 9, 0, 0],
    ])
}

pub fn v3() -> EvaluationCoefficients {
    bundle("V3", 3, [
        [0, 0, 1, 1, 100, 100],
        [5, 5, 25, 25, 50, 50],
        [100, 100, 100, 100, 100, 100],
        [0, 0, 10, 10, 50, 50],
        [0, 0, 10, 10, 20, 20],
        [0, 0, 10, 10, 20, 20],
    ])
}

pub fn v4() -> EvaluationCoefficients {
    bundle("V4", 4, [
        [0, 0, 1, 1, 11, 11],
        [6, 6, 20, 20, 39, 39],
        [100, 100, 100, 100, 100, 100],
        [7, 7, 29, 29, 47, 47],
        [3, 3, 9, 9, 27, 27],
        [7, 7, 8, 8, 38, 38],
    ])
}

pub fn v5() -> EvaluationCoefficients {
    bundle("V5", 5, [
        [1, 1, 1, 1, 13, 13],
        [6, 6, 1, 1, 78, 78],
        [66, 66, 81, 81, 100, 100],
        [29, 29, 1, 1, 1, 1],
        [1, 1, 9, 9, 1, 1],
        [58, 58, 11, 11, 23, 23],
    ])
}

pub fn v6() -> EvaluationCoefficients {
    bundle("V6", 6, [
        [2, 2, 1, 1, 12, 12],
        [21, 21, 5, 5, 79, 79],
        [89, 89, 100, 100, 82, 82],
        [45, 45, 9, 9, 2, 2],
        [20, 20, 7, 7, 1, 1],
        [67, 67, 12, 12, 11, 11],
    ])
}

pub fn v7() -> EvaluationCoefficients {
    bundle("V7", 7, [
        [1, 1, 1, 1, 10, 14],
        [18, 33, 5, 5, 65, 68],
        [87, 61, 100, 100, 97, 92],
        [36, 39, 9, 9, 2, 21],
        [23, 23, 4, 7, 1, 1],
        [54, 66, 14, 13, 11, 12],
    ])
}

pub const PRESET_NAMES: [&str; 7] = ["V1", "V2", "V3", "V4", "V5", "V6", "V7"];

pub fn presets() -> Vec<EvaluationCoefficients> {
    vec![v1(), v2(), v3(), v4(), v5(), v6(), v7()]
}

/// Case-insensitive preset lookup.
pub fn preset(name: &str) -> Result<EvaluationCoefficients, CoefficientError> {
    presets()
        .into_iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| CoefficientError::UnknownPreset(name.to_string()))
}
