use crate::rule::GameRule;
use pyo3::prelude::*;
use serde::Serialize;

pub const TILE_MAX: usize = 34;
pub const FLOWER_MAX: usize = 8;

/// A hand representation using a histogram of tile kinds (0-33).
///
/// 0-8: wan, 9-17: tong, 18-26: so, 27-30: winds (E/S/W/N), 31-33: dragons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand {
    pub counts: [u8; TILE_MAX],
}

impl Hand {
    pub fn new(tiles: Option<Vec<u8>>) -> Result<Self, String> {
        let mut h = Hand {
            counts: [0; TILE_MAX],
        };
        if let Some(ts) = tiles {
            for t in ts {
                h.try_add(t)?;
            }
        }
        Ok(h)
    }

    /// Add one tile, rejecting out-of-range kinds and fifth copies at the
    /// mutation point.
    pub fn try_add(&mut self, t: u8) -> Result<(), String> {
        if (t as usize) >= TILE_MAX {
            return Err(format!("invalid tile kind: {}", t));
        }
        if self.counts[t as usize] >= 4 {
            return Err(format!("more than 4 copies of tile kind {}", t));
        }
        self.counts[t as usize] += 1;
        Ok(())
    }

    pub fn remove(&mut self, t: u8) {
        if (t as usize) < TILE_MAX && self.counts[t as usize] > 0 {
            self.counts[t as usize] -= 1;
        }
    }

    pub fn total(&self) -> u8 {
        self.counts.iter().sum()
    }
}

impl Default for Hand {
    fn default() -> Self {
        Hand {
            counts: [0; TILE_MAX],
        }
    }
}

/// Flower tiles held by the player, at most one per kind.
///
/// 0-3 are the four seasons, 4-7 the four plants; season `w` and plant
/// `w + 4` belong to seat wind `w`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flowers {
    pub held: [bool; FLOWER_MAX],
}

impl Flowers {
    pub fn new(flowers: Option<Vec<u8>>) -> Result<Self, String> {
        let mut f = Flowers::default();
        if let Some(fs) = flowers {
            for k in fs {
                f.try_add(k)?;
            }
        }
        Ok(f)
    }

    pub fn try_add(&mut self, k: u8) -> Result<(), String> {
        if (k as usize) >= FLOWER_MAX {
            return Err(format!("invalid flower kind: {}", k));
        }
        if self.held[k as usize] {
            return Err(format!("duplicate flower kind {}", k));
        }
        self.held[k as usize] = true;
        Ok(())
    }

    pub fn count(&self) -> u8 {
        self.held.iter().filter(|&&b| b).count() as u8
    }
}

#[pyclass(eq, eq_int)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeldType {
    Chi = 0,
    Peng = 1,
    Gang = 2,
    Angang = 3,
}

/// Wind directions, used for the round wind and the seat wind.
///
/// East = 0, South = 1, West = 2, North = 3. A wind's tile kind is
/// `27 + wind`, and its matching season/plant flowers are `wind` and
/// `wind + 4`.
#[pyclass(eq, eq_int)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wind {
    East = 0,
    South = 1,
    West = 2,
    North = 3,
}

impl Wind {
    pub fn tile_kind(self) -> u8 {
        27 + self as u8
    }
}

/// An exposed (or declared concealed-kong) group. Its tiles never appear in
/// the concealed count vector; a kong's fourth tile does not count toward
/// the 17-tile winning total.
#[pyclass]
#[derive(Debug, Clone)]
pub struct Meld {
    #[pyo3(get, set)]
    pub meld_type: MeldType,
    #[pyo3(get, set)]
    pub tiles: Vec<u8>,
}

#[pymethods]
impl Meld {
    #[new]
    pub fn new(meld_type: MeldType, tiles: Vec<u8>) -> Self {
        Self { meld_type, tiles }
    }

    fn __repr__(&self) -> String {
        format!("Meld({:?}, {:?})", self.meld_type, self.tiles)
    }
}

impl Meld {
    pub fn is_exposed(&self) -> bool {
        self.meld_type != MeldType::Angang
    }

    /// Kind of the tile the group is built on (lowest for a sequence).
    pub fn base_kind(&self) -> u8 {
        self.tiles.first().copied().unwrap_or(0)
    }

    /// Structural validity: a chi is three consecutive in-suit kinds, a peng
    /// three identical, a gang/angang four identical.
    pub fn validate(&self) -> Result<(), String> {
        if self.tiles.iter().any(|&t| t as usize >= TILE_MAX) {
            return Err(format!("invalid tile kind in meld: {:?}", self.tiles));
        }
        match self.meld_type {
            MeldType::Chi => {
                let t = self.base_kind() as usize;
                let ok = self.tiles.len() == 3
                    && t < 27
                    && t % 9 <= 6
                    && self.tiles[1] == self.tiles[0] + 1
                    && self.tiles[2] == self.tiles[0] + 2;
                if !ok {
                    return Err(format!("malformed chi: {:?}", self.tiles));
                }
            }
            MeldType::Peng => {
                if self.tiles.len() != 3 || self.tiles.iter().any(|&t| t != self.tiles[0]) {
                    return Err(format!("malformed peng: {:?}", self.tiles));
                }
            }
            MeldType::Gang | MeldType::Angang => {
                if self.tiles.len() != 4 || self.tiles.iter().any(|&t| t != self.tiles[0]) {
                    return Err(format!("malformed gang: {:?}", self.tiles));
                }
            }
        }
        Ok(())
    }
}

/// Everything about the winning moment that is not the tiles themselves.
#[pyclass]
#[derive(Debug, Clone)]
pub struct Conditions {
    #[pyo3(get, set)]
    pub round_wind: Wind,
    #[pyo3(get, set)]
    pub seat_wind: Wind,
    #[pyo3(get, set)]
    pub self_draw: bool,
    #[pyo3(get, set)]
    pub kong_bloom: bool,
    #[pyo3(get, set)]
    pub last_tile: bool,
    #[pyo3(get, set)]
    pub robbing_kong: bool,
    #[pyo3(get, set)]
    pub seven_snatch: bool,
    #[pyo3(get, set)]
    pub rule: GameRule,
}

impl Default for Conditions {
    fn default() -> Self {
        Self {
            round_wind: Wind::East,
            seat_wind: Wind::East,
            self_draw: false,
            kong_bloom: false,
            last_tile: false,
            robbing_kong: false,
            seven_snatch: false,
            rule: GameRule::default(),
        }
    }
}

#[pymethods]
impl Conditions {
    #[allow(clippy::too_many_arguments)]
    #[new]
    #[pyo3(signature = (round_wind=Wind::East, seat_wind=Wind::East, self_draw=false, kong_bloom=false, last_tile=false, robbing_kong=false, seven_snatch=false, rule=None))]
    pub fn new(
        round_wind: Wind,
        seat_wind: Wind,
        self_draw: bool,
        kong_bloom: bool,
        last_tile: bool,
        robbing_kong: bool,
        seven_snatch: bool,
        rule: Option<GameRule>,
    ) -> Self {
        Self {
            round_wind,
            seat_wind,
            self_draw,
            kong_bloom,
            last_tile,
            robbing_kong,
            seven_snatch,
            rule: rule.unwrap_or_default(),
        }
    }
}

/// Outcome of a score query: the tai total plus the matched categories in
/// evaluation order.
#[pyclass]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaiResult {
    #[pyo3(get)]
    pub hu: bool,
    #[pyo3(get)]
    pub total: u32,
    #[pyo3(get)]
    pub categories: Vec<(String, u32)>,
}

impl TaiResult {
    pub fn no_hu() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: &str, value: u32) {
        self.total += value;
        self.categories.push((label.to_string(), value));
    }
}

#[pymethods]
impl TaiResult {
    /// JSON dump for callers that want to log or display the breakdown.
    pub fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(self)
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))
    }

    fn __repr__(&self) -> String {
        format!(
            "TaiResult(hu={}, total={}, categories={:?})",
            self.hu, self.total, self.categories
        )
    }
}

/// One ranked discard suggestion for a 17-tile hand.
#[pyclass]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscardOption {
    #[pyo3(get)]
    pub discard: u8,
    #[pyo3(get)]
    pub waits: Vec<u8>,
    #[pyo3(get)]
    pub acceptance: u8,
    #[pyo3(get)]
    pub remaining_supply: u8,
}

#[pymethods]
impl DiscardOption {
    fn __repr__(&self) -> String {
        format!(
            "DiscardOption(discard={}, waits={:?}, acceptance={}, remaining_supply={})",
            self.discard, self.waits, self.acceptance, self.remaining_supply
        )
    }
}
