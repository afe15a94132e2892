use pyo3::{pyclass, pymethods};
use serde::{Deserialize, Serialize};

/// How the optional tile groups are scored.
///
/// `StrictFlower` is the common table rule: flower ownership matters (seat
/// flowers and flower kongs pay out, ping-hu demands a flowerless hand) and
/// wind triplets only pay for the round/seat winds, with the four- and
/// three-wind shapes above them. `LooseWord` drops the flower bookkeeping
/// and pays a flat tai for every wind triplet instead.
#[pyclass(eq, eq_int)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleMode {
    StrictFlower = 0,
    LooseWord = 1,
}

#[pyclass]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameRule {
    #[pyo3(get, set)]
    pub mode: RuleMode,
}

impl Default for GameRule {
    fn default() -> Self {
        Self::default_strict_flower()
    }
}

#[pymethods]
impl GameRule {
    #[new]
    #[pyo3(signature = (mode=RuleMode::StrictFlower))]
    pub fn new(mode: RuleMode) -> Self {
        Self { mode }
    }

    #[staticmethod]
    pub fn default_strict_flower() -> Self {
        Self {
            mode: RuleMode::StrictFlower,
        }
    }

    #[staticmethod]
    pub fn default_loose_word() -> Self {
        Self {
            mode: RuleMode::LooseWord,
        }
    }

    fn __repr__(&self) -> String {
        format!("GameRule(mode={:?})", self.mode)
    }
}
