use crate::tai;
use crate::ting;
use crate::types::{Conditions, DiscardOption, Flowers, Hand, Meld, TaiResult, TILE_MAX};
use crate::{hu, parser};
use log::debug;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// The validated query object: concealed tiles, declared groups and flowers.
///
/// Everything is checked on construction — kinds against the 34/8
/// enumerations, the four-copies cap across concealed tiles and group tiles
/// together, one copy per flower, group shapes. Queries never mutate the
/// stored state; each one works on a fresh copy of the count vector.
#[pyclass]
pub struct TaiCalculator {
    pub hand: Hand,
    pub melds: Vec<Meld>,
    pub flowers: Flowers,
}

#[pymethods]
impl TaiCalculator {
    #[new]
    #[pyo3(signature = (tiles, melds=vec![], flowers=vec![]))]
    pub fn new(tiles: Vec<u8>, melds: Vec<Meld>, flowers: Vec<u8>) -> PyResult<Self> {
        let hand = Hand::new(Some(tiles)).map_err(PyValueError::new_err)?;

        // The per-kind cap spans concealed tiles and declared groups alike.
        let mut seen = hand.clone();
        for meld in &melds {
            meld.validate().map_err(PyValueError::new_err)?;
            for &t in &meld.tiles {
                seen.try_add(t).map_err(PyValueError::new_err)?;
            }
        }

        let flowers = Flowers::new(Some(flowers)).map_err(PyValueError::new_err)?;
        Ok(Self {
            hand,
            melds,
            flowers,
        })
    }

    /// Build from text notation, e.g. `"123m456p55z(p1z)(a9s) f12"`.
    #[staticmethod]
    pub fn hand_from_text(text: &str) -> PyResult<Self> {
        let (tiles, melds, flowers) = parser::parse_hand_internal(text)?;
        Self::new(tiles, melds, flowers)
    }

    /// Tile total counted toward the winning shape: concealed plus three per
    /// declared group (a kong's fourth tile is free).
    pub fn effective_total(&self) -> u8 {
        self.hand.total() + 3 * self.melds.len() as u8
    }

    /// Completeness of the hand with `win_tile` added. Errors unless the
    /// effective total lands on exactly 17.
    pub fn is_hu(&self, win_tile: u8) -> PyResult<bool> {
        let mut full = self.winning_hand(win_tile)?;
        Ok(hu::is_hu(&mut full))
    }

    /// Waiting tile kinds of a 16-total hand. Empty on the wrong total.
    pub fn waits(&self) -> Vec<u8> {
        if self.effective_total() != 16 {
            return Vec::new();
        }
        let mut hand = self.hand.clone();
        ting::waits(&mut hand)
    }

    pub fn is_ting(&self) -> bool {
        !self.waits().is_empty()
    }

    /// Ranked discard suggestions for a 17-total hand. An empty list means
    /// no discard keeps the hand alive.
    pub fn discard_options(&self) -> PyResult<Vec<DiscardOption>> {
        if self.effective_total() != 17 {
            return Err(PyValueError::new_err(format!(
                "discard query requires 17 effective tiles, got {}",
                self.effective_total()
            )));
        }
        Ok(ting::discard_options(&self.hand))
    }

    /// Score the hand completed by `win_tile` under `conditions`.
    /// A non-complete shape yields `TaiResult { hu: false, .. }`; a wrong
    /// tile total is a precondition failure.
    #[pyo3(signature = (win_tile, conditions=None))]
    pub fn calc(&self, win_tile: u8, conditions: Option<Conditions>) -> PyResult<TaiResult> {
        let cond = conditions.unwrap_or_default();
        let mut full = self.winning_hand(win_tile)?;
        debug!(
            "calc win_tile={} melds={} flowers={} mode={:?}",
            win_tile,
            self.melds.len(),
            self.flowers.count(),
            cond.rule.mode
        );

        if !hu::is_hu(&mut full) {
            return Ok(TaiResult::no_hu());
        }
        Ok(tai::calculate_tai(
            &full,
            &self.melds,
            &self.flowers,
            &cond,
            win_tile,
        ))
    }
}

impl TaiCalculator {
    /// Concealed vector with the winning tile added, checked against the
    /// 17-tile winning total and the per-kind cap.
    fn winning_hand(&self, win_tile: u8) -> PyResult<Hand> {
        if win_tile as usize >= TILE_MAX {
            return Err(PyValueError::new_err(format!(
                "invalid tile kind: {}",
                win_tile
            )));
        }
        let total = self.effective_total() + 1;
        if total != 17 {
            return Err(PyValueError::new_err(format!(
                "winning-hand query requires 17 effective tiles, got {}",
                total
            )));
        }
        // The cap check has to see declared group tiles as well.
        let mut copies = self.hand.counts[win_tile as usize];
        for meld in &self.melds {
            copies += meld.tiles.iter().filter(|&&t| t == win_tile).count() as u8;
        }
        if copies >= 4 {
            return Err(PyValueError::new_err(format!(
                "more than 4 copies of tile kind {}",
                win_tile
            )));
        }

        let mut full = self.hand.clone();
        full.try_add(win_tile).map_err(PyValueError::new_err)?;
        Ok(full)
    }
}
