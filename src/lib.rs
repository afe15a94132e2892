use pyo3::prelude::*;

mod hu;
mod parser;
mod rule;
mod tai;
mod tai_calculator;
mod tests;
mod ting;
mod types;

pub use hu::{decompose, is_hu, is_ligu, is_standard_hu};
pub use rule::{GameRule, RuleMode};
pub use tai::{calculate_tai, Tai};
pub use tai_calculator::TaiCalculator;
pub use ting::{discard_options, is_pinghu_wait, is_single_wait, is_ting, waits};
pub use types::{
    Conditions, DiscardOption, Flowers, Hand, Meld, MeldType, TaiResult, Wind, FLOWER_MAX,
    TILE_MAX,
};

/// Which kinds of a 17-tile concealed hand can be discarded while keeping
/// the hand alive, ranked like `TaiCalculator::discard_options`.
#[pyfunction]
fn check_ting_discards(tiles: Vec<u8>) -> PyResult<Vec<DiscardOption>> {
    let hand = Hand::new(Some(tiles))
        .map_err(pyo3::exceptions::PyValueError::new_err)?;
    if hand.total() != 17 {
        return Err(pyo3::exceptions::PyValueError::new_err(format!(
            "discard query requires 17 tiles, got {}",
            hand.total()
        )));
    }
    Ok(ting::discard_options(&hand))
}

#[pymodule]
fn _taicalc(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    let _ = pyo3_log::try_init();

    m.add_class::<types::Meld>()?;
    m.add_class::<types::MeldType>()?;
    m.add_class::<types::Wind>()?;
    m.add_class::<types::Conditions>()?;
    m.add_class::<types::TaiResult>()?;
    m.add_class::<types::DiscardOption>()?;
    m.add_class::<rule::GameRule>()?;
    m.add_class::<rule::RuleMode>()?;
    m.add_class::<tai_calculator::TaiCalculator>()?;

    m.add_function(wrap_pyfunction!(parser::parse_hand, m)?)?;
    m.add_function(wrap_pyfunction!(parser::parse_tile, m)?)?;
    m.add_function(wrap_pyfunction!(check_ting_discards, m)?)?;
    Ok(())
}
