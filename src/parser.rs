use crate::types::{Meld, MeldType, FLOWER_MAX, TILE_MAX};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::iter::Peekable;
use std::str::Chars;

fn suit_offset(c: char) -> Option<usize> {
    match c {
        'm' => Some(0),
        'p' => Some(9),
        's' => Some(18),
        'z' => Some(27),
        _ => None,
    }
}

fn tile_kind(digit: u32, offset: usize) -> Result<u8, String> {
    if digit == 0 {
        return Err("tile ranks start at 1".to_string());
    }
    if offset == 27 && digit > 7 {
        return Err(format!("honor rank out of range: {}z", digit));
    }
    let kind = offset + digit as usize - 1;
    if kind >= TILE_MAX {
        return Err(format!("tile kind out of range: {}", kind));
    }
    Ok(kind as u8)
}

/// Parse hand notation into tile kinds, declared groups and flowers.
///
/// Digit runs bind to the following letter: `m`/`p`/`s` are the suits, `z`
/// honors (1-4 winds, 5-7 dragons), `f` flowers (1-8). Declared groups sit
/// in parentheses: `(123m)` chi, `(p5m)` peng, `(k5m)` open kong, `(a5m)`
/// concealed kong. Whitespace separates blocks: `"123m456p55z(p1z) f12"`.
pub fn parse_hand_internal(text: &str) -> PyResult<(Vec<u8>, Vec<Meld>, Vec<u8>)> {
    let mut tiles = Vec::new();
    let mut melds = Vec::new();
    let mut flowers = Vec::new();

    let mut chars = text.chars().peekable();
    let mut pending_digits: Vec<char> = Vec::new();

    while let Some(&c) = chars.peek() {
        if c == '(' {
            if !pending_digits.is_empty() {
                return Err(PyValueError::new_err("pending digits without suit"));
            }
            chars.next(); // consume '('
            melds.push(parse_meld(&mut chars)?);
        } else if c.is_ascii_digit() {
            chars.next();
            pending_digits.push(c);
        } else if c == 'f' {
            chars.next();
            for d in &pending_digits {
                let digit = d.to_digit(10).unwrap_or(0);
                if digit == 0 || digit as usize > FLOWER_MAX {
                    return Err(PyValueError::new_err(format!(
                        "flower rank out of range: {}f",
                        d
                    )));
                }
                flowers.push(digit as u8 - 1);
            }
            pending_digits.clear();
        } else if let Some(offset) = suit_offset(c) {
            chars.next();
            for d in &pending_digits {
                let digit = d.to_digit(10).unwrap_or(0);
                let kind = tile_kind(digit, offset).map_err(PyValueError::new_err)?;
                tiles.push(kind);
            }
            pending_digits.clear();
        } else if c.is_whitespace() {
            chars.next();
        } else {
            return Err(PyValueError::new_err(format!("unexpected character: {}", c)));
        }
    }

    if !pending_digits.is_empty() {
        return Err(PyValueError::new_err("pending digits without suit"));
    }

    Ok((tiles, melds, flowers))
}

#[pyfunction]
pub fn parse_hand(text: &str) -> PyResult<(Vec<u8>, Vec<Meld>, Vec<u8>)> {
    parse_hand_internal(text)
}

/// Parse exactly one tile, e.g. `"5m"` or `"2z"`.
#[pyfunction]
pub fn parse_tile(text: &str) -> PyResult<u8> {
    let (tiles, melds, flowers) = parse_hand_internal(text)?;
    if !melds.is_empty() || !flowers.is_empty() {
        return Err(PyValueError::new_err(
            "parse_tile expects a single tile, found meld or flower syntax",
        ));
    }
    match tiles.as_slice() {
        [t] => Ok(*t),
        [] => Err(PyValueError::new_err("no tile found in string")),
        _ => Err(PyValueError::new_err(format!(
            "expected exactly one tile, found {}",
            tiles.len()
        ))),
    }
}

fn parse_meld(chars: &mut Peekable<Chars>) -> PyResult<Meld> {
    let mut content = String::new();
    while let Some(&c) = chars.peek() {
        if c == ')' {
            chars.next();
            break;
        }
        content.push(c);
        chars.next();
    }

    let (prefix, rest) = if let Some(stripped) = content.strip_prefix('p') {
        ('p', stripped)
    } else if let Some(stripped) = content.strip_prefix('k') {
        ('k', stripped)
    } else if let Some(stripped) = content.strip_prefix('a') {
        ('a', stripped)
    } else {
        (' ', content.as_str()) // no prefix: chi
    };

    let mut digits = Vec::new();
    let mut rest_chars = rest.chars().peekable();
    while let Some(&c) = rest_chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c.to_digit(10).unwrap_or(0));
        rest_chars.next();
    }
    let suit = rest_chars.next().unwrap_or(' ');
    if rest_chars.next().is_some() {
        return Err(PyValueError::new_err(format!(
            "trailing characters in meld: ({})",
            content
        )));
    }
    let offset = suit_offset(suit).ok_or_else(|| {
        PyValueError::new_err(format!("invalid suit in meld: ({})", content))
    })?;

    if prefix == ' ' {
        // Chi: three consecutive ranks, any input order.
        if digits.len() != 3 {
            return Err(PyValueError::new_err("chi meld requires 3 digits"));
        }
        digits.sort_unstable();
        if digits[1] != digits[0] + 1 || digits[2] != digits[0] + 2 {
            return Err(PyValueError::new_err(format!(
                "chi ranks must be consecutive: ({})",
                content
            )));
        }
        let mut tiles = Vec::with_capacity(3);
        for &d in &digits {
            tiles.push(tile_kind(d, offset).map_err(PyValueError::new_err)?);
        }
        let meld = Meld::new(MeldType::Chi, tiles);
        meld.validate().map_err(PyValueError::new_err)?;
        Ok(meld)
    } else {
        if digits.len() != 1 {
            return Err(PyValueError::new_err(format!(
                "peng/kong meld requires exactly 1 digit: ({})",
                content
            )));
        }
        let kind = tile_kind(digits[0], offset).map_err(PyValueError::new_err)?;
        let (meld_type, copies) = match prefix {
            'p' => (MeldType::Peng, 3),
            'k' => (MeldType::Gang, 4),
            _ => (MeldType::Angang, 4),
        };
        Ok(Meld::new(meld_type, vec![kind; copies]))
    }
}
