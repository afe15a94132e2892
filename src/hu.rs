use crate::types::{Hand, TILE_MAX};

/// True when a sequence may start at `i`: number tiles only, and never
/// across a suit boundary.
#[inline]
pub fn can_sequence(i: usize) -> bool {
    i < 27 && i % 9 <= 6
}

/// Completeness check for a concealed count vector that already includes the
/// winning tile. Exposed groups must have been removed beforehand.
pub fn is_hu(hand: &mut Hand) -> bool {
    if is_ligu(hand) {
        return true;
    }
    is_standard_hu(hand)
}

/// The seven-pairs-plus-one-triplet shape ("ligu ligu"), only possible on a
/// fully concealed 17-tile hand: no kind held once or five times, exactly one
/// kind held three times, everything else pairs or quads.
pub fn is_ligu(hand: &Hand) -> bool {
    if hand.total() != 17 {
        return false;
    }
    let mut triplets = 0;
    for &c in hand.counts.iter() {
        match c {
            0 | 2 | 4 => {}
            3 => triplets += 1,
            _ => return false,
        }
    }
    triplets == 1
}

/// Standard shape: one pair plus triplets/sequences covering the rest.
/// Works on any 3n+2 total, so hands with exposed groups evaluate on their
/// concealed remainder.
pub fn is_standard_hu(hand: &mut Hand) -> bool {
    if hand.total() % 3 != 2 {
        return false;
    }
    for i in 0..TILE_MAX {
        if hand.counts[i] >= 2 {
            hand.counts[i] -= 2;
            if decompose(hand, 0) {
                hand.counts[i] += 2; // backtrack
                return true;
            }
            hand.counts[i] += 2; // backtrack
        }
    }
    false
}

/// Recursive backtracking partition into triplets and in-suit sequences.
///
/// The lowest occupied kind must be consumed by whichever group contains it,
/// so only two branches exist at each step. The count array is reverted
/// after every recursive call, success or not.
pub fn decompose(hand: &mut Hand, start_idx: usize) -> bool {
    let mut i = start_idx;
    while i < TILE_MAX && hand.counts[i] == 0 {
        i += 1;
    }

    if i == TILE_MAX {
        return true; // all tiles used
    }

    // Try a triplet.
    if hand.counts[i] >= 3 {
        hand.counts[i] -= 3;
        let ok = decompose(hand, i);
        hand.counts[i] += 3;
        if ok {
            return true;
        }
    }

    // Try a sequence.
    if can_sequence(i) && hand.counts[i + 1] > 0 && hand.counts[i + 2] > 0 {
        hand.counts[i] -= 1;
        hand.counts[i + 1] -= 1;
        hand.counts[i + 2] -= 1;
        let ok = decompose(hand, i); // stay at i, there may be more runs
        hand.counts[i] += 1;
        hand.counts[i + 1] += 1;
        hand.counts[i + 2] += 1;
        if ok {
            return true;
        }
    }

    false
}
