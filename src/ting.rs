use crate::hu::{self, can_sequence};
use crate::types::{DiscardOption, Hand, TILE_MAX};

/// Enumerate the tile kinds that would complete a 3n+1 concealed remainder.
/// Trial insertion over all 34 kinds, removed unconditionally afterwards.
pub fn waits(hand: &mut Hand) -> Vec<u8> {
    let mut out = Vec::new();
    for i in 0..TILE_MAX {
        if hand.counts[i] >= 4 {
            continue;
        }
        hand.counts[i] += 1;

        // Cheap structural pruning: the added tile can only matter if it
        // pairs up or touches a neighbor.
        let c = hand.counts[i];
        let worth_checking = if i >= 27 {
            c >= 2
        } else {
            let has_prev = i % 9 > 0 && hand.counts[i - 1] > 0;
            let has_next = i % 9 < 8 && hand.counts[i + 1] > 0;
            c >= 2 || has_prev || has_next
        };

        if worth_checking && hu::is_hu(hand) {
            out.push(i as u8);
        }
        hand.counts[i] -= 1; // backtrack
    }
    out
}

pub fn is_ting(hand: &mut Hand) -> bool {
    !waits(hand).is_empty()
}

/// Rank the discards of a one-over concealed hand by how the remainder
/// waits. Kinds whose removal leaves a dead hand are omitted; an empty
/// result means no discard keeps the hand alive, which is a legitimate
/// outcome rather than an error.
///
/// `remaining_supply` counts `4 - copies-left-in-hand` per waiting kind.
/// Tiles visible in other players' melds and discards are not subtracted.
pub fn discard_options(hand: &Hand) -> Vec<DiscardOption> {
    let mut options = Vec::new();
    for d in 0..TILE_MAX {
        if hand.counts[d] == 0 {
            continue;
        }
        let mut rest = hand.clone();
        rest.counts[d] -= 1;
        let ws = waits(&mut rest);
        if ws.is_empty() {
            continue;
        }
        let remaining_supply = ws.iter().map(|&w| 4 - rest.counts[w as usize]).sum();
        options.push(DiscardOption {
            discard: d as u8,
            acceptance: ws.len() as u8,
            remaining_supply,
            waits: ws,
        });
    }
    options.sort_by(|a, b| {
        (b.remaining_supply, b.acceptance).cmp(&(a.remaining_supply, a.acceptance))
    });
    options
}

/// Strict ping-hu eligibility for the concealed part of a winning hand.
///
/// `pre_win` is the concealed vector with the winning tile removed. The
/// caller has already ruled out exposed triplets, honor triplets and the
/// flower/kong-bloom conditions. Two further requirements live here:
/// the pre-win hand must wait on fewer than three kinds, and some pair
/// choice other than the winds and the winning kind must admit a
/// sequence-only partition in which the winning tile closes a genuine
/// two-sided wait.
pub fn is_pinghu_wait(pre_win: &Hand, win_tile: u8, round_kind: u8, seat_kind: u8) -> bool {
    let mut probe = pre_win.clone();
    if waits(&mut probe).len() >= 3 {
        return false;
    }

    let mut full = pre_win.clone();
    if full.try_add(win_tile).is_err() {
        return false;
    }

    for p in 0..TILE_MAX {
        let pk = p as u8;
        if full.counts[p] < 2 || pk == round_kind || pk == seat_kind || pk == win_tile {
            continue;
        }
        full.counts[p] -= 2;
        let ok = sequences_with_two_sided(&mut full.counts, 0, win_tile, true);
        full.counts[p] += 2;
        if ok {
            return true;
        }
    }
    false
}

/// Sequence-only partition search. While `win_pending` holds, one copy of
/// `win` still has to be placed; placing it in a sequence it closes from
/// both sides clears the flag. Succeeds only on partitions that cleared it.
fn sequences_with_two_sided(
    counts: &mut [u8; TILE_MAX],
    start_idx: usize,
    win: u8,
    win_pending: bool,
) -> bool {
    let mut i = start_idx;
    while i < TILE_MAX && counts[i] == 0 {
        i += 1;
    }
    if i == TILE_MAX {
        return !win_pending;
    }
    if !can_sequence(i) || counts[i + 1] == 0 || counts[i + 2] == 0 {
        return false;
    }

    counts[i] -= 1;
    counts[i + 1] -= 1;
    counts[i + 2] -= 1;

    let t = i as u8;
    let mut ok = false;
    if win_pending && win >= t && win <= t + 2 {
        // 8-9 waiting 7 and 1-2 waiting 3 are edge waits; t+1 is a closed
        // middle wait. Only the remaining closures count.
        let two_sided = (win == t && t % 9 != 6) || (win == t + 2 && t % 9 != 0);
        if two_sided {
            ok = sequences_with_two_sided(counts, i, win, false);
        }
    }
    if !ok {
        ok = sequences_with_two_sided(counts, i, win, win_pending);
    }

    counts[i] += 1;
    counts[i + 1] += 1;
    counts[i + 2] += 1;
    ok
}

/// Narrow-wait ("du ting") predicate over a concealed vector that includes
/// the winning tile.
///
/// A placement of the winning tile is "good" when it closes a sequence from
/// both sides or completes a triplet; landing as the pair is exempt. The
/// hand is a narrow wait iff some valid partition only places the tile badly
/// and no partition with a non-winning-kind pair places it well.
pub fn is_single_wait(hand: &Hand, win_tile: u8) -> bool {
    let mut counts = hand.counts;
    let mut exists_bad = false;
    let mut exists_good = false;

    for p in 0..TILE_MAX {
        if counts[p] < 2 {
            continue;
        }
        counts[p] -= 2;
        if p as u8 == win_tile {
            // The winning tile may sit in the pair itself; any partition of
            // the rest keeps the flag clear.
            let mut rest = Hand { counts };
            if hu::decompose(&mut rest, 0) {
                exists_bad = true;
            }
        } else {
            let (good, bad) = placements(&mut counts, 0, win_tile);
            exists_good |= good;
            exists_bad |= bad;
        }
        counts[p] += 2;
    }

    exists_bad && !exists_good
}

/// Mirror of `hu::decompose` that additionally tracks how the still-pending
/// winning tile can be placed. Returns the pair (some partition places it
/// well, some partition places it badly); the two are combined with plain
/// boolean algebra at every branch point instead of a shared accumulator.
fn placements(counts: &mut [u8; TILE_MAX], start_idx: usize, win: u8) -> (bool, bool) {
    let mut i = start_idx;
    while i < TILE_MAX && counts[i] == 0 {
        i += 1;
    }
    if i == TILE_MAX {
        // Ran out of material with the winning tile never placed.
        return (false, false);
    }

    let mut good = false;
    let mut bad = false;

    if counts[i] >= 3 {
        counts[i] -= 3;
        if i as u8 == win {
            // Designate the winning copy into this triplet.
            let mut rest = Hand { counts: *counts };
            if hu::decompose(&mut rest, i) {
                good = true;
            }
        }
        let (g, b) = placements(counts, i, win);
        good |= g;
        bad |= b;
        counts[i] += 3;
    }

    if can_sequence(i) && counts[i + 1] > 0 && counts[i + 2] > 0 {
        counts[i] -= 1;
        counts[i + 1] -= 1;
        counts[i + 2] -= 1;

        let t = i as u8;
        if win >= t && win <= t + 2 {
            let mut rest = Hand { counts: *counts };
            if hu::decompose(&mut rest, i) {
                let two_sided = (win == t && t % 9 != 6) || (win == t + 2 && t % 9 != 0);
                if two_sided {
                    good = true;
                } else {
                    bad = true;
                }
            }
        }
        let (g, b) = placements(counts, i, win);
        good |= g;
        bad |= b;

        counts[i] += 1;
        counts[i + 1] += 1;
        counts[i + 2] += 1;
    }

    (good, bad)
}
