#[cfg(test)]
mod unit_tests {
    use crate::parser::{parse_hand_internal, parse_tile};
    use crate::rule::GameRule;
    use crate::tai_calculator::TaiCalculator;
    use crate::types::{Conditions, Hand, TaiResult};
    use crate::{hu, ting};

    fn hand(text: &str) -> Hand {
        let (tiles, melds, flowers) = parse_hand_internal(text).unwrap();
        assert!(melds.is_empty() && flowers.is_empty());
        Hand::new(Some(tiles)).unwrap()
    }

    fn labels(res: &TaiResult) -> Vec<&str> {
        res.categories.iter().map(|(l, _)| l.as_str()).collect()
    }

    #[test]
    fn test_hu_standard() {
        // Five sequences plus a pair.
        let mut h = hand("123456789m123456p11s");
        assert_eq!(h.total(), 17);
        assert!(hu::is_hu(&mut h), "should be a winning shape");
    }

    #[test]
    fn test_no_cross_suit_sequence() {
        let mut h = hand("89m1p");
        assert!(!hu::decompose(&mut h, 0), "sequences never cross suits");
        let mut h = hand("789m");
        assert!(hu::decompose(&mut h, 0));
        let mut h = hand("999m");
        assert!(hu::decompose(&mut h, 0));
    }

    #[test]
    fn test_ligu_shape() {
        // One triplet, seven pairs. Honors cannot form sequences, so the
        // standard search fails while the structural check succeeds.
        let mut h = hand("111z22z33z44z55z66z77z11m");
        assert_eq!(h.total(), 17);
        assert!(hu::is_ligu(&h));
        assert!(!hu::is_standard_hu(&mut h));
        assert!(hu::is_hu(&mut h));

        // A single or a five-count kind breaks the shape.
        let mut bad = hand("111z22z33z44z55z66z7z1m11m");
        assert_eq!(bad.total(), 17);
        assert!(!hu::is_hu(&mut bad));
    }

    #[test]
    fn test_hu_is_idempotent_and_restores_counts() {
        let mut h = hand("123456789m123456p11s");
        let before = h.counts;
        let first = hu::is_hu(&mut h);
        assert_eq!(h.counts, before, "search must revert its mutations");
        assert_eq!(hu::is_hu(&mut h), first);
    }

    #[test]
    fn test_waits() {
        // 56p waits on both sides; nothing else completes the hand.
        let mut h = hand("123456789m123p56p11s");
        assert_eq!(h.total(), 16);
        let before = h.counts;
        let ws = ting::waits(&mut h);
        assert_eq!(h.counts, before);
        assert_eq!(ws, vec![12, 15]); // 4p, 7p
        assert!(ting::is_ting(&mut h));
    }

    #[test]
    fn test_waits_soundness() {
        let mut h = hand("123456789m123p56p11s");
        let ws = ting::waits(&mut h);
        for k in 0u8..34 {
            if h.counts[k as usize] >= 4 {
                continue;
            }
            let mut trial = h.clone();
            trial.try_add(k).unwrap();
            assert_eq!(
                hu::is_hu(&mut trial),
                ws.contains(&k),
                "wait set disagrees with the win detector on kind {}",
                k
            );
        }
    }

    #[test]
    fn test_discard_options_ranking() {
        // Discarding a terminal opens a three-sided wait; discarding the
        // pair tile leaves a lone tanki.
        let h = hand("123456789m123456p55s");
        let options = ting::discard_options(&h);
        assert!(!options.is_empty());
        assert_eq!(options[0].remaining_supply, 10);
        assert_eq!(options[0].acceptance, 3);
        assert!(options[0].discard == 0 || options[0].discard == 8);

        // No option may dominate one ranked above it.
        for pair in options.windows(2) {
            let (hi, lo) = (&pair[0], &pair[1]);
            assert!(
                (hi.remaining_supply, hi.acceptance) >= (lo.remaining_supply, lo.acceptance),
                "ranking violates supply/acceptance order"
            );
        }
    }

    #[test]
    fn test_discard_options_dead_hand() {
        // Scattered singles: no discard leaves a live hand, and that is a
        // normal empty result.
        let h = hand("147m147p147s1234567z7z");
        assert_eq!(h.total(), 17);
        assert!(ting::discard_options(&h).is_empty());
    }

    #[test]
    fn test_flush_category() {
        // Nine-gates-like pure hand; 5m completes it.
        let calc = TaiCalculator::hand_from_text("1112223456789992m").unwrap();
        let res = calc.calc(parse_tile("5m").unwrap(), None).unwrap();
        assert!(res.hu);
        assert!(labels(&res).contains(&"Qing Yi Se"));
        assert!(!labels(&res).contains(&"Hun Yi Se"));
        assert!(!labels(&res).contains(&"Ping Hu"));
    }

    #[test]
    fn test_four_wind_triplets_report_top_tier_only() {
        let calc = TaiCalculator::hand_from_text("111z222z333z444z123m5m").unwrap();
        let res = calc.calc(parse_tile("5m").unwrap(), None).unwrap();
        assert!(res.hu);
        let ls = labels(&res);
        assert!(ls.contains(&"Da Si Xi"));
        assert!(!ls.contains(&"Xiao Si Xi"));
        assert!(!ls.contains(&"Quan Feng"));
        assert!(!ls.contains(&"Men Feng"));
        assert!(!ls.contains(&"Feng Ke"));
        // Man tiles plus honors: half-flush.
        assert!(ls.contains(&"Hun Yi Se"));
    }

    #[test]
    fn test_three_wind_triplets_with_wind_pair() {
        let calc = TaiCalculator::hand_from_text("111z222z333z44z123m99m").unwrap();
        let res = calc.calc(parse_tile("9m").unwrap(), None).unwrap();
        assert!(res.hu);
        let ls = labels(&res);
        assert!(ls.contains(&"Xiao Si Xi"));
        assert!(!ls.contains(&"Da Si Xi"));
        assert!(!ls.contains(&"Quan Feng"));
    }

    #[test]
    fn test_loose_word_mode_flat_wind_tai() {
        let calc = TaiCalculator::hand_from_text("111z222z333z44z123m99m").unwrap();
        let cond = Conditions {
            rule: GameRule::default_loose_word(),
            ..Default::default()
        };
        let res = calc.calc(parse_tile("9m").unwrap(), Some(cond)).unwrap();
        let ls = labels(&res);
        assert_eq!(ls.iter().filter(|&&l| l == "Feng Ke").count(), 3);
        assert!(!ls.contains(&"Xiao Si Xi"));
        assert!(!ls.contains(&"Quan Feng"));
        // Flower bookkeeping is off in this mode.
        assert!(!ls.contains(&"Zheng Hua"));
    }

    #[test]
    fn test_ping_hu() {
        // All sequences, neutral pair, two-sided 45p wait.
        let calc = TaiCalculator::hand_from_text("123456789m12345p66s").unwrap();
        let res = calc.calc(parse_tile("6p").unwrap(), None).unwrap();
        assert!(res.hu);
        let ls = labels(&res);
        assert!(ls.contains(&"Ping Hu"));
        assert!(!ls.contains(&"Du Ting"), "ping hu suppresses the narrow wait");
        assert!(ls.contains(&"Men Qing"));
    }

    #[test]
    fn test_edge_wait_is_not_ping_hu() {
        // 12p waiting on 3p is an edge wait: no ping hu, but a narrow wait.
        let calc = TaiCalculator::hand_from_text("123456789m12p999p66s").unwrap();
        let res = calc.calc(parse_tile("3p").unwrap(), None).unwrap();
        assert!(res.hu);
        let ls = labels(&res);
        assert!(!ls.contains(&"Ping Hu"));
        assert!(ls.contains(&"Du Ting"));
    }

    #[test]
    fn test_ping_hu_needs_flowerless_hand() {
        let calc = TaiCalculator::hand_from_text("123456789m12345p66s f3").unwrap();
        let res = calc.calc(parse_tile("6p").unwrap(), None).unwrap();
        assert!(res.hu);
        assert!(!labels(&res).contains(&"Ping Hu"));
    }

    #[test]
    fn test_peng_peng_hu() {
        let calc = TaiCalculator::hand_from_text("111m222m333p444s111z9s").unwrap();
        let res = calc.calc(parse_tile("9s").unwrap(), None).unwrap();
        assert!(res.hu);
        let ls = labels(&res);
        assert!(ls.contains(&"Peng Peng Hu"));
        assert!(ls.contains(&"Du Ting")); // lone 9s pair wait
        assert!(ls.contains(&"Men Qing"));
        // East triplet under an East/East default table.
        assert!(ls.contains(&"Quan Feng"));
        assert!(ls.contains(&"Men Feng"));
    }

    #[test]
    fn test_dragon_triplets() {
        let calc = TaiCalculator::hand_from_text("111222333m555z666z7s").unwrap();
        let res = calc.calc(parse_tile("7s").unwrap(), None).unwrap();
        assert!(res.hu);
        let ls = labels(&res);
        assert!(ls.contains(&"Bai Ban"));
        assert!(ls.contains(&"Fa Cai"));
        assert!(!ls.contains(&"Hong Zhong"));
        assert!(ls.contains(&"Peng Peng Hu"));
    }

    #[test]
    fn test_ligu_skips_structure_bonuses() {
        let calc = TaiCalculator::hand_from_text("111z22z33z44z55z66z77z1m").unwrap();
        let res = calc.calc(parse_tile("1m").unwrap(), None).unwrap();
        assert!(res.hu);
        let ls = labels(&res);
        assert!(ls.contains(&"Ligu Ligu"));
        assert!(!ls.contains(&"Ping Hu"));
        assert!(!ls.contains(&"Peng Peng Hu"));
        assert!(!ls.contains(&"Du Ting"));
        assert!(!ls.contains(&"Men Qing"));
        // The unconditional groups still apply.
        assert!(ls.contains(&"Quan Feng"));
        assert!(ls.contains(&"Hun Yi Se"));
    }

    #[test]
    fn test_eight_flowers() {
        let calc = TaiCalculator::hand_from_text("123456789m123456p5s f12345678").unwrap();
        let res = calc.calc(parse_tile("5s").unwrap(), None).unwrap();
        assert!(res.hu);
        let ls = labels(&res);
        assert!(ls.contains(&"Ba Xian Guo Hai"));
        assert!(!ls.contains(&"Qi Qiang Yi"));
        assert!(!ls.contains(&"Men Qing"));
        // East seat owns flowers 1 and 5; both flower kongs are complete.
        assert_eq!(ls.iter().filter(|&&l| l == "Zheng Hua").count(), 2);
        assert_eq!(ls.iter().filter(|&&l| l == "Hua Gang").count(), 2);
        assert_eq!(res.total, 8 + 1 + 1 + 2 + 2);
    }

    #[test]
    fn test_seven_flowers_snatch() {
        let calc = TaiCalculator::hand_from_text("123456789m123456p5s f1234567").unwrap();
        let cond = Conditions {
            seven_snatch: true,
            ..Default::default()
        };
        let res = calc.calc(parse_tile("5s").unwrap(), Some(cond)).unwrap();
        let ls = labels(&res);
        assert!(ls.contains(&"Qi Qiang Yi"));
        assert!(!ls.contains(&"Ba Xian Guo Hai"));

        // Without the snatch flag the same flowers are ordinary bonuses.
        let res = calc.calc(parse_tile("5s").unwrap(), None).unwrap();
        assert!(!labels(&res).contains(&"Qi Qiang Yi"));
    }

    #[test]
    fn test_concealed_self_draw_priority() {
        let calc = TaiCalculator::hand_from_text("123456789m12345p66s").unwrap();
        let cond = Conditions {
            self_draw: true,
            ..Default::default()
        };
        let res = calc.calc(parse_tile("6p").unwrap(), Some(cond)).unwrap();
        let ls = labels(&res);
        assert!(ls.contains(&"Men Qing Zi Mo"));
        assert!(!ls.contains(&"Men Qing"));
        assert!(!ls.contains(&"Zi Mo"));
    }

    #[test]
    fn test_fully_melded() {
        let calc =
            TaiCalculator::hand_from_text("5s(123m)(456m)(p2p)(p7p)(p3s)").unwrap();
        assert_eq!(calc.effective_total(), 16);
        let res = calc.calc(parse_tile("5s").unwrap(), None).unwrap();
        assert!(res.hu);
        let ls = labels(&res);
        assert!(ls.contains(&"Quan Qiu Ren"));
        assert!(!ls.contains(&"Men Qing"));
        assert!(!ls.contains(&"Zi Mo"));
        assert!(!ls.contains(&"Peng Peng Hu")); // chi groups present
    }

    #[test]
    fn test_situational_bonuses() {
        let calc = TaiCalculator::hand_from_text("123456789m12345p66s").unwrap();
        let cond = Conditions {
            self_draw: true,
            kong_bloom: true,
            last_tile: true,
            ..Default::default()
        };
        let res = calc.calc(parse_tile("6p").unwrap(), Some(cond)).unwrap();
        let ls = labels(&res);
        assert!(ls.contains(&"Gang Shang Kai Hua"));
        assert!(ls.contains(&"Hai Di Lao Yue"));
        assert!(!ls.contains(&"Qiang Gang"));
        // Kong bloom blocks ping hu.
        assert!(!ls.contains(&"Ping Hu"));
    }

    #[test]
    fn test_calc_determinism() {
        let calc = TaiCalculator::hand_from_text("111z222z333z444z123m5m").unwrap();
        let a = calc.calc(parse_tile("5m").unwrap(), None).unwrap();
        let b = calc.calc(parse_tile("5m").unwrap(), None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_not_hu_result() {
        let calc = TaiCalculator::hand_from_text("123456789m1245p678s").unwrap();
        assert_eq!(calc.effective_total(), 16);
        let res = calc.calc(parse_tile("1z").unwrap(), None).unwrap();
        assert!(!res.hu);
        assert_eq!(res.total, 0);
        assert!(res.categories.is_empty());
    }

    #[test]
    fn test_validation_errors() {
        assert!(TaiCalculator::new(vec![34], vec![], vec![]).is_err());
        assert!(TaiCalculator::new(vec![0, 0, 0, 0, 0], vec![], vec![]).is_err());
        assert!(TaiCalculator::new(vec![0], vec![], vec![8]).is_err());
        assert!(TaiCalculator::new(vec![0], vec![], vec![3, 3]).is_err());

        // A winning-hand query on the wrong tile total is a precondition
        // failure, not a search miss.
        let calc = TaiCalculator::new(vec![0, 1, 2], vec![], vec![]).unwrap();
        assert!(calc.calc(3, None).is_err());
        assert!(calc.discard_options().is_err());
        assert!(calc.waits().is_empty());
    }

    #[test]
    fn test_win_tile_cap_spans_melds() {
        // Three 9s in a declared peng plus one concealed: a fifth copy can
        // never be the winning tile.
        let calc = TaiCalculator::hand_from_text("123456789m123p9s(p9s)").unwrap();
        assert!(calc.calc(parse_tile("9s").unwrap(), None).is_err());
    }

    #[test]
    fn test_parser() {
        assert_eq!(parse_tile("1m").unwrap(), 0);
        assert_eq!(parse_tile("5m").unwrap(), 4);
        assert_eq!(parse_tile("2z").unwrap(), 28);
        assert_eq!(parse_tile("7z").unwrap(), 33);
        assert!(parse_tile("8z").is_err());
        assert!(parse_tile("0m").is_err());
        assert!(parse_tile("12m").is_err());

        let (tiles, melds, flowers) =
            parse_hand_internal("123m456p55z(p1z)(a9s) f12").unwrap();
        assert_eq!(tiles, vec![0, 1, 2, 12, 13, 14, 31, 31]);
        assert_eq!(melds.len(), 2);
        assert_eq!(melds[0].tiles, vec![27, 27, 27]);
        assert_eq!(melds[1].tiles, vec![26, 26, 26, 26]);
        assert_eq!(flowers, vec![0, 1]);

        assert!(parse_hand_internal("12m3").is_err());
        assert!(parse_hand_internal("(124m)").is_err());
        assert!(parse_hand_internal("(p12m)").is_err());
        assert!(parse_hand_internal("123x").is_err());
    }
}

#[cfg(test)]
mod property_tests {
    use crate::hu;
    use crate::ting;
    use crate::types::{Hand, TILE_MAX};
    use proptest::prelude::*;

    /// Independent list-based partitioner used as a reference for the
    /// count-vector search.
    fn partition_ref(tiles: &[u8]) -> bool {
        let Some((&first, _)) = tiles.split_first() else {
            return true;
        };
        let mut rest = tiles.to_vec();
        if remove_copies(&mut rest, first, 3) && partition_ref(&rest) {
            return true;
        }
        if (first as usize) < 27 && first % 9 <= 6 {
            let mut rest = tiles.to_vec();
            if remove_copies(&mut rest, first, 1)
                && remove_copies(&mut rest, first + 1, 1)
                && remove_copies(&mut rest, first + 2, 1)
                && partition_ref(&rest)
            {
                return true;
            }
        }
        false
    }

    fn remove_copies(tiles: &mut Vec<u8>, kind: u8, n: usize) -> bool {
        for _ in 0..n {
            match tiles.iter().position(|&t| t == kind) {
                Some(idx) => {
                    tiles.remove(idx);
                }
                None => return false,
            }
        }
        true
    }

    fn expand(counts: &[u8; TILE_MAX]) -> Vec<u8> {
        let mut tiles = Vec::new();
        for (k, &c) in counts.iter().enumerate() {
            for _ in 0..c {
                tiles.push(k as u8);
            }
        }
        tiles
    }

    /// Overlay up to five groups onto a count vector, skipping any group
    /// that would break the four-copy cap. The result is partitionable by
    /// construction.
    fn build_counts(groups: &[(usize, bool)]) -> [u8; TILE_MAX] {
        let mut counts = [0u8; TILE_MAX];
        for &(k, triplet) in groups {
            if triplet {
                if counts[k] + 3 <= 4 {
                    counts[k] += 3;
                }
            } else if k < 27 && k % 9 <= 6 && counts[k] < 4 && counts[k + 1] < 4 && counts[k + 2] < 4
            {
                counts[k] += 1;
                counts[k + 1] += 1;
                counts[k + 2] += 1;
            }
        }
        counts
    }

    proptest! {
        #[test]
        fn meld_search_matches_reference(raw in proptest::collection::vec(0u8..=4, TILE_MAX)) {
            let mut counts = [0u8; TILE_MAX];
            counts.copy_from_slice(&raw);
            let tiles = expand(&counts);
            let mut h = Hand { counts };
            let got = hu::decompose(&mut h, 0);
            prop_assert_eq!(h.counts, counts);
            let want = tiles.len() % 3 == 0 && partition_ref(&tiles);
            prop_assert_eq!(got, want);
        }

        #[test]
        fn built_partitions_always_decompose(
            groups in proptest::collection::vec((0usize..TILE_MAX, any::<bool>()), 1..6),
            pair in 0usize..TILE_MAX,
        ) {
            let counts = build_counts(&groups);
            let mut h = Hand { counts };
            prop_assert!(hu::decompose(&mut h, 0));

            // With a pair on top the standard win search must succeed, and
            // removing any tile must leave the removed kind in the waits.
            prop_assume!(counts[pair] <= 2);
            let mut winning = Hand { counts };
            winning.counts[pair] += 2;
            prop_assert!(hu::is_standard_hu(&mut winning));

            let removed = winning
                .counts
                .iter()
                .position(|&c| c > 0)
                .unwrap_or(0);
            let mut ting_hand = winning.clone();
            ting_hand.counts[removed] -= 1;
            let before = ting_hand.counts;
            let ws = ting::waits(&mut ting_hand);
            prop_assert_eq!(ting_hand.counts, before);
            prop_assert!(ws.contains(&(removed as u8)));
        }
    }
}
