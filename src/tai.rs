use crate::hu;
use crate::rule::RuleMode;
use crate::ting;
use crate::types::{Conditions, Flowers, Hand, Meld, MeldType, TaiResult, TILE_MAX};
use log::debug;

/// Every scoring category, with its flat tai value and display label.
/// The evaluation order lives in `calculate_tai`; the table only holds data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tai {
    // Big shapes, mutually exclusive, highest first.
    BaXianGuoHai,
    QiQiangYi,
    LiguLigu,
    // Hand-structure bonuses.
    PingHu,
    DuTing,
    PengPengHu,
    MenQingZiMo,
    QuanQiuRen,
    MenQing,
    ZiMo,
    // Situational bonuses.
    GangShangKaiHua,
    HaiDiLaoYue,
    QiangGang,
    // Flowers.
    ZhengHua,
    HuaGang,
    // Dragons.
    BaiBan,
    FaCai,
    HongZhong,
    // Winds.
    DaSiXi,
    XiaoSiXi,
    QuanFeng,
    MenFeng,
    FengKe,
    // Suit purity, mutually exclusive.
    ZiYiSe,
    QingYiSe,
    HunYiSe,
}

impl Tai {
    pub const fn value(self) -> u32 {
        match self {
            Tai::BaXianGuoHai => 8,
            Tai::QiQiangYi => 8,
            Tai::LiguLigu => 8,
            Tai::PingHu => 2,
            Tai::DuTing => 1,
            Tai::PengPengHu => 4,
            Tai::MenQingZiMo => 3,
            Tai::QuanQiuRen => 2,
            Tai::MenQing => 1,
            Tai::ZiMo => 1,
            Tai::GangShangKaiHua => 1,
            Tai::HaiDiLaoYue => 1,
            Tai::QiangGang => 1,
            Tai::ZhengHua => 1,
            Tai::HuaGang => 2,
            Tai::BaiBan => 1,
            Tai::FaCai => 1,
            Tai::HongZhong => 1,
            Tai::DaSiXi => 16,
            Tai::XiaoSiXi => 8,
            Tai::QuanFeng => 1,
            Tai::MenFeng => 1,
            Tai::FengKe => 1,
            Tai::ZiYiSe => 8,
            Tai::QingYiSe => 8,
            Tai::HunYiSe => 4,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Tai::BaXianGuoHai => "Ba Xian Guo Hai",
            Tai::QiQiangYi => "Qi Qiang Yi",
            Tai::LiguLigu => "Ligu Ligu",
            Tai::PingHu => "Ping Hu",
            Tai::DuTing => "Du Ting",
            Tai::PengPengHu => "Peng Peng Hu",
            Tai::MenQingZiMo => "Men Qing Zi Mo",
            Tai::QuanQiuRen => "Quan Qiu Ren",
            Tai::MenQing => "Men Qing",
            Tai::ZiMo => "Zi Mo",
            Tai::GangShangKaiHua => "Gang Shang Kai Hua",
            Tai::HaiDiLaoYue => "Hai Di Lao Yue",
            Tai::QiangGang => "Qiang Gang",
            Tai::ZhengHua => "Zheng Hua",
            Tai::HuaGang => "Hua Gang",
            Tai::BaiBan => "Bai Ban",
            Tai::FaCai => "Fa Cai",
            Tai::HongZhong => "Hong Zhong",
            Tai::DaSiXi => "Da Si Xi",
            Tai::XiaoSiXi => "Xiao Si Xi",
            Tai::QuanFeng => "Quan Feng",
            Tai::MenFeng => "Men Feng",
            Tai::FengKe => "Feng Ke",
            Tai::ZiYiSe => "Zi Yi Se",
            Tai::QingYiSe => "Qing Yi Se",
            Tai::HunYiSe => "Hun Yi Se",
        }
    }
}

fn add(res: &mut TaiResult, tai: Tai) {
    res.push(tai.label(), tai.value());
}

/// Tai evaluation for a hand already known to be complete.
///
/// `hand` is the concealed count vector including the winning tile; exposed
/// groups, flowers and the table context come separately. Categories append
/// in a fixed order so the result log doubles as an audit trail.
pub fn calculate_tai(
    hand: &Hand,
    melds: &[Meld],
    flowers: &Flowers,
    cond: &Conditions,
    win_tile: u8,
) -> TaiResult {
    let mut res = TaiResult {
        hu: true,
        ..Default::default()
    };
    let strict = cond.rule.mode == RuleMode::StrictFlower;
    let flower_count = flowers.count();

    // Big shapes: first match wins and the structure bonuses are skipped.
    if flower_count == 8 {
        add(&mut res, Tai::BaXianGuoHai);
    } else if flower_count == 7 && cond.seven_snatch {
        add(&mut res, Tai::QiQiangYi);
    } else if melds.is_empty() && hu::is_ligu(hand) {
        add(&mut res, Tai::LiguLigu);
    } else {
        let exposed_triplet = melds.iter().any(|m| m.meld_type != MeldType::Chi);
        let honor_triplet = (27..TILE_MAX).any(|k| hand.counts[k] >= 3);

        let mut pinghu = false;
        if strict && flower_count == 0 && !cond.kong_bloom && !exposed_triplet && !honor_triplet {
            let mut pre_win = hand.clone();
            pre_win.remove(win_tile);
            pinghu = ting::is_pinghu_wait(
                &pre_win,
                win_tile,
                cond.round_wind.tile_kind(),
                cond.seat_wind.tile_kind(),
            );
        }
        if pinghu {
            add(&mut res, Tai::PingHu);
        } else if ting::is_single_wait(hand, win_tile) {
            add(&mut res, Tai::DuTing);
        }

        let has_chi = melds.iter().any(|m| m.meld_type == MeldType::Chi);
        if !has_chi && all_triplets(hand) {
            add(&mut res, Tai::PengPengHu);
        }

        // Concealed/self-draw is a priority chain, not a sum of parts.
        let concealed = melds.iter().all(|m| !m.is_exposed());
        let fully_melded = melds.iter().filter(|m| m.is_exposed()).count() == 5;
        if concealed && cond.self_draw {
            add(&mut res, Tai::MenQingZiMo);
        } else if fully_melded && !cond.self_draw {
            add(&mut res, Tai::QuanQiuRen);
        } else {
            if concealed {
                add(&mut res, Tai::MenQing);
            }
            if cond.self_draw {
                add(&mut res, Tai::ZiMo);
            }
        }
    }

    if cond.kong_bloom {
        add(&mut res, Tai::GangShangKaiHua);
    }
    if cond.last_tile {
        add(&mut res, Tai::HaiDiLaoYue);
    }
    if cond.robbing_kong {
        add(&mut res, Tai::QiangGang);
    }

    if strict {
        let seat = cond.seat_wind as usize;
        if flowers.held[seat] {
            add(&mut res, Tai::ZhengHua);
        }
        if flowers.held[seat + 4] {
            add(&mut res, Tai::ZhengHua);
        }
        if flowers.held[0..4].iter().all(|&b| b) {
            add(&mut res, Tai::HuaGang);
        }
        if flowers.held[4..8].iter().all(|&b| b) {
            add(&mut res, Tai::HuaGang);
        }
    }

    if has_triplet(hand, melds, 31) {
        add(&mut res, Tai::BaiBan);
    }
    if has_triplet(hand, melds, 32) {
        add(&mut res, Tai::FaCai);
    }
    if has_triplet(hand, melds, 33) {
        add(&mut res, Tai::HongZhong);
    }

    let wind_triplets: Vec<u8> = (27u8..=30).filter(|&k| has_triplet(hand, melds, k)).collect();
    if strict {
        // A wind held twice in a complete hand can only be the pair.
        let wind_pair = (27..=30).any(|k| hand.counts[k] == 2);
        if wind_triplets.len() == 4 {
            add(&mut res, Tai::DaSiXi);
        } else if wind_triplets.len() == 3 && wind_pair {
            add(&mut res, Tai::XiaoSiXi);
        } else {
            if wind_triplets.contains(&cond.round_wind.tile_kind()) {
                add(&mut res, Tai::QuanFeng);
            }
            if wind_triplets.contains(&cond.seat_wind.tile_kind()) {
                add(&mut res, Tai::MenFeng);
            }
        }
    } else {
        for _ in &wind_triplets {
            add(&mut res, Tai::FengKe);
        }
    }

    if let Some(tai) = purity(hand, melds) {
        add(&mut res, tai);
    }

    debug!(
        "tai win_tile={} total={} categories={:?}",
        win_tile, res.total, res.categories
    );
    res
}

/// Triplet (or kong) of `kind` anywhere in the hand or the declared groups.
fn has_triplet(hand: &Hand, melds: &[Meld], kind: u8) -> bool {
    hand.counts[kind as usize] >= 3
        || melds
            .iter()
            .any(|m| m.meld_type != MeldType::Chi && m.base_kind() == kind)
}

/// Some pair choice leaves nothing but triplets in the concealed vector.
fn all_triplets(hand: &Hand) -> bool {
    (0..TILE_MAX).any(|p| {
        hand.counts[p] >= 2
            && (0..TILE_MAX).all(|k| {
                let c = if k == p {
                    hand.counts[k] - 2
                } else {
                    hand.counts[k]
                };
                c == 0 || c == 3
            })
    })
}

/// All-honors, flush and half-flush are mutually exclusive; evaluated once
/// over the concealed vector and the declared groups together.
fn purity(hand: &Hand, melds: &[Meld]) -> Option<Tai> {
    let mut suits = [false; 3];
    let mut has_honor = false;
    let mut mark = |k: usize| {
        if k >= 27 {
            has_honor = true;
        } else {
            suits[k / 9] = true;
        }
    };
    for (k, &c) in hand.counts.iter().enumerate() {
        if c > 0 {
            mark(k);
        }
    }
    for m in melds {
        for &t in &m.tiles {
            mark(t as usize);
        }
    }

    let suit_count = suits.iter().filter(|&&b| b).count();
    if suit_count == 0 && has_honor {
        Some(Tai::ZiYiSe)
    } else if suit_count == 1 && !has_honor {
        Some(Tai::QingYiSe)
    } else if suit_count == 1 && has_honor {
        Some(Tai::HunYiSe)
    } else {
        None
    }
}
