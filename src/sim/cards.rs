//! Rogue cards
//!
//! The catalog is a static table keyed by `CardId`; each card's effect is a
//! single arm in `apply_card`. Pools are per run: an offered card that is not
//! picked stays in its pool, a picked card is gone for the rest of the run.

use rand::Rng;

use super::powerups::apply_effect;
use super::state::{GameEvent, GameState, Mode, PowerUpKind};
use crate::tuning::GameConfig;

/// Cards shown per offer
pub const OFFER_SIZE: usize = 3;
/// Rogue drop chance is scaled down from the base chance...
pub const ROGUE_DROP_SCALE: f32 = 0.62;
/// ...and never exceeds this
pub const ROGUE_DROP_CAP: f32 = 0.68;

/// Every card in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardId {
    // Power-up cards: join the drop deck and fire once immediately
    PuExtraBall,
    PuExpand,
    PuShield,
    PuFireball,
    PuExtraLife,
    // Modifiers: explicit trade-offs
    WidePaddle,
    Overdrive,
    HeavyHitter,
    LuckyCharm,
    Greed,
    QuickBanker,
    Tailwind,
    Gale,
    CenteredArena,
    Glue,
    Overgrowth,
    Pruning,
    Demolition,
    Aegis,
    // OP: pure upside, later waves only
    GiantPaddle,
    TwinStrike,
    Jackpot,
    Fortune,
    NineLives,
    Inferno,
    Afterburner,
}

/// Static card metadata
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardDef {
    pub id: CardId,
    pub name: &'static str,
    pub short_desc: &'static str,
    pub is_op: bool,
    /// First wave at which the card may be offered
    pub min_wave: i32,
}

const fn card(
    id: CardId,
    name: &'static str,
    short_desc: &'static str,
    is_op: bool,
    min_wave: i32,
) -> CardDef {
    CardDef {
        id,
        name,
        short_desc,
        is_op,
        min_wave,
    }
}

/// Catalog, in `CardId` declaration order
pub const CARDS: &[CardDef] = &[
    card(CardId::PuExtraBall, "Multiball", "Extra Ball drops; +3 balls now", false, 1),
    card(CardId::PuExpand, "Long Paddle", "Expand drops; expand now", false, 1),
    card(CardId::PuShield, "Barrier", "Shield drops; shield now", false, 1),
    card(CardId::PuFireball, "Fire Starter", "Fireball drops; fireball now", false, 2),
    card(CardId::PuExtraLife, "Spare Heart", "Extra Life drops; +1 life now", false, 3),
    card(CardId::WidePaddle, "Wide Paddle", "Paddle x1.35 wide, x0.88 speed", false, 1),
    card(CardId::Overdrive, "Overdrive", "Ball x1.15 speed, points x1.25", false, 1),
    card(CardId::HeavyHitter, "Heavy Hitter", "+1 brick damage, drops x0.8", false, 4),
    card(CardId::LuckyCharm, "Lucky Charm", "Drops x1.35, Tiny curse joins deck", false, 2),
    card(CardId::Greed, "Greed", "Points x1.5, +150 life-loss penalty", false, 2),
    card(CardId::QuickBanker, "Quick Banker", "Bank 40% sooner, drops x0.9", false, 2),
    card(CardId::Tailwind, "Tailwind", "Steady wind, points x1.15", false, 1),
    card(CardId::Gale, "Gale", "Random gusts, points x1.3", false, 2),
    card(CardId::CenteredArena, "Centered", "Paddle kept from edges, x1.1 speed", false, 1),
    card(CardId::Glue, "Glue", "Paddle catches balls, x0.9 speed", false, 3),
    card(CardId::Overgrowth, "Overgrowth", "+1 row per wave, points x1.3", false, 2),
    card(CardId::Pruning, "Pruning", "-1 row per wave, drops x0.85", false, 2),
    card(CardId::Demolition, "Demolition", "Fireball radius x1.4, Reverse curse", false, 2),
    card(CardId::Aegis, "Aegis", "Shield lasts x1.5, Slow curse", false, 2),
    card(CardId::GiantPaddle, "Giant", "Paddle x1.25 wide", true, 3),
    card(CardId::TwinStrike, "Twin Strike", "+1 brick damage", true, 6),
    card(CardId::Jackpot, "Jackpot", "Points x1.5", true, 3),
    card(CardId::Fortune, "Fortune", "Drops x1.5", true, 3),
    card(CardId::NineLives, "Nine Lives", "+2 lives", true, 3),
    card(CardId::Inferno, "Inferno", "Fireball radius x1.5, Fireball drops", true, 6),
    card(CardId::Afterburner, "Afterburner", "Paddle x1.25 speed", true, 3),
];

impl CardId {
    pub fn def(self) -> &'static CardDef {
        &CARDS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.def().name
    }

    pub fn is_op(self) -> bool {
        self.def().is_op
    }

    /// The power-up a power-up card grants
    pub fn power_up(self) -> Option<PowerUpKind> {
        match self {
            CardId::PuExtraBall => Some(PowerUpKind::ExtraBall),
            CardId::PuExpand => Some(PowerUpKind::Expand),
            CardId::PuShield => Some(PowerUpKind::Shield),
            CardId::PuFireball => Some(PowerUpKind::Fireball),
            CardId::PuExtraLife => Some(PowerUpKind::ExtraLife),
            _ => None,
        }
    }
}

/// Whether a card may be offered at `wave`
pub fn is_eligible(id: CardId, wave: i32) -> bool {
    wave >= id.def().min_wave
}

/// Fresh per-run pools from the catalog
pub fn init_pools(state: &mut GameState) {
    state.rogue.normal_pool = CARDS.iter().filter(|c| !c.is_op).map(|c| c.id).collect();
    state.rogue.op_pool = CARDS.iter().filter(|c| c.is_op).map(|c| c.id).collect();
    state.rogue.chosen.clear();
    state.rogue.offers.clear();
}

/// Deal up to three distinct eligible cards and enter the card screen.
///
/// Returns false (and leaves the mode alone) when nothing is eligible.
pub fn deal_offer(state: &mut GameState, use_op: bool, wave_progress: i32) -> bool {
    let pool = if use_op {
        &state.rogue.op_pool
    } else {
        &state.rogue.normal_pool
    };
    let mut eligible: Vec<CardId> = pool
        .iter()
        .copied()
        .filter(|id| is_eligible(*id, wave_progress))
        .collect();

    // Partial Fisher-Yates: only the first `k` slots are shuffled
    let k = eligible.len().min(OFFER_SIZE);
    for i in 0..k {
        let j = state.rng.random_range(i..eligible.len());
        eligible.swap(i, j);
    }
    eligible.truncate(k);

    if eligible.is_empty() {
        state.rogue.offers.clear();
        return false;
    }

    log::debug!(
        "Offering {:?} ({} pool, wave {})",
        eligible,
        if use_op { "OP" } else { "normal" },
        wave_progress
    );
    state.rogue.offers = eligible;
    state.rogue.offer_is_op = use_op;
    state.mode = Mode::RogueCards;
    state.push_event(GameEvent::CardsOffered { op: use_op });
    true
}

/// Offer after clearing a wave: OP pool ahead of every third wave
pub fn offer_after_wave_clear(state: &mut GameState, next_wave: i32) -> bool {
    let use_op = next_wave >= 3 && next_wave % 3 == 0;
    if deal_offer(state, use_op, next_wave) {
        return true;
    }
    // OP pool exhausted or gated: fall back to a normal offer
    use_op && deal_offer(state, false, next_wave)
}

/// Take the offered card at `index`.
///
/// Returns the picked card, or None if nothing was pickable.
pub fn pick_card(state: &mut GameState, cfg: &GameConfig, index: usize) -> Option<CardId> {
    if state.mode != Mode::RogueCards {
        return None;
    }
    let id = *state.rogue.offers.get(index)?;

    let pool = if id.is_op() {
        &mut state.rogue.op_pool
    } else {
        &mut state.rogue.normal_pool
    };
    pool.retain(|c| *c != id);
    state.rogue.chosen.push(id);
    state.rogue.offers.clear();

    apply_card(state, cfg, id);
    state.push_event(GameEvent::CardPicked(id));
    log::debug!("Picked card {}", id.name());

    if state.rogue.draft_rounds_left > 0 {
        state.rogue.draft_rounds_left -= 1;
        if state.rogue.draft_rounds_left > 0 && deal_offer(state, false, 1) {
            return Some(id);
        }
        state.rogue.draft_rounds_left = 0;
    }
    state.mode = Mode::Playing;
    Some(id)
}

/// Apply a card's effect to the run
pub fn apply_card(state: &mut GameState, cfg: &GameConfig, id: CardId) {
    if let Some(kind) = id.power_up() {
        state.rogue.drop_deck.insert(kind);
        apply_effect(state, cfg, kind);
        return;
    }

    let deck = &mut state.rogue.drop_deck;
    let m = &mut state.rogue.mods;
    match id {
        CardId::WidePaddle => {
            m.base_paddle_scale_x *= 1.35;
            m.paddle_speed_mult *= 0.88;
        }
        CardId::Overdrive => {
            m.ball_speed_mult *= 1.15;
            m.brick_points_mult *= 1.25;
        }
        CardId::HeavyHitter => {
            m.brick_damage_bonus += 1;
            m.drop_chance_mult *= 0.8;
        }
        CardId::LuckyCharm => {
            m.drop_chance_mult *= 1.35;
            deck.insert(PowerUpKind::Tiny);
        }
        CardId::Greed => {
            m.brick_points_mult *= 1.5;
            m.life_loss_penalty_bonus += 150;
        }
        CardId::QuickBanker => {
            m.bank_idle_mult *= 0.6;
            m.drop_chance_mult *= 0.9;
        }
        CardId::Tailwind => {
            m.wind_x += 1.6;
            m.brick_points_mult *= 1.15;
        }
        CardId::Gale => {
            m.random_wind = true;
            m.brick_points_mult *= 1.3;
        }
        CardId::CenteredArena => {
            m.paddle_clamp_margin += 3.0;
            m.paddle_speed_mult *= 1.1;
        }
        CardId::Glue => {
            m.sticky_paddle = true;
            m.paddle_speed_mult *= 0.9;
        }
        CardId::Overgrowth => {
            m.rows_per_wave_delta += 1;
            m.brick_points_mult *= 1.3;
        }
        CardId::Pruning => {
            m.rows_per_wave_delta -= 1;
            m.drop_chance_mult *= 0.85;
        }
        CardId::Demolition => {
            m.fireball_radius_mult *= 1.4;
            deck.insert(PowerUpKind::Fireball);
            deck.insert(PowerUpKind::Reverse);
        }
        CardId::Aegis => {
            m.shield_duration_mult *= 1.5;
            deck.insert(PowerUpKind::Shield);
            deck.insert(PowerUpKind::Slow);
        }
        CardId::GiantPaddle => m.base_paddle_scale_x *= 1.25,
        CardId::TwinStrike => m.brick_damage_bonus += 1,
        CardId::Jackpot => m.brick_points_mult *= 1.5,
        CardId::Fortune => m.drop_chance_mult *= 1.5,
        CardId::NineLives => state.lives += 2,
        CardId::Inferno => {
            m.fireball_radius_mult *= 1.5;
            deck.insert(PowerUpKind::Fireball);
        }
        CardId::Afterburner => m.paddle_speed_mult *= 1.25,
        CardId::PuExtraBall
        | CardId::PuExpand
        | CardId::PuShield
        | CardId::PuFireball
        | CardId::PuExtraLife => {}
    }
}

/// Drop chance under Rogue rules
pub fn effective_drop_chance(state: &GameState, cfg: &GameConfig) -> f32 {
    (cfg.power_up_chance * ROGUE_DROP_SCALE * state.rogue.mods.drop_chance_mult)
        .clamp(0.0, ROGUE_DROP_CAP)
}

pub fn base_paddle_scale_x(state: &GameState) -> f32 {
    state.rogue.mods.base_paddle_scale_x
}

pub fn paddle_speed_mult(state: &GameState) -> f32 {
    state.rogue.mods.paddle_speed_mult
}

pub fn ball_speed_mult(state: &GameState) -> f32 {
    state.rogue.mods.ball_speed_mult
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameType;

    fn rogue_state() -> (GameState, GameConfig) {
        let cfg = GameConfig::default();
        let mut state = GameState::new(&cfg);
        state.game_type = GameType::Rogue;
        init_pools(&mut state);
        (state, cfg)
    }

    #[test]
    fn test_catalog_matches_ids() {
        for (i, def) in CARDS.iter().enumerate() {
            assert_eq!(def.id as usize, i, "{} out of order", def.name);
        }
    }

    #[test]
    fn test_offer_is_unique_and_eligible() {
        let (mut state, _) = rogue_state();
        for _ in 0..50 {
            assert!(deal_offer(&mut state, false, 1));
            let offers = state.rogue.offers.clone();
            assert_eq!(offers.len(), OFFER_SIZE);
            for (i, a) in offers.iter().enumerate() {
                assert!(is_eligible(*a, 1));
                assert!(!a.is_op());
                assert!(!offers[i + 1..].contains(a));
            }
        }
    }

    #[test]
    fn test_unpicked_offer_keeps_pool() {
        let (mut state, _) = rogue_state();
        let before = state.rogue.normal_pool.len();
        deal_offer(&mut state, false, 5);
        assert_eq!(state.rogue.normal_pool.len(), before);
    }

    #[test]
    fn test_pick_removes_from_pool() {
        let (mut state, cfg) = rogue_state();
        deal_offer(&mut state, false, 5);
        let id = pick_card(&mut state, &cfg, 1).expect("picked");
        assert!(!state.rogue.normal_pool.contains(&id));
        assert_eq!(state.rogue.chosen, vec![id]);
        assert_eq!(state.mode, Mode::Playing);
        // Offer already consumed
        assert_eq!(pick_card(&mut state, &cfg, 0), None);
    }

    #[test]
    fn test_op_offer_every_third_wave() {
        let (mut state, _) = rogue_state();
        assert!(offer_after_wave_clear(&mut state, 3));
        assert!(state.rogue.offer_is_op);
        assert!(state.rogue.offers.iter().all(|c| c.is_op()));

        assert!(offer_after_wave_clear(&mut state, 4));
        assert!(!state.rogue.offer_is_op);
    }

    #[test]
    fn test_wave_one_gating() {
        for def in CARDS {
            if matches!(def.id, CardId::Greed | CardId::LuckyCharm | CardId::QuickBanker) {
                assert!(!is_eligible(def.id, 1));
            }
        }
        assert!(!is_eligible(CardId::HeavyHitter, 3));
        assert!(is_eligible(CardId::HeavyHitter, 4));
    }

    #[test]
    fn test_modifier_effects() {
        let (mut state, cfg) = rogue_state();
        apply_card(&mut state, &cfg, CardId::WidePaddle);
        assert!((base_paddle_scale_x(&state) - 1.35).abs() < 1e-6);
        assert!((paddle_speed_mult(&state) - 0.88).abs() < 1e-6);

        apply_card(&mut state, &cfg, CardId::LuckyCharm);
        assert!(state.rogue.drop_deck.contains(&PowerUpKind::Tiny));

        apply_card(&mut state, &cfg, CardId::Overdrive);
        assert!((ball_speed_mult(&state) - 1.15).abs() < 1e-6);
    }

    #[test]
    fn test_power_up_card_fills_deck_and_fires() {
        let (mut state, cfg) = rogue_state();
        let lives = state.lives;
        apply_card(&mut state, &cfg, CardId::PuExtraLife);
        assert!(state.rogue.drop_deck.contains(&PowerUpKind::ExtraLife));
        assert_eq!(state.lives, lives + 1);
    }

    #[test]
    fn test_drop_chance_clamped() {
        let (mut state, cfg) = rogue_state();
        let base = effective_drop_chance(&state, &cfg);
        assert!((base - 0.35 * 0.62).abs() < 1e-6);
        state.rogue.mods.drop_chance_mult = 10.0;
        assert_eq!(effective_drop_chance(&state, &cfg), ROGUE_DROP_CAP);
        state.rogue.mods.drop_chance_mult = -1.0;
        assert_eq!(effective_drop_chance(&state, &cfg), 0.0);
    }
}
