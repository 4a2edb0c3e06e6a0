use crate::dex::ReferenceData;
use crate::model::DamageClass;
use crate::pokemon::{Move, Pokemon};
use phf::phf_set;
use rand::Rng;

/// Moves that skip the formula and deal damage equal to the attacker's level.
static LEVEL_DAMAGE_MOVES: phf::Set<&'static str> = phf_set! {
    "seismic-toss",
};

pub const STAB: f64 = 1.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub damage: u32,
    pub critical: bool,
    pub times: u32,
}

/// Speed/512, or speed/64 for high-crit moves. Crit-boosting abilities are not modelled.
pub fn crit_chance(speed: u32, elevated: bool) -> f64 {
    let denominator = if elevated { 64.0 } else { 512.0 };
    speed as f64 / denominator
}

pub fn is_critical_hit<R: Rng + ?Sized>(speed: u32, elevated: bool, rng: &mut R) -> bool {
    let roll: f64 = rng.gen();
    roll <= crit_chance(speed, elevated)
}

pub fn same_type_bonus(attacker: &Pokemon, mv: &Move) -> f64 {
    if attacker.has_type(&mv.move_type) {
        STAB
    } else {
        1.0
    }
}

pub fn type_multiplier(dex: &dyn ReferenceData, move_type: &str, defender_types: &[String]) -> f64 {
    defender_types
        .iter()
        .map(|defending| match dex.type_modifier(move_type, defending) {
            Some(modifier) => modifier as f64,
            None => unknown_matchup_modifier(move_type, defending),
        })
        .product()
}

// Pairs missing from the chart are treated as neutral.
fn unknown_matchup_modifier(move_type: &str, defending: &str) -> f64 {
    tracing::trace!(move_type, defending, "no type chart entry, using neutral modifier");
    1.0
}

pub fn roll_damage_spread<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen_range(217..=255)
}

/// Floored damage formula for one hit with a fixed spread roll `z` (217..=255).
#[allow(clippy::too_many_arguments)]
pub fn calculate_damage(
    level: u32,
    attack: u32,
    power: u32,
    defense: u32,
    stab: f64,
    modifier: f64,
    critical: bool,
    z: u32,
) -> u32 {
    let crit_mult = if critical { 4.0 } else { 2.0 };
    let level = level as f64;
    let defense = defense.max(1) as f64;
    let mut damage = ((((crit_mult * level) / 5.0) + 2.0) * attack as f64 * power as f64 / defense).floor();
    damage = (damage / 50.0).floor() + 2.0;
    damage = (damage * stab).floor();
    damage = (damage * modifier.max(0.0)).floor();
    ((damage * z as f64) / 255.0).floor() as u32
}

pub fn resolve_move<R: Rng + ?Sized>(
    attacker: &Pokemon,
    defender: &Pokemon,
    mv: &Move,
    level: u32,
    dex: &dyn ReferenceData,
    rng: &mut R,
) -> Hit {
    let critical = is_critical_hit(attacker.stats.speed, mv.elevated_crit, rng);
    let stab = same_type_bonus(attacker, mv);
    let (attack, defense) = match mv.damage_class {
        DamageClass::Special => (attacker.stats.special_attack, defender.stats.special_defense),
        _ => (attacker.stats.attack, defender.stats.defense),
    };
    let modifier = type_multiplier(dex, &mv.move_type, &defender.types);

    let per_hit = if LEVEL_DAMAGE_MOVES.contains(mv.name.as_str()) {
        level
    } else {
        let z = roll_damage_spread(rng);
        calculate_damage(level, attack, mv.power, defense, stab, modifier, critical, z)
    };

    let times = match mv.hits {
        Some((min, max)) => rng.gen_range(min..=max),
        None => 1,
    };

    Hit {
        damage: per_hit.saturating_mul(times),
        critical,
        times,
    }
}
