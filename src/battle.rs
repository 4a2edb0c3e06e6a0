use crate::damage::resolve_move;
use crate::dex::ReferenceData;
use crate::pokemon::Pokemon;
use rand::Rng;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BattleOptions {
    pub level: u32,
    pub max_moves: usize,
    pub choose_attempts: usize,
    /// Hard ceiling on exchanges, on top of the PP-derived bound.
    pub max_exchanges: usize,
}

impl Default for BattleOptions {
    fn default() -> Self {
        Self {
            level: 10,
            max_moves: 4,
            choose_attempts: 100,
            max_exchanges: 10_000,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BattleResult {
    Winner(Side),
    Tie,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BattleRecord {
    pub result: BattleResult,
    pub first_attacker: Side,
    pub turns: u32,
}

impl BattleRecord {
    pub fn winner(&self) -> Option<Side> {
        match self.result {
            BattleResult::Winner(side) => Some(side),
            BattleResult::Tie => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Phase {
    Start,
    Exchange,
    Resolved(BattleResult),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum HalfTurn {
    Hit,
    Knockout,
    MovesExhausted,
}

/// Random move with PP left, or `None` after `attempts` misses.
pub fn choose_move<R: Rng + ?Sized>(pokemon: &Pokemon, attempts: usize, rng: &mut R) -> Option<usize> {
    let count = pokemon.move_count();
    if count == 0 {
        return None;
    }
    (0..attempts)
        .map(|_| rng.gen_range(0..count))
        .find(|&slot| pokemon.move_at(slot).has_pp())
}

pub struct Battle<'a, R: Rng> {
    a: &'a mut Pokemon,
    b: &'a mut Pokemon,
    dex: &'a dyn ReferenceData,
    options: &'a BattleOptions,
    rng: &'a mut R,
    phase: Phase,
    first: Side,
    turns: u32,
    exchanges: usize,
    exchange_limit: usize,
}

impl<'a, R: Rng> Battle<'a, R> {
    pub fn new(
        a: &'a mut Pokemon,
        b: &'a mut Pokemon,
        dex: &'a dyn ReferenceData,
        options: &'a BattleOptions,
        rng: &'a mut R,
    ) -> Self {
        Battle {
            a,
            b,
            dex,
            options,
            rng,
            phase: Phase::Start,
            first: Side::A,
            turns: 0,
            exchanges: 0,
            exchange_limit: options.max_exchanges,
        }
    }

    fn start(&mut self) {
        self.a.reset(self.options.max_moves, &mut *self.rng);
        self.b.reset(self.options.max_moves, &mut *self.rng);
        self.first = if self.rng.gen_bool(0.5) { Side::A } else { Side::B };
        // Every non-final exchange spends at least one PP.
        let total_pp = (self.a.remaining_pp() + self.b.remaining_pp()) as usize;
        self.exchange_limit = self.options.max_exchanges.min(total_pp + 1);
        self.phase = Phase::Exchange;
    }

    fn half_turn(&mut self, attacker: Side) -> HalfTurn {
        self.turns += 1;
        let level = self.options.level;
        let attempts = self.options.choose_attempts;
        let dex = self.dex;
        let rng = &mut *self.rng;
        let (atk, def) = match attacker {
            Side::A => (&mut *self.a, &mut *self.b),
            Side::B => (&mut *self.b, &mut *self.a),
        };
        let Some(slot) = choose_move(atk, attempts, rng) else {
            return HalfTurn::MovesExhausted;
        };
        let hit = resolve_move(atk, def, atk.move_at(slot), level, dex, rng);
        def.take_damage(hit.damage);
        atk.move_at_mut(slot).spend_pp();
        tracing::trace!(
            attacker = %atk.name,
            defender = %def.name,
            move_name = %atk.move_at(slot).name,
            damage = hit.damage,
            critical = hit.critical,
            pp = atk.move_at(slot).current_pp,
            hp = def.current_hp,
            "move applied"
        );
        if def.is_fainted() {
            HalfTurn::Knockout
        } else {
            HalfTurn::Hit
        }
    }

    fn exchange(&mut self) {
        if self.exchanges >= self.exchange_limit {
            tracing::warn!(
                a = %self.a.name,
                b = %self.b.name,
                exchanges = self.exchanges,
                "exchange limit reached, calling the battle a tie"
            );
            self.phase = Phase::Resolved(BattleResult::Tie);
            return;
        }
        self.exchanges += 1;

        let first = self.first;
        let opening = self.half_turn(first);
        if opening == HalfTurn::Knockout {
            self.phase = Phase::Resolved(BattleResult::Winner(first));
            return;
        }
        let reply = self.half_turn(first.opponent());
        if reply == HalfTurn::Knockout {
            self.phase = Phase::Resolved(BattleResult::Winner(first.opponent()));
            return;
        }
        if opening == HalfTurn::MovesExhausted && reply == HalfTurn::MovesExhausted {
            self.phase = Phase::Resolved(BattleResult::Tie);
        }
    }

    pub fn run(mut self) -> BattleRecord {
        loop {
            match self.phase {
                Phase::Start => self.start(),
                Phase::Exchange => self.exchange(),
                Phase::Resolved(result) => {
                    return BattleRecord {
                        result,
                        first_attacker: self.first,
                        turns: self.turns,
                    }
                }
            }
        }
    }
}

pub fn simulate_battle<R: Rng>(
    a: &mut Pokemon,
    b: &mut Pokemon,
    dex: &dyn ReferenceData,
    options: &BattleOptions,
    rng: &mut R,
) -> BattleRecord {
    Battle::new(a, b, dex, options, rng).run()
}
