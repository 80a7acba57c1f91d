//! Race analysis between movers and interceptors.
//!
//! Every safety question the evaluator asks has the same shape: can some
//! mover reach a cell (a resource, a capsule, a border crossing) before any
//! interceptor can get there? Offense and defense use the same functions
//! with the roles swapped. The head-start margins differ between strategies
//! and are carried in `SafetyPolicy`.
//!
//! `UNREACHABLE` threads through every comparison: a mover that cannot
//! reach never wins a race, and a missing or unreachable interceptor never
//! stops one.

use serde::{Deserialize, Serialize};

use crate::board::cell::Cell;
use crate::board::distance::{Distance, DistanceOracle, UNREACHABLE};

/// Head start the symmetric strategy requires to call an escape safe:
/// the mover moves first, so it needs `distance + 1 < interceptor`.
pub const ESCAPE_HEAD_START: i32 = 1;

/// Capsule margin for the symmetric strategy: defenders must be two steps
/// closer than any attacker for a capsule to count as guarded.
pub const CAPSULE_GUARD_MARGIN: i32 = 1;

/// A piece taking part in a race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Participant {
    pub position: Option<Cell>,
    pub carrying: u32,
}

/// How resource races are tallied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceRule {
    /// Every resource counts when the closest mover can fetch it and reach
    /// the resource's nearest border cell ahead of every interceptor.
    /// Carried cargo counts when its holder's nearest exit is safe.
    Detour {
        resource_margin: i32,
        carried_margin: i32,
    },
    /// Each mover threatens at most one resource: its cargo if carrying,
    /// otherwise the single cheapest resource to steal and bank.
    NearestThreat { margin: i32 },
}

/// Which border the defensive race is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderChoice {
    Home,
    Enemy,
}

/// Margins and race rules for one strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyPolicy {
    pub escape_margin: i32,
    pub capsule_margin: i32,
    /// `None` disables the capturable-food feature.
    pub capture: Option<RaceRule>,
    pub defense: RaceRule,
    pub defense_border: BorderChoice,
}

impl SafetyPolicy {
    /// Symmetric accounting: counts both what we can capture and what the
    /// opponent can capture from us.
    pub const fn symmetric() -> Self {
        SafetyPolicy {
            escape_margin: ESCAPE_HEAD_START,
            capsule_margin: CAPSULE_GUARD_MARGIN,
            capture: Some(RaceRule::Detour {
                resource_margin: 1,
                carried_margin: 1,
            }),
            defense: RaceRule::Detour {
                resource_margin: -2,
                carried_margin: 0,
            },
            defense_border: BorderChoice::Home,
        }
    }

    /// Attacker-only accounting with ties going to the attacker.
    pub const fn sentinel() -> Self {
        SafetyPolicy {
            escape_margin: 0,
            capsule_margin: -1,
            capture: None,
            defense: RaceRule::NearestThreat { margin: -1 },
            defense_border: BorderChoice::Home,
        }
    }

    /// Predicted gains and losses, both with a one-step head start.
    pub const fn ledger() -> Self {
        SafetyPolicy {
            escape_margin: ESCAPE_HEAD_START,
            capsule_margin: CAPSULE_GUARD_MARGIN,
            capture: Some(RaceRule::Detour {
                resource_margin: 1,
                carried_margin: 1,
            }),
            defense: RaceRule::Detour {
                resource_margin: 1,
                carried_margin: 1,
            },
            defense_border: BorderChoice::Enemy,
        }
    }
}

/// True when `mover + margin < interceptor`, with `UNREACHABLE` as infinity.
#[inline]
pub fn beats(mover: Distance, margin: i32, interceptor: Distance) -> bool {
    if mover == UNREACHABLE {
        return false;
    }
    if interceptor == UNREACHABLE {
        return true;
    }
    (mover as i64) + (margin as i64) < interceptor as i64
}

/// The candidate closest to `from`; the first minimum wins ties.
/// `None` when there are no candidates.
pub fn closest_cell_and_distance(
    oracle: &DistanceOracle,
    from: Cell,
    candidates: &[Cell],
) -> Option<(Cell, Distance)> {
    let mut best: Option<(Cell, Distance)> = None;
    for &c in candidates {
        let d = oracle.distance(from, c);
        match best {
            Some((_, bd)) if bd <= d => {}
            _ => best = Some((c, d)),
        }
    }
    best
}

/// Smallest distance from `target` to any of `positions`; `UNREACHABLE`
/// for an empty set.
#[inline]
pub fn min_distance(oracle: &DistanceOracle, target: Cell, positions: &[Cell]) -> Distance {
    positions
        .iter()
        .map(|&p| oracle.distance(target, p))
        .min()
        .unwrap_or(UNREACHABLE)
}

/// Observed positions of a participant set.
pub fn positions(participants: &[Participant]) -> Vec<Cell> {
    participants.iter().filter_map(|p| p.position).collect()
}

/// True iff some border cell can be reached with `margin` steps to spare
/// over every interceptor.
pub fn has_safe_escape(
    oracle: &DistanceOracle,
    mover: Cell,
    interceptors: &[Cell],
    border: &[Cell],
    margin: i32,
) -> bool {
    border.iter().any(|&b| {
        beats(
            oracle.distance(mover, b),
            margin,
            min_distance(oracle, b, interceptors),
        )
    })
}

/// True when the closest defender reaches `target` with `margin` steps to
/// spare over the closest attacker.
pub fn is_guarded(
    oracle: &DistanceOracle,
    target: Cell,
    defenders: &[Cell],
    attackers: &[Cell],
    margin: i32,
) -> bool {
    beats(
        min_distance(oracle, target, defenders),
        margin,
        min_distance(oracle, target, attackers),
    )
}

/// Number of capsules the defenders do not guard.
pub fn count_unguarded_capsules(
    oracle: &DistanceOracle,
    defenders: &[Cell],
    attackers: &[Cell],
    capsules: &[Cell],
    margin: i32,
) -> u32 {
    capsules
        .iter()
        .filter(|&&c| !is_guarded(oracle, c, defenders, attackers, margin))
        .count() as u32
}

/// Resources (plus carried cargo) the movers can bank before the
/// interceptors can cut them off at `border`.
pub fn count_capturable(
    oracle: &DistanceOracle,
    movers: &[Participant],
    interceptors: &[Cell],
    border: &[Cell],
    resources: &[Cell],
    rule: RaceRule,
) -> u32 {
    match rule {
        RaceRule::Detour {
            resource_margin,
            carried_margin,
        } => count_detour(
            oracle,
            movers,
            interceptors,
            border,
            resources,
            resource_margin,
            carried_margin,
        ),
        RaceRule::NearestThreat { margin } => {
            count_nearest_threat(oracle, movers, interceptors, border, resources, margin)
        }
    }
}

/// The defensive mirror of `count_capturable`: resources the attackers can
/// steal and bank past `border` before any defender intercepts.
pub fn count_unguarded(
    oracle: &DistanceOracle,
    defenders: &[Cell],
    attackers: &[Participant],
    border: &[Cell],
    resources: &[Cell],
    rule: RaceRule,
) -> u32 {
    count_capturable(oracle, attackers, defenders, border, resources, rule)
}

fn count_detour(
    oracle: &DistanceOracle,
    movers: &[Participant],
    interceptors: &[Cell],
    border: &[Cell],
    resources: &[Cell],
    resource_margin: i32,
    carried_margin: i32,
) -> u32 {
    let mover_cells = positions(movers);
    let mut count = 0u32;

    for &f in resources {
        let Some((crossing, border_dist)) = closest_cell_and_distance(oracle, f, border) else {
            continue;
        };
        let fetch = min_distance(oracle, f, &mover_cells);
        let intercept = min_distance(oracle, crossing, interceptors);
        if beats(border_dist.saturating_add(fetch), resource_margin, intercept) {
            count += 1;
        }
    }

    for m in movers {
        let Some(pos) = m.position else {
            continue;
        };
        if m.carrying == 0 {
            continue;
        }
        let Some((exit, exit_dist)) = closest_cell_and_distance(oracle, pos, border) else {
            continue;
        };
        if beats(exit_dist, carried_margin, min_distance(oracle, exit, interceptors)) {
            count += m.carrying;
        }
    }

    count
}

fn count_nearest_threat(
    oracle: &DistanceOracle,
    movers: &[Participant],
    interceptors: &[Cell],
    border: &[Cell],
    resources: &[Cell],
    margin: i32,
) -> u32 {
    let mut count = 0u32;

    for m in movers {
        let Some(pos) = m.position else {
            continue;
        };

        if m.carrying > 0 {
            let Some((exit, exit_dist)) = closest_cell_and_distance(oracle, pos, border) else {
                continue;
            };
            if beats(exit_dist, margin, min_distance(oracle, exit, interceptors)) {
                count += m.carrying;
            }
            continue;
        }

        // Cheapest resource to grab and carry out.
        let target = resources
            .iter()
            .filter_map(|&f| {
                let (_, out) = closest_cell_and_distance(oracle, f, border)?;
                Some((f, oracle.distance(pos, f).saturating_add(out)))
            })
            .min_by_key(|&(_, cost)| cost);
        let Some((f, _)) = target else {
            continue;
        };
        let Some((crossing, out)) = closest_cell_and_distance(oracle, f, border) else {
            continue;
        };
        if beats(out, margin, min_distance(oracle, crossing, interceptors)) {
            count += 1;
        }
    }

    count
}
