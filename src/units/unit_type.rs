//! The static unit table and the rules that read it.
//!
//! Every unit type's numbers live here: attack, defense, cost, hit points,
//! which domain it belongs to and which domain (if any) its hits are
//! restricted to. The behavior functions layer weapon developments and
//! escort conditions on top of the raw table.

use std::fmt;

use im::OrdSet;
use serde::{Deserialize, Serialize};

use crate::combat::Force;

/// Theatre a unit fights in, and the only thing domain-restricted hits can
/// land on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Domain {
    Land,
    Sea,
    Air,
}

impl Domain {
    /// All domains, in hit-resolution order.
    pub const ALL: [Domain; 3] = [Domain::Land, Domain::Sea, Domain::Air];
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Domain::Land => "Land",
            Domain::Sea => "Sea",
            Domain::Air => "Air",
        };
        f.write_str(name)
    }
}

/// Researched upgrades that change how some units fight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponDevelopment {
    /// Fighters defend at +1.
    JetFighters,
    Rockets,
    /// Submarines attack at +1.
    SuperSubmarines,
    LongRangeAircraft,
    /// Destroyers may bombard shores.
    CombinedBombardment,
    /// Attacking bombers roll two dice.
    HeavyBombers,
}

impl WeaponDevelopment {
    /// Every development, in declaration order.
    pub const ALL: [WeaponDevelopment; 6] = [
        WeaponDevelopment::JetFighters,
        WeaponDevelopment::Rockets,
        WeaponDevelopment::SuperSubmarines,
        WeaponDevelopment::LongRangeAircraft,
        WeaponDevelopment::CombinedBombardment,
        WeaponDevelopment::HeavyBombers,
    ];
}

impl fmt::Display for WeaponDevelopment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WeaponDevelopment::JetFighters => "Jet Fighters",
            WeaponDevelopment::Rockets => "Rockets",
            WeaponDevelopment::SuperSubmarines => "Super Submarines",
            WeaponDevelopment::LongRangeAircraft => "Long Range Aircraft",
            WeaponDevelopment::CombinedBombardment => "Combined Bombardment",
            WeaponDevelopment::HeavyBombers => "Heavy Bombers",
        };
        f.write_str(name)
    }
}

/// Set of developments active for one side.
pub type Developments = OrdSet<WeaponDevelopment>;

/// Static numbers for one unit type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitStats {
    pub domain: Domain,
    pub attack: u32,
    pub defense: u32,
    pub cost: u32,
    pub hit_points: u32,
    /// Only domain this unit's hits can land on; `None` hits anything.
    pub target_domain: Option<Domain>,
    /// Fires in the first round only, then leaves the battle.
    pub first_round_only: bool,
}

impl UnitStats {
    const fn new(domain: Domain, attack: u32, defense: u32, cost: u32) -> Self {
        Self {
            domain,
            attack,
            defense,
            cost,
            hit_points: 1,
            target_domain: None,
            first_round_only: false,
        }
    }

    const fn hit_points(mut self, hit_points: u32) -> Self {
        self.hit_points = hit_points;
        self
    }

    const fn targets(mut self, domain: Domain) -> Self {
        self.target_domain = Some(domain);
        self
    }

    const fn first_round_only(mut self) -> Self {
        self.first_round_only = true;
        self
    }
}

/// A kind of unit. Declaration order is the stable fallback order used
/// wherever unit types are walked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitType {
    Infantry,
    Artillery,
    Tank,
    AntiaircraftGun,
    Fighter,
    Bomber,
    Transport,
    Submarine,
    Destroyer,
    AircraftCarrier,
    Battleship,
    BombardingBattleship,
    BombardingDestroyer,
}

impl UnitType {
    /// Every unit type, in table order.
    pub const ALL: [UnitType; 13] = [
        UnitType::Infantry,
        UnitType::Artillery,
        UnitType::Tank,
        UnitType::AntiaircraftGun,
        UnitType::Fighter,
        UnitType::Bomber,
        UnitType::Transport,
        UnitType::Submarine,
        UnitType::Destroyer,
        UnitType::AircraftCarrier,
        UnitType::Battleship,
        UnitType::BombardingBattleship,
        UnitType::BombardingDestroyer,
    ];

    /// The raw table row for this type.
    #[must_use]
    pub const fn stats(self) -> UnitStats {
        use Domain::{Air, Land, Sea};
        match self {
            UnitType::Infantry => UnitStats::new(Land, 1, 2, 3),
            UnitType::Artillery => UnitStats::new(Land, 2, 2, 4),
            UnitType::Tank => UnitStats::new(Land, 3, 3, 5),
            UnitType::AntiaircraftGun => UnitStats::new(Land, 0, 1, 5).targets(Air).first_round_only(),
            UnitType::Fighter => UnitStats::new(Air, 3, 4, 10),
            UnitType::Bomber => UnitStats::new(Air, 4, 1, 15),
            UnitType::Transport => UnitStats::new(Sea, 0, 1, 8),
            UnitType::Submarine => UnitStats::new(Sea, 2, 2, 8).targets(Sea),
            UnitType::Destroyer => UnitStats::new(Sea, 3, 3, 12),
            UnitType::AircraftCarrier => UnitStats::new(Sea, 1, 3, 16),
            UnitType::Battleship => UnitStats::new(Sea, 4, 4, 24).hit_points(2),
            UnitType::BombardingBattleship => {
                UnitStats::new(Sea, 4, 0, 24).targets(Land).first_round_only()
            }
            UnitType::BombardingDestroyer => {
                UnitStats::new(Sea, 3, 0, 12).targets(Land).first_round_only()
            }
        }
    }

    #[must_use]
    pub const fn domain(self) -> Domain {
        self.stats().domain
    }

    #[must_use]
    pub const fn attack(self) -> u32 {
        self.stats().attack
    }

    #[must_use]
    pub const fn defense(self) -> u32 {
        self.stats().defense
    }

    #[must_use]
    pub const fn cost(self) -> u32 {
        self.stats().cost
    }

    /// Hit points of a fresh unit.
    #[must_use]
    pub const fn max_hit_points(self) -> u32 {
        self.stats().hit_points
    }

    #[must_use]
    pub const fn target_domain(self) -> Option<Domain> {
        self.stats().target_domain
    }

    #[must_use]
    pub const fn is_first_round_only(self) -> bool {
        self.stats().first_round_only
    }

    /// Die threshold for this unit in the given role: a die showing this
    /// value or less is a hit.
    #[must_use]
    pub fn combat_power(self, is_attacking: bool, developments: &Developments) -> u32 {
        let stats = self.stats();
        match (self, is_attacking) {
            (UnitType::Fighter, false) if developments.contains(&WeaponDevelopment::JetFighters) => {
                stats.defense + 1
            }
            (UnitType::Submarine, true)
                if developments.contains(&WeaponDevelopment::SuperSubmarines) =>
            {
                stats.attack + 1
            }
            (_, true) => stats.attack,
            (_, false) => stats.defense,
        }
    }

    /// Dice one unit of this type rolls against `enemies`.
    #[must_use]
    pub fn number_of_rolls(self, enemies: &Force, is_attacking: bool, developments: &Developments) -> u32 {
        match self {
            UnitType::AntiaircraftGun if is_attacking => 0,
            UnitType::AntiaircraftGun => enemies.units_in_domain(Domain::Air),
            UnitType::Bomber
                if is_attacking && developments.contains(&WeaponDevelopment::HeavyBombers) =>
            {
                2
            }
            _ => 1,
        }
    }

    /// Whether this type fires in the opening sub-round against `enemies`.
    ///
    /// Submarines only get the first shot when nothing on the other side
    /// can spot them.
    #[must_use]
    pub fn has_opening_fire(self, enemies: &Force) -> bool {
        match self {
            UnitType::Submarine => !enemies.contains(UnitType::Destroyer),
            _ => self.is_first_round_only(),
        }
    }

    /// Whether a survivor of this type can take territory.
    #[must_use]
    pub const fn can_invade(self) -> bool {
        !matches!(self.domain(), Domain::Air) && !self.is_first_round_only()
    }

    /// Whether this type may join an attack on a `battle_domain` territory.
    #[must_use]
    pub fn can_attack_in(self, battle_domain: Domain) -> bool {
        match self {
            UnitType::AntiaircraftGun => false,
            _ => self.domain() == Domain::Air || self.domain() == battle_domain,
        }
    }

    /// Whether this type may defend a `battle_domain` territory.
    #[must_use]
    pub fn can_defend_in(self, battle_domain: Domain) -> bool {
        match self {
            UnitType::BombardingBattleship | UnitType::BombardingDestroyer => false,
            UnitType::Bomber => battle_domain == Domain::Land,
            _ => self.domain() == Domain::Air || self.domain() == battle_domain,
        }
    }

    /// Development that must be active before this type can be fielded.
    #[must_use]
    pub const fn required_development(self) -> Option<WeaponDevelopment> {
        match self {
            UnitType::BombardingDestroyer => Some(WeaponDevelopment::CombinedBombardment),
            _ => None,
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnitType::Infantry => "Infantry",
            UnitType::Artillery => "Artillery",
            UnitType::Tank => "Tank",
            UnitType::AntiaircraftGun => "Antiaircraft Gun",
            UnitType::Fighter => "Fighter",
            UnitType::Bomber => "Bomber",
            UnitType::Transport => "Transport",
            UnitType::Submarine => "Submarine",
            UnitType::Destroyer => "Destroyer",
            UnitType::AircraftCarrier => "Aircraft Carrier",
            UnitType::Battleship => "Battleship",
            UnitType::BombardingBattleship => "Bombarding Battleship",
            UnitType::BombardingDestroyer => "Bombarding Destroyer",
        };
        f.write_str(name)
    }
}
