//! The four carriers of the Kido Butai and their damage/CAP state.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::unit::UnitId;

/// Number of carriers in the order of battle.
pub const CARRIER_COUNT: usize = 4;

/// Combat air patrol slots per carrier.
pub const CAP_SLOTS: usize = 2;

/// Damage at which a carrier sinks. Damage never exceeds this.
pub const SINKING_DAMAGE: u8 = 4;

/// A Japanese fleet carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Carrier {
    Akagi,
    Kaga,
    Hiryu,
    Soryu,
}

/// All carriers in board order. `Carrier as usize` indexes this array.
pub const ALL_CARRIERS: [Carrier; CARRIER_COUNT] =
    [Carrier::Akagi, Carrier::Kaga, Carrier::Hiryu, Carrier::Soryu];

/// The flagship of the carrier striking force.
pub const FLAGSHIP: Carrier = Carrier::Akagi;

impl Carrier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Carrier::Akagi => "AKAGI",
            Carrier::Kaga => "KAGA",
            Carrier::Hiryu => "HIRYU",
            Carrier::Soryu => "SORYU",
        }
    }

    /// Parses an uppercase carrier token.
    pub fn from_token(s: &str) -> Option<Carrier> {
        match s {
            "AKAGI" => Some(Carrier::Akagi),
            "KAGA" => Some(Carrier::Kaga),
            "HIRYU" => Some(Carrier::Hiryu),
            "SORYU" => Some(Carrier::Soryu),
            _ => None,
        }
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Damage and CAP assignment for one carrier.
///
/// Sinking is derived from `damage` and never stored. All damage goes through
/// [`CarrierState::apply_damage`], which saturates at [`SINKING_DAMAGE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierState {
    pub name: Carrier,
    damage: u8,
    pub cap_slots: [Option<UnitId>; CAP_SLOTS],
}

impl CarrierState {
    pub fn new(name: Carrier) -> Self {
        CarrierState {
            name,
            damage: 0,
            cap_slots: [None, None],
        }
    }

    pub fn damage(&self) -> u8 {
        self.damage
    }

    pub fn is_sunk(&self) -> bool {
        self.damage >= SINKING_DAMAGE
    }

    /// Adds hits and returns the damage actually taken.
    pub fn apply_damage(&mut self, hits: u32) -> u8 {
        let before = self.damage;
        let after = (before as u32 + hits).min(SINKING_DAMAGE as u32) as u8;
        self.damage = after;
        after - before
    }

    /// Index of the first empty CAP slot.
    pub fn free_cap_slot(&self) -> Option<usize> {
        self.cap_slots.iter().position(|s| s.is_none())
    }

    /// Puts a fighter in the first empty slot. Returns false if full.
    pub fn occupy_cap_slot(&mut self, id: UnitId) -> bool {
        match self.free_cap_slot() {
            Some(idx) => {
                self.cap_slots[idx] = Some(id);
                true
            }
            None => false,
        }
    }

    /// Clears every slot holding `id`.
    pub fn release_cap_slot(&mut self, id: &UnitId) {
        for slot in self.cap_slots.iter_mut() {
            if slot.as_ref() == Some(id) {
                *slot = None;
            }
        }
    }

    /// Ids of the fighters currently flying CAP.
    pub fn cap_units(&self) -> impl Iterator<Item = &UnitId> {
        self.cap_slots.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carrier_tokens_roundtrip() {
        for c in ALL_CARRIERS {
            assert_eq!(Carrier::from_token(c.as_str()), Some(c));
            assert_eq!(ALL_CARRIERS[c as usize], c);
        }
        assert_eq!(Carrier::from_token("ENTERPRISE"), None);
    }

    #[test]
    fn damage_saturates_and_sinks() {
        let mut cv = CarrierState::new(Carrier::Kaga);
        assert_eq!(cv.apply_damage(1), 1);
        assert!(!cv.is_sunk());
        assert_eq!(cv.apply_damage(6), 3);
        assert_eq!(cv.damage(), SINKING_DAMAGE);
        assert!(cv.is_sunk());
        assert_eq!(cv.apply_damage(2), 0);
        assert_eq!(cv.damage(), SINKING_DAMAGE);
    }

    #[test]
    fn cap_slots_fill_in_order() {
        let mut cv = CarrierState::new(Carrier::Hiryu);
        assert!(cv.occupy_cap_slot(UnitId::from("A")));
        assert!(cv.occupy_cap_slot(UnitId::from("B")));
        assert!(!cv.occupy_cap_slot(UnitId::from("C")));
        assert_eq!(cv.free_cap_slot(), None);

        cv.release_cap_slot(&UnitId::from("A"));
        assert_eq!(cv.free_cap_slot(), Some(0));
        assert_eq!(cv.cap_units().count(), 1);
    }
}
