//! Squadron types, ownership, status, and board locations.
//!
//! A unit is one squadron counter. Its `location` says where the counter sits
//! on the board and its `status` says what the squadron is doing there; the
//! two must agree (see `GameState::validate`).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::carrier::Carrier;

/// Turns a squadron spends on the turn track after a strike or abort.
pub const RECOVERY_DELAY: u8 = 3;

/// Unique squadron identifier, e.g. `AKAGI-DB` or `US-B1-T6`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub String);

impl UnitId {
    pub fn new(id: impl Into<String>) -> Self {
        UnitId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UnitId {
    fn from(s: &str) -> Self {
        UnitId(s.to_string())
    }
}

/// The aircraft type of a squadron.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitType {
    Fighter,
    DiveBomber,
    TorpedoBomber,
}

impl UnitType {
    /// Short suffix used in squadron ids.
    pub const fn id_suffix(self) -> &'static str {
        match self {
            UnitType::Fighter => "F",
            UnitType::DiveBomber => "DB",
            UnitType::TorpedoBomber => "TB",
        }
    }

    pub const fn is_bomber(self) -> bool {
        !matches!(self, UnitType::Fighter)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            UnitType::Fighter => "FIGHTER",
            UnitType::DiveBomber => "DIVE_BOMBER",
            UnitType::TorpedoBomber => "TORPEDO_BOMBER",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The side a squadron flies for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Owner {
    Japan,
    Us,
}

/// What a squadron is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitStatus {
    Ready,
    Staging,
    InFlight,
    Returning,
    Destroyed,
    CapLow,
    CapNormal,
}

impl UnitStatus {
    pub const fn is_cap(self) -> bool {
        matches!(self, UnitStatus::CapLow | UnitStatus::CapNormal)
    }
}

/// Where a squadron counter sits on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Location {
    /// On the flight deck of a carrier.
    Carrier(Carrier),
    /// Spotted for a strike against the US task force.
    Staging,
    /// Outbound to Midway island.
    MidwayFlight,
    /// Flying combat air patrol over its own carrier.
    Cap,
    /// Away from the carrier, waiting to recover.
    TurnTrack,
    /// Off the board.
    Pool,
    /// Inbound US strike.
    FleetApproach,
}

impl Location {
    /// Every location a squadron can be ordered to, in board order.
    pub const ALL: [Location; 10] = [
        Location::Carrier(Carrier::Akagi),
        Location::Carrier(Carrier::Kaga),
        Location::Carrier(Carrier::Hiryu),
        Location::Carrier(Carrier::Soryu),
        Location::Cap,
        Location::Staging,
        Location::MidwayFlight,
        Location::TurnTrack,
        Location::Pool,
        Location::FleetApproach,
    ];

    /// Returns the board token for this location.
    pub const fn as_str(self) -> &'static str {
        match self {
            Location::Carrier(c) => c.as_str(),
            Location::Staging => "STAGING",
            Location::MidwayFlight => "MIDWAY_FLIGHT",
            Location::Cap => "CAP",
            Location::TurnTrack => "TURN_TRACK",
            Location::Pool => "POOL",
            Location::FleetApproach => "FLEET_APPROACH",
        }
    }

    /// Parses a board token, case-insensitively.
    pub fn from_token(s: &str) -> Option<Location> {
        let upper = s.to_ascii_uppercase();
        if let Some(c) = Carrier::from_token(&upper) {
            return Some(Location::Carrier(c));
        }
        match upper.as_str() {
            "STAGING" => Some(Location::Staging),
            "MIDWAY_FLIGHT" => Some(Location::MidwayFlight),
            "CAP" => Some(Location::Cap),
            "TURN_TRACK" => Some(Location::TurnTrack),
            "POOL" => Some(Location::Pool),
            "FLEET_APPROACH" => Some(Location::FleetApproach),
            _ => None,
        }
    }

    /// The status a squadron takes on when it is moved here.
    pub const fn arrival_status(self) -> UnitStatus {
        match self {
            Location::Carrier(_) | Location::Pool => UnitStatus::Ready,
            Location::Staging => UnitStatus::Staging,
            Location::MidwayFlight | Location::FleetApproach => UnitStatus::InFlight,
            Location::Cap => UnitStatus::CapNormal,
            Location::TurnTrack => UnitStatus::Returning,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Location> for String {
    fn from(loc: Location) -> Self {
        loc.as_str().to_string()
    }
}

impl TryFrom<String> for Location {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Location::from_token(&s).ok_or_else(|| format!("unknown location '{}'", s))
    }
}

/// A squadron counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub unit_type: UnitType,
    pub owner: Owner,
    /// Home carrier; Japanese squadrons only.
    pub carrier: Option<Carrier>,
    pub status: UnitStatus,
    pub location: Location,
    /// Present only while on the turn track.
    pub turns_until_ready: Option<u8>,
    pub hp: u8,
}

impl Unit {
    /// Creates a ready Japanese squadron on its home carrier's deck.
    pub fn japanese(carrier: Carrier, unit_type: UnitType) -> Self {
        Unit {
            id: UnitId(format!("{}-{}", carrier.as_str(), unit_type.id_suffix())),
            unit_type,
            owner: Owner::Japan,
            carrier: Some(carrier),
            status: UnitStatus::Ready,
            location: Location::Carrier(carrier),
            turns_until_ready: None,
            hp: match unit_type {
                UnitType::Fighter => 2,
                _ => 1,
            },
        }
    }

    /// Creates an inbound US squadron.
    pub fn american(id: UnitId, unit_type: UnitType) -> Self {
        Unit {
            id,
            unit_type,
            owner: Owner::Us,
            carrier: None,
            status: UnitStatus::InFlight,
            location: Location::FleetApproach,
            turns_until_ready: None,
            hp: match unit_type {
                UnitType::Fighter => 3,
                _ => 1,
            },
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.status == UnitStatus::Destroyed
    }

    /// Where this squadron lands when it recovers.
    pub fn home(&self) -> Location {
        match self.carrier {
            Some(c) => Location::Carrier(c),
            None => Location::Pool,
        }
    }

    /// Moves the counter and sets the matching status and track counter.
    pub fn relocate(&mut self, location: Location) {
        self.location = location;
        self.status = location.arrival_status();
        self.turns_until_ready = if location == Location::TurnTrack {
            Some(RECOVERY_DELAY)
        } else {
            None
        };
    }

    /// Removes the squadron from play.
    pub fn destroy(&mut self) {
        self.location = Location::Pool;
        self.status = UnitStatus::Destroyed;
        self.turns_until_ready = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_tokens_roundtrip() {
        for loc in Location::ALL {
            assert_eq!(Location::from_token(loc.as_str()), Some(loc));
        }
        assert_eq!(Location::from_token("cap"), Some(Location::Cap));
        assert_eq!(Location::from_token("hiryu"), Some(Location::Carrier(Carrier::Hiryu)));
        assert_eq!(Location::from_token("MIDWAY"), None);
    }

    #[test]
    fn japanese_unit_ids_and_hp() {
        let f = Unit::japanese(Carrier::Kaga, UnitType::Fighter);
        assert_eq!(f.id.as_str(), "KAGA-F");
        assert_eq!(f.hp, 2);
        assert_eq!(f.location, Location::Carrier(Carrier::Kaga));

        let tb = Unit::japanese(Carrier::Soryu, UnitType::TorpedoBomber);
        assert_eq!(tb.id.as_str(), "SORYU-TB");
        assert_eq!(tb.hp, 1);
    }

    #[test]
    fn relocate_to_turn_track_sets_delay() {
        let mut u = Unit::japanese(Carrier::Akagi, UnitType::DiveBomber);
        u.relocate(Location::TurnTrack);
        assert_eq!(u.status, UnitStatus::Returning);
        assert_eq!(u.turns_until_ready, Some(RECOVERY_DELAY));

        u.relocate(Location::Carrier(Carrier::Akagi));
        assert_eq!(u.status, UnitStatus::Ready);
        assert_eq!(u.turns_until_ready, None);
    }

    #[test]
    fn destroyed_units_go_to_pool() {
        let mut u = Unit::american(UnitId::from("US-B1-T2"), UnitType::DiveBomber);
        u.destroy();
        assert!(u.is_destroyed());
        assert_eq!(u.location, Location::Pool);
        assert_eq!(u.home(), Location::Pool);
    }

    #[test]
    fn location_serializes_as_token() {
        let json = serde_json::to_string(&Location::Carrier(Carrier::Akagi)).unwrap();
        assert_eq!(json, "\"AKAGI\"");
        let back: Location = serde_json::from_str("\"TURN_TRACK\"").unwrap();
        assert_eq!(back, Location::TurnTrack);
    }
}
