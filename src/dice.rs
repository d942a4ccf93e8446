//! Dice: the only source of randomness in the rules.
//!
//! Rules code asks a [`Dice`] for rolls and never touches an RNG directly.
//! Play uses [`RngDice`]; tests and replays use [`ScriptedDice`], which hands
//! out a fixed sequence and fails once it runs dry.

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Errors produced by a dice source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiceError {
    #[error("dice script exhausted after {0} rolls")]
    Exhausted(usize),

    #[error("scripted roll {value} is not a face of a d{sides}")]
    OutOfRange { value: u8, sides: u8 },

    #[error("cannot roll a die with {0} sides")]
    InvalidDie(u8),
}

/// A uniform integer source.
pub trait Dice {
    /// Rolls one die with `sides` faces, returning a value in `1..=sides`.
    fn roll(&mut self, sides: u8) -> Result<u8, DiceError>;

    /// Rolls one six-sided die.
    fn d6(&mut self) -> Result<u8, DiceError> {
        self.roll(6)
    }
}

impl<D: Dice + ?Sized> Dice for &mut D {
    fn roll(&mut self, sides: u8) -> Result<u8, DiceError> {
        (**self).roll(sides)
    }
}

/// Dice backed by a seedable small RNG.
#[derive(Debug, Clone)]
pub struct RngDice {
    rng: SmallRng,
}

impl RngDice {
    /// Seeds from a fixed value for reproducible games.
    pub fn seeded(seed: u64) -> Self {
        RngDice {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Seeds from OS entropy.
    pub fn from_entropy() -> Self {
        RngDice {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Seed 0 means entropy, anything else is a fixed seed.
    pub fn from_seed_option(seed: u64) -> Self {
        if seed == 0 {
            Self::from_entropy()
        } else {
            Self::seeded(seed)
        }
    }
}

impl Dice for RngDice {
    fn roll(&mut self, sides: u8) -> Result<u8, DiceError> {
        if sides == 0 {
            return Err(DiceError::InvalidDie(sides));
        }
        Ok(self.rng.gen_range(1..=sides))
    }
}

/// Dice that replay a fixed sequence of faces.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    faces: VecDeque<u8>,
    rolled: usize,
}

impl ScriptedDice {
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        ScriptedDice {
            faces: faces.into_iter().collect(),
            rolled: 0,
        }
    }

    /// Faces not yet consumed.
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }

    /// Appends more faces to the end of the script.
    pub fn extend(&mut self, faces: impl IntoIterator<Item = u8>) {
        self.faces.extend(faces);
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self, sides: u8) -> Result<u8, DiceError> {
        if sides == 0 {
            return Err(DiceError::InvalidDie(sides));
        }
        let value = self.faces.pop_front().ok_or(DiceError::Exhausted(self.rolled))?;
        if value == 0 || value > sides {
            return Err(DiceError::OutOfRange { value, sides });
        }
        self.rolled += 1;
        Ok(value)
    }
}
