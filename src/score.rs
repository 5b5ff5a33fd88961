/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops};

use crate::MAX_DEPTH;

/// An evaluation in [centipawns](https://www.chessprogramming.org/Score), from one side's point of view.
///
/// Forced mates sit just inside [`Score::INF`], one point closer to zero for every ply until mate.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Score(pub i32);

impl Score {
    /// Bound that no reachable score meets.
    pub const INF: Self = Self(i16::MAX as i32);

    /// Delivering mate on the board right now. Being mated is `-MATE`.
    pub const MATE: Self = Self(Self::INF.0 - 1);

    pub const DRAW: Self = Self(0);

    /// Smallest magnitude a mate score can have: mate found at [`MAX_DEPTH`] plies.
    pub const LOWEST_MATE: Self = Self(Self::MATE.0 - MAX_DEPTH as i32);

    /// Returns `true` if this score is a forced mate for either side.
    #[inline(always)]
    pub const fn is_mate(self) -> bool {
        self.0.abs() >= Self::LOWEST_MATE.0
    }

    /// Plies (half moves) until mate. Only meaningful if [`Score::is_mate`].
    #[inline(always)]
    pub const fn plies_to_mate(self) -> i32 {
        Self::MATE.0 - self.0.abs()
    }

    /// Full moves until mate: positive if this side mates, negative if it gets mated.
    ///
    /// The mating side also has to play its final move, hence the rounding up.
    #[inline(always)]
    pub const fn moves_to_mate(self) -> i32 {
        let plies = self.plies_to_mate();
        if self.0 > 0 {
            (plies + 1) / 2
        } else {
            -plies / 2
        }
    }

    /// This score in pawns, for display.
    #[inline(always)]
    pub fn pawns(self) -> f32 {
        self.0 as f32 / 100.0
    }
}

macro_rules! arithmetic {
    ($($op:ident :: $fn:ident),*) => {$(
        impl ops::$op for Score {
            type Output = Self;
            #[inline(always)]
            fn $fn(self, rhs: Self) -> Self {
                Self(ops::$op::$fn(self.0, rhs.0))
            }
        }

        impl ops::$op<i32> for Score {
            type Output = Self;
            #[inline(always)]
            fn $fn(self, rhs: i32) -> Self {
                Self(ops::$op::$fn(self.0, rhs))
            }
        }
    )*};
}

arithmetic!(Add::add, Sub::sub);

impl ops::AddAssign<i32> for Score {
    #[inline(always)]
    fn add_assign(&mut self, rhs: i32) {
        self.0 += rhs;
    }
}

impl ops::Neg for Score {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl PartialEq<i32> for Score {
    fn eq(&self, other: &i32) -> bool {
        self.0 == *other
    }
}

impl PartialOrd<i32> for Score {
    fn partial_cmp(&self, other: &i32) -> Option<std::cmp::Ordering> {
        Some(self.0.cmp(other))
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_mate() {
            write!(f, "mate {}", self.moves_to_mate())
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Debug for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_mate() {
            write!(f, "{} (mate in {} plies)", self.0, self.plies_to_mate())
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mate_distances() {
        let mating = Score::MATE - 3;
        assert!(mating.is_mate());
        assert_eq!(mating.plies_to_mate(), 3);
        assert_eq!(mating.moves_to_mate(), 2);
        assert_eq!(mating.to_string(), "mate 2");

        let mated = -(Score::MATE - 2);
        assert!(mated.is_mate());
        assert_eq!(mated.plies_to_mate(), 2);
        assert_eq!(mated.moves_to_mate(), -1);

        assert!(!Score(900).is_mate());
        assert!(!Score::DRAW.is_mate());
        assert_eq!(Score(-150).to_string(), "-150");
    }

    #[test]
    fn test_ordering_against_infinity() {
        assert!(-Score::INF < -Score::MATE);
        assert!(Score::MATE < Score::INF);
        assert!(Score(100) > 0);
        assert_eq!(Score(250).pawns(), 2.5);
    }
}
