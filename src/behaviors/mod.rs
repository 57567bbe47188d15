//! The three Reynolds flocking rules. Each reads the tick's [Roster] and
//! returns a weighted displacement for one agent; a rule with no
//! neighbors in range contributes nothing.
//!
//! [Roster]: crate::prelude::Roster

pub(crate) mod alignment;
pub(crate) mod cohesion;
pub(crate) mod separation;
