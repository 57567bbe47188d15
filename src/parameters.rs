use std::str::FromStr;

use bevy::prelude::*;
use derivative::Derivative;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

const METERS_PER_NAUTICAL_MILE: f32 = 1852.0;
const METERS_PER_KILOMETER: f32 = 1000.0;
const METERS_PER_FOOT: f32 = 0.3048;

/// Unit a configured [Distance] was given in.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Reflect, Display, EnumString)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[strum(serialize_all = "kebab-case")]
pub enum DistanceUnit {
    #[default]
    Meters,
    NauticalMiles,
    Kilometers,
    Feet,
}

impl DistanceUnit {
    fn meters_per_unit(self) -> f32 {
        match self {
            DistanceUnit::Meters => 1.0,
            DistanceUnit::NauticalMiles => METERS_PER_NAUTICAL_MILE,
            DistanceUnit::Kilometers => METERS_PER_KILOMETER,
            DistanceUnit::Feet => METERS_PER_FOOT,
        }
    }
}

/// A distance tagged with its unit. Converted to meters before it
/// reaches the flocking rules.
#[derive(Debug, Copy, Clone, PartialEq, Reflect)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Distance {
    pub amount: f32,
    pub unit: DistanceUnit,
}

impl Distance {
    pub fn meters(amount: f32) -> Self {
        Self {
            amount,
            unit: DistanceUnit::Meters,
        }
    }

    pub fn nautical_miles(amount: f32) -> Self {
        Self {
            amount,
            unit: DistanceUnit::NauticalMiles,
        }
    }

    pub fn to_meters(self) -> f32 {
        self.amount * self.unit.meters_per_unit()
    }
}

/// A value handed to [SwarmParameters::set_option]. Plain numbers given
/// to a distance option are read as meters.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(untagged))]
pub enum OptionValue {
    Number(f32),
    Distance(Distance),
}

impl From<f32> for OptionValue {
    fn from(value: f32) -> Self {
        OptionValue::Number(value)
    }
}

impl From<Distance> for OptionValue {
    fn from(value: Distance) -> Self {
        OptionValue::Distance(value)
    }
}

/// The recognized configuration options of a swarm controller.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display, EnumString)]
pub enum SwarmOption {
    #[strum(to_string = "separationFactor", serialize = "sFactor")]
    SeparationFactor,
    #[strum(to_string = "alignmentFactor", serialize = "aFactor")]
    AlignmentFactor,
    #[strum(to_string = "cohesionFactor", serialize = "cFactor")]
    CohesionFactor,
    #[strum(to_string = "commDistance")]
    CommDistance,
    #[strum(to_string = "desiredSeparation")]
    DesiredSeparation,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("no value given for swarm option `{0}`")]
    Missing(SwarmOption),
    #[error("unknown swarm option `{0}`")]
    UnknownOption(String),
    #[error("swarm option `{0}` is dimensionless and cannot take a distance")]
    ExpectedNumber(SwarmOption),
}

/// Weights and radii consumed by the flocking rules. Distances are
/// stored in meters.
#[derive(Debug, Copy, Clone, PartialEq, Reflect, Derivative)]
#[derivative(Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct SwarmParameters {
    /// Weight of the separation rule.
    #[derivative(Default(value = "1.0"))]
    pub(crate) separation_factor: f32,
    /// Weight of the alignment rule.
    #[derivative(Default(value = "1.0"))]
    pub(crate) alignment_factor: f32,
    /// Weight of the cohesion rule.
    #[derivative(Default(value = "1.0"))]
    pub(crate) cohesion_factor: f32,
    /// Radius within which peers count for alignment and cohesion.
    /// Defaults to 15 nautical miles.
    #[derivative(Default(value = "27780.0"))]
    pub(crate) comm_distance: f32,
    /// Radius within which peers push the agent away.
    #[derivative(Default(value = "1000.0"))]
    pub(crate) desired_separation: f32,
}

impl SwarmParameters {
    pub fn with_separation_factor(mut self, factor: f32) -> Self {
        self.set_separation_factor(factor);
        self
    }

    pub fn with_alignment_factor(mut self, factor: f32) -> Self {
        self.set_alignment_factor(factor);
        self
    }

    pub fn with_cohesion_factor(mut self, factor: f32) -> Self {
        self.set_cohesion_factor(factor);
        self
    }

    pub fn with_comm_distance(mut self, distance: Distance) -> Self {
        self.set_comm_distance(distance);
        self
    }

    pub fn with_desired_separation(mut self, distance: Distance) -> Self {
        self.set_desired_separation(distance);
        self
    }

    pub fn separation_factor(&self) -> f32 {
        self.separation_factor
    }

    pub fn alignment_factor(&self) -> f32 {
        self.alignment_factor
    }

    pub fn cohesion_factor(&self) -> f32 {
        self.cohesion_factor
    }

    /// Alignment and cohesion radius, in meters.
    pub fn comm_distance(&self) -> f32 {
        self.comm_distance
    }

    /// Separation radius, in meters.
    pub fn desired_separation(&self) -> f32 {
        self.desired_separation
    }

    pub fn set_separation_factor(&mut self, factor: f32) {
        self.separation_factor = factor;
    }

    pub fn set_alignment_factor(&mut self, factor: f32) {
        self.alignment_factor = factor;
    }

    pub fn set_cohesion_factor(&mut self, factor: f32) {
        self.cohesion_factor = factor;
    }

    pub fn set_comm_distance(&mut self, distance: Distance) {
        self.comm_distance = checked_radius(SwarmOption::CommDistance, distance);
    }

    pub fn set_desired_separation(&mut self, distance: Distance) {
        self.desired_separation = checked_radius(SwarmOption::DesiredSeparation, distance);
    }

    /// Set an option by its configuration name, e.g. `"commDistance"`.
    /// Fails when the name is unknown, when no value is given, or when a
    /// distance is given to a dimensionless weight. Values are otherwise
    /// accepted as-is.
    pub fn set_option(
        &mut self,
        name: &str,
        value: Option<OptionValue>,
    ) -> Result<(), ParameterError> {
        let option = SwarmOption::from_str(name)
            .map_err(|_| ParameterError::UnknownOption(name.to_owned()))?;
        self.apply(option, value)
    }

    /// Typed counterpart of [SwarmParameters::set_option].
    pub fn apply(
        &mut self,
        option: SwarmOption,
        value: Option<OptionValue>,
    ) -> Result<(), ParameterError> {
        let Some(value) = value else {
            return Err(ParameterError::Missing(option));
        };
        let distance = match value {
            OptionValue::Number(amount) => Distance::meters(amount),
            OptionValue::Distance(distance) => distance,
        };
        let factor = match value {
            OptionValue::Number(amount) => Ok(amount),
            OptionValue::Distance(_) => Err(ParameterError::ExpectedNumber(option)),
        };
        match option {
            SwarmOption::SeparationFactor => self.set_separation_factor(factor?),
            SwarmOption::AlignmentFactor => self.set_alignment_factor(factor?),
            SwarmOption::CohesionFactor => self.set_cohesion_factor(factor?),
            SwarmOption::CommDistance => self.set_comm_distance(distance),
            SwarmOption::DesiredSeparation => self.set_desired_separation(distance),
        }
        Ok(())
    }
}

/// Radii must stay strictly positive for the rules to mean anything,
/// but the value is still stored so the caller sees what it asked for.
fn checked_radius(option: SwarmOption, distance: Distance) -> f32 {
    let meters = distance.to_meters();
    if meters.is_nan() || meters <= 0.0 {
        warn!("Swarm option {option} set to non-positive radius {meters} m");
    }
    meters
}
