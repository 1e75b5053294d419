//! Time-varying signal sources
//!
//! Sources never write into the electric field directly; each step their
//! values are splatted into the exponentially-decaying source accumulator,
//! so switching a source off leaves a smooth tail instead of an impulse.

use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::Error;

/// Closed set of source variants.
///
/// The wire format is tagged JSON, e.g.
/// `{"type":"point","position":[12.0,8.0],"amplitude":1.0,"frequency":2.0}`.
/// Unknown `type` tags are a hard decode error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SourceDescriptor {
    #[serde(rename_all = "camelCase")]
    Point {
        /// Position in grid-relative units
        position: [f32; 2],
        amplitude: f32,
        /// Oscillation frequency (cycles per unit time)
        frequency: f32,
        /// Simulation time after which the source stops injecting
        #[serde(default, skip_serializing_if = "Option::is_none")]
        turn_off_time: Option<f32>,
    },
}

impl SourceDescriptor {
    /// Forcing value at simulation time `t`, or `None` outside the source's
    /// active window.
    pub fn value_at(&self, t: f32) -> Option<f32> {
        match *self {
            SourceDescriptor::Point {
                amplitude,
                frequency,
                turn_off_time,
                ..
            } => {
                if t < 0.0 {
                    return None;
                }
                if let Some(cutoff) = turn_off_time {
                    if t > cutoff {
                        return None;
                    }
                }
                Some(-amplitude * (TAU * frequency * t).cos())
            }
        }
    }

    /// Position in grid-relative units
    pub fn position(&self) -> [f32; 2] {
        match *self {
            SourceDescriptor::Point { position, .. } => position,
        }
    }

    /// Decode one descriptor from its JSON wire form
    pub fn from_json(payload: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Encode to the JSON wire form
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }
}
