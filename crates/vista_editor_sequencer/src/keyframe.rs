// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe views and interpolation for the sequencer.

use serde::{Deserialize, Serialize};

/// Interpolation mode between keyframes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InterpolationMode {
    /// Step: hold the earlier keyframe until the next one
    Discrete,
    /// Linear interpolation (spherical for quaternions)
    #[default]
    Linear,
    /// Cubic Hermite with Catmull-Rom tangents
    Smooth,
}

impl InterpolationMode {
    /// All modes, in the order the selector lists them
    pub fn all() -> &'static [InterpolationMode] {
        &[
            InterpolationMode::Linear,
            InterpolationMode::Smooth,
            InterpolationMode::Discrete,
        ]
    }

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Discrete => "Discrete",
            Self::Linear => "Linear",
            Self::Smooth => "Smooth",
        }
    }
}

/// An owned keyframe, as returned when one is removed from a track
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    /// Time in seconds
    pub time: f32,
    /// Value block (`value_size` components)
    pub value: Vec<f32>,
}

/// Borrowed view of one keyframe inside a track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyframeRef<'a> {
    /// Position within the track
    pub index: usize,
    /// Time in seconds
    pub time: f32,
    /// Value block
    pub value: &'a [f32],
}

impl KeyframeRef<'_> {
    /// Copy into an owned keyframe
    pub fn to_keyframe(&self) -> Keyframe {
        Keyframe {
            time: self.time,
            value: self.value.to_vec(),
        }
    }
}

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two floats
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Hermite spline interpolation
    pub fn hermite(p0: f32, m0: f32, p1: f32, m1: f32, t: f32) -> f32 {
        let t2 = t * t;
        let t3 = t2 * t;

        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        h00 * p0 + h10 * m0 + h01 * p1 + h11 * m1
    }

    /// Component-wise lerp of two value blocks into `out`
    pub fn lerp_block(a: &[f32], b: &[f32], t: f32, out: &mut [f32]) {
        for ((o, a), b) in out.iter_mut().zip(a).zip(b) {
            *o = Self::lerp(*a, *b, t);
        }
    }

    /// Spherical linear interpolation for quaternions
    pub fn slerp(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
        let mut dot = a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3];

        // Take the short way round
        let mut b = b;
        if dot < 0.0 {
            b = [-b[0], -b[1], -b[2], -b[3]];
            dot = -dot;
        }

        // Nearly parallel: lerp and renormalize
        if dot > 0.9995 {
            let mut result = [0.0; 4];
            Self::lerp_block(&a, &b, t, &mut result);
            return Self::normalize4(result);
        }

        let theta_0 = dot.acos();
        let theta = theta_0 * t;
        let sin_theta = theta.sin();
        let sin_theta_0 = theta_0.sin();

        let s0 = theta.cos() - dot * sin_theta / sin_theta_0;
        let s1 = sin_theta / sin_theta_0;

        [
            a[0] * s0 + b[0] * s1,
            a[1] * s0 + b[1] * s1,
            a[2] * s0 + b[2] * s1,
            a[3] * s0 + b[3] * s1,
        ]
    }

    /// Normalize a quaternion; the zero quaternion maps to identity
    pub fn normalize4(q: [f32; 4]) -> [f32; 4] {
        let len = (q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3]).sqrt();
        if len <= f32::EPSILON {
            return [0.0, 0.0, 0.0, 1.0];
        }
        [q[0] / len, q[1] / len, q[2] / len, q[3] / len]
    }

    /// Copy the first four components of a block; `None` when it is shorter
    pub fn quat(block: &[f32]) -> Option<[f32; 4]> {
        block.get(..4)?.try_into().ok()
    }
}
