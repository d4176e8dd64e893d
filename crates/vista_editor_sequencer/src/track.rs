// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe tracks stored as parallel time/value buffers.
//!
//! A track holds `times` and a flat `values` buffer where keyframe `i` owns
//! the block `values[i * value_size..(i + 1) * value_size]`. Every edit keeps
//! `values.len() == times.len() * value_size` and leaves at least one keyframe.

use crate::binding::TrackBinding;
use crate::error::{EditError, Result};
use crate::keyframe::{Interpolation, InterpolationMode, Keyframe, KeyframeRef};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Two keyframes closer than this are treated as the same time on insert
pub const KEYFRAME_TIME_THRESHOLD: f32 = 0.001;

/// Value tolerance when pruning redundant keyframes
pub const OPTIMIZE_TOLERANCE: f32 = 1e-6;

/// Unique identifier for a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(pub Uuid);

impl TrackId {
    /// Create a new random track ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

/// Kind of value a track animates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackValueType {
    /// Single float
    Number,
    /// 2D vector
    Vector2,
    /// 3D vector
    Vector3,
    /// 4D vector
    Vector4,
    /// Rotation quaternion (x, y, z, w)
    Quaternion,
    /// RGB color
    Color,
    /// Boolean stored as 0.0 / 1.0
    Boolean,
}

impl TrackValueType {
    /// Number of components per keyframe
    pub fn value_size(&self) -> usize {
        match self {
            Self::Number | Self::Boolean => 1,
            Self::Vector2 => 2,
            Self::Vector3 | Self::Color => 3,
            Self::Vector4 | Self::Quaternion => 4,
        }
    }

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Number => "Number",
            Self::Vector2 => "Vector2",
            Self::Vector3 => "Vector3",
            Self::Vector4 => "Vector4",
            Self::Quaternion => "Quaternion",
            Self::Color => "Color",
            Self::Boolean => "Boolean",
        }
    }

    /// Get the track color
    pub fn color(&self) -> [u8; 3] {
        match self {
            Self::Number => [150, 255, 100],
            Self::Vector2 | Self::Vector3 | Self::Vector4 => [100, 150, 255],
            Self::Quaternion => [255, 100, 150],
            Self::Color => [255, 200, 100],
            Self::Boolean => [200, 100, 255],
        }
    }

    /// Whether tracks of this type can use the given interpolation
    pub fn supports(&self, mode: InterpolationMode) -> bool {
        match self {
            Self::Boolean => mode == InterpolationMode::Discrete,
            _ => true,
        }
    }

    /// Interpolation a new track of this type starts with
    pub fn default_interpolation(&self) -> InterpolationMode {
        match self {
            Self::Boolean => InterpolationMode::Discrete,
            _ => InterpolationMode::Linear,
        }
    }
}

/// An animation channel: parallel time/value buffers for one property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeTrack {
    /// Unique track ID
    pub id: TrackId,
    /// Track name, `node.property` when bound
    pub name: String,
    value_type: TrackValueType,
    times: Vec<f32>,
    values: Vec<f32>,
    interpolation: InterpolationMode,
    /// Track color override
    pub color: Option<[u8; 3]>,
}

impl KeyframeTrack {
    /// Create a track from raw buffers. Keyframes are sorted by time.
    pub fn new(
        name: impl Into<String>,
        value_type: TrackValueType,
        times: Vec<f32>,
        values: Vec<f32>,
    ) -> Result<Self> {
        let mut track = Self {
            id: TrackId::new(),
            name: name.into(),
            value_type,
            times,
            values,
            interpolation: value_type.default_interpolation(),
            color: None,
        };
        track.check_buffers()?;
        track.sort();
        Ok(track)
    }

    /// Set interpolation mode
    pub fn with_interpolation(mut self, mode: InterpolationMode) -> Result<Self> {
        self.set_interpolation(mode)?;
        Ok(self)
    }

    /// Kind of value this track animates
    pub fn value_type(&self) -> TrackValueType {
        self.value_type
    }

    /// Components per keyframe
    pub fn value_size(&self) -> usize {
        self.value_type.value_size()
    }

    /// Keyframe times
    pub fn times(&self) -> &[f32] {
        &self.times
    }

    /// Flat value buffer
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Get keyframe count
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the track has no keyframes (only possible for corrupt data)
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Current interpolation mode
    pub fn interpolation(&self) -> InterpolationMode {
        self.interpolation
    }

    /// Property this track is bound to, parsed from its name
    pub fn binding(&self) -> Option<TrackBinding> {
        TrackBinding::parse(&self.name)
    }

    /// Get the effective color for this track
    pub fn effective_color(&self) -> [u8; 3] {
        self.color.unwrap_or_else(|| self.value_type.color())
    }

    /// Time of the first keyframe
    pub fn start_time(&self) -> f32 {
        self.times.first().copied().unwrap_or(0.0)
    }

    /// Get the duration (time of last keyframe)
    pub fn duration(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Value block of keyframe `index`
    pub fn value_block(&self, index: usize) -> Option<&[f32]> {
        let size = self.value_size();
        let start = index.checked_mul(size)?;
        self.values.get(start..start.checked_add(size)?)
    }

    /// Get keyframe by index
    pub fn keyframe(&self, index: usize) -> Option<KeyframeRef<'_>> {
        Some(KeyframeRef {
            index,
            time: *self.times.get(index)?,
            value: self.value_block(index)?,
        })
    }

    /// Iterate keyframes in time order
    pub fn keyframes(&self) -> impl Iterator<Item = KeyframeRef<'_>> + '_ {
        let size = self.value_size();
        self.times
            .iter()
            .zip(self.values.chunks_exact(size))
            .enumerate()
            .map(|(index, (time, value))| KeyframeRef {
                index,
                time: *time,
                value,
            })
    }

    /// Check every invariant; used after loading tracks from disk
    pub fn validate(&self) -> Result<()> {
        self.check_buffers()?;

        if self.times.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(EditError::operation(format!(
                "keyframes of '{}' are not sorted by time",
                self.name
            )));
        }

        if !self.value_type.supports(self.interpolation) {
            return Err(EditError::operation(format!(
                "{} tracks do not support {} interpolation",
                self.value_type.name(),
                self.interpolation.name()
            )));
        }

        Ok(())
    }

    fn check_buffers(&self) -> Result<()> {
        if self.times.is_empty() {
            return Err(EditError::operation("track needs at least one keyframe"));
        }

        let expected = self.times.len() * self.value_size();
        if self.values.len() != expected {
            return Err(EditError::input(format!(
                "expected {} values for {} keyframes, got {}",
                expected,
                self.times.len(),
                self.values.len()
            )));
        }

        if self.times.iter().chain(&self.values).any(|v| !v.is_finite()) {
            return Err(EditError::input("track contains non-finite numbers"));
        }

        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.times.len() {
            return Err(EditError::operation(format!(
                "keyframe {} no longer exists (track has {})",
                index,
                self.times.len()
            )));
        }
        Ok(())
    }

    /// Sort keyframes by time, moving value blocks with their times.
    ///
    /// Equal times keep their relative order.
    pub fn sort(&mut self) {
        self.sort_tracking(0);
    }

    /// Insertion sort; returns where the keyframe at `tracked` ended up.
    fn sort_tracking(&mut self, mut tracked: usize) -> usize {
        for i in 1..self.times.len() {
            let mut j = i;
            while j > 0 && self.times[j - 1] > self.times[j] {
                self.swap_keyframes(j - 1, j);
                if tracked == j {
                    tracked = j - 1;
                } else if tracked == j - 1 {
                    tracked = j;
                }
                j -= 1;
            }
        }
        tracked
    }

    fn swap_keyframes(&mut self, a: usize, b: usize) {
        self.times.swap(a, b);
        let size = self.value_size();
        for m in 0..size {
            self.values.swap(a * size + m, b * size + m);
        }
    }

    /// Replace both buffers with the keyframes flagged in `keep`
    fn commit_mask(&mut self, keep: &[bool]) -> usize {
        let size = self.value_size();
        let kept = keep.iter().filter(|k| **k).count();

        let mut times = Vec::with_capacity(kept);
        let mut values = Vec::with_capacity(kept * size);
        for (index, _) in keep.iter().enumerate().filter(|(_, k)| **k) {
            times.push(self.times[index]);
            values.extend_from_slice(&self.values[index * size..(index + 1) * size]);
        }

        let removed = self.times.len() - kept;
        self.times = times;
        self.values = values;
        removed
    }

    /// Remove a keyframe. The last remaining keyframe cannot be deleted.
    pub fn delete_keyframe(&mut self, index: usize) -> Result<Keyframe> {
        self.check_index(index)?;
        if self.times.len() == 1 {
            return Err(EditError::operation("track needs at least one keyframe"));
        }

        let removed = Keyframe {
            time: self.times[index],
            value: self.value_block(index).unwrap_or_default().to_vec(),
        };

        let keep: Vec<bool> = (0..self.times.len()).map(|i| i != index).collect();
        self.commit_mask(&keep);
        Ok(removed)
    }

    /// Move keyframe to a new time. Returns its index after re-sorting.
    pub fn move_keyframe(&mut self, index: usize, new_time: f32) -> Result<usize> {
        if !new_time.is_finite() {
            return Err(EditError::input("keyframe time must be a finite number"));
        }
        self.check_index(index)?;

        self.times[index] = new_time;
        Ok(self.sort_tracking(index))
    }

    /// Insert or update keyframe at time. Returns its index.
    pub fn insert_keyframe(&mut self, time: f32, value: &[f32]) -> Result<usize> {
        if !time.is_finite() {
            return Err(EditError::input("keyframe time must be a finite number"));
        }
        let size = self.value_size();
        if value.len() != size {
            return Err(EditError::input(format!(
                "{} keyframes take {} components, got {}",
                self.value_type.name(),
                size,
                value.len()
            )));
        }
        if value.iter().any(|v| !v.is_finite()) {
            return Err(EditError::input("keyframe value must be finite"));
        }

        if let Some(index) = self
            .times
            .iter()
            .position(|t| (t - time).abs() < KEYFRAME_TIME_THRESHOLD)
        {
            self.values[index * size..(index + 1) * size].copy_from_slice(value);
            return Ok(index);
        }

        self.times.push(time);
        self.values.extend_from_slice(value);
        let last = self.times.len() - 1;
        Ok(self.sort_tracking(last))
    }

    /// Offset all keyframes by a time delta
    pub fn shift(&mut self, delta: f32) -> Result<()> {
        if !delta.is_finite() {
            return Err(EditError::input("shift must be a finite number"));
        }
        self.retime(|time| time + delta)
    }

    /// Scale all keyframes by a time factor
    pub fn scale(&mut self, factor: f32) -> Result<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(EditError::input("time scale must be a positive number"));
        }
        self.retime(|time| time * factor)
    }

    /// Map every time; nothing changes if a result is not finite
    fn retime(&mut self, map: impl Fn(f32) -> f32) -> Result<()> {
        let times: Vec<f32> = self.times.iter().map(|time| map(*time)).collect();
        if times.iter().any(|time| !time.is_finite()) {
            return Err(EditError::input("keyframe times would leave the representable range"));
        }
        self.times = times;
        Ok(())
    }

    /// Remove keyframes outside `[start, end]`. Returns how many were removed.
    pub fn trim(&mut self, start: f32, end: f32) -> Result<usize> {
        if !start.is_finite() || !end.is_finite() {
            return Err(EditError::input("trim range must be finite numbers"));
        }
        if start > end {
            return Err(EditError::input(format!(
                "trim start {} is after end {}",
                start, end
            )));
        }

        let keep: Vec<bool> = self.times.iter().map(|t| *t >= start && *t <= end).collect();
        if !keep.contains(&true) {
            return Err(EditError::operation(format!(
                "no keyframes between {} and {}, track needs at least one keyframe",
                start, end
            )));
        }

        Ok(self.commit_mask(&keep))
    }

    /// Remove keyframes that do not change the sampled curve.
    ///
    /// The first and last keyframes always survive. Returns how many were removed.
    pub fn optimize(&mut self) -> usize {
        let count = self.times.len();
        if count < 3 {
            return 0;
        }

        let mut keep = vec![false; count];
        keep[0] = true;
        keep[count - 1] = true;

        let mut previous = 0;
        for index in 1..count - 1 {
            let time = self.times[index];
            let redundant = if time == self.times[index + 1] || time == self.times[previous] {
                true
            } else {
                match self.interpolation {
                    InterpolationMode::Discrete => self.blocks_equal(previous, index),
                    InterpolationMode::Linear if self.value_type == TrackValueType::Quaternion => {
                        self.blocks_equal(previous, index) && self.blocks_equal(index, index + 1)
                    }
                    InterpolationMode::Linear => self.on_line(previous, index, index + 1),
                    InterpolationMode::Smooth => false,
                }
            };

            if !redundant {
                keep[index] = true;
                previous = index;
            }
        }

        self.commit_mask(&keep)
    }

    fn blocks_equal(&self, a: usize, b: usize) -> bool {
        match (self.value_block(a), self.value_block(b)) {
            (Some(a), Some(b)) => a
                .iter()
                .zip(b)
                .all(|(x, y)| (x - y).abs() <= OPTIMIZE_TOLERANCE),
            _ => false,
        }
    }

    /// Whether keyframe `mid` lies on the straight line from `a` to `b`
    fn on_line(&self, a: usize, mid: usize, b: usize) -> bool {
        let (Some(va), Some(vm), Some(vb)) =
            (self.value_block(a), self.value_block(mid), self.value_block(b))
        else {
            return false;
        };

        let span = self.times[b] - self.times[a];
        if span <= 0.0 {
            return false;
        }
        let t = (self.times[mid] - self.times[a]) / span;

        va.iter()
            .zip(vm)
            .zip(vb)
            .all(|((a, m), b)| (Interpolation::lerp(*a, *b, t) - m).abs() <= OPTIMIZE_TOLERANCE)
    }

    /// Change interpolation mode
    pub fn set_interpolation(&mut self, mode: InterpolationMode) -> Result<()> {
        if !self.value_type.supports(mode) {
            return Err(EditError::operation(format!(
                "{} tracks do not support {} interpolation",
                self.value_type.name(),
                mode.name()
            )));
        }
        self.interpolation = mode;
        Ok(())
    }

    /// Evaluate the track value at a given time
    pub fn evaluate(&self, time: f32) -> Vec<f32> {
        let count = self.times.len();
        if count == 0 {
            return Vec::new();
        }
        if time <= self.times[0] {
            return self.block_vec(0);
        }
        if time >= self.times[count - 1] {
            return self.block_vec(count - 1);
        }

        let next = self.times.partition_point(|t| *t <= time);
        let prev = next - 1;
        let (t0, t1) = (self.times[prev], self.times[next]);
        let span = t1 - t0;
        if span <= 0.0 {
            return self.block_vec(next);
        }
        let alpha = (time - t0) / span;

        let (Some(a), Some(b)) = (self.value_block(prev), self.value_block(next)) else {
            return Vec::new();
        };

        match self.interpolation {
            InterpolationMode::Discrete => a.to_vec(),
            InterpolationMode::Linear if self.value_type == TrackValueType::Quaternion => {
                match (Interpolation::quat(a), Interpolation::quat(b)) {
                    (Some(qa), Some(qb)) => Interpolation::slerp(qa, qb, alpha).to_vec(),
                    _ => a.to_vec(),
                }
            }
            InterpolationMode::Linear => {
                let mut out = vec![0.0; a.len()];
                Interpolation::lerp_block(a, b, alpha, &mut out);
                out
            }
            InterpolationMode::Smooth => self.evaluate_smooth(prev, next, alpha),
        }
    }

    /// Hermite between `prev` and `next` with Catmull-Rom tangents, zero slope at the ends
    fn evaluate_smooth(&self, prev: usize, next: usize, alpha: f32) -> Vec<f32> {
        let size = self.value_size();
        let span = self.times[next] - self.times[prev];
        let before = prev.checked_sub(1);
        let after = (next + 1 < self.times.len()).then_some(next + 1);

        let mut out = Vec::with_capacity(size);
        for c in 0..size {
            let p0 = self.values[prev * size + c];
            let p1 = self.values[next * size + c];

            let m0 = before.map_or(0.0, |i| {
                (p1 - self.values[i * size + c]) * span / (self.times[next] - self.times[i])
            });
            let m1 = after.map_or(0.0, |i| {
                (self.values[i * size + c] - p0) * span / (self.times[i] - self.times[prev])
            });

            out.push(Interpolation::hermite(p0, m0, p1, m1, alpha));
        }

        match Interpolation::quat(&out) {
            Some(q) if self.value_type == TrackValueType::Quaternion => Interpolation::normalize4(q).to_vec(),
            _ => out,
        }
    }

    fn block_vec(&self, index: usize) -> Vec<f32> {
        self.value_block(index).map(<[f32]>::to_vec).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number_track(times: &[f32], values: &[f32]) -> KeyframeTrack {
        KeyframeTrack::new("Cube.opacity", TrackValueType::Number, times.to_vec(), values.to_vec()).unwrap()
    }

    /// Raw track that skips the sort done by `new`
    fn unsorted(value_type: TrackValueType, times: &[f32], values: &[f32]) -> KeyframeTrack {
        KeyframeTrack {
            id: TrackId::new(),
            name: "Cube.position".to_string(),
            value_type,
            times: times.to_vec(),
            values: values.to_vec(),
            interpolation: InterpolationMode::Linear,
            color: None,
        }
    }

    fn assert_consistent(track: &KeyframeTrack) {
        assert_eq!(track.values().len(), track.times().len() * track.value_size());
        assert!(!track.is_empty());
    }

    #[test]
    fn test_new_validates_buffers() {
        assert!(matches!(
            KeyframeTrack::new("a.b", TrackValueType::Vector3, vec![0.0, 1.0], vec![0.0; 5]),
            Err(EditError::InvalidInput(_))
        ));
        assert!(matches!(
            KeyframeTrack::new("a.b", TrackValueType::Number, vec![], vec![]),
            Err(EditError::InvalidOperation(_))
        ));
        assert!(matches!(
            KeyframeTrack::new("a.b", TrackValueType::Number, vec![f32::NAN], vec![1.0]),
            Err(EditError::InvalidInput(_))
        ));

        let track = KeyframeTrack::new("a.b", TrackValueType::Number, vec![2.0, 0.0], vec![20.0, 0.0]).unwrap();
        assert_eq!(track.times(), &[0.0, 2.0]);
        assert_eq!(track.values(), &[0.0, 20.0]);
    }

    #[test]
    fn test_sort_moves_values_with_times() {
        let mut track = unsorted(TrackValueType::Number, &[3.0, 1.0, 2.0], &[30.0, 10.0, 20.0]);
        track.sort();
        assert_eq!(track.times(), &[1.0, 2.0, 3.0]);
        assert_eq!(track.values(), &[10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_sort_keeps_equal_times_in_order() {
        // Blocks A = [1, 1], B = [2, 2], C = [3, 3]
        let mut track = unsorted(
            TrackValueType::Vector2,
            &[1.0, 1.0, 0.0],
            &[1.0, 1.0, 2.0, 2.0, 3.0, 3.0],
        );
        track.sort();
        assert_eq!(track.times(), &[0.0, 1.0, 1.0]);
        assert_eq!(track.values(), &[3.0, 3.0, 1.0, 1.0, 2.0, 2.0]);
    }

    #[test]
    fn test_delete_keyframe() {
        let mut track = KeyframeTrack::new(
            "Cube.position",
            TrackValueType::Vector3,
            vec![0.0, 1.0, 2.0],
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0],
        )
        .unwrap();

        let removed = track.delete_keyframe(1).unwrap();
        assert_eq!(removed.time, 1.0);
        assert_eq!(removed.value, vec![1.0, 1.0, 1.0]);
        assert_eq!(track.times(), &[0.0, 2.0]);
        assert_eq!(track.values(), &[0.0, 0.0, 0.0, 2.0, 2.0, 2.0]);
        assert_consistent(&track);
    }

    #[test]
    fn test_delete_last_keyframe_rejected() {
        let mut track = number_track(&[0.5], &[7.0]);
        let before = track.clone();

        let err = track.delete_keyframe(0).unwrap_err();
        assert!(matches!(err, EditError::InvalidOperation(_)));
        assert_eq!(track, before);
    }

    #[test]
    fn test_stale_index_rejected() {
        let mut track = number_track(&[0.0, 1.0], &[0.0, 1.0]);
        track.delete_keyframe(1).unwrap();

        assert!(matches!(track.delete_keyframe(1), Err(EditError::InvalidOperation(_))));
        assert!(matches!(track.move_keyframe(1, 3.0), Err(EditError::InvalidOperation(_))));
    }

    #[test]
    fn test_move_keyframe_resorts() {
        let mut track = number_track(&[0.0, 1.0, 2.0], &[10.0, 11.0, 12.0]);
        let new_index = track.move_keyframe(0, 5.0).unwrap();

        assert_eq!(new_index, 2);
        assert_eq!(track.times(), &[1.0, 2.0, 5.0]);
        assert_eq!(track.values(), &[11.0, 12.0, 10.0]);
        assert_consistent(&track);
    }

    #[test]
    fn test_move_keyframe_rejects_non_finite() {
        let mut track = number_track(&[0.0, 1.0], &[0.0, 1.0]);
        let before = track.clone();
        assert!(matches!(track.move_keyframe(0, f32::NAN), Err(EditError::InvalidInput(_))));
        assert!(matches!(track.move_keyframe(0, f32::INFINITY), Err(EditError::InvalidInput(_))));
        assert_eq!(track, before);
    }

    #[test]
    fn test_shift_keeps_order() {
        let mut track = number_track(&[0.0, 1.0, 2.0], &[5.0, 6.0, 7.0]);
        track.shift(10.0).unwrap();
        assert_eq!(track.times(), &[10.0, 11.0, 12.0]);
        assert_eq!(track.values(), &[5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_shift_round_trip() {
        let original = [0.0, 0.3, 1.7, 2.25];
        let mut track = number_track(&original, &[0.0; 4]);
        track.shift(5.0).unwrap();
        track.shift(-5.0).unwrap();
        for (a, b) in track.times().iter().zip(original) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn test_retime_overflow_leaves_track_unchanged() {
        let mut track = number_track(&[0.0, 3.0e38], &[1.0, 2.0]);
        let before = track.clone();

        assert!(matches!(track.shift(1.0e38), Err(EditError::InvalidInput(_))));
        assert_eq!(track, before);

        assert!(matches!(track.scale(10.0), Err(EditError::InvalidInput(_))));
        assert_eq!(track, before);
        assert!(track.validate().is_ok());
    }

    #[test]
    fn test_trim_is_inclusive() {
        let mut track = number_track(&[0.0, 1.0, 2.0, 3.0], &[0.0, 10.0, 20.0, 30.0]);
        let removed = track.trim(1.0, 2.0).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(track.times(), &[1.0, 2.0]);
        assert_eq!(track.values(), &[10.0, 20.0]);
    }

    #[test]
    fn test_trim_rejections() {
        let mut track = number_track(&[0.0, 1.0], &[0.0, 1.0]);
        let before = track.clone();

        assert!(matches!(track.trim(5.0, 6.0), Err(EditError::InvalidOperation(_))));
        assert!(matches!(track.trim(2.0, 1.0), Err(EditError::InvalidInput(_))));
        assert!(matches!(track.trim(0.0, f32::NAN), Err(EditError::InvalidInput(_))));
        assert_eq!(track, before);
    }

    #[test]
    fn test_insert_keyframe() {
        let mut track = number_track(&[0.0, 2.0], &[0.0, 2.0]);

        assert_eq!(track.insert_keyframe(1.0, &[1.0]).unwrap(), 1);
        assert_eq!(track.times(), &[0.0, 1.0, 2.0]);

        // Same time overwrites the value
        assert_eq!(track.insert_keyframe(1.0005, &[9.0]).unwrap(), 1);
        assert_eq!(track.len(), 3);
        assert_eq!(track.values(), &[0.0, 9.0, 2.0]);

        assert!(matches!(track.insert_keyframe(3.0, &[1.0, 2.0]), Err(EditError::InvalidInput(_))));
        assert!(matches!(track.insert_keyframe(f32::NAN, &[1.0]), Err(EditError::InvalidInput(_))));
    }

    #[test]
    fn test_scale() {
        let mut track = number_track(&[0.0, 1.0, 2.0], &[0.0; 3]);
        track.scale(0.5).unwrap();
        assert_eq!(track.times(), &[0.0, 0.5, 1.0]);
        assert!(matches!(track.scale(0.0), Err(EditError::InvalidInput(_))));
        assert!(matches!(track.scale(-1.0), Err(EditError::InvalidInput(_))));
    }

    #[test]
    fn test_optimize_linear_removes_collinear() {
        let mut track = number_track(&[0.0, 1.0, 2.0, 3.0, 4.0], &[0.0, 1.0, 2.0, 5.0, 5.0]);
        let removed = track.optimize();
        assert_eq!(removed, 1);
        assert_eq!(track.times(), &[0.0, 2.0, 3.0, 4.0]);
        assert_eq!(track.values(), &[0.0, 2.0, 5.0, 5.0]);
        assert_consistent(&track);
    }

    #[test]
    fn test_optimize_discrete_and_smooth() {
        let mut discrete = number_track(&[0.0, 1.0, 2.0, 3.0], &[1.0, 1.0, 2.0, 2.0])
            .with_interpolation(InterpolationMode::Discrete)
            .unwrap();
        assert_eq!(discrete.optimize(), 1);
        assert_eq!(discrete.times(), &[0.0, 2.0, 3.0]);

        let mut smooth = number_track(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0])
            .with_interpolation(InterpolationMode::Smooth)
            .unwrap();
        assert_eq!(smooth.optimize(), 0);
    }

    #[test]
    fn test_optimize_drops_duplicate_times() {
        let mut track = number_track(&[0.0, 1.0, 1.0, 2.0], &[0.0, 5.0, 6.0, 0.0]);
        assert_eq!(track.optimize(), 1);
        assert_eq!(track.times(), &[0.0, 1.0, 2.0]);
        assert_eq!(track.values(), &[0.0, 6.0, 0.0]);
    }

    #[test]
    fn test_optimize_linear_quaternion_needs_equal_neighbours() {
        let identity = [0.0, 0.0, 0.0, 1.0];
        let half = std::f32::consts::FRAC_PI_4;
        let quarter = [0.0, 0.0, half.sin(), half.cos()];

        // Middle key equals both neighbours: dropped
        let values: Vec<f32> = [identity, identity, identity, quarter].concat();
        let mut track =
            KeyframeTrack::new("Cube.quaternion", TrackValueType::Quaternion, vec![0.0, 1.0, 2.0, 3.0], values).unwrap();
        assert_eq!(track.optimize(), 1);
        assert_eq!(track.times(), &[0.0, 2.0, 3.0]);
        assert_consistent(&track);

        // A key halfway along the rotation is kept even though it is on the arc
        let eighth = std::f32::consts::FRAC_PI_8;
        let midway = [0.0, 0.0, eighth.sin(), eighth.cos()];
        let values: Vec<f32> = [identity, midway, quarter].concat();
        let mut track =
            KeyframeTrack::new("Cube.quaternion", TrackValueType::Quaternion, vec![0.0, 1.0, 2.0], values).unwrap();
        assert_eq!(track.optimize(), 0);
        assert_eq!(track.len(), 3);
    }

    #[test]
    fn test_optimize_smooth_drops_only_duplicate_times() {
        let mut track = number_track(&[0.0, 1.0, 1.0, 2.0, 3.0], &[0.0, 5.0, 6.0, 7.0, 8.0])
            .with_interpolation(InterpolationMode::Smooth)
            .unwrap();
        assert_eq!(track.optimize(), 1);
        assert_eq!(track.times(), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(track.values(), &[0.0, 6.0, 7.0, 8.0]);
        assert_consistent(&track);
    }

    #[test]
    fn test_value_block_out_of_range() {
        let track = number_track(&[0.0, 1.0], &[1.0, 2.0]);
        assert_eq!(track.value_block(1), Some(&[2.0][..]));
        assert_eq!(track.value_block(2), None);
        assert_eq!(track.value_block(usize::MAX), None);
        assert!(track.keyframe(usize::MAX).is_none());
    }

    #[test]
    fn test_boolean_interpolation() {
        let mut track = KeyframeTrack::new("Cube.visible", TrackValueType::Boolean, vec![0.0, 1.0], vec![1.0, 0.0]).unwrap();
        assert_eq!(track.interpolation(), InterpolationMode::Discrete);
        assert!(matches!(
            track.set_interpolation(InterpolationMode::Linear),
            Err(EditError::InvalidOperation(_))
        ));
        assert_eq!(track.evaluate(0.5), vec![1.0]);
    }

    #[test]
    fn test_evaluate_linear_and_clamped() {
        let track = KeyframeTrack::new(
            "Cube.position",
            TrackValueType::Vector3,
            vec![0.0, 2.0],
            vec![0.0, 0.0, 0.0, 2.0, 4.0, 6.0],
        )
        .unwrap();

        assert_eq!(track.evaluate(-1.0), vec![0.0, 0.0, 0.0]);
        assert_eq!(track.evaluate(1.0), vec![1.0, 2.0, 3.0]);
        assert_eq!(track.evaluate(5.0), vec![2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_evaluate_smooth_passes_through_keys() {
        let track = number_track(&[0.0, 1.0, 2.0, 3.0], &[0.0, 2.0, 1.0, 4.0])
            .with_interpolation(InterpolationMode::Smooth)
            .unwrap();
        assert!((track.evaluate(1.0)[0] - 2.0).abs() < 1e-6);
        let mid = track.evaluate(1.5)[0];
        assert!(mid > 1.0 && mid < 2.0);
    }

    #[test]
    fn test_evaluate_quaternion_is_unit_length() {
        let half = std::f32::consts::FRAC_PI_4;
        let track = KeyframeTrack::new(
            "Cube.quaternion",
            TrackValueType::Quaternion,
            vec![0.0, 1.0],
            vec![0.0, 0.0, 0.0, 1.0, 0.0, half.sin(), 0.0, half.cos()],
        )
        .unwrap();

        let q = track.evaluate(0.3);
        let len: f32 = q.iter().map(|c| c * c).sum::<f32>().sqrt();
        assert!((len - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_validate_detects_unsorted() {
        let track = unsorted(TrackValueType::Number, &[1.0, 0.0], &[0.0, 0.0]);
        assert!(track.validate().is_err());
        let mut sorted = track.clone();
        sorted.sort();
        assert!(sorted.validate().is_ok());
    }

    #[test]
    fn test_edit_sequence_keeps_buffers_consistent() {
        let mut track = KeyframeTrack::new(
            "Cube.scale",
            TrackValueType::Vector3,
            vec![0.0, 0.5, 1.0, 1.5, 2.0],
            (0..15).map(|v| v as f32).collect(),
        )
        .unwrap();

        track.move_keyframe(4, 0.25).unwrap();
        assert_consistent(&track);
        track.delete_keyframe(2).unwrap();
        assert_consistent(&track);
        track.shift(1.0).unwrap();
        assert_consistent(&track);
        track.trim(1.0, 2.0).unwrap();
        assert_consistent(&track);
        track.insert_keyframe(1.75, &[1.0, 2.0, 3.0]).unwrap();
        assert_consistent(&track);
        assert!(track.validate().is_ok());
    }

    #[test]
    fn test_binding_from_name() {
        let track = number_track(&[0.0], &[1.0]);
        let binding = track.binding().unwrap();
        assert_eq!(binding.node, "Cube");
        assert_eq!(binding.property, "opacity");
    }
}
