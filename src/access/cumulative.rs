use std::{collections::HashMap, hash::{BuildHasher, Hash}};

use serde::Serialize;

use crate::{outcome::Outcome, vocab::Mode};

/// Default upper bound of the travel-time axis, in minutes.
pub const MAX_MINUTES: u32 = 60;

/// Longest travel-time axis computed; larger bounds are clamped to it.
pub const MAX_AXIS_MINUTES: u32 = 24 * 60;

/// One point of a cumulative access curve.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CumulativeSharePoint {
    pub travel_time: u32,
    pub mode: Mode,
    /// Fraction of the population reaching a facility within `travel_time`.
    pub share: f64,
    pub group: String,
}

/// Share of `population` that reaches a facility within each whole minute
/// `0..=max_minutes`, with `max_minutes` clamped to [`MAX_AXIS_MINUTES`].
///
/// Origins missing from `travel_times`, or with a negative or non-finite
/// travel time, never reach a facility but still count towards the total.
/// Negative population counts are clamped to zero. Returns `None` when the
/// total population is zero, since the share is undefined there.
///
/// Runs in O(origins + max_minutes): reachable population is bucketed by the
/// first whole minute at which it counts, then prefix-summed.
pub fn compute_cumulative_share<K, S>(
    travel_times: &HashMap<K, f64, S>,
    population: &HashMap<K, f64, S>,
    max_minutes: u32,
) -> Option<Vec<(u32, f64)>>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    let max_minutes = max_minutes.min(MAX_AXIS_MINUTES);
    let mut buckets = vec![0.0; max_minutes as usize + 1];
    let mut total = 0.0;

    for (origin, &count) in population {
        let count = clamp_population(count);
        total += count;

        let Some(&time) = travel_times.get(origin) else { continue };
        if !time.is_finite() || time < 0.0 { continue }

        // time <= t for integer t exactly when ceil(time) <= t
        let minute = time.ceil();
        if minute <= max_minutes as f64 {
            buckets[minute as usize] += count;
        }
    }

    if total <= 0.0 { return None }

    let mut reached = 0.0;
    Some(buckets.into_iter().enumerate()
        .map(|(minute, count)| {
            reached += count;
            (minute as u32, (reached / total).clamp(0.0, 1.0))
        })
        .collect())
}

fn clamp_population(count: f64) -> f64 {
    if count.is_nan() { 0.0 } else { count.max(0.0) }
}

/// One curve per mode over the shared axis `0..=max_minutes`, tagged with
/// `group`. Points are ordered by mode (in the order given), then minute.
pub fn compute_curves<K, S>(
    modes: &[(Mode, &HashMap<K, f64, S>)],
    population: &HashMap<K, f64, S>,
    max_minutes: u32,
    group: &str,
) -> Outcome<Vec<CumulativeSharePoint>>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    let max_minutes = max_minutes.min(MAX_AXIS_MINUTES);
    let mut points = Vec::with_capacity(modes.len() * (max_minutes as usize + 1));
    for &(mode, travel_times) in modes {
        let Some(curve) = compute_cumulative_share(travel_times, population, max_minutes) else {
            return Outcome::no_data(format!("no population in {}", group));
        };
        points.extend(curve.into_iter().map(|(travel_time, share)| CumulativeSharePoint {
            travel_time,
            mode,
            share,
            group: group.to_string(),
        }));
    }
    Outcome::Ready(points)
}
