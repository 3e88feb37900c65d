//! Backoff strategies and the delay arithmetic behind them.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use rand::Rng;

use crate::error::ConstructionError;

/// How the delay between attempts grows.
///
/// For a base delay `b` (in seconds) and a zero-based attempt index `i`:
///
/// | Strategy      | Delay         | `b = 2`          |
/// |---------------|---------------|------------------|
/// | `Constant`    | `b`           | 2, 2, 2, 2, ...  |
/// | `Linear`      | `(i + 1) * b` | 2, 4, 6, 8, ...  |
/// | `Exponential` | `b^i * b`     | 2, 4, 8, 16, ... |
///
/// Bases below ten are first scaled up by a power of ten so their order of
/// magnitude is zero, run through the formula, and scaled back down. A base of `2`
/// is unaffected; a base of `0.5` becomes `5`, so exponential growth from half a
/// second reads `0.5, 2.5, 12.5, ...`.
///
/// # Examples
///
/// ```rust
/// use actionpack::Backoff;
///
/// let delays: Vec<f64> = (0..4).map(|i| Backoff::Exponential.calculate(i, 2.0, 0)).collect();
/// assert_eq!(delays, vec![2.0, 4.0, 8.0, 16.0]);
///
/// let linear: Vec<f64> = (0..4).map(|i| Backoff::Linear.calculate(i, 2.0, 0)).collect();
/// assert_eq!(linear, vec![2.0, 4.0, 6.0, 8.0]);
///
/// assert_eq!("exponential".parse::<Backoff>(), Ok(Backoff::Exponential));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Backoff {
    /// The same delay every time.
    #[default]
    Constant,
    /// Delay grows by the base each attempt.
    Linear,
    /// Delay is multiplied by the base each attempt.
    Exponential,
}

impl Backoff {
    /// Delay in seconds after attempt `attempt`, with up to `jitter_percentage`
    /// percent of the scaled base added or removed at random.
    ///
    /// The spread is taken from the base after scaling, so a `0.5` base at 10%
    /// varies by up to `0.5` seconds. A zero base always yields zero. The result may
    /// be negative only when the jitter exceeds the curve itself; [`Backoff::delay`]
    /// clamps it. A non-finite base gets no jitter.
    pub fn calculate(&self, attempt: u32, base: f64, jitter_percentage: u8) -> f64 {
        if base == 0.0 {
            return 0.0;
        }
        let (scaled, _, _) = normalize(base);
        self.curve(attempt, base) + jitter(scaled, jitter_percentage)
    }

    /// The strategy curve alone, without jitter.
    pub fn curve(&self, attempt: u32, base: f64) -> f64 {
        if base == 0.0 {
            return 0.0;
        }
        let (b, factor, is_fraction) = normalize(base);
        let i = f64::from(attempt);

        let delay = match self {
            Backoff::Constant => b,
            Backoff::Linear => (i + 1.0) * b,
            Backoff::Exponential => b.powi(i32::try_from(attempt).unwrap_or(i32::MAX)) * b,
        };

        if is_fraction {
            delay / factor
        } else {
            delay
        }
    }

    /// [`calculate`](Backoff::calculate) as a `Duration`, clamped to `0..=max`.
    pub fn delay(
        &self,
        attempt: u32,
        base: Duration,
        jitter_percentage: u8,
        max: Duration,
    ) -> Duration {
        let secs = self
            .calculate(attempt, base.as_secs_f64(), jitter_percentage)
            .max(0.0);
        Duration::try_from_secs_f64(secs).unwrap_or(max).min(max)
    }
}

/// Scale factor bringing a base below ten to order of magnitude zero.
fn rectify(base: f64) -> (f64, bool) {
    let order = base.abs().log10().floor();
    let is_fraction = order < 1.0;
    let factor = if is_fraction {
        10f64.powf(order.abs())
    } else {
        1.0
    };
    (factor, is_fraction)
}

/// The base after scaling, with the factor that scaled it.
fn normalize(base: f64) -> (f64, f64, bool) {
    let (factor, is_fraction) = rectify(base);
    let scaled = if is_fraction { factor * base } else { base };
    (scaled.abs(), factor, is_fraction)
}

/// Uniform offset in `[-j, +j]` with `j = percentage / 100 * base`.
fn jitter(base: f64, percentage: u8) -> f64 {
    let spread = f64::from(percentage) / 100.0 * base;
    if spread == 0.0 || !spread.is_finite() {
        return 0.0;
    }
    rand::rng().random_range(-spread..=spread)
}

impl fmt::Display for Backoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Backoff::Constant => "CONSTANT",
            Backoff::Linear => "LINEAR",
            Backoff::Exponential => "EXPONENTIAL",
        };
        f.write_str(name)
    }
}

impl FromStr for Backoff {
    type Err = ConstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CONSTANT" => Ok(Backoff::Constant),
            "LINEAR" => Ok(Backoff::Linear),
            "EXPONENTIAL" => Ok(Backoff::Exponential),
            _ => Err(ConstructionError::UnknownBackoff(s.to_string())),
        }
    }
}
