use std::cmp::Ordering;
use std::fmt;

use crate::foundation::error::{CutlineError, CutlineResult};

/// An exact point or span of time: `value / timescale` seconds.
///
/// This is the authoritative time representation across the crate. Ordering
/// and equality are defined by cross-multiplication in 128-bit space, never
/// by float conversion, so `{1, 2}` and `{2, 4}` compare equal. Values are
/// not reduced to lowest terms: interchange formats preserve the producing
/// timescale for readability, and so do we.
///
/// Arithmetic across differing timescales unifies on the least common
/// multiple of both timescales and reports [`CutlineError::Overflow`] instead
/// of wrapping or silently discarding precision.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawRationalTime")]
pub struct RationalTime {
    /// Count of ticks. May be negative for spans produced by subtraction.
    pub value: i64,
    /// Ticks per second. Always strictly positive.
    pub timescale: i32,
}

/// Unvalidated wire shape; deserialization routes through
/// [`RationalTime::new`] so external input cannot smuggle in a
/// non-positive timescale.
#[derive(serde::Deserialize)]
struct RawRationalTime {
    value: i64,
    timescale: i32,
}

impl TryFrom<RawRationalTime> for RationalTime {
    type Error = CutlineError;

    fn try_from(raw: RawRationalTime) -> CutlineResult<Self> {
        Self::new(raw.value, raw.timescale)
    }
}

impl RationalTime {
    /// Build a time value, rejecting non-positive timescales.
    pub fn new(value: i64, timescale: i32) -> CutlineResult<Self> {
        if timescale <= 0 {
            return Err(CutlineError::validation(format!(
                "timescale must be > 0, got {timescale}"
            )));
        }
        Ok(Self { value, timescale })
    }

    /// The zero value `{0, 1}`.
    pub const fn zero() -> Self {
        Self {
            value: 0,
            timescale: 1,
        }
    }

    /// Whole seconds at timescale 1.
    pub const fn from_whole_seconds(seconds: i64) -> Self {
        Self {
            value: seconds,
            timescale: 1,
        }
    }

    /// Convert a float second count to the nearest tick at `timescale`.
    ///
    /// For estimation and external inputs (asset durations reported as
    /// floats) only; exact times should be constructed directly.
    pub fn from_seconds(seconds: f64, timescale: i32) -> CutlineResult<Self> {
        if timescale <= 0 {
            return Err(CutlineError::validation(format!(
                "timescale must be > 0, got {timescale}"
            )));
        }
        if !seconds.is_finite() {
            return Err(CutlineError::validation(
                "seconds must be finite".to_string(),
            ));
        }
        let ticks = (seconds * f64::from(timescale)).round();
        if ticks < i64::MIN as f64 || ticks > i64::MAX as f64 {
            return Err(CutlineError::overflow(format!(
                "{seconds}s does not fit a 64-bit tick count at timescale {timescale}"
            )));
        }
        Ok(Self {
            value: ticks as i64,
            timescale,
        })
    }

    /// Approximate float seconds, for display and estimation only.
    ///
    /// Never use the result for comparisons; compare `RationalTime` values
    /// directly instead.
    pub fn to_seconds(self) -> f64 {
        self.value as f64 / f64::from(self.timescale)
    }

    /// True when the value is exactly zero.
    pub fn is_zero(self) -> bool {
        self.value == 0
    }

    /// True when the value is strictly greater than zero.
    pub fn is_positive(self) -> bool {
        self.value > 0
    }

    /// True when the value is strictly less than zero.
    pub fn is_negative(self) -> bool {
        self.value < 0
    }

    /// Exact addition, unifying timescales; fails with `Overflow` rather
    /// than wrap or lose precision.
    pub fn checked_add(self, other: Self) -> CutlineResult<Self> {
        self.combine(other, i64::checked_add, "add")
    }

    /// Exact subtraction, unifying timescales; fails with `Overflow` rather
    /// than wrap or lose precision.
    pub fn checked_sub(self, other: Self) -> CutlineResult<Self> {
        self.combine(other, i64::checked_sub, "subtract")
    }

    fn combine(
        self,
        other: Self,
        op: fn(i64, i64) -> Option<i64>,
        verb: &str,
    ) -> CutlineResult<Self> {
        let (a, b, timescale) = unify(self, other)?;
        let value = op(a, b).ok_or_else(|| {
            CutlineError::overflow(format!("cannot {verb} {self} and {other} without overflow"))
        })?;
        Ok(Self { value, timescale })
    }

    /// Canonical text form: `"5s"` for exact whole seconds, `"1001/24000s"`
    /// otherwise. These are the two textual encodings the interchange
    /// format accepts.
    pub fn formatted(self) -> String {
        if self.value % i64::from(self.timescale) == 0 {
            format!("{}s", self.value / i64::from(self.timescale))
        } else {
            format!("{}/{}s", self.value, self.timescale)
        }
    }
}

/// Rescale both operands to a common timescale (the lcm of the two).
fn unify(a: RationalTime, b: RationalTime) -> CutlineResult<(i64, i64, i32)> {
    if a.timescale == b.timescale {
        return Ok((a.value, b.value, a.timescale));
    }
    let g = gcd(i64::from(a.timescale), i64::from(b.timescale));
    let lcm = i64::from(a.timescale) / g * i64::from(b.timescale);
    if lcm > i64::from(i32::MAX) {
        return Err(CutlineError::overflow(format!(
            "common timescale of {} and {} exceeds i32",
            a.timescale, b.timescale
        )));
    }
    let scale_a = lcm / i64::from(a.timescale);
    let scale_b = lcm / i64::from(b.timescale);
    let va = a.value.checked_mul(scale_a).ok_or_else(|| {
        CutlineError::overflow(format!("{a} cannot be rescaled to timescale {lcm}"))
    })?;
    let vb = b.value.checked_mul(scale_b).ok_or_else(|| {
        CutlineError::overflow(format!("{b} cannot be rescaled to timescale {lcm}"))
    })?;
    Ok((va, vb, lcm as i32))
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl PartialEq for RationalTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RationalTime {}

impl PartialOrd for RationalTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RationalTime {
    fn cmp(&self, other: &Self) -> Ordering {
        // Cross-multiplication in i128 cannot overflow for i64 * i32 operands
        // and keeps ordering exact. Timescales are positive, so no sign flip.
        let lhs = i128::from(self.value) * i128::from(other.timescale);
        let rhs = i128::from(other.value) * i128::from(self.timescale);
        lhs.cmp(&rhs)
    }
}

impl fmt::Display for RationalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/time.rs"]
mod tests;
