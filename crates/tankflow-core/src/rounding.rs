//! Conversion of raw simulation times into reported integers.
//!
//! The clock accumulates floating-point error across many additions, so a
//! time that is exactly `5` can come out as `4.999997`. Flooring that
//! directly would lose a whole unit. Times are first rounded *up* at the
//! fifth decimal and only then floored.

/// Fractional digits kept by [`ceil5`].
const PLACES: usize = 5;

/// `10^5`: one unit in the fifth decimal place.
const UNITS_PER_WHOLE: u128 = 100_000;

/// Round `t` up at the fifth decimal place.
///
/// The ceiling is taken on the shortest decimal that round-trips to `t`, not
/// on `t * 10^5`. `0.3` stays `0.3` even though `0.3 * 1e5` is
/// `30000.000000000004`, while `4.999990000000001` (one ulp above
/// `4.99999`) still goes up to `5`.
pub fn ceil5(t: f64) -> f64 {
    if !t.is_finite() {
        return t;
    }
    ceil_shortest_decimal(t).unwrap_or(t)
}

fn ceil_shortest_decimal(t: f64) -> Option<f64> {
    // `Display` for f64 prints the shortest round-trip digits and never
    // switches to exponent notation.
    let text = t.to_string();
    let (negative, magnitude) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.as_str()),
    };
    let (whole, fraction) = magnitude.split_once('.').unwrap_or((magnitude, ""));
    if fraction.len() <= PLACES {
        return Some(t);
    }

    // More than five fractional digits means the value is below 2^53, so
    // the scaled unit count fits comfortably in a u128.
    let (kept, dropped) = fraction.split_at(PLACES);
    let mut units =
        whole.parse::<u128>().ok()? * UNITS_PER_WHOLE + kept.parse::<u128>().ok()?;
    // Toward positive infinity: only positive values move away from zero.
    if !negative && dropped.bytes().any(|b| b != b'0') {
        units += 1;
    }

    let sign = if negative { "-" } else { "" };
    let decimal = format!(
        "{sign}{}.{:0width$}",
        units / UNITS_PER_WHOLE,
        units % UNITS_PER_WHOLE,
        width = PLACES
    );
    decimal.parse().ok()
}

/// Reported integer for a raw simulation time: `floor(ceil5(t))`.
///
/// Negative or non-finite input is clamped to zero; the engine never
/// produces such times.
pub fn report_time(t: f64) -> u64 {
    let rounded = ceil5(t).floor();
    if rounded.is_finite() && rounded > 0.0 {
        rounded as u64
    } else {
        0
    }
}
