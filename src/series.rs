use crate::{InputError, Ohlcv, Price};

/// Checks the series invariants detection relies on.
///
/// Bars must be strictly ascending by date, carry positive finite prices,
/// and keep `low <= open, close <= high`. The first violation is reported;
/// nothing is repaired.
///
/// # Errors
///
/// Returns the [`InputError`] describing the first offending bar.
pub fn validate_series(bars: &[impl Ohlcv]) -> Result<(), InputError> {
    for (index, bar) in bars.iter().enumerate() {
        if index > 0 {
            let previous = bars[index - 1].time();
            let current = bar.time();

            if current == previous {
                return Err(InputError::DuplicateDate {
                    index,
                    date: current,
                });
            }
            if current < previous {
                return Err(InputError::NotAscending {
                    index,
                    previous,
                    current,
                });
            }
        }

        validate_bar(index, bar)?;
    }

    Ok(())
}

fn validate_bar(index: usize, bar: &impl Ohlcv) -> Result<(), InputError> {
    let (open, high, low, close) = (bar.open(), bar.high(), bar.low(), bar.close());

    for (field, value) in [("open", open), ("high", high), ("low", low), ("close", close)] {
        if !(value.is_finite() && value > 0.0) {
            return Err(InputError::NonPositivePrice {
                index,
                field,
                value,
            });
        }
    }

    if low > high {
        return Err(InputError::InvertedRange { index, low, high });
    }

    for (field, value) in [("open", open), ("close", close)] {
        if !within(value, low, high) {
            return Err(InputError::OutsideRange {
                index,
                field,
                value,
            });
        }
    }

    Ok(())
}

#[inline]
fn within(value: Price, low: Price, high: Price) -> bool {
    low <= value && value <= high
}
