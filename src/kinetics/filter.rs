//! Observation Filter
//!
//! Two filtering steps guard the model evaluation:
//!
//! 1. [`working_set`] keeps rows with a strictly positive substrate concentration. The rate
//!    equations are trivial at `s = 0` and log-scaled presentation needs `s > 0`, so these
//!    rows are removed before any model is evaluated.
//! 2. [`predict`] evaluates one model for one row and reports why a row has no usable
//!    prediction. Each model table applies this independently.

use super::{
    constants::DerivedRow,
    error::UndefinedValue,
    models::{InhibitionModel, VmaxSource},
};

/// Rows with `s > 0`, in their original order.
pub fn working_set(rows: &[DerivedRow]) -> Vec<DerivedRow> {
    rows.iter().filter(|row| row.s > 0.0).copied().collect()
}

/// Predicted velocity of `row` under `model`.
///
/// # Returns
///
/// * `Ok(v)` - A finite predicted velocity
/// * `Err(UndefinedValue::InhibitorConstant)` - The row has no inhibitor constant
/// * `Err(UndefinedValue::NonFinitePrediction)` - The equation produced `NaN` or an infinity
pub fn predict(
    model: InhibitionModel,
    row: &DerivedRow,
    vmax: VmaxSource,
) -> Result<f64, UndefinedValue> {
    let k_i = row.k_i.ok_or(UndefinedValue::InhibitorConstant)?;
    let v = model.velocity(vmax.resolve(row.v), row.s, row.k_m, row.i, k_i);

    if v.is_finite() {
        Ok(v)
    } else {
        Err(UndefinedValue::NonFinitePrediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(index: usize, s: f64, i: f64, k_m: f64, k_i: Option<f64>) -> DerivedRow {
        DerivedRow {
            index,
            s,
            i,
            v: 1.0,
            k_m,
            k_i,
        }
    }

    #[test]
    fn test_working_set_excludes_zero_substrate() {
        let rows = vec![
            row(0, 0.0, 0.0, 2.0, Some(0.0)),
            row(1, 1.0, 0.0, 2.0, Some(0.0)),
            row(2, 0.0, 4.0, 2.0, Some(8.0)),
            row(3, 5.0, 4.0, 2.0, Some(8.0)),
        ];

        let working = working_set(&rows);

        assert_eq!(
            working.iter().map(|r| r.index).collect::<Vec<_>>(),
            vec![1, 3]
        );
    }

    #[test]
    fn test_predict_rejects_undefined_inhibitor_constant() {
        let result = predict(
            InhibitionModel::Competitive,
            &row(0, 1.0, 2.0, 1.0, None),
            VmaxSource::Observed,
        );
        assert_eq!(result, Err(UndefinedValue::InhibitorConstant));
    }

    #[test]
    fn test_predict_rejects_non_finite_velocity() {
        // alpha = 0 divides vmax by zero in the noncompetitive equation
        let result = predict(
            InhibitionModel::Noncompetitive,
            &row(0, 1.0, 2.0, 0.5, Some(-2.0)),
            VmaxSource::Observed,
        );
        assert_eq!(result, Err(UndefinedValue::NonFinitePrediction));
    }

    #[test]
    fn test_predict_uses_fixed_vmax() {
        let v = predict(
            InhibitionModel::Competitive,
            &row(0, 2.0, 0.0, 2.0, Some(0.0)),
            VmaxSource::Fixed(10.0),
        )
        .unwrap();
        assert_eq!(v, 5.0);
    }
}
