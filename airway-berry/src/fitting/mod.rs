//! 曲线拟合.
//!
//! 给定一系列点 `(x, y)`, 该模块可以基于最小二乘法拟合出一条多项式曲线.

use ndarray::ArrayView1;

use crate::error::CalcResult;

mod polynomial;

pub use polynomial::Polynomial;

/// 基于最小二乘法拟合 n 次多项式曲线.
///
/// `x` 是自变量数组, `y` 是对应函数值, `degree` 是多项式次数 (最小为 1).
///
/// # 返回值
///
/// - `x` 与 `y` 长度不一致时, 返回 `Err(CalcError::ShapeMismatch)`;
/// - 点数少于 `degree + 1`, 或自变量取值过少导致正规方程奇异时,
///   返回 `Err(CalcError::TooFewPoints)`;
/// - 其他情况返回拟合出的多项式.
pub fn polynomial_f64(
    x: ArrayView1<f64>,
    y: ArrayView1<f64>,
    degree: u32,
) -> CalcResult<Polynomial<f64>> {
    polynomial::PolyImp::<f64>::new(x.view(), y.view(), degree)?.make_fit()
}

/// 基于最小二乘法拟合 n 次多项式曲线.
///
/// 参数与返回值同 [`polynomial_f64`].
pub fn polynomial_f32(
    x: ArrayView1<f32>,
    y: ArrayView1<f32>,
    degree: u32,
) -> CalcResult<Polynomial<f32>> {
    polynomial::PolyImp::<f32>::new(x.view(), y.view(), degree)?.make_fit()
}

/// 最小二乘直线拟合 `y = slope * x + intercept`. 返回 `(slope, intercept)`.
#[inline]
pub fn line_f64(x: ArrayView1<f64>, y: ArrayView1<f64>) -> CalcResult<(f64, f64)> {
    let poly = polynomial_f64(x, y, 1)?;
    Ok((poly.coefficient(1), poly.coefficient(0)))
}
