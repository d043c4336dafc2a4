//! 多项式曲线.

// ref: https://blog.csdn.net/u012494154/article/details/112519550

use nalgebra::{DMatrix, DVector, RealField};
use ndarray::{Array1, ArrayView1};

use crate::error::{CalcError, CalcResult};

/// 多项式. 系数按次数升序存储, 即 `self.0[i]` 是 `x^i` 的系数.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial<T: num::Float>(Array1<T>);

impl<T: num::Float> Polynomial<T> {
    /// 多项式的次数.
    #[inline]
    pub fn degree(&self) -> usize {
        self.0.len() - 1
    }

    /// 按次数升序排列的系数.
    #[inline]
    pub fn coefficients(&self) -> ArrayView1<'_, T> {
        self.0.view()
    }

    /// `x^i` 项的系数. 超出次数时为零.
    #[inline]
    pub fn coefficient(&self, i: usize) -> T {
        self.0.get(i).copied().unwrap_or_else(T::zero)
    }

    /// Horner 法求值.
    pub fn eval(&self, x: T) -> T {
        self.0.iter().rev().fold(T::zero(), |acc, &cur| acc * x + cur)
    }
}

pub(crate) struct PolyImp<'a, T: num::Float + RealField> {
    x: ArrayView1<'a, T>,
    y: ArrayView1<'a, T>,
    degree: u32,
}

impl<'a, T: num::Float + RealField> PolyImp<'a, T> {
    /// `degree` 是多项式次数.
    pub fn new(x: ArrayView1<'a, T>, y: ArrayView1<'a, T>, degree: u32) -> CalcResult<Self> {
        assert_ne!(degree, 0, "拟合曲线的次数不能为 0");
        if x.len() != y.len() {
            return Err(CalcError::ShapeMismatch(format!(
                "{} x value(s) against {} y value(s)",
                x.len(),
                y.len()
            )));
        }
        let need = degree as usize + 1;
        if x.len() < need {
            return Err(CalcError::TooFewPoints(x.len(), need));
        }
        Ok(Self { x, y, degree })
    }

    /// 对 Vandermonde 矩阵做 SVD, 求 `V theta = y` 的最小二乘解.
    ///
    /// 数值秩不足 (自变量的不同取值过少) 时返回 `Err(CalcError::TooFewPoints)`.
    pub fn make_fit(&self) -> CalcResult<Polynomial<T>> {
        let (m, n) = (self.x.len(), self.degree as usize + 1);
        let degenerate = CalcError::TooFewPoints(m, n);

        let v_mat = self.vandermonde();
        let y = DVector::from_iterator(m, self.y.iter().copied());
        let svd = v_mat.svd(true, true);

        // 与 numpy `matrix_rank` 相同的默认容差.
        let largest = svd
            .singular_values
            .iter()
            .fold(<T as num::Zero>::zero(), |acc, &s| num::Float::max(acc, s));
        let dim = <T as num::NumCast>::from(m.max(n)).ok_or_else(|| degenerate.clone())?;
        let tol = largest * <T as num::Float>::epsilon() * dim;
        if svd.rank(tol) < n {
            return Err(degenerate);
        }

        let theta = svd.solve(&y, tol).map_err(|_| degenerate)?;
        debug_assert_eq!(theta.len(), n);
        Ok(Polynomial(theta.iter().copied().collect()))
    }

    fn vandermonde(&self) -> DMatrix<T> {
        // shape: (m, n); m = x.len(), n = self.degree + 1
        DMatrix::from_fn(self.x.len(), self.degree as usize + 1, |m, n| {
            num::Float::powi(self.x[m], n as i32)
        })
    }
}
