/*
 * // Copyright (c) Radzivon Bartoshyk 6/2025. All rights reserved.
 * //
 * // Redistribution and use in source and binary forms, with or without modification,
 * // are permitted provided that the following conditions are met:
 * //
 * // 1.  Redistributions of source code must retain the above copyright notice, this
 * // list of conditions and the following disclaimer.
 * //
 * // 2.  Redistributions in binary form must reproduce the above copyright notice,
 * // this list of conditions and the following disclaimer in the documentation
 * // and/or other materials provided with the distribution.
 * //
 * // 3.  Neither the name of the copyright holder nor the names of its
 * // contributors may be used to endorse or promote products derived from
 * // this software without specific prior written permission.
 * //
 * // THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * // AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * // IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * // DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * // FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * // DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * // SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * // CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * // OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * // OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
use crate::approx::Approx;
use crate::dyadic::ceil_shr;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};

/// Result of a binary splitting pass: the partial sum over the processed
/// index range is `t / (b * q)`.
pub struct SeriesTuple {
    pub p: BigInt,
    pub q: BigInt,
    pub b: BigInt,
    pub t: BigInt,
}

/// Widens the radius of a truncated partial sum so it covers the first
/// omitted term plus one ulp. Sound for series whose terms keep shrinking
/// by at least a factor of two.
pub fn fudge(partial: &Approx, next: &Approx) -> Approx {
    match (partial, next) {
        (
            Approx::Finite { mb, m, e, s },
            Approx::Finite {
                m: m2, e: e2, s: s2, ..
            },
        ) => {
            let mag = m2.abs() + e2;
            let extra = if s2 >= s {
                mag << ((s2 - s) as usize)
            } else {
                ceil_shr(&mag, s - s2)
            };
            Approx::Finite {
                mb: *mb,
                m: m.clone(),
                e: e + extra + 1i32,
                s: *s,
            }
        }
        _ => Approx::Bottom,
    }
}

fn nonzero_centred(a: &Approx) -> bool {
    match a {
        Approx::Bottom => false,
        Approx::Finite { m, .. } => !m.is_zero(),
    }
}

/// Sums `a_n / q_n` with interval numerators and integer denominators.
/// Terms are accumulated while they stay non-zero at `res` bits; the first
/// vanishing term pays for the tail via [`fudge`].
pub fn taylor(res: i64, terms: impl Iterator<Item = (Approx, BigInt)>) -> Approx {
    let cap = (4 * res.max(1) + 64) as usize;
    let mut sum = Approx::zero();
    for (i, (a, q)) in terms.enumerate() {
        if i > cap || a.is_bottom() || q.is_zero() {
            return Approx::Bottom;
        }
        let term = a.div_by_int(&q, res).limit_and_bound(res);
        if term.is_bottom() {
            return Approx::Bottom;
        }
        if nonzero_centred(&term) {
            sum = (&sum + &term).bound_error_term();
        } else {
            return fudge(&sum, &term);
        }
    }
    sum
}

/// Sums `c_n * x^n` with the truncation rule of [`taylor`].
pub fn taylor_a(
    res: i64,
    coeffs: impl Iterator<Item = Approx>,
    x: &Approx,
) -> Approx {
    if x.is_bottom() {
        return Approx::Bottom;
    }
    let cap = (4 * res.max(1) + 64) as usize;
    let mut sum = Approx::zero();
    for (i, (c, xp)) in coeffs.zip(x.powers()).enumerate() {
        let term = (&c * &xp).limit_and_bound(res);
        if i > cap || term.is_bottom() {
            return Approx::Bottom;
        }
        if nonzero_centred(&term) {
            sum = (&sum + &term).bound_error_term();
        } else {
            return fudge(&sum, &term);
        }
    }
    sum
}

fn abpq_single(
    a: &dyn Fn(u64) -> BigInt,
    b: &dyn Fn(u64) -> BigInt,
    p: &dyn Fn(u64) -> BigInt,
    q: &dyn Fn(u64) -> BigInt,
    k: u64,
) -> SeriesTuple {
    let pk = p(k);
    SeriesTuple {
        t: a(k) * &pk,
        p: pk,
        q: q(k),
        b: b(k),
    }
}

fn abpq_combine(l: SeriesTuple, r: SeriesTuple) -> SeriesTuple {
    SeriesTuple {
        t: &r.b * &r.q * &l.t + &l.b * &l.p * &r.t,
        p: &l.p * &r.p,
        q: &l.q * &r.q,
        b: &l.b * &r.b,
    }
}

/// Binary splitting over the half-open range `[n1, n2)` of the series with
/// term `k` equal to `(a_k / b_k) * (p_{n1}..p_k) / (q_{n1}..q_k)`.
/// The sum of the range is `t / (b * q)` of the returned tuple.
pub fn abpq(
    a: &dyn Fn(u64) -> BigInt,
    b: &dyn Fn(u64) -> BigInt,
    p: &dyn Fn(u64) -> BigInt,
    q: &dyn Fn(u64) -> BigInt,
    n1: u64,
    n2: u64,
) -> SeriesTuple {
    debug_assert!(n1 < n2, "abpq: empty range");
    let len = n2 - n1;
    if len == 1 {
        return abpq_single(a, b, p, q, n1);
    }
    if len <= 5 {
        let mut acc = abpq_single(a, b, p, q, n1);
        for k in n1 + 1..n2 {
            acc = abpq_combine(acc, abpq_single(a, b, p, q, k));
        }
        return acc;
    }
    let m = (n1 + n2 + 1) / 2;
    abpq_combine(abpq(a, b, p, q, n1, m), abpq(a, b, p, q, m, n2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approx::Bits;
    use num_bigint::BigInt;
    use num_rational::BigRational;
    use num_traits::{One, Zero};

    #[test]
    fn taylor_exp_of_one() {
        // e = sum 1/n!
        let one = Approx::one();
        let terms = (0u64..).scan(BigInt::one(), |fact, n| {
            if n > 0 {
                *fact *= n;
            }
            Some((one.clone(), fact.clone()))
        });
        let s = taylor(120, terms);
        let lo = s.lower().finite().to_f64();
        let hi = s.upper().finite().to_f64();
        assert!(lo <= std::f64::consts::E && std::f64::consts::E <= hi);
        assert!(s.precision() > Bits::Finite(100), "too coarse: {:?}", s.precision());
    }

    #[test]
    fn taylor_a_geometric() {
        // 1/(1-x) at x = 1/4 exactly
        let x = Approx::approx_auto_mb(BigInt::one(), BigInt::zero(), -2);
        let coeffs = std::iter::repeat_with(Approx::one);
        let s = taylor_a(100, coeffs, &x);
        let lo = s.lower().finite().to_f64();
        let hi = s.upper().finite().to_f64();
        assert!(lo <= 4.0 / 3.0 && 4.0 / 3.0 <= hi, "Invalid result {}", s);
    }

    #[test]
    fn fudge_covers_tail() {
        let sum = Approx::approx_auto_mb(BigInt::from(100), BigInt::from(1), -4);
        let next = Approx::approx_auto_mb(BigInt::from(3), BigInt::from(1), -6);
        let f = fudge(&sum, &next);
        assert!(sum.better(&f));
        let widened = f.radius().finite().to_f64();
        assert!(widened >= 1.0 / 16.0 + 4.0 / 64.0, "Invalid result {}", widened);
    }

    #[test]
    fn abpq_plain_sum() {
        // sum_{k=0}^{9} 1/k! with a=b=1, p=1, q_0=1, q_k=k
        let a = |_: u64| BigInt::one();
        let b = |_: u64| BigInt::one();
        let p = |_: u64| BigInt::one();
        let q = |k: u64| if k == 0 { BigInt::one() } else { BigInt::from(k) };
        let tup = abpq(&a, &b, &p, &q, 0, 10);
        let sum = BigRational::new(tup.t, tup.b * tup.q);
        let expected: f64 = (0..10).map(|k| 1.0 / (1..=k).product::<u64>() as f64).sum();
        let got = sum.numer().to_string().parse::<f64>().unwrap()
            / sum.denom().to_string().parse::<f64>().unwrap();
        assert!((got - expected).abs() < 1e-12, "Invalid result {}", got);
    }
}
