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
use crate::dyadic::{Dyadic, ilog2_big};
use crate::math::series::{abpq, taylor_a};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

/// Exponential of an approximation; the range-reduced Taylor evaluation is
/// the default algorithm.
pub fn exp_a(a: &Approx) -> Approx {
    exp_taylor_a(a)
}

fn factorial_recips(mbp: i64) -> impl Iterator<Item = Approx> {
    (0u64..).scan(BigInt::one(), move |fact, n| {
        if n > 0 {
            *fact *= n;
        }
        Some(Approx::from_bigint(fact.clone()).set_mb(mbp).recip())
    })
}

fn exp_endpoints(a: &Approx, f: impl Fn(&Approx) -> Approx) -> Approx {
    let mb = a.mbound();
    let lo = Approx::from_dyadic_mb(mb, a.lower().finite());
    let up = Approx::from_dyadic_mb(mb, a.upper().finite());
    f(&lo).union_a(&f(&up))
}

/// Taylor evaluation after scaling the argument below `2^(-sqrt(mb))`,
/// squaring back afterwards.
pub fn exp_taylor_a(a: &Approx) -> Approx {
    let (mb, m, e, s) = match a {
        Approx::Bottom => return Approx::Bottom,
        Approx::Finite { mb, m, e, s } => ((*mb).max(2), m, e, *s),
    };
    if !e.is_zero() {
        return exp_endpoints(a, exp_taylor_a).bound_error_term();
    }
    if m.is_zero() {
        return Approx::one();
    }
    if m.is_negative() {
        return exp_taylor_a(&-a).set_mb(mb + 2).recip();
    }
    let il = ilog2_big(m);
    let s1 = s + il;
    let r = (s1 + (mb.max(4) as u64).isqrt() as i64).max(0);
    let mbp = 12 * (mb + r + il + 1) / 10;
    let aa = a.scale(-r).set_mb(mbp);
    let mut v = taylor_a(mbp, factorial_recips(mbp), &aa);
    for _ in 0..r {
        v = v.sqr().bound_error_term();
    }
    v
}

/// Binary splitting evaluation of the reduced exponential series, kept for
/// very high precision work.
pub fn exp_binary_splitting_a(res: i64, a: &Approx) -> Approx {
    let (_mb, m, e, s) = match a {
        Approx::Bottom => return Approx::Bottom,
        Approx::Finite { mb, m, e, s } => (*mb, m, e, *s),
    };
    if !e.is_zero() {
        return exp_endpoints(a, |x| exp_binary_splitting_a(res, x)).bound_error_term();
    }
    if m.is_zero() {
        return Approx::one();
    }
    if m.is_negative() {
        return exp_binary_splitting_a(res, &-a).set_mb(res + 2).recip();
    }
    let il = ilog2_big(m);
    let s1 = s + il;
    let g = (res.max(16) as u64).isqrt() as i64;
    let r = (s1 + g).max(0);
    let s2 = s - r;
    let per = (-(s2 + il) - 1).max(1);
    let n = (res / per + 3).max(2) as u64;
    let shift = (-s2) as usize;
    let one_f = |_: u64| BigInt::one();
    let p_f = |k: u64| if k == 0 { BigInt::one() } else { m.clone() };
    let q_f = |k: u64| {
        if k == 0 {
            BigInt::one()
        } else {
            BigInt::from(k) << shift
        }
    };
    let tup = abpq(&one_f, &one_f, &p_f, &q_f, 0, n);
    let ratio = BigRational::new(tup.t, &tup.b * &tup.q);
    let mut v = Approx::to_approx(res + 4, &ratio)
        .add_error(&Dyadic::new(BigInt::one(), -(res + 1)))
        .set_mb(res + 4);
    for _ in 0..r {
        v = v.sqr().bound_error_term();
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approx::Bits;

    fn contains(a: &Approx, v: f64) -> bool {
        let tol = 1e-12 * (1.0 + v.abs());
        let lo = a.lower().finite().to_f64();
        let hi = a.upper().finite().to_f64();
        lo - tol <= v && v <= hi + tol
    }

    #[test]
    fn exp_of_zero_is_one() {
        assert_eq!(exp_a(&Approx::from_i64(0)), Approx::one());
    }

    #[test]
    fn exp_of_one() {
        let a = Approx::from_i64(1).set_mb(120);
        let r = exp_a(&a);
        assert!(contains(&r, std::f64::consts::E), "Invalid result {}", r);
        assert!(r.precision() > Bits::Finite(90), "too coarse: {:?}", r.precision());
    }

    #[test]
    fn exp_of_negative() {
        let a = Approx::from_i64(-2).set_mb(100);
        let r = exp_a(&a);
        assert!(contains(&r, (-2f64).exp()), "Invalid result {}", r);
    }

    #[test]
    fn exp_of_large_argument() {
        let a = Approx::from_i64(20).set_mb(120);
        let r = exp_a(&a);
        assert!(contains(&r, 20f64.exp()), "Invalid result {}", r);
    }

    #[test]
    fn exp_of_thick_interval() {
        let a = Approx::Finite {
            mb: 80,
            m: BigInt::from(3),
            e: BigInt::from(1),
            s: -1,
        }; // [1, 2]
        let r = exp_a(&a);
        assert!(contains(&r, 1f64.exp()));
        assert!(contains(&r, 2f64.exp()));
        assert!(contains(&r, 1.5f64.exp()));
    }

    #[test]
    fn binary_splitting_agrees_with_taylor() {
        let a = Approx::from_i64(1).set_mb(200);
        let t = exp_a(&a);
        let b = exp_binary_splitting_a(200, &a);
        assert!(t.consistent_a(&b), "{} vs {}", t, b);
        assert!(b.precision() > Bits::Finite(150), "too coarse: {:?}", b.precision());
        let c = Approx::Finite {
            mb: 150,
            m: BigInt::from(7),
            e: BigInt::zero(),
            s: -2,
        };
        let t2 = exp_a(&c);
        let b2 = exp_binary_splitting_a(150, &c);
        assert!(t2.consistent_a(&b2), "{} vs {}", t2, b2);
    }
}
