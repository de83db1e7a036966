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
use crate::defaults::ERROR_BITS;
use crate::dyadic::ilog2_big;
use crate::extended::Extended;
use crate::math::pi::pi_a;
use crate::math::series::taylor_a;
use num_bigint::BigInt;
use num_traits::{One, Zero};

fn odd_factorial_recips(mbp: i64) -> impl Iterator<Item = Approx> {
    (0u64..).scan(BigInt::one(), move |fact, n| {
        if n > 0 {
            *fact *= (2 * n) * (2 * n + 1);
        }
        Some(Approx::from_bigint(fact.clone()).set_mb(mbp).recip())
    })
}

/// Taylor stage of sine for arguments already inside `[-π/2, π/2]`: scale
/// down by `3^k`, sum the series, then triplicate back with
/// `sin 3x = 3 sin x - 4 sin³x`.
fn sin_red2_a(a: &Approx) -> Approx {
    let (mb, m, e, s) = match a {
        Approx::Bottom => return Approx::Bottom,
        Approx::Finite { mb, m, e, s } => ((*mb).max(2), m, e, *s),
    };
    if m.is_zero() && e.is_zero() {
        return Approx::zero();
    }
    let k = if m.is_zero() {
        0
    } else {
        (ilog2_big(m) + s + (mb as u64).isqrt() as i64).max(0)
    };
    let three_k = BigInt::from(3).pow(k as u32);
    let reduced = a.div_by_int(&three_k, mb + 2 * k + 2 * ERROR_BITS);
    let x = -&reduced.sqr();
    let t = taylor_a(mb + ERROR_BITS, odd_factorial_recips(mb + ERROR_BITS), &x);
    let mut v = &t * &reduced;
    let three = Approx::from_i64(3);
    for _ in 0..k {
        v = (&v * &(&three - &v.sqr().scale(2))).bound_error_term();
    }
    v
}

/// Sine of an approximation.
///
/// The argument is reduced modulo `2π`, folded into `[-π/2, π/2]` and fed
/// into the Taylor stage; whatever sticks out past the fold (because π is
/// itself an enclosure) is clamped against the constant bounds `±1`.
pub fn sin_a(a: &Approx) -> Approx {
    let mb = match a {
        Approx::Bottom => return Approx::Bottom,
        Approx::Finite { mb, m, e, .. } => {
            if m.is_zero() && e.is_zero() {
                return Approx::zero();
            }
            (*mb).max(2)
        }
    };
    let pi = pi_a(mb + 10);
    let half_pi = pi.scale(-1);
    let two_pi = pi.scale(1);
    let red = a.mod_a(&two_pi);
    let folded = &(&pi - &(&red - &half_pi).abs()).abs() - &half_pi;
    let lob = half_pi.lower().finite().clone();
    let pos = Extended::Finite(lob.clone());
    let neg = Extended::Finite(-&lob);
    if folded.upper() <= pos && folded.lower() >= neg {
        return sin_red2_a(&folded).bound_error_term();
    }
    let zl = folded.lower().max(neg.clone());
    let zu = folded.upper().min(pos.clone());
    if zu < zl {
        // the whole interval sits in the fold overhang
        return Approx::Finite {
            mb,
            m: BigInt::zero(),
            e: BigInt::one(),
            s: 0,
        };
    }
    let clipped = Approx::end_to_approx(mb, &zl, &zu);
    let mut res = sin_red2_a(&clipped);
    if folded.upper() > pos {
        res = res.union_a(&Approx::one());
    }
    if folded.lower() < neg {
        res = res.union_a(&(-Approx::one()));
    }
    res.bound_error_term()
}

/// Cosine via `cos x = sin(π/2 - x)`.
pub fn cos_a(a: &Approx) -> Approx {
    let mb = match a {
        Approx::Bottom => return Approx::Bottom,
        Approx::Finite { mb, .. } => (*mb).max(2),
    };
    let half_pi = pi_a(mb + 2).scale(-1);
    sin_a(&(&half_pi - a))
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
    fn sin_of_zero_is_exact() {
        assert!(sin_a(&Approx::from_i64(0)).is_exact());
    }

    #[test]
    fn sin_of_small_arguments() {
        for v in [1i64, 2, 3, -1, -2] {
            let a = Approx::from_i64(v).set_mb(100);
            let r = sin_a(&a);
            assert!(contains(&r, (v as f64).sin()), "sin({}) not in {}", v, r);
            assert!(r.precision() > Bits::Finite(60), "too coarse for {}: {:?}", v, r.precision());
        }
    }

    #[test]
    fn sin_beyond_two_pi() {
        for v in [10i64, 100, -50] {
            let a = Approx::from_i64(v).set_mb(120);
            let r = sin_a(&a);
            assert!(contains(&r, (v as f64).sin()), "sin({}) not in {}", v, r);
        }
    }

    #[test]
    fn sin_near_half_pi_hits_one() {
        // 1.5707963 ≈ π/2
        let a = Approx::Finite {
            mb: 90,
            m: BigInt::from(15707963i64),
            e: BigInt::zero(),
            s: 0,
        };
        let a = a.div_by_int(&BigInt::from(10000000i64), 90);
        let r = sin_a(&a);
        assert!(r.upper().finite().to_f64() >= 0.999999999);
        assert!(r.lower().finite().to_f64() <= 1.0);
    }

    #[test]
    fn sin_of_thick_interval() {
        let a = Approx::Finite {
            mb: 90,
            m: BigInt::from(3),
            e: BigInt::from(1),
            s: -1,
        }; // [1, 2]
        let r = sin_a(&a);
        for v in [1.0f64, 1.5, 2.0] {
            assert!(contains(&r, v.sin()), "sin({}) not in {}", v, r);
        }
    }

    #[test]
    fn cos_values() {
        let z = cos_a(&Approx::from_i64(0).set_mb(90));
        assert!(contains(&z, 1.0), "Invalid result {}", z);
        for v in [1i64, 2, 4] {
            let a = Approx::from_i64(v).set_mb(100);
            let r = cos_a(&a);
            assert!(contains(&r, (v as f64).cos()), "cos({}) not in {}", v, r);
        }
    }

    #[test]
    fn sin_squared_plus_cos_squared() {
        let a = Approx::from_i64(1).set_mb(120);
        let s = sin_a(&a);
        let c = cos_a(&a);
        let sum = &s.sqr() + &c.sqr();
        assert!(contains(&sum, 1.0), "Invalid result {}", sum);
    }
}
