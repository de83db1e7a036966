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
use crate::approx::{Approx, Bits};
use crate::defaults::ERROR_BITS;
use crate::dyadic::{Dyadic, ilog2_big, ln2_d, shift_bigint, atanh_d};
use crate::extended::Extended;
use crate::math::pi::pi_a;
use crate::math::sqrt::sqrt_a;
use num_bigint::BigInt;
use num_traits::{One, Zero};

/// Threshold above which the AGM algorithm replaces the atanh series.
const AGM_CUTOFF: i64 = 1000;

/// Natural logarithm of an approximation.
///
/// Strictly non-positive intervals are a programmer error; intervals
/// reaching zero from above yield `Bottom`.
pub fn log_a(a: &Approx) -> Approx {
    match a {
        Approx::Bottom => Approx::Bottom,
        Approx::Finite { .. } => {
            let zero = Dyadic::zero();
            if a.upper() <= Extended::Finite(zero.clone()) {
                panic!("log_a: non-positive argument");
            }
            if a.lower() <= Extended::Finite(zero) {
                return Approx::Bottom;
            }
            if a.mbound() < AGM_CUTOFF {
                log_internal(a)
            } else {
                log_agm_a(-a.mbound() - 10, a)
            }
        }
    }
}

/// `ln 2` with error below `2^t`.
pub fn log2_a(t: i64) -> Approx {
    let d = ln2_d(t - 2);
    Approx::with_error_at(&d, t)
}

/// Range reduction into `[2/3, 4/3]` followed by
/// `log x = 2 atanh((x-1)/(x+1))` on the midpoint, with the interval
/// thickness carried as an additive error term.
pub fn log_internal(a: &Approx) -> Approx {
    let (mb, m, e, s) = match a {
        Approx::Bottom => return Approx::Bottom,
        Approx::Finite { mb, m, e, s } => ((*mb).max(2), m, e, *s),
    };
    if a.upper() < Extended::Finite(Dyadic::one()) {
        return -log_internal(&a.recip());
    }
    if !e.is_zero() && a.significance() <= Bits::Finite(3 * ERROR_BITS) {
        // wide operand: evaluate the monotone endpoints instead
        let lo = Approx::from_dyadic_mb(mb, a.lower().finite());
        let up = Approx::from_dyadic_mb(mb, a.upper().finite());
        return log_internal(&lo).union_a(&log_internal(&up)).bound_error_term();
    }
    let r = s + ilog2_big(&(m * 3)) - 1;
    let x = a.scale(-r);
    let y = &(&x - &Approx::one()) / &(&x + &Approx::one());
    if y.is_bottom() {
        return Approx::Bottom;
    }
    let t = -(mb + 2 * ERROR_BITS + 10);
    let c = y.centre().unwrap();
    let ct = Dyadic::new(shift_bigint(&c.m, c.s - (t - 2)), t - 2);
    let v = atanh_d(t, &ct);
    let rho = y.radius();
    let rho = rho.finite();
    let mut res = Approx::with_error_at(&v.shift(1), t + 2)
        .add_error(&Dyadic::new(&rho.m * 3, rho.s));
    if r != 0 {
        res = &res + &(&Approx::from_i64(r) * &log2_a(t - 2));
    }
    res.set_mb(mb).bound_error_term()
}

/// Interval arithmetic-geometric mean, iterated until the gap between the
/// two legs drops below `2^t`.
pub fn agm_a(t: i64, a: &Approx, b: &Approx) -> Approx {
    if a.is_bottom() || b.is_bottom() {
        return Approx::Bottom;
    }
    let bits = (-t).max(16);
    let mbw = (bits + 20).max(a.mbound().max(b.mbound()));
    let lim = Dyadic::new(BigInt::one(), t);
    let mut x = a.set_mb(mbw);
    let mut y = b.set_mb(mbw);
    for _ in 0..(4 * bits + 64) {
        let diff = (&x - &y).abs();
        match diff.upper() {
            Extended::Finite(d) if d <= lim => break,
            Extended::Finite(_) => {}
            _ => return Approx::Bottom,
        }
        let nx = (&x + &y).scale(-1).bound_error_term();
        let ny = sqrt_a(bits + 10, &(&x * &y)).bound_error_term();
        x = nx;
        y = ny;
    }
    x.union_a(&y)
}

/// `ln x = π / (2 AGM(1, 4/(x 2^j))) - j ln 2` with `j` pushing the scaled
/// argument far enough out that the asymptotic correction stays below the
/// target resolution.
fn agm_ln_core(t: i64, x: &Approx) -> Approx {
    let bits = -t;
    let lo = match x.lower() {
        Extended::Finite(d) if d.is_positive() => d,
        _ => return Approx::Bottom,
    };
    let ilx = lo.s + ilog2_big(&lo.m);
    let h = bits / 2 + 12;
    let j = h - ilx;
    let xb = x.scale(j).set_mb(bits + 40);
    let z = xb.recip().scale(2);
    let one = Approx::one().set_mb(bits + 40);
    let g = agm_a(t - 10, &one, &z);
    let p = pi_a(bits + 10);
    let ln_big = &p / &g.scale(1);
    let res = &ln_big - &(&Approx::from_i64(j) * &log2_a(t - 6));
    res.add_error(&Dyadic::new(BigInt::one(), t)).bound_error_term()
}

/// AGM logarithm specialised to arguments above 2.
pub fn ln_large(t: i64, x: &Approx) -> Approx {
    agm_ln_core(t, x)
}

/// AGM logarithm specialised to arguments below 3.
pub fn ln_small(t: i64, x: &Approx) -> Approx {
    agm_ln_core(t, x)
}

/// AGM-based logarithm for high precision work.
pub fn log_agm_a(t: i64, x: &Approx) -> Approx {
    if x.is_bottom() {
        return Approx::Bottom;
    }
    let two = Dyadic::new(BigInt::from(2), 0);
    let three = Dyadic::new(BigInt::from(3), 0);
    match x.lower() {
        Extended::Finite(lo) if lo > two => ln_large(t, x),
        _ => match x.upper() {
            Extended::Finite(up) if up < three => ln_small(t, x),
            _ => ln_large(t, x),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(a: &Approx, v: f64) -> bool {
        let tol = 1e-12 * (1.0 + v.abs());
        let lo = a.lower().finite().to_f64();
        let hi = a.upper().finite().to_f64();
        lo - tol <= v && v <= hi + tol
    }

    #[test]
    fn log_of_two() {
        let a = Approx::from_i64(2).set_mb(120);
        let r = log_a(&a);
        assert!(contains(&r, std::f64::consts::LN_2), "Invalid result {}", r);
        assert!(r.precision() > Bits::Finite(90), "too coarse: {:?}", r.precision());
    }

    #[test]
    fn log_of_ten() {
        let a = Approx::from_i64(10).set_mb(120);
        let r = log_a(&a);
        assert!(contains(&r, 10f64.ln()), "Invalid result {}", r);
    }

    #[test]
    fn log_below_one_is_negative() {
        let a = Approx::Finite {
            mb: 120,
            m: BigInt::one(),
            e: BigInt::zero(),
            s: -3,
        }; // 1/8
        let r = log_a(&a);
        assert!(contains(&r, 0.125f64.ln()), "Invalid result {}", r);
        assert!(r.upper().finite().to_f64() < 0.0);
    }

    #[test]
    fn log_of_thick_interval() {
        let a = Approx::Finite {
            mb: 100,
            m: BigInt::from(3),
            e: BigInt::one(),
            s: 0,
        }; // [2, 4]
        let r = log_a(&a);
        assert!(contains(&r, 2f64.ln()));
        assert!(contains(&r, 4f64.ln()));
        assert!(contains(&r, 3f64.ln()));
    }

    #[test]
    fn log_reaching_zero_is_bottom() {
        let a = Approx::Finite {
            mb: 40,
            m: BigInt::one(),
            e: BigInt::one(),
            s: 0,
        }; // [0, 2]
        assert!(log_a(&a).is_bottom());
    }

    #[test]
    #[should_panic(expected = "non-positive")]
    fn log_of_negative_panics() {
        let a = Approx::Finite {
            mb: 40,
            m: BigInt::from(-4),
            e: BigInt::one(),
            s: 0,
        };
        let _ = log_a(&a);
    }

    #[test]
    fn log2_constant() {
        let l = log2_a(-80);
        assert!(contains(&l, std::f64::consts::LN_2), "Invalid result {}", l);
    }

    #[test]
    fn agm_of_one_and_two() {
        // AGM(1, 2) = 1.45679103104690686...
        let one = Approx::one().set_mb(100);
        let two = Approx::from_i64(2).set_mb(100);
        let g = agm_a(-90, &one, &two);
        assert!(contains(&g, 1.456791031046906869), "Invalid result {}", g);
    }

    #[test]
    fn agm_log_matches_series_log() {
        let a = Approx::from_i64(7).set_mb(200);
        let series = log_internal(&a);
        let agm = log_agm_a(-200, &a);
        assert!(series.consistent_a(&agm), "{} vs {}", series, agm);
        assert!(contains(&agm, 7f64.ln()), "Invalid result {}", agm);
        let small = Approx::Finite {
            mb: 200,
            m: BigInt::one(),
            e: BigInt::zero(),
            s: -1,
        };
        let agm_small = log_agm_a(-200, &small);
        assert!(contains(&agm_small, 0.5f64.ln()), "Invalid result {}", agm_small);
    }
}
