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
use crate::dyadic::{Dyadic, ilog2_big};
use crate::extended::Extended;
use crate::math::series::{abpq, taylor_a};
use crate::math::sqrt::sqrt_a;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

fn odd_recips(res: i64) -> impl Iterator<Item = Approx> {
    (0u64..).map(move |n| {
        Approx::from_bigint(BigInt::from(2 * n + 1))
            .set_mb(res)
            .recip()
    })
}

fn half_angle(res: i64, one: &Approx, x: &Approx) -> Approx {
    let den = one + &sqrt_a(res + ERROR_BITS, &(one + &x.sqr()));
    (x / &den).bound_error_term()
}

/// Arc tangent at `res` bits of working precision, by the half-angle
/// reduction `atan x = 2 atan(x / (1 + sqrt(1 + x²)))` and the odd series.
pub fn atan_a(res: i64, a: &Approx) -> Approx {
    if a.is_bottom() {
        return Approx::Bottom;
    }
    let res = res.max(8);
    let r = match a.significance() {
        Bits::Finite(x) => res.min(x.max(4)),
        _ => res,
    };
    let k = ((r as u64).isqrt() as i64 / 2).clamp(0, 2);
    let one = Approx::one().set_mb(res + 2 * ERROR_BITS);
    let mut x = a.set_mb(res + 2 * ERROR_BITS);
    let mut applied = 0i64;
    for _ in 0..k {
        x = half_angle(res, &one, &x);
        applied += 1;
    }
    // keep the series ratio under control for arguments the planned
    // reduction count left too large
    let half = Dyadic::new(BigInt::one(), -1);
    let mut extra = 0;
    while extra < 2 {
        match x.abs().upper() {
            Extended::Finite(u) if u > half => {
                x = half_angle(res, &one, &x);
                applied += 1;
                extra += 1;
            }
            _ => break,
        }
    }
    if x.is_bottom() {
        return Approx::Bottom;
    }
    if let Extended::Finite(u) = x.abs().upper() {
        if u > Dyadic::new(BigInt::from(3), -2) {
            // a wide interval that no reduction can shrink; atan is
            // bounded by ±π/2 regardless
            return Approx::Finite {
                mb: a.mbound().max(2),
                m: BigInt::zero(),
                e: BigInt::from(2),
                s: 0,
            };
        }
    }
    let t = &x * &taylor_a(res + ERROR_BITS, odd_recips(res + ERROR_BITS), &(-&x.sqr()));
    t.scale(applied).bound_error_term()
}

/// Binary splitting evaluation of the arc tangent series for exact dyadic
/// arguments below one half, kept for very high precision work.
pub fn atan_binary_splitting_a(res: i64, a: &Approx) -> Approx {
    let (mb, m, e, s) = match a {
        Approx::Bottom => return Approx::Bottom,
        Approx::Finite { mb, m, e, s } => (*mb, m, e, *s),
    };
    if !e.is_zero() {
        let lo = Approx::from_dyadic_mb(mb, a.lower().finite());
        let up = Approx::from_dyadic_mb(mb, a.upper().finite());
        return atan_binary_splitting_a(res, &lo)
            .union_a(&atan_binary_splitting_a(res, &up))
            .bound_error_term();
    }
    if m.is_zero() {
        return Approx::zero();
    }
    let lg = s + ilog2_big(m);
    if lg >= -1 {
        return atan_a(res, a);
    }
    let per = (-2 * lg - 1).max(1);
    let n = (res / per + 3).max(2) as u64;
    let m2 = -(m * m);
    let shift = (-2 * s) as usize;
    let one_f = |_: u64| BigInt::one();
    let b_f = |k: u64| BigInt::from(2 * k + 1);
    let p_f = |k: u64| if k == 0 { BigInt::one() } else { m2.clone() };
    let q_f = |k: u64| {
        if k == 0 {
            BigInt::one()
        } else {
            BigInt::one() << shift
        }
    };
    let tup = abpq(&one_f, &b_f, &p_f, &q_f, 0, n);
    let ratio = BigRational::new(tup.t, &tup.b * &tup.q);
    let v = Approx::to_approx(res + 4, &ratio)
        .add_error(&Dyadic::new(BigInt::one(), -(res + 1)));
    (&Approx::from_dyadic_mb(res + 4, &Dyadic::new(m.clone(), s)) * &v).bound_error_term()
}
