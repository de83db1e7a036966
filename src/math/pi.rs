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
use crate::dyadic::{Dyadic, bit_length, ilog2_big, pi_borwein_d, pi_machin_d};
use crate::extended::Extended;
use crate::math::log::{agm_a, log2_a};
use crate::math::series::abpq;
use crate::math::sqrt::sqrt_a;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;

/// `640320³ / 24`, the `q` factor of the Chudnovsky-style recurrence.
const CHUD_Q: i64 = 10939058860032000;
/// `(640320³ / 144)`, whose square root rescales the series into π.
const CHUD_ROOT: i64 = 1823176476672000;

fn chud_a(n: u64) -> BigInt {
    BigInt::from(13591409i64) + BigInt::from(545140134i64) * n
}

fn chud_p(n: u64) -> BigInt {
    if n == 0 {
        BigInt::one()
    } else {
        let n = n as i128;
        BigInt::from(-(6 * n - 5) * (2 * n - 1) * (6 * n - 1))
    }
}

fn chud_q(n: u64) -> BigInt {
    if n == 0 {
        BigInt::one()
    } else {
        BigInt::from(n).pow(3) * CHUD_Q
    }
}

/// The lazy sequence of ever sharper π enclosures from Ramanujan-style
/// binary splitting; element `i` sums `2^i` terms of the series at
/// `21 + 47·(2^i - 1)` working bits.
pub fn pi_raw() -> impl Iterator<Item = Approx> {
    (0u32..).map(|i| {
        let terms = 1u64 << i;
        let p = 21 + 47 * (terms as i64 - 1);
        let one = |_: u64| BigInt::one();
        let tup = abpq(&chud_a, &one, &chud_p, &chud_q, 0, terms);
        let ratio = BigRational::new(tup.t, &tup.b * &tup.q);
        // the first omitted term bounds the alternating tail
        let tail = -p + 4 + bit_length(&BigInt::from(terms));
        let x = Approx::to_approx(p, &ratio)
            .add_error(&Dyadic::new(BigInt::one(), tail))
            .set_mb(p + 8);
        let root = sqrt_a(p + 8, &Approx::from_i64(CHUD_ROOT).set_mb(p + 8));
        (&root / &x).bound_error_term()
    })
}

/// First element of [`pi_raw`] with at least `t` bits of precision.
pub fn pi_a(t: i64) -> Approx {
    pi_raw()
        .find(|x| x.precision() >= Bits::Finite(t))
        .unwrap()
}

/// π from the dyadic Machin evaluation.
pub fn pi_machin_a(t: i64) -> Approx {
    Approx::with_error_at(&pi_machin_d(-t - 4), -t - 1)
}

/// π from the dyadic Borwein iteration.
pub fn pi_borwein_a(t: i64) -> Approx {
    Approx::with_error_at(&pi_borwein_d(-t - 4), -t - 2)
}

/// π to `t` bits from two AGM evaluations at the scales `x·2^j` and
/// `x·2^(j+1)`: their reciprocals differ by exactly `(2/π)·ln 2` in the
/// limit, so `π ≈ 2 ln 2 / (1/AGM₂ - 1/AGM₁)`.
pub fn pi_agm_a(t: i64, x: &Approx) -> Approx {
    let bits = t.max(64);
    let lo = match x.lower() {
        Extended::Finite(d) if d.is_positive() => d,
        _ => return Approx::Bottom,
    };
    let tt = -bits - 40;
    let ilx = lo.s + ilog2_big(&lo.m);
    let h = bits / 2 + 20;
    let j = h - ilx;
    let s1 = x.scale(j).set_mb(bits + 60);
    let s2 = s1.scale(1);
    let one = Approx::one().set_mb(bits + 60);
    let z1 = s1.recip().scale(2);
    let z2 = s2.recip().scale(2);
    let g1 = agm_a(tt, &one, &z1);
    let g2 = agm_a(tt, &one, &z2);
    let diff = &g2.recip() - &g1.recip();
    let res = &log2_a(tt).scale(1) / &diff;
    let slack = -bits - 20 + 3 * bit_length(&BigInt::from(h));
    res.add_error(&Dyadic::new(BigInt::one(), slack))
        .bound_error_term()
}
