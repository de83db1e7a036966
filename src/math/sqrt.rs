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
use crate::dyadic::{Dyadic, bit_length, ilog2_big, sqrt_d, sqrt_rec_d};
use crate::extended::Extended;
use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

/// Square root of an approximation at `t` bits of working precision.
///
/// Strictly negative intervals are a programmer error; intervals straddling
/// zero yield `Bottom`.
pub fn sqrt_a(t: i64, a: &Approx) -> Approx {
    let (mb, m, e, s) = match a {
        Approx::Bottom => return Approx::Bottom,
        Approx::Finite { mb, m, e, s } => (*mb, m, e, *s),
    };
    let zero = Dyadic::zero();
    if a.upper() < Extended::Finite(zero.clone()) {
        panic!("sqrt_a: negative argument");
    }
    if m.is_zero() && e.is_zero() {
        return Approx::zero();
    }
    let lower = a.lower();
    let lo = lower.finite();
    if *lo < zero {
        return Approx::Bottom;
    }
    if lo.is_zero() {
        // [0, u]: bound the top endpoint alone
        let up = a.upper();
        let u = up.finite();
        let tu = (s + bit_length(&(m + e))).div_euclid(2) - t;
        let root = sqrt_d(tu, u);
        let hi = &root + &Dyadic::new(BigInt::from(2), tu);
        return Approx::end_to_approx(mb, &Extended::Finite(zero), &Extended::Finite(hi));
    }
    if a.upper() < Extended::Finite(Dyadic::one()) {
        return sqrt_rec_a(t, &a.recip());
    }
    a * &sqrt_rec_a(t, a)
}

/// Reciprocal square root at `t` bits of working precision.
pub fn sqrt_rec_a(t: i64, a: &Approx) -> Approx {
    let (mb, m, e, s) = match a {
        Approx::Bottom => return Approx::Bottom,
        Approx::Finite { mb, m, e, s } => (*mb, m, e, *s),
    };
    let zero = Dyadic::zero();
    if a.upper() <= Extended::Finite(zero.clone()) {
        panic!("sqrt_rec_a: non-positive argument");
    }
    if a.lower() <= Extended::Finite(zero) {
        return Approx::Bottom;
    }
    let val_log = s + ilog2_big(m);
    let tt = -val_log.div_euclid(2) - (t.max(4) + 2 * ERROR_BITS);
    if e.is_zero() {
        let c = a.centre().unwrap();
        let y = sqrt_rec_d(tt, &c);
        return Approx::with_error_at(&y, tt).set_mb(mb);
    }
    if a.significance() > Bits::Finite(2 * ERROR_BITS) {
        // thin: one Newton run at the midpoint, widened by the derivative
        let c = a.centre().unwrap();
        let y = sqrt_rec_d(tt, &c);
        let y3 = &(&y * &y) * &y;
        let r = Dyadic::new(e.clone(), s);
        let widen = Dyadic::new(&r.m * &y3.m.abs(), r.s + y3.s);
        return Approx::with_error_at(&y, tt).add_error(&widen).set_mb(mb);
    }
    // thick: independent endpoint runs, one ulp of guard each
    let lower = a.lower();
    let upper = a.upper();
    let ylo = sqrt_rec_d(tt, lower.finite());
    let yup = sqrt_rec_d(tt, upper.finite());
    let guard = Dyadic::new(BigInt::one(), tt);
    Approx::end_to_approx(
        mb,
        &Extended::Finite(&yup - &guard),
        &Extended::Finite(&ylo + &guard),
    )
}
