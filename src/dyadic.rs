/*
 * // Copyright (c) Radzivon Bartoshyk 5/2025. All rights reserved.
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
use num_bigint::BigInt;
use num_integer::Integer;
use num_integer::Roots;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::ops::{Add, Mul, Neg, Sub};

/// An exact dyadic rational `m * 2^s`.
///
/// The representation is not normalised: `6 * 2^0` and `3 * 2^1` compare
/// equal but keep their own mantissas.
#[derive(Clone, Debug)]
pub struct Dyadic {
    pub m: BigInt,
    pub s: i64,
}

/// Number of bits in the magnitude of `x`, 0 for zero.
pub(crate) fn bit_length(x: &BigInt) -> i64 {
    x.bits() as i64
}

/// `⌊log₂ |x|⌋` of a nonzero integer.
pub(crate) fn ilog2_big(x: &BigInt) -> i64 {
    debug_assert!(!x.is_zero(), "ilog2 of zero");
    x.bits() as i64 - 1
}

/// `x * 2^k` for a possibly negative `k`; right shifts floor toward -inf.
pub(crate) fn shift_bigint(x: &BigInt, k: i64) -> BigInt {
    if k >= 0 {
        x << (k as usize)
    } else {
        x >> ((-k) as usize)
    }
}

/// `⌈x / 2^k⌉` for `x >= 0` and `k >= 0`.
pub(crate) fn ceil_shr(x: &BigInt, k: i64) -> BigInt {
    debug_assert!(!x.is_negative() && k >= 0);
    if k == 0 {
        return x.clone();
    }
    (x + ((BigInt::one() << (k as usize)) - 1i32)) >> (k as usize)
}

/// `x / 2^k` rounded to nearest with ties toward +inf; exactness flag is
/// false when low bits were discarded.
pub(crate) fn round_shr(x: &BigInt, k: i64) -> (BigInt, bool) {
    debug_assert!(k >= 0);
    if k == 0 {
        return (x.clone(), true);
    }
    let exact = x.is_zero() || x.trailing_zeros().unwrap_or(0) >= k as u64;
    let mut q = x >> (k as usize);
    if x.bit(k as u64 - 1) {
        q += 1;
    }
    (q, exact)
}

/// `n / d` rounded to nearest for `d > 0`, ties toward +inf.
pub(crate) fn rounded_div(n: &BigInt, d: &BigInt) -> BigInt {
    debug_assert!(d.is_positive(), "rounded_div: non-positive divisor");
    let (q, r) = n.div_mod_floor(d);
    if &(&r << 1usize) >= d { q + 1 } else { q }
}

impl Dyadic {
    #[inline]
    pub fn new(m: BigInt, s: i64) -> Dyadic {
        Dyadic { m, s }
    }

    #[inline]
    pub fn zero() -> Dyadic {
        Dyadic::new(BigInt::zero(), 0)
    }

    #[inline]
    pub fn one() -> Dyadic {
        Dyadic::new(BigInt::one(), 0)
    }

    /// Exact multiplication by `2^k`.
    #[inline]
    pub fn shift(&self, k: i64) -> Dyadic {
        Dyadic::new(self.m.clone(), self.s + k)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.m.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.m.is_positive()
    }

    pub fn abs(&self) -> Dyadic {
        Dyadic::new(self.m.abs(), self.s)
    }

    /// Nearest double; overflowing exponents saturate to infinities.
    pub fn to_f64(&self) -> f64 {
        if self.m.is_zero() {
            return 0.0;
        }
        let bl = bit_length(&self.m);
        let drop = (bl - 53).max(0);
        let top = shift_bigint(&self.m, -drop).to_f64().unwrap_or(0.0);
        let exp = self.s + drop;
        let exp = exp.clamp(-1100, 1100) as i32;
        top * 2f64.powi(exp)
    }

    fn cmp_dyadic(&self, other: &Dyadic) -> Ordering {
        let r = self.s.min(other.s);
        let a = shift_bigint(&self.m, self.s - r);
        let b = shift_bigint(&other.m, other.s - r);
        a.cmp(&b)
    }
}

impl PartialEq for Dyadic {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_dyadic(other) == Ordering::Equal
    }
}

impl Eq for Dyadic {}

impl PartialOrd for Dyadic {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp_dyadic(other))
    }
}

impl Ord for Dyadic {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_dyadic(other)
    }
}

impl Display for Dyadic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}*2^{}", self.m, self.s)
    }
}

impl Add for &Dyadic {
    type Output = Dyadic;

    fn add(self, rhs: &Dyadic) -> Dyadic {
        let r = self.s.min(rhs.s);
        Dyadic::new(
            shift_bigint(&self.m, self.s - r) + shift_bigint(&rhs.m, rhs.s - r),
            r,
        )
    }
}

impl Add for Dyadic {
    type Output = Dyadic;

    fn add(self, rhs: Dyadic) -> Dyadic {
        &self + &rhs
    }
}

impl Sub for &Dyadic {
    type Output = Dyadic;

    fn sub(self, rhs: &Dyadic) -> Dyadic {
        let r = self.s.min(rhs.s);
        Dyadic::new(
            shift_bigint(&self.m, self.s - r) - shift_bigint(&rhs.m, rhs.s - r),
            r,
        )
    }
}

impl Sub for Dyadic {
    type Output = Dyadic;

    fn sub(self, rhs: Dyadic) -> Dyadic {
        &self - &rhs
    }
}

impl Mul for &Dyadic {
    type Output = Dyadic;

    fn mul(self, rhs: &Dyadic) -> Dyadic {
        Dyadic::new(&self.m * &rhs.m, self.s + rhs.s)
    }
}

impl Mul for Dyadic {
    type Output = Dyadic;

    fn mul(self, rhs: Dyadic) -> Dyadic {
        &self * &rhs
    }
}

impl Neg for Dyadic {
    type Output = Dyadic;

    fn neg(self) -> Dyadic {
        Dyadic::new(-self.m, self.s)
    }
}

impl Neg for &Dyadic {
    type Output = Dyadic;

    fn neg(self) -> Dyadic {
        Dyadic::new(-&self.m, self.s)
    }
}

/// Largest `n * 2^t` with `(n * 2^t)^2 <= x`, up to 2 ulp slack from the
/// truncation of `x` itself.
pub fn sqrt_d(t: i64, x: &Dyadic) -> Dyadic {
    assert!(!x.m.is_negative(), "sqrt_d: negative operand");
    if x.m.is_zero() {
        return Dyadic::new(BigInt::zero(), t);
    }
    let n = shift_bigint(&x.m, x.s - 2 * t).sqrt();
    Dyadic::new(n, t)
}

/// Division at resolution `2^t`, error at most half an ulp.
pub fn div_d(t: i64, a: &Dyadic, b: &Dyadic) -> Dyadic {
    assert!(!b.m.is_zero(), "div_d: division by zero");
    let k = a.s - b.s - t;
    let (mut n, mut d) = if k >= 0 {
        (&a.m << (k as usize), b.m.clone())
    } else {
        (a.m.clone(), &b.m << ((-k) as usize))
    };
    if d.is_negative() {
        n = -n;
        d = -d;
    }
    Dyadic::new(rounded_div(&n, &d), t)
}

/// Reciprocal square root of a positive dyadic by Newton iteration.
///
/// The starting value is sampled from double precision on the operand
/// scaled into `[1, 4)`; each iteration doubles the working precision.
/// The result satisfies `|y - x^(-1/2)| <= 2^(t-4)`.
pub fn sqrt_rec_d(t: i64, x: &Dyadic) -> Dyadic {
    assert!(x.m.is_positive(), "sqrt_rec_d: operand must be positive");
    let b = ilog2_big(&x.m);
    let k = x.s + b;
    let h = k.div_euclid(2);
    // v = x / 4^h lies in [1, 4); z = v^(-1/2) in (1/2, 1].
    let bl = b + 1;
    let drop = (bl - 53).max(0);
    let top = shift_bigint(&x.m, -drop).to_f64().unwrap();
    let vf = top * 2f64.powi((x.s - 2 * h + drop) as i32);
    let z0 = 1.0 / vf.sqrt();

    let target = (-t - h + 8).max(52);
    let mut p: i64 = 52;
    let mut z = BigInt::from((z0 * 2f64.powi(52)) as i64);
    while p < target {
        let pn = (2 * p - 10).min(target);
        let q = pn + 6;
        let v = shift_bigint(&x.m, x.s - 2 * h + q);
        let z2 = &z * &z;
        let vz2 = shift_bigint(&(v * z2), -(q + 2 * p - (pn + 2)));
        let r = (BigInt::from(3) << ((pn + 2) as usize)) - vz2;
        z = shift_bigint(&(&z * r), -(p + 3));
        p = pn;
    }
    Dyadic::new(z, -p - h)
}

/// `atanh x` of a dyadic `|x| < 1/2` at resolution `2^t`, error below
/// `2^(t-3)`, always an underestimate in magnitude.
pub fn atanh_d(t: i64, x: &Dyadic) -> Dyadic {
    debug_assert!(
        x.abs() < Dyadic::new(BigInt::one(), -1),
        "atanh_d: operand out of range"
    );
    let guard = 16 + bit_length(&BigInt::from((-t).max(1)));
    let p = (-t).max(1) + guard;
    let p = p.max(-x.s);
    let neg = x.m.is_negative();
    let ax = shift_bigint(&x.m.abs(), x.s + p);
    let x2 = shift_bigint(&(&ax * &ax), -p);
    let mut pow = ax.clone();
    let mut sum = ax;
    let mut n: u64 = 1;
    loop {
        pow = shift_bigint(&(pow * &x2), -p);
        if pow.is_zero() {
            break;
        }
        sum += &pow / (2 * n + 1);
        n += 1;
    }
    Dyadic::new(if neg { -sum } else { sum }, -p)
}

/// `ln 2` at resolution `2^t` via `2 * atanh(1/3)`, error below `2^(t-3)`.
pub fn ln2_d(t: i64) -> Dyadic {
    let guard = 16 + bit_length(&BigInt::from((-t).max(1)));
    let p = (-t).max(1) + guard;
    let mut pow: BigInt = (BigInt::one() << (p as usize)) / 3;
    let mut sum = BigInt::zero();
    let mut n: u64 = 0;
    while !pow.is_zero() {
        sum += &pow / (2 * n + 1);
        pow /= 9;
        n += 1;
    }
    Dyadic::new(sum << 1usize, -p)
}

fn atan_recip(p: i64, k: u64) -> BigInt {
    let mut pow: BigInt = (BigInt::one() << (p as usize)) / k;
    let k2 = k * k;
    let mut sum = BigInt::zero();
    let mut n: u64 = 0;
    while !pow.is_zero() {
        let term = &pow / (2 * n + 1);
        if n % 2 == 0 {
            sum += term;
        } else {
            sum -= term;
        }
        pow /= k2;
        n += 1;
    }
    sum
}

/// π at resolution `2^t` by Machin's formula
/// `π = 16 atan(1/5) - 4 atan(1/239)`, error below `2^(t-3)`.
pub fn pi_machin_d(t: i64) -> Dyadic {
    let guard = 16 + bit_length(&BigInt::from((-t).max(1)));
    let p = (-t).max(1) + guard;
    let sum = (atan_recip(p, 5) << 4usize) - (atan_recip(p, 239) << 2usize);
    Dyadic::new(sum, -p)
}

/// π at resolution `2^t` by Borwein's quartically convergent iteration,
/// error below `2^(t-2)`.
pub fn pi_borwein_d(t: i64) -> Dyadic {
    let p = (-t).max(8) + 64;
    let one: BigInt = BigInt::one() << (p as usize);
    let fmul = |a: &BigInt, b: &BigInt| -> BigInt { (a * b) >> (p as usize) };
    let fdiv = |a: &BigInt, b: &BigInt| -> BigInt { rounded_div(&(a << (p as usize)), b) };
    let fsqrt = |a: &BigInt| -> BigInt { (a << (p as usize)).sqrt() };

    let sqrt2 = fsqrt(&(BigInt::from(2) << (p as usize)));
    let mut y: BigInt = &sqrt2 - &one;
    let mut a: BigInt = (BigInt::from(6) << (p as usize)) - (&sqrt2 << 2usize);
    let iters = 64 - (p as u64).leading_zeros() as i64 + 2;
    for k in 0..iters {
        let y2 = fmul(&y, &y);
        let y4 = fmul(&y2, &y2);
        let r4 = fsqrt(&fsqrt(&(&one - &y4)));
        y = fdiv(&(&one - &r4), &(&one + &r4));
        let onep = &one + &y;
        let onep2 = fmul(&onep, &onep);
        let p4 = fmul(&onep2, &onep2);
        let corr = fmul(&y, &(&(&one + &y) + &fmul(&y, &y)));
        a = fmul(&a, &p4) - (corr << ((2 * k + 3) as usize));
    }
    Dyadic::new(fdiv(&one, &a), -p)
}
