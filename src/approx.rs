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
use crate::defaults::ERROR_BITS;
use crate::dyadic::{
    Dyadic, bit_length, ceil_shr, ilog2_big, round_shr, rounded_div, shift_bigint,
};
use crate::err::RealError;
use crate::extended::Extended;
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A bit count extended with the two infinities; `precision` of an exact
/// approximation is `PosInf`, of `Bottom` it is `NegInf`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Bits {
    NegInf,
    Finite(i64),
    PosInf,
}

/// A centred dyadic approximation of a real number.
///
/// `Finite { mb, m, e, s }` encodes the closed interval
/// `[(m-e)*2^s, (m+e)*2^s]` with `e >= 0` and the midpoint bound
/// `|m| <= 2^mb` (up to the slack of constructor normalisation).
/// `Bottom` carries no information and contains every real.
#[derive(Clone, Debug)]
pub enum Approx {
    Bottom,
    Finite { mb: i64, m: BigInt, e: BigInt, s: i64 },
}

impl Approx {
    /// Interval constructor enforcing the midpoint bit bound.
    pub fn approx_mb(mb: i64, m: BigInt, e: BigInt, s: i64) -> Approx {
        debug_assert!(!e.is_negative(), "negative radius");
        Approx::Finite { mb, m, e, s }.enforce_mb()
    }

    /// Like [`Approx::approx_mb`] with the larger of two inherited bounds.
    pub fn approx_mb2(mb1: i64, mb2: i64, m: BigInt, e: BigInt, s: i64) -> Approx {
        Approx::approx_mb(mb1.max(mb2), m, e, s)
    }

    /// Interval constructor with the minimal legal midpoint bound for the
    /// given operands.
    pub fn approx_auto_mb(m: BigInt, e: BigInt, s: i64) -> Approx {
        let g = m.abs() + &e - 1i32;
        let mb = if g.is_positive() { bit_length(&g).max(2) } else { 2 };
        Approx::approx_mb(mb, m, e, s)
    }

    /// Exact approximation of a dyadic number.
    pub fn from_dyadic(d: &Dyadic) -> Approx {
        Approx::approx_auto_mb(d.m.clone(), BigInt::zero(), d.s)
    }

    /// Exact approximation of a dyadic number with a fixed midpoint bound.
    pub fn from_dyadic_mb(mb: i64, d: &Dyadic) -> Approx {
        Approx::approx_mb(mb, d.m.clone(), BigInt::zero(), d.s)
    }

    pub fn from_bigint(i: BigInt) -> Approx {
        Approx::approx_auto_mb(i, BigInt::zero(), 0)
    }

    pub fn from_i64(i: i64) -> Approx {
        Approx::from_bigint(BigInt::from(i))
    }

    pub fn zero() -> Approx {
        Approx::from_i64(0)
    }

    pub fn one() -> Approx {
        Approx::from_i64(1)
    }

    /// A dyadic value carrying an error of at most `2^t`.
    pub(crate) fn with_error_at(d: &Dyadic, t: i64) -> Approx {
        let e = if t >= d.s {
            BigInt::one() << ((t - d.s) as usize)
        } else {
            BigInt::one()
        };
        Approx::approx_auto_mb(d.m.clone(), e, d.s)
    }

    /// The centred interval with the given extended-dyadic endpoints;
    /// `Bottom` when an endpoint is infinite or `upper < lower`.
    pub fn end_to_approx(mb: i64, lower: &Extended, upper: &Extended) -> Approx {
        let (l, u) = match (lower, upper) {
            (Extended::Finite(l), Extended::Finite(u)) => (l, u),
            _ => return Approx::Bottom,
        };
        if u < l {
            return Approx::Bottom;
        }
        let r = l.s.min(u.s);
        let a = shift_bigint(&l.m, l.s - r);
        let b = shift_bigint(&u.m, u.s - r);
        Approx::approx_mb(mb, &a + &b, b - a, r - 1)
    }

    /// Rational to approximation at resolution `2^-t`, 1 ulp of slack.
    pub fn to_approx(t: i64, r: &BigRational) -> Approx {
        let t = t.max(1);
        let m = rounded_div(&(r.numer() << (t as usize)), r.denom());
        Approx::approx_auto_mb(m, BigInt::one(), -t)
    }

    fn enforce_mb(self) -> Approx {
        match self {
            Approx::Bottom => Approx::Bottom,
            Approx::Finite { mb, m, e, s } => {
                let bl = bit_length(&m);
                if bl <= mb.max(1) {
                    return Approx::Finite { mb, m, e, s };
                }
                let k = bl - mb;
                let (m2, exact) = round_shr(&m, k);
                let e2 = ceil_shr(&e, k) + if exact { 0 } else { 1 };
                Approx::Finite {
                    mb,
                    m: m2,
                    e: e2,
                    s: s + k,
                }
            }
        }
    }

    #[inline]
    pub fn is_bottom(&self) -> bool {
        matches!(self, Approx::Bottom)
    }

    /// `true` when the approximation is a single dyadic point.
    pub fn is_exact(&self) -> bool {
        match self {
            Approx::Bottom => false,
            Approx::Finite { e, .. } => e.is_zero(),
        }
    }

    /// The midpoint bit bound; querying it on `Bottom` is a programmer
    /// error.
    pub fn mbound(&self) -> i64 {
        match self {
            Approx::Bottom => panic!("mbound of Bottom"),
            Approx::Finite { mb, .. } => *mb,
        }
    }

    pub fn lower(&self) -> Extended {
        match self {
            Approx::Bottom => Extended::NegInf,
            Approx::Finite { m, e, s, .. } => Extended::Finite(Dyadic::new(m - e, *s)),
        }
    }

    pub fn upper(&self) -> Extended {
        match self {
            Approx::Bottom => Extended::PosInf,
            Approx::Finite { m, e, s, .. } => Extended::Finite(Dyadic::new(m + e, *s)),
        }
    }

    pub fn centre(&self) -> Option<Dyadic> {
        match self {
            Approx::Bottom => None,
            Approx::Finite { m, s, .. } => Some(Dyadic::new(m.clone(), *s)),
        }
    }

    pub fn radius(&self) -> Extended {
        match self {
            Approx::Bottom => Extended::PosInf,
            Approx::Finite { e, s, .. } => Extended::Finite(Dyadic::new(e.clone(), *s)),
        }
    }

    pub fn diameter(&self) -> Extended {
        match self {
            Approx::Bottom => Extended::PosInf,
            Approx::Finite { e, s, .. } => Extended::Finite(Dyadic::new(e << 1usize, *s)),
        }
    }

    /// Sub-interval order: `self` is at least as sharp as `other`.
    pub fn better(&self, other: &Approx) -> bool {
        self.lower() >= other.lower() && self.upper() <= other.upper()
    }

    /// Correct bits after the binary point.
    pub fn precision(&self) -> Bits {
        match self {
            Approx::Bottom => Bits::NegInf,
            Approx::Finite { e, s, .. } => {
                if e.is_zero() {
                    Bits::PosInf
                } else {
                    Bits::Finite(-(s + ilog2_big(e) + 1))
                }
            }
        }
    }

    /// Correct leading bits of the midpoint.
    pub fn significance(&self) -> Bits {
        match self {
            Approx::Bottom => Bits::NegInf,
            Approx::Finite { m, e, .. } => {
                if e.is_zero() {
                    if m.is_zero() { Bits::NegInf } else { Bits::PosInf }
                } else if m.is_zero() {
                    Bits::NegInf
                } else if e.is_one() {
                    Bits::Finite(ilog2_big(m))
                } else {
                    let em1 = e - 1i32;
                    Bits::Finite(ilog2_big(m) - ilog2_big(&em1) - 1)
                }
            }
        }
    }

    /// Exact multiplication by `2^k`.
    pub fn scale(&self, k: i64) -> Approx {
        match self {
            Approx::Bottom => Approx::Bottom,
            Approx::Finite { mb, m, e, s } => Approx::Finite {
                mb: *mb,
                m: m.clone(),
                e: e.clone(),
                s: s + k,
            },
        }
    }

    /// Raises the midpoint bound to at least `l`; never lowers it.
    pub fn set_mb(&self, l: i64) -> Approx {
        match self {
            Approx::Bottom => Approx::Bottom,
            Approx::Finite { mb, m, e, s } => Approx::Finite {
                mb: (*mb).max(l),
                m: m.clone(),
                e: e.clone(),
                s: *s,
            },
        }
    }

    /// Smallest interval containing both operands; `Bottom` absorbs.
    pub fn union_a(&self, other: &Approx) -> Approx {
        if self.is_bottom() || other.is_bottom() {
            return Approx::Bottom;
        }
        let l = self.lower().min(other.lower());
        let u = self.upper().max(other.upper());
        Approx::end_to_approx(self.mbound().max(other.mbound()), &l, &u)
    }

    /// Intersection of the operands. `Bottom` is the identity here even
    /// though it is the top of the `better` order. Disjoint operands are a
    /// programmer error.
    pub fn intersection_a(&self, other: &Approx) -> Approx {
        if self.is_bottom() {
            return other.clone();
        }
        if other.is_bottom() {
            return self.clone();
        }
        let l = self.lower().max(other.lower());
        let u = self.upper().min(other.upper());
        if u < l {
            panic!("intersection_a: disjoint approximations");
        }
        Approx::end_to_approx(self.mbound().max(other.mbound()), &l, &u)
    }

    /// Whether the operands can approximate the same real.
    pub fn consistent_a(&self, other: &Approx) -> bool {
        if self.is_bottom() || other.is_bottom() {
            return true;
        }
        self.lower().max(other.lower()) <= self.upper().min(other.upper())
    }

    /// Renormalises a swollen radius down to `ERROR_BITS` ulps, widening
    /// the interval by at most one ulp of the new scale.
    pub fn bound_error_term(&self) -> Approx {
        match self {
            Approx::Bottom => Approx::Bottom,
            Approx::Finite { mb, m, e, s } => {
                if bit_length(e) <= ERROR_BITS {
                    return self.clone();
                }
                let k = bit_length(e) - ERROR_BITS;
                let (m2, exact) = round_shr(m, k);
                let e2 = ceil_shr(e, k) + if exact { 0 } else { 1 };
                Approx::Finite {
                    mb: *mb,
                    m: m2,
                    e: e2,
                    s: s + k,
                }
            }
        }
    }

    /// Forces the exponent up to at least `-l`, trading resolution for
    /// size. Always a super-interval of the operand.
    pub fn limit_size(&self, l: i64) -> Approx {
        match self {
            Approx::Bottom => Approx::Bottom,
            Approx::Finite { mb, m, e, s } => {
                if *s >= -l {
                    return self.clone();
                }
                let k = -l - s;
                let (m2, exact) = round_shr(m, k);
                let e2 = ceil_shr(e, k) + if exact { 0 } else { 1 };
                Approx::Finite {
                    mb: (*mb - k).max(2),
                    m: m2,
                    e: e2,
                    s: -l,
                }
            }
        }
    }

    /// The canonicalisation applied after every lifted operation.
    pub fn limit_and_bound(&self, l: i64) -> Approx {
        self.bound_error_term().limit_size(l)
    }

    /// Widens the radius by a non-negative dyadic amount.
    pub(crate) fn add_error(&self, err: &Dyadic) -> Approx {
        debug_assert!(!err.m.is_negative());
        match self {
            Approx::Bottom => Approx::Bottom,
            Approx::Finite { mb, m, e, s } => {
                let ulps = if err.s >= *s {
                    &err.m << ((err.s - s) as usize)
                } else {
                    ceil_shr(&err.m, s - err.s)
                };
                Approx::Finite {
                    mb: *mb,
                    m: m.clone(),
                    e: e + ulps,
                    s: *s,
                }
            }
        }
    }

    pub fn abs(&self) -> Approx {
        match self {
            Approx::Bottom => Approx::Bottom,
            Approx::Finite { mb, m, e, s } => {
                let am = m.abs();
                if am < *e {
                    let u = am + e;
                    Approx::Finite {
                        mb: *mb,
                        m: u.clone(),
                        e: u,
                        s: s - 1,
                    }
                } else {
                    Approx::Finite {
                        mb: *mb,
                        m: am,
                        e: e.clone(),
                        s: *s,
                    }
                }
            }
        }
    }

    /// Sign of the interval; an uncertain sign widens to `[0 ± 1]`, and so
    /// does `Bottom`.
    pub fn signum(&self) -> Approx {
        match self {
            Approx::Bottom => Approx::Finite {
                mb: 2,
                m: BigInt::zero(),
                e: BigInt::one(),
                s: 0,
            },
            Approx::Finite { mb, m, e, .. } => {
                if m.is_zero() && e.is_zero() {
                    Approx::Finite {
                        mb: *mb,
                        m: BigInt::zero(),
                        e: BigInt::zero(),
                        s: 0,
                    }
                } else if &m.abs() > e {
                    Approx::Finite {
                        mb: *mb,
                        m: m.signum(),
                        e: BigInt::zero(),
                        s: 0,
                    }
                } else {
                    Approx::Finite {
                        mb: *mb,
                        m: BigInt::zero(),
                        e: BigInt::one(),
                        s: 0,
                    }
                }
            }
        }
    }

    /// Reciprocal. Intervals containing zero give `Bottom`.
    pub fn recip(&self) -> Approx {
        match self {
            Approx::Bottom => Approx::Bottom,
            Approx::Finite { mb, m, e, s } => {
                if e.is_zero() {
                    if m.is_zero() {
                        return Approx::Bottom;
                    }
                    let k = ilog2_big(m);
                    if m.abs() == BigInt::one() << (k as usize) {
                        return Approx::Finite {
                            mb: *mb,
                            m: m.signum(),
                            e: BigInt::zero(),
                            s: -(s + k),
                        };
                    }
                    let t = (*mb).max(2) + 2;
                    let num = BigInt::one() << ((k + t) as usize);
                    let q = m.signum() * rounded_div(&num, &m.abs());
                    return Approx::approx_mb(*mb, q, BigInt::one(), -(s + k + t));
                }
                if m.abs() > *e {
                    let d = m * m - e * e;
                    let k = ((*mb).max(2) + 2 * ERROR_BITS + bit_length(&d) - bit_length(m))
                        .max(2);
                    let mid = rounded_div(&(m << (k as usize)), &d);
                    let rad = (e << (k as usize)) / &d + 2i32;
                    return Approx::approx_mb(*mb, mid, rad, -(s + k));
                }
                Approx::Bottom
            }
        }
    }

    /// Tight squaring without the dependency widening of `a * a`.
    pub fn sqr(&self) -> Approx {
        match self {
            Approx::Bottom => Approx::Bottom,
            Approx::Finite { mb, m, e, s } => {
                let am = m.abs();
                if am > *e {
                    Approx::approx_mb(*mb, m * m + e * e, (am * e) << 1usize, 2 * s)
                } else {
                    let u = am + e;
                    let sq = &u * &u;
                    Approx::approx_mb(*mb, sq.clone(), sq, 2 * s - 1)
                }
            }
        }
    }

    /// Euclidean quotient and remainder against the midpoints of `d`; the
    /// quotient is an exact integer-valued approximation, the remainder
    /// absorbs both radii.
    pub fn div_mod_a(&self, d: &Approx) -> (Approx, Approx) {
        match (self, d) {
            (
                Approx::Finite { mb, m, e, s },
                Approx::Finite {
                    mb: mbd,
                    m: n,
                    e: f,
                    s: t,
                },
            ) => {
                let r = (*s).min(*t);
                let a = shift_bigint(m, s - r);
                let b = shift_bigint(n, t - r);
                if b.is_zero() {
                    return (Approx::Bottom, Approx::Bottom);
                }
                let (q, rem) = a.div_mod_floor(&b);
                let e2 = shift_bigint(e, s - r) + q.abs() * shift_bigint(f, t - r);
                let mbq = (*mb).max(*mbd);
                (
                    Approx::approx_mb(mbq, q, BigInt::zero(), 0),
                    Approx::approx_mb(mbq, rem, e2, r),
                )
            }
            _ => (Approx::Bottom, Approx::Bottom),
        }
    }

    /// Remainder of [`Approx::div_mod_a`].
    pub fn mod_a(&self, d: &Approx) -> Approx {
        self.div_mod_a(d).1
    }

    /// Division by a nonzero integer at resolution `2^-res`.
    pub(crate) fn div_by_int(&self, q: &BigInt, res: i64) -> Approx {
        debug_assert!(!q.is_zero());
        match self {
            Approx::Bottom => Approx::Bottom,
            Approx::Finite { mb, m, e, s } => {
                let qa = q.abs();
                let m = if q.is_negative() { -m } else { m.clone() };
                let p = (res + s).max(0);
                let m2 = rounded_div(&(m << (p as usize)), &qa);
                let e2 = (e << (p as usize)) / &qa + 2i32;
                Approx::approx_mb(*mb, m2, e2, s - p)
            }
        }
    }

    /// Enclosures of the powers `a^0, a^1, a^2, ...`, each tightened via
    /// the binomial expansion around the midpoint.
    pub fn powers(&self) -> Powers {
        match self {
            Approx::Bottom => Powers {
                bottom: true,
                mb: 2,
                s: 0,
                n: 0,
                mid: BigInt::one(),
                outer: BigInt::one(),
                inner: BigInt::one(),
                base_mid: BigInt::zero(),
                base_outer: BigInt::zero(),
                base_inner: BigInt::zero(),
            },
            Approx::Finite { mb, m, e, s } => {
                let am = m.abs();
                Powers {
                    bottom: false,
                    mb: *mb,
                    s: *s,
                    n: 0,
                    mid: BigInt::one(),
                    outer: BigInt::one(),
                    inner: BigInt::one(),
                    base_mid: m.clone(),
                    base_outer: &am + e,
                    base_inner: am,
                }
            }
        }
    }

    /// Evaluates a polynomial with exact coefficients at `x`, bounding the
    /// dependency error by the derivative over the interval.
    pub fn poly_a(coeffs: &[Approx], x: &Approx) -> Approx {
        fn horner(coeffs: &[Approx], x: &Approx) -> Approx {
            let mut acc = Approx::zero();
            for c in coeffs.iter().rev() {
                acc = &(&acc * x) + c;
            }
            acc
        }
        if coeffs.iter().any(|c| c.is_bottom()) || x.is_bottom() {
            return Approx::Bottom;
        }
        let centre = match x.centre() {
            Some(c) => Approx::from_dyadic_mb(x.mbound(), &c),
            None => return Approx::Bottom,
        };
        let value = horner(coeffs, &centre);
        if x.is_exact() {
            return value;
        }
        let deriv: Vec<Approx> = coeffs
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, c)| c * &Approx::from_i64(i as i64))
            .collect();
        let dv = horner(&deriv, x).abs();
        let bound = match dv.upper() {
            Extended::Finite(b) => b,
            _ => return Approx::Bottom,
        };
        let r = x.radius();
        let r = match r {
            Extended::Finite(r) => r,
            _ => return Approx::Bottom,
        };
        let widen = &bound * &r;
        if widen.m.is_negative() {
            return value;
        }
        value.add_error(&widen)
    }

    /// Nearest double of the midpoint; `None` for `Bottom`.
    pub fn to_double(&self) -> Option<f64> {
        self.centre().map(|c| c.to_f64())
    }

    /// The midpoint as an exact rational; `None` for `Bottom`.
    pub fn to_rational(&self) -> Option<BigRational> {
        self.centre().map(|c| {
            if c.s >= 0 {
                BigRational::from_integer(c.m << (c.s as usize))
            } else {
                BigRational::new(c.m, BigInt::one() << ((-c.s) as usize))
            }
        })
    }

    /// Renders the approximation in any base `2..=16`.
    ///
    /// Exact values print as plain numbers, intervals containing zero as
    /// `±digits~`, anything else as the midpoint digits cut with `~` at
    /// the first uncertain position.
    pub fn to_string_in_base(&self, base: u32) -> Result<String, RealError> {
        if !(2..=16).contains(&base) {
            return Err(RealError::UnsupportedBase(base));
        }
        match self {
            Approx::Bottom => Ok("⊥".to_string()),
            Approx::Finite { m, e, s, .. } => {
                if e.is_zero() && (*s >= 0 || base % 2 == 0) {
                    Ok(show_exact(base, m, *s))
                } else if m.abs() < *e {
                    Ok(show_near_zero(base, m, e, *s))
                } else {
                    Ok(show_inexact(base, m, e, *s))
                }
            }
        }
    }

    fn add_ref(&self, rhs: &Approx) -> Approx {
        match (self, rhs) {
            (
                Approx::Finite { mb, m, e, s },
                Approx::Finite {
                    mb: mb2,
                    m: n,
                    e: f,
                    s: t,
                },
            ) => {
                let r = (*s).min(*t);
                Approx::approx_mb2(
                    *mb,
                    *mb2,
                    shift_bigint(m, s - r) + shift_bigint(n, t - r),
                    shift_bigint(e, s - r) + shift_bigint(f, t - r),
                    r,
                )
            }
            _ => Approx::Bottom,
        }
    }

    fn mul_ref(&self, rhs: &Approx) -> Approx {
        let (mb1, m, e, s, mb2, n, f, t) = match (self, rhs) {
            (
                Approx::Finite { mb, m, e, s },
                Approx::Finite {
                    mb: mb2,
                    m: n,
                    e: f,
                    s: t,
                },
            ) => (*mb, m, e, *s, *mb2, n, f, *t),
            _ => return Approx::Bottom,
        };
        let u = s + t;
        let a = m * n;
        let b = m * f;
        let c = n * e;
        let d = e * f;
        let xp = m >= e;
        let xn = (-m) >= *e;
        let yp = n >= f;
        let yn = (-n) >= *f;
        match (xp, xn, yp, yn) {
            (true, _, true, _) => Approx::approx_mb2(mb1, mb2, a + d, b + c, u),
            (true, _, _, true) => Approx::approx_mb2(mb1, mb2, a - d, b - c, u),
            (_, true, true, _) => Approx::approx_mb2(mb1, mb2, a - d, c - b, u),
            (_, true, _, true) => Approx::approx_mb2(mb1, mb2, a + d, -b - c, u),
            (true, _, _, _) => Approx::approx_mb2(mb1, mb2, a + c, b + d, u),
            (_, true, _, _) => Approx::approx_mb2(mb1, mb2, a - c, d - b, u),
            (_, _, true, _) => Approx::approx_mb2(mb1, mb2, a + b, c + d, u),
            (_, _, _, true) => Approx::approx_mb2(mb1, mb2, a - b, d - c, u),
            _ => {
                // both straddle zero: take the hull of the corner products
                let p1 = &a - &b - &c + &d;
                let p2 = &a + &b - &c - &d;
                let p3 = &a - &b + &c - &d;
                let p4 = &a + &b + &c + &d;
                let mn = p1.clone().min(p2.clone()).min(p3.clone()).min(p4.clone());
                let mx = p1.max(p2).max(p3).max(p4);
                Approx::approx_mb2(mb1, mb2, &mx + &mn, mx - mn, u - 1)
            }
        }
    }
}

/// Iterator produced by [`Approx::powers`].
pub struct Powers {
    bottom: bool,
    mb: i64,
    s: i64,
    n: i64,
    mid: BigInt,
    outer: BigInt,
    inner: BigInt,
    base_mid: BigInt,
    base_outer: BigInt,
    base_inner: BigInt,
}

impl Iterator for Powers {
    type Item = Approx;

    fn next(&mut self) -> Option<Approx> {
        if self.bottom && self.n > 0 {
            return Some(Approx::Bottom);
        }
        let item = Approx::approx_mb(
            self.mb,
            self.mid.clone(),
            &self.outer - &self.inner,
            self.s * self.n,
        );
        self.mid *= &self.base_mid;
        self.outer *= &self.base_outer;
        self.inner *= &self.base_inner;
        self.n += 1;
        Some(item)
    }
}

impl Add for &Approx {
    type Output = Approx;

    fn add(self, rhs: &Approx) -> Approx {
        self.add_ref(rhs)
    }
}

impl Add for Approx {
    type Output = Approx;

    fn add(self, rhs: Approx) -> Approx {
        self.add_ref(&rhs)
    }
}

impl Sub for &Approx {
    type Output = Approx;

    fn sub(self, rhs: &Approx) -> Approx {
        self.add_ref(&-rhs)
    }
}

impl Sub for Approx {
    type Output = Approx;

    fn sub(self, rhs: Approx) -> Approx {
        self.add_ref(&-rhs)
    }
}

impl Mul for &Approx {
    type Output = Approx;

    fn mul(self, rhs: &Approx) -> Approx {
        self.mul_ref(rhs)
    }
}

impl Mul for Approx {
    type Output = Approx;

    fn mul(self, rhs: Approx) -> Approx {
        self.mul_ref(&rhs)
    }
}

impl Div for &Approx {
    type Output = Approx;

    fn div(self, rhs: &Approx) -> Approx {
        match (self, rhs) {
            (Approx::Bottom, _) | (_, Approx::Bottom) => Approx::Bottom,
            _ => {
                let mb = self.mbound().max(rhs.mbound());
                self.mul_ref(&rhs.set_mb(mb).recip())
            }
        }
    }
}

impl Div for Approx {
    type Output = Approx;

    fn div(self, rhs: Approx) -> Approx {
        &self / &rhs
    }
}

impl Neg for &Approx {
    type Output = Approx;

    fn neg(self) -> Approx {
        match self {
            Approx::Bottom => Approx::Bottom,
            Approx::Finite { mb, m, e, s } => Approx::Finite {
                mb: *mb,
                m: -m,
                e: e.clone(),
                s: *s,
            },
        }
    }
}

impl Neg for Approx {
    type Output = Approx;

    fn neg(self) -> Approx {
        -&self
    }
}

impl PartialEq for Approx {
    /// Equality of the encoded intervals, not of the tuples.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Approx::Bottom, Approx::Bottom) => true,
            (
                Approx::Finite { m, e, s, .. },
                Approx::Finite {
                    m: n, e: f, s: t, ..
                },
            ) => {
                let r = (*s).min(*t);
                shift_bigint(m, s - r) == shift_bigint(n, t - r)
                    && shift_bigint(e, s - r) == shift_bigint(f, t - r)
            }
            _ => false,
        }
    }
}

impl PartialOrd for Approx {
    /// A partial order: defined for identical intervals, exact values, and
    /// intervals whose distance exceeds the sum of the radii. Overlapping
    /// distinct intervals are not comparable.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }
        match (self, other) {
            (Approx::Finite { .. }, Approx::Finite { .. }) => {
                if self.is_exact() && other.is_exact() {
                    return self.centre().unwrap().partial_cmp(&other.centre().unwrap());
                }
                if self.upper() < other.lower() {
                    Some(Ordering::Less)
                } else if self.lower() > other.upper() {
                    Some(Ordering::Greater)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

impl Display for Approx {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_string_in_base(10).unwrap())
    }
}

fn digit(d: u32, base: u32) -> char {
    debug_assert!(d < base);
    char::from_digit(d, base).unwrap()
}

fn show_exact(base: u32, m: &BigInt, s: i64) -> String {
    let mut out = String::new();
    if m.is_negative() {
        out.push('-');
    }
    let am = m.abs();
    if s >= 0 {
        out.push_str(&(am << (s as usize)).to_str_radix(base));
        return out;
    }
    let den_bits = (-s) as usize;
    let mask = (BigInt::one() << den_bits) - 1i32;
    let ipart: BigInt = &am >> den_bits;
    let mut fnum = am & &mask;
    out.push_str(&ipart.to_str_radix(base));
    if !fnum.is_zero() {
        out.push('.');
        while !fnum.is_zero() {
            fnum *= base;
            let d: BigInt = &fnum >> den_bits;
            out.push(digit(d.to_u32().unwrap(), base));
            fnum &= &mask;
        }
    }
    out
}

fn show_near_zero(base: u32, m: &BigInt, e: &BigInt, s: i64) -> String {
    let g = m.abs() + e;
    let mut out = String::from("±");
    if shift_bigint(&g, s) >= BigInt::one() {
        out.push('~');
        return out;
    }
    out.push_str("0.");
    let mut gb = g;
    loop {
        gb *= base;
        if shift_bigint(&gb, s) >= BigInt::one() {
            out.push('~');
            return out;
        }
        out.push('0');
    }
}

fn show_inexact(base: u32, m: &BigInt, e: &BigInt, s: i64) -> String {
    const EXACT_DIGIT_CAP: usize = 60;
    let mut out = String::new();
    if m.is_negative() {
        out.push('-');
    }
    let am = m.abs();
    let den_bits = (-s).max(0) as usize;
    let mask = (BigInt::one() << den_bits) - 1i32;
    let (ipart, mut fnum) = if s >= 0 {
        (&am << (s as usize), BigInt::zero())
    } else {
        (&am >> den_bits, am & &mask)
    };
    let istr = ipart.to_str_radix(base);
    // radius <= base^pos means the digit at integer position pos is shown
    let radius_le = |pos: u32| -> bool {
        let bpow = BigInt::from(base).pow(pos);
        if s >= 0 {
            (e << (s as usize)) <= bpow
        } else {
            *e <= (bpow << den_bits)
        }
    };
    if !e.is_zero() && !radius_le(0) {
        let mut pthr: u32 = 1;
        while !radius_le(pthr) {
            pthr += 1;
        }
        let keep = istr.len().saturating_sub(pthr as usize);
        out.push_str(&istr[..keep]);
        out.push('~');
        return out;
    }
    out.push_str(&istr);
    out.push('.');
    let den = BigInt::one() << den_bits;
    let mut eb = e.clone();
    let mut emitted = 0usize;
    loop {
        if e.is_zero() {
            if fnum.is_zero() {
                // drop the trailing dot of an exact value
                out.pop();
                return out;
            }
            if emitted >= EXACT_DIGIT_CAP {
                out.push('~');
                return out;
            }
        } else {
            eb *= base;
            if eb > den {
                out.push('~');
                return out;
            }
        }
        fnum *= base;
        let d: BigInt = &fnum >> den_bits;
        out.push(digit(d.to_u32().unwrap(), base));
        fnum &= &mask;
        emitted += 1;
    }
}
