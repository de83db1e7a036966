/*
 * // Copyright (c) Radzivon Bartoshyk 7/2025. All rights reserved.
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
use crate::defaults::{DEFAULT_PRECISION, resource, resources};
use crate::err::RealError;
use crate::math::{atan_a, cos_a, exp_a, log_a, pi_a, sin_a, sqrt_a};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;
use std::cell::RefCell;
use std::fmt::{Display, Formatter};
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::rc::Rc;
use std::str::FromStr;

struct Node {
    producer: Box<dyn Fn(usize) -> Approx>,
    memo: RefCell<Vec<Approx>>,
}

/// A computable real: a lazy stream of sharpening approximations indexed
/// by the escalating resource sequence.
///
/// Element `k` is computed at resource level `resources()[k]` from the
/// elements `k` of the operand streams; forced elements are memoised so
/// shared subexpressions are evaluated once. Values are immutable and the
/// type is a cheap reference-counted handle.
///
/// `CReal` deliberately implements neither `PartialEq` nor `PartialOrd`:
/// equality and order of computable reals are uncomputable.
#[derive(Clone)]
pub struct CReal {
    node: Rc<Node>,
}

/// Demotes an approximation with `d` or fewer correct bits to `Bottom`.
fn ok(d: i64, a: Approx) -> Approx {
    if a.precision() > Bits::Finite(d) {
        a
    } else {
        Approx::Bottom
    }
}

impl CReal {
    fn new(producer: impl Fn(usize) -> Approx + 'static) -> CReal {
        CReal {
            node: Rc::new(Node {
                producer: Box::new(producer),
                memo: RefCell::new(Vec::new()),
            }),
        }
    }

    /// The `k`-th element of the stream.
    pub fn approximation(&self, k: usize) -> Approx {
        loop {
            let len = self.node.memo.borrow().len();
            if len > k {
                return self.node.memo.borrow()[k].clone();
            }
            let a = (self.node.producer)(len);
            self.node.memo.borrow_mut().push(a);
        }
    }

    /// Walks the stream until an element with more than `d` correct bits
    /// after the binary point appears. A stream that stays uninformative
    /// long past the resource level needed for `d` is declared divergent
    /// and yields `Bottom`.
    pub fn require(&self, d: i64) -> Approx {
        let cutoff = 32 * d.max(1) + 2048;
        for (k, l) in resources().enumerate() {
            let a = self.approximation(k);
            if a.precision() > Bits::Finite(d) {
                return a;
            }
            if l > cutoff {
                return Approx::Bottom;
            }
        }
        unreachable!()
    }

    fn lift1(&self, f: impl Fn(i64, Approx) -> Approx + 'static) -> CReal {
        let x = self.clone();
        CReal::new(move |k| {
            let l = resource(k);
            ok(10, f(l, x.approximation(k).set_mb(l)).limit_and_bound(l))
        })
    }

    fn lift2(&self, other: &CReal, f: impl Fn(i64, Approx, Approx) -> Approx + 'static) -> CReal {
        let x = self.clone();
        let y = other.clone();
        CReal::new(move |k| {
            let l = resource(k);
            let a = x.approximation(k).set_mb(l);
            let b = y.approximation(k).set_mb(l);
            ok(10, f(l, a, b).limit_and_bound(l))
        })
    }

    pub fn from_bigint(i: BigInt) -> CReal {
        let a = Approx::from_bigint(i);
        CReal::new(move |_| a.clone())
    }

    pub fn from_integer(i: i64) -> CReal {
        CReal::from_bigint(BigInt::from(i))
    }

    pub fn from_rational(r: BigRational) -> CReal {
        CReal::new(move |k| Approx::to_approx(resource(k), &r))
    }

    /// The rational `p / q` as a computable real.
    pub fn from_ratio(p: i64, q: i64) -> CReal {
        CReal::from_rational(BigRational::new(BigInt::from(p), BigInt::from(q)))
    }

    /// A double decoded into a one-ulp dyadic interval; non-finite inputs
    /// produce the uninformative stream.
    pub fn from_double(f: f64) -> CReal {
        Self::decode_double(f, false)
    }

    /// A double taken as the exact dyadic rational it encodes.
    pub fn from_double_exact(f: f64) -> CReal {
        Self::decode_double(f, true)
    }

    fn decode_double(f: f64, exact: bool) -> CReal {
        if !f.is_finite() {
            return CReal::new(|_| Approx::Bottom);
        }
        let bits = f.to_bits();
        let biased = ((bits >> 52) & 0x7ff) as i64;
        let frac = (bits & ((1u64 << 52) - 1)) as i64;
        let (m, s) = if biased == 0 {
            (frac, -1074)
        } else {
            (frac | (1 << 52), biased - 1075)
        };
        let m = BigInt::from(if f.is_sign_negative() { -m } else { m });
        let e = if exact { BigInt::from(0) } else { BigInt::one() };
        let a = Approx::Finite { mb: 64, m, e, s };
        CReal::new(move |_| a.clone())
    }

    /// The constant π.
    pub fn pi() -> CReal {
        CReal::new(|k| {
            let l = resource(k);
            ok(10, pi_a(l + 10).limit_and_bound(l))
        })
    }

    /// The sentinel `[-2^-L_k, 2^-L_k]` stream.
    pub fn epsilon() -> CReal {
        CReal::new(|k| Approx::Finite {
            mb: 2,
            m: BigInt::from(0),
            e: BigInt::one(),
            s: -resource(k),
        })
    }

    /// Exact multiplication by `2^k`.
    pub fn scale(&self, k: i64) -> CReal {
        self.lift1(move |_, a| a.scale(k))
    }

    pub fn recip(&self) -> CReal {
        self.lift1(|_, a| a.recip())
    }

    pub fn abs(&self) -> CReal {
        self.lift1(|_, a| a.abs())
    }

    pub fn signum(&self) -> CReal {
        self.lift1(|_, a| a.signum())
    }

    pub fn sqr(&self) -> CReal {
        self.lift1(|_, a| a.sqr())
    }

    pub fn sqrt(&self) -> CReal {
        self.lift1(|l, a| sqrt_a(l, &a))
    }

    pub fn exp(&self) -> CReal {
        self.lift1(|_, a| exp_a(&a))
    }

    /// Natural logarithm.
    pub fn log(&self) -> CReal {
        self.lift1(|_, a| log_a(&a))
    }

    pub fn sin(&self) -> CReal {
        self.lift1(|_, a| sin_a(&a))
    }

    pub fn cos(&self) -> CReal {
        self.lift1(|_, a| cos_a(&a))
    }

    pub fn atan(&self) -> CReal {
        self.lift1(|l, a| atan_a(l, &a))
    }

    pub fn tan(&self) -> CReal {
        &self.sin() / &self.cos()
    }

    pub fn asin(&self) -> CReal {
        let one = CReal::from_integer(1);
        let den = &one + &(&one - &self.sqr()).sqrt();
        (self / &den).atan().scale(1)
    }

    pub fn acos(&self) -> CReal {
        &CReal::pi().scale(-1) - &self.asin()
    }

    pub fn sinh(&self) -> CReal {
        (&self.exp() - &(-self).exp()).scale(-1)
    }

    pub fn cosh(&self) -> CReal {
        (&self.exp() + &(-self).exp()).scale(-1)
    }

    pub fn tanh(&self) -> CReal {
        &self.sinh() / &self.cosh()
    }

    pub fn asinh(&self) -> CReal {
        let one = CReal::from_integer(1);
        (self + &(&self.sqr() + &one).sqrt()).log()
    }

    pub fn acosh(&self) -> CReal {
        let one = CReal::from_integer(1);
        (self + &(&self.sqr() - &one).sqrt()).log()
    }

    pub fn atanh(&self) -> CReal {
        let one = CReal::from_integer(1);
        (&(&one + self) / &(&one - self)).log().scale(-1)
    }

    /// Nearest double of a 70-bit approximation; `None` when the value
    /// stays uninformative.
    pub fn to_double(&self) -> Option<f64> {
        self.require(70).to_double()
    }

    /// The midpoint of the default-precision approximation as a rational.
    pub fn to_rational(&self) -> Option<BigRational> {
        self.require(DEFAULT_PRECISION).to_rational()
    }

    /// Renders the value to `d` bits after the binary point.
    pub fn show_at(&self, d: i64) -> String {
        self.require(d).to_string()
    }

    /// Renders the first `n` stream elements, one per line.
    pub fn show_first(&self, n: usize) -> String {
        (0..n)
            .map(|k| self.approximation(k).to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Add for &CReal {
    type Output = CReal;

    fn add(self, rhs: &CReal) -> CReal {
        self.lift2(rhs, |_, a, b| &a + &b)
    }
}

impl Add for CReal {
    type Output = CReal;

    fn add(self, rhs: CReal) -> CReal {
        &self + &rhs
    }
}

impl Sub for &CReal {
    type Output = CReal;

    fn sub(self, rhs: &CReal) -> CReal {
        self.lift2(rhs, |_, a, b| &a - &b)
    }
}

impl Sub for CReal {
    type Output = CReal;

    fn sub(self, rhs: CReal) -> CReal {
        &self - &rhs
    }
}

impl Mul for &CReal {
    type Output = CReal;

    fn mul(self, rhs: &CReal) -> CReal {
        self.lift2(rhs, |_, a, b| &a * &b)
    }
}

impl Mul for CReal {
    type Output = CReal;

    fn mul(self, rhs: CReal) -> CReal {
        &self * &rhs
    }
}

impl Div for &CReal {
    type Output = CReal;

    fn div(self, rhs: &CReal) -> CReal {
        self.lift2(rhs, |_, a, b| &a / &b)
    }
}

impl Div for CReal {
    type Output = CReal;

    fn div(self, rhs: CReal) -> CReal {
        &self / &rhs
    }
}

impl Neg for &CReal {
    type Output = CReal;

    fn neg(self) -> CReal {
        self.lift1(|_, a| -a)
    }
}

impl Neg for CReal {
    type Output = CReal;

    fn neg(self) -> CReal {
        -&self
    }
}

impl Display for CReal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.show_at(DEFAULT_PRECISION))
    }
}

impl FromStr for CReal {
    type Err = RealError;

    /// Parses a decimal floating point literal into the exact rational it
    /// denotes.
    fn from_str(s: &str) -> Result<CReal, RealError> {
        let t = s.trim();
        let (neg, t) = match t.strip_prefix('-') {
            Some(r) => (true, r),
            None => (false, t.strip_prefix('+').unwrap_or(t)),
        };
        let (mant, exp_str) = match t.split_once(['e', 'E']) {
            Some((m, e)) => (m, Some(e)),
            None => (t, None),
        };
        let exp: i64 = match exp_str {
            None => 0,
            Some(e) => {
                let digits = e.strip_prefix(['-', '+']).unwrap_or(e);
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(RealError::InvalidLiteral);
                }
                e.parse().map_err(|_| RealError::ExponentOverflow)?
            }
        };
        if exp.abs() > 999_999 {
            return Err(RealError::ExponentOverflow);
        }
        let (int_part, frac_part) = match mant.split_once('.') {
            Some((i, f)) => (i, f),
            None => (mant, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(RealError::InvalidLiteral);
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(RealError::InvalidLiteral);
        }
        let digits: String = [int_part, frac_part].concat();
        let num = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or(RealError::InvalidLiteral)?;
        let e10 = exp - frac_part.len() as i64;
        let (mut numer, denom) = if e10 >= 0 {
            (num * BigInt::from(10).pow(e10 as u32), BigInt::one())
        } else {
            (num, BigInt::from(10).pow((-e10) as u32))
        };
        if neg {
            numer = -numer;
        }
        Ok(CReal::from_rational(BigRational::new(numer, denom)))
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
    fn integers_are_exact_immediately() {
        let x = CReal::from_integer(42);
        let a = x.require(1000);
        assert!(a.is_exact());
        assert_eq!(a.to_double().unwrap(), 42.0);
    }

    #[test]
    fn rationals_refine() {
        let x = CReal::from_ratio(1, 3);
        let a = x.require(100);
        assert!(contains(&a, 1.0 / 3.0));
        assert!(a.precision() > Bits::Finite(100));
    }

    #[test]
    fn field_arithmetic() {
        let x = &CReal::from_ratio(1, 3) + &CReal::from_ratio(1, 6);
        assert!(contains(&x.require(80), 0.5));
        let y = &CReal::from_integer(7) * &CReal::from_ratio(1, 7);
        assert!(contains(&y.require(80), 1.0));
        let z = &CReal::from_integer(1) / &CReal::from_integer(3);
        assert!(contains(&z.require(80), 1.0 / 3.0));
        let w = -&CReal::from_integer(5);
        assert!(contains(&w.require(80), -5.0));
    }

    #[test]
    fn division_by_zero_diverges_to_bottom() {
        let x = CReal::from_integer(0).recip();
        assert!(x.require(20).is_bottom());
    }

    #[test]
    fn monotone_refinement_stays_consistent() {
        let x = (&CReal::from_integer(2)).sqrt();
        let coarse = x.require(50);
        let fine = x.require(200);
        assert!(coarse.consistent_a(&fine));
        assert!(contains(&coarse, std::f64::consts::SQRT_2));
        assert!(contains(&fine, std::f64::consts::SQRT_2));
    }

    #[test]
    fn transcendental_round_trips() {
        let two = CReal::from_integer(2);
        let r = two.log().exp().require(100);
        assert!(contains(&r, 2.0), "Invalid result {}", r);
        let x = CReal::from_ratio(1, 4);
        let t = x.atan().tan().require(80);
        assert!(contains(&t, 0.25), "Invalid result {}", t);
    }

    #[test]
    fn trig_identity() {
        let one = CReal::from_integer(1);
        let s = one.sin();
        let c = one.cos();
        let total = &(&s * &s) + &(&c * &c);
        assert!(contains(&total.require(90), 1.0));
    }

    #[test]
    fn hyperbolic_functions() {
        let x = CReal::from_integer(1);
        assert!(contains(&x.sinh().require(80), 1f64.sinh()));
        assert!(contains(&x.cosh().require(80), 1f64.cosh()));
        assert!(contains(&x.tanh().require(80), 1f64.tanh()));
        let y = CReal::from_ratio(1, 2);
        assert!(contains(&y.asinh().require(80), 0.5f64.asinh()));
        assert!(contains(&y.atanh().require(80), 0.5f64.atanh()));
        let z = CReal::from_integer(2);
        assert!(contains(&z.acosh().require(80), 2f64.acosh()));
    }

    #[test]
    fn inverse_trig() {
        let h = CReal::from_ratio(1, 2);
        assert!(contains(&h.asin().require(80), 0.5f64.asin()));
        assert!(contains(&h.acos().require(80), 0.5f64.acos()));
    }

    #[test]
    fn pi_value() {
        let p = CReal::pi();
        assert!(contains(&p.require(200), std::f64::consts::PI));
    }

    #[test]
    fn epsilon_tracks_resource() {
        let e = CReal::epsilon();
        let a = e.approximation(0);
        assert!(contains(&a, 0.0));
        assert_eq!(a.precision(), Bits::Finite(79));
    }

    #[test]
    fn doubles_decode() {
        let x = CReal::from_double(0.5);
        assert_eq!(x.to_double().unwrap(), 0.5);
        let y = CReal::from_double_exact(-0.2939788524332769);
        assert_eq!(y.to_double().unwrap(), -0.2939788524332769);
        assert!(y.require(80).is_exact());
        assert!(CReal::from_double(f64::INFINITY).require(10).is_bottom());
        assert!(CReal::from_double(f64::NAN).require(10).is_bottom());
    }

    #[test]
    fn parse_literals() {
        let x: CReal = "3.25".parse().unwrap();
        assert_eq!(x.to_double().unwrap(), 3.25);
        let y: CReal = "-0.125e2".parse().unwrap();
        assert_eq!(y.to_double().unwrap(), -12.5);
        let z: CReal = "42".parse().unwrap();
        assert_eq!(z.to_double().unwrap(), 42.0);
        let w: CReal = "+.5".parse().unwrap();
        assert_eq!(w.to_double().unwrap(), 0.5);
        fn parse_err(s: &str) -> RealError {
            match s.parse::<CReal>() {
                Ok(_) => panic!("expected parse error for {s:?}"),
                Err(e) => e,
            }
        }
        assert_eq!(parse_err(""), RealError::InvalidLiteral);
        assert_eq!(parse_err("1.2.3"), RealError::InvalidLiteral);
        assert_eq!(parse_err("12e"), RealError::InvalidLiteral);
        assert_eq!(
            parse_err("1e99999999999999999999"),
            RealError::ExponentOverflow
        );
    }

    #[test]
    fn display_and_show() {
        assert_eq!(CReal::from_integer(7).to_string(), "7");
        let third = CReal::from_ratio(1, 3);
        let shown = third.show_at(60);
        assert!(shown.starts_with("0.3333333"), "Invalid result {}", shown);
        assert!(shown.ends_with('~'));
        let lines = third.show_first(3);
        assert_eq!(lines.lines().count(), 3);
    }

    #[test]
    fn signum_of_exact_values() {
        assert_eq!(CReal::from_integer(-3).signum().to_double().unwrap(), -1.0);
        assert_eq!(CReal::from_integer(0).signum().to_double().unwrap(), 0.0);
    }
}
