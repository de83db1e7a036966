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
use moxreal::{Approx, Bits, CReal, Dyadic};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;

fn dyadic_to_ratio(d: &Dyadic) -> BigRational {
    if d.s >= 0 {
        BigRational::from_integer(&d.m << (d.s as usize))
    } else {
        BigRational::new(d.m.clone(), BigInt::one() << ((-d.s) as usize))
    }
}

fn encloses(a: &Approx, r: &BigRational) -> bool {
    if a.is_bottom() {
        return true;
    }
    let lo = a.lower();
    let hi = a.upper();
    dyadic_to_ratio(lo.finite()) <= *r && *r <= dyadic_to_ratio(hi.finite())
}

fn ratio(p: i64, q: i64) -> BigRational {
    BigRational::new(BigInt::from(p), BigInt::from(q))
}

fn rpow(r: &BigRational, n: u32) -> BigRational {
    BigRational::new(r.numer().pow(n), r.denom().pow(n))
}

fn cr_int(i: i64) -> CReal {
    CReal::from_integer(i)
}

/// Rump's first ill-conditioned expression: double precision returns the
/// wrong sign, the computable real pins the value down exactly.
#[test]
fn rump_polynomial_with_catastrophic_cancellation() {
    let a = cr_int(77617);
    let b = cr_int(33096);
    let b2 = b.sqr();
    let b4 = b2.sqr();
    let a2 = a.sqr();
    let expr = &(&(&(&(&cr_int(21) * &b2) - &(&cr_int(2) * &a2))
        + &(&cr_int(55) * &b4))
        - &(&(&cr_int(10) * &a2) * &b2))
        + &(&a / &b.scale(1));
    let got = expr.require(100);
    assert!(encloses(&got, &ratio(-54767, 66192)), "got {}", got);
    let shown = expr.show_at(100);
    assert!(
        shown.starts_with("-0.827396059946821368"),
        "Invalid result {}",
        shown
    );
}

/// Rump's second example evaluated against the exact rational value.
#[test]
fn rump_second_polynomial() {
    let p = CReal::from_ratio(206987, 2048);
    let q = CReal::from_ratio(119504, 2048);
    let cr_pow = |x: &CReal, n: u32| -> CReal {
        let mut acc = cr_int(1);
        let mut base = x.clone();
        let mut n = n;
        while n > 0 {
            if n & 1 == 1 {
                acc = &acc * &base;
            }
            base = base.sqr();
            n >>= 1;
        }
        acc
    };
    let inner = &(&(&(&(&(&(&(&(&cr_pow(&p, 16) + &(&cr_int(6561) * &cr_pow(&q, 16)))
        - &(&cr_int(17496) * &(&cr_pow(&p, 2) * &cr_pow(&q, 14))))
        + &(&cr_int(20412) * &(&cr_pow(&p, 4) * &cr_pow(&q, 12))))
        - &(&cr_int(13608) * &(&cr_pow(&p, 6) * &cr_pow(&q, 10))))
        + &(&cr_int(5670) * &(&cr_pow(&p, 8) * &cr_pow(&q, 8))))
        - &(&cr_int(1512) * &(&cr_pow(&p, 10) * &cr_pow(&q, 6))))
        + &(&cr_int(252) * &(&cr_pow(&p, 12) * &cr_pow(&q, 4))))
        - &(&cr_int(24) * &(&cr_pow(&p, 14) * &cr_pow(&q, 2))));
    let r = &(&cr_pow(&p, 3) * inner) - &q;

    let pr = ratio(206987, 2048);
    let qr = ratio(119504, 2048);
    let exact = rpow(&pr, 3)
        * (rpow(&pr, 16) + ratio(6561, 1) * rpow(&qr, 16)
            - ratio(17496, 1) * rpow(&pr, 2) * rpow(&qr, 14)
            + ratio(20412, 1) * rpow(&pr, 4) * rpow(&qr, 12)
            - ratio(13608, 1) * rpow(&pr, 6) * rpow(&qr, 10)
            + ratio(5670, 1) * rpow(&pr, 8) * rpow(&qr, 8)
            - ratio(1512, 1) * rpow(&pr, 10) * rpow(&qr, 6)
            + ratio(252, 1) * rpow(&pr, 12) * rpow(&qr, 4)
            - ratio(24, 1) * rpow(&pr, 14) * rpow(&qr, 2))
        - qr;
    let got = r.require(200);
    assert!(!got.is_bottom());
    assert!(encloses(&got, &exact), "got {}", got);
}

const PI_300: &str = "1415926535897932384626433832795028841971693993751058209749445923\
0781640628620899862803482534211706798214808651328230664709384460\
9550582231725359408128481117450284102701938521105559644622948954\
9303819644288109756659334461284756482337867831652712019091456485\
66923460348610454326648213393607260249141273";

/// π to a thousand bits agrees with three hundred decimal digits.
#[test]
fn pi_to_three_hundred_digits() {
    let p = CReal::pi();
    let a = p.require(1000);
    assert!(a.precision() > Bits::Finite(1000));
    let shown = p.show_at(1000);
    assert!(shown.starts_with("3."), "Invalid result {}", shown);
    let digits: String = shown[2..].chars().take_while(|c| c.is_ascii_hexdigit()).collect();
    assert!(digits.len() >= 300, "only {} digits: {}", digits.len(), shown);
    assert_eq!(&digits[..300], PI_300);
}

/// `exp(log 2)` recovers 2 to the requested width.
#[test]
fn exp_log_round_trip() {
    let two = cr_int(2);
    let r = two.log().exp();
    let a = r.require(300);
    assert!(encloses(&a, &ratio(2, 1)), "got {}", a);
    assert!(a.precision() > Bits::Finite(290));
}

/// `sin π` straddles zero and `cos π` reaches −1.
#[test]
fn trig_at_pi() {
    let s = CReal::pi().sin().require(200);
    assert!(encloses(&s, &ratio(0, 1)), "got {}", s);
    let c = CReal::pi().cos().require(200);
    assert!(encloses(&c, &ratio(-1, 1)), "got {}", c);
}

/// The documented rendering of the unit interval around one.
#[test]
fn unit_uncertainty_prints_with_tilde() {
    let a = Approx::Finite {
        mb: 10,
        m: BigInt::one(),
        e: BigInt::one(),
        s: 0,
    };
    assert_eq!(a.to_string(), "1.~");
}

/// `tan(atan x)` stays consistent with the double it started from.
#[test]
fn tan_atan_round_trip() {
    let x = CReal::from_double(-0.2939788524332769);
    let direct = x.require(10);
    let round = x.atan().tan().require(10);
    assert!(direct.consistent_a(&round), "{} vs {}", direct, round);
}

/// Bottom absorbs through every lifted operation.
#[test]
fn bottom_propagates_through_expressions() {
    let bad = CReal::from_double(f64::NAN);
    let combos = [
        &bad + &CReal::pi(),
        &CReal::pi() * &bad,
        &cr_int(1) - &bad,
        bad.sqrt(),
        bad.exp(),
        bad.sin(),
        bad.atan(),
    ];
    for c in combos {
        assert!(c.require(10).is_bottom());
    }
}

/// Associativity, commutativity and distributivity hold up to
/// consistency at every resource level.
#[test]
fn field_laws_up_to_enclosure() {
    let a = CReal::from_ratio(1, 3);
    let b = cr_int(2).sqrt();
    let c = CReal::pi();
    let assoc_l = &(&a + &b) + &c;
    let assoc_r = &a + &(&b + &c);
    let comm_l = &a * &b;
    let comm_r = &b * &a;
    let dist_l = &a * &(&b + &c);
    let dist_r = &(&a * &b) + &(&a * &c);
    for k in 0..5 {
        assert!(assoc_l.approximation(k).consistent_a(&assoc_r.approximation(k)));
        assert!(comm_l.approximation(k).consistent_a(&comm_r.approximation(k)));
        assert!(dist_l.approximation(k).consistent_a(&dist_r.approximation(k)));
    }
}

/// The transcendental identities of the suite all contain zero.
#[test]
fn transcendental_identities_contain_zero() {
    let zero = ratio(0, 1);
    let x = CReal::from_ratio(7, 5);
    let pyth = &(&x.sin().sqr() + &x.cos().sqr()) - &cr_int(1);
    assert!(encloses(&pyth.require(60), &zero));
    let three = cr_int(3);
    let el = &three.log().exp() - &three;
    assert!(encloses(&el.require(60), &zero));
    let two = cr_int(2);
    let le = &two.exp().log() - &two;
    assert!(encloses(&le.require(60), &zero));
    let one = cr_int(1);
    let at = &one.tan().atan() - &one;
    assert!(encloses(&at.require(60), &zero));
}

/// Deeper requests refine without ever contradicting shallower ones.
#[test]
fn refinement_is_consistent_across_depths() {
    let x = &cr_int(10).sqrt() * &CReal::pi();
    let shallow = x.require(40);
    let deep = x.require(400);
    assert!(shallow.consistent_a(&deep));
    assert!(deep.precision() > Bits::Finite(400));
    assert!(shallow.better(&Approx::Bottom));
}

/// Round trip through a power-of-two rational is exact containment at
/// every depth.
#[test]
fn power_of_two_rational_round_trip() {
    let r = ratio(-13, 64);
    let x = CReal::from_ratio(-13, 64);
    for d in [10i64, 50, 150, 400] {
        let a = x.require(d);
        assert!(encloses(&a, &r), "depth {} got {}", d, a);
    }
}
