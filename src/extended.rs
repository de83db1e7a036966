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
use crate::dyadic::Dyadic;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// A dyadic number extended with the two infinities, totally ordered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Extended {
    NegInf,
    Finite(Dyadic),
    PosInf,
}

impl Extended {
    #[inline]
    pub fn is_finite(&self) -> bool {
        matches!(self, Extended::Finite(_))
    }

    /// The finite payload, panics on infinities.
    pub fn finite(&self) -> &Dyadic {
        match self {
            Extended::Finite(d) => d,
            Extended::NegInf => panic!("Extended::finite on -inf"),
            Extended::PosInf => panic!("Extended::finite on +inf"),
        }
    }
}

impl PartialOrd for Extended {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Extended {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Extended::NegInf, Extended::NegInf) => Ordering::Equal,
            (Extended::NegInf, _) => Ordering::Less,
            (_, Extended::NegInf) => Ordering::Greater,
            (Extended::PosInf, Extended::PosInf) => Ordering::Equal,
            (Extended::PosInf, _) => Ordering::Greater,
            (_, Extended::PosInf) => Ordering::Less,
            (Extended::Finite(a), Extended::Finite(b)) => a.cmp(b),
        }
    }
}

impl Display for Extended {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Extended::NegInf => f.write_str("-inf"),
            Extended::PosInf => f.write_str("+inf"),
            Extended::Finite(d) => write!(f, "{d}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    #[test]
    fn extended_order() {
        let a = Extended::Finite(Dyadic::new(BigInt::from(1), 0));
        let b = Extended::Finite(Dyadic::new(BigInt::from(3), -1));
        assert!(Extended::NegInf < a);
        assert!(a < b);
        assert!(b < Extended::PosInf);
        assert!(Extended::NegInf < Extended::PosInf);
    }
}
