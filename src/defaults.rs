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

/// Radii above `2^ERROR_BITS` ulps are renormalised by `Approx::bound_error_term`.
pub(crate) const ERROR_BITS: i64 = 10;

/// Precision in bits used by `Display` on computable reals and by `to_rational`.
pub const DEFAULT_PRECISION: i64 = 31;

/// First working resource level of a computable real stream.
pub(crate) const RESOURCE_START: i64 = 80;

/// The escalating resource sequence `80, 120, 180, 270, ...`,
/// each level 3/2 of the previous one rounded down.
pub(crate) fn resources() -> impl Iterator<Item = i64> {
    std::iter::successors(Some(RESOURCE_START), |l| Some(l + (l >> 1)))
}

/// Resource level at stream index `k`.
pub(crate) fn resource(k: usize) -> i64 {
    let mut l = RESOURCE_START;
    for _ in 0..k {
        l += l >> 1;
    }
    l
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_sequence() {
        let head: Vec<i64> = resources().take(4).collect();
        assert_eq!(head, vec![80, 120, 180, 270]);
        assert_eq!(resource(0), 80);
        assert_eq!(resource(3), 270);
    }
}
