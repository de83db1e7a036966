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
#![deny(unreachable_pub)]
mod approx;
mod cr;
mod defaults;
mod dyadic;
mod err;
mod extended;
/// Elementary functions over centred dyadic approximations; working
/// precision follows the operand's midpoint bound.
mod math;

pub use approx::{Approx, Bits, Powers};
pub use cr::CReal;
pub use defaults::DEFAULT_PRECISION;
pub use dyadic::{
    Dyadic, atanh_d, div_d, ln2_d, pi_borwein_d, pi_machin_d, sqrt_d, sqrt_rec_d,
};
pub use err::RealError;
pub use extended::Extended;
pub use math::{
    SeriesTuple, abpq, agm_a, atan_a, atan_binary_splitting_a, cos_a, exp_a,
    exp_binary_splitting_a, exp_taylor_a, fudge, ln_large, ln_small, log2_a, log_a, log_agm_a,
    log_internal, pi_a, pi_agm_a, pi_borwein_a, pi_machin_a, pi_raw, sin_a, sqrt_a, sqrt_rec_a,
    taylor, taylor_a,
};
