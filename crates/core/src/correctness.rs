// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2026 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Functions for correctness checks similar to the *design by contract* philosophy.
//!
//! Each check returns an `anyhow::Result` describing the failed condition. Panicking
//! constructors pair these with `.expect(FAILED)`.

/// A message prefix that can be used with calls to `expect` or other assertion-related functions.
///
/// This constant provides a standard message that can be used to indicate a failure condition
/// when a predicate or condition does not hold true.
pub const FAILED: &str = "Condition failed";

/// Checks the `predicate` is true.
///
/// # Errors
///
/// Returns an error if the validation check fails.
#[inline(always)]
pub fn check_predicate_true(predicate: bool, fail_msg: &str) -> anyhow::Result<()> {
    if !predicate {
        anyhow::bail!("{fail_msg}")
    }
    Ok(())
}

/// Checks the `usize` value is positive (> 0).
///
/// # Errors
///
/// Returns an error if the validation check fails.
#[inline(always)]
pub fn check_positive_usize(value: usize, param: &str) -> anyhow::Result<()> {
    if value == 0 {
        anyhow::bail!("invalid usize for '{param}' not positive, was {value}")
    }
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_check_predicate_true_when_true() {
        assert!(check_predicate_true(true, "the predicate was false").is_ok());
    }

    #[rstest]
    fn test_check_predicate_true_when_false() {
        let err = check_predicate_true(false, "the predicate was false").unwrap_err();
        assert_eq!(err.to_string(), "the predicate was false");
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(usize::MAX)]
    fn test_check_positive_usize_when_positive(#[case] value: usize) {
        assert!(check_positive_usize(value, "capacity").is_ok());
    }

    #[rstest]
    fn test_check_positive_usize_when_zero() {
        let err = check_positive_usize(0, "capacity").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid usize for 'capacity' not positive, was 0"
        );
    }
}
