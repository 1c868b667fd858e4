//! Fixture capture from the byte-at-a-time oracle.
//!
//! Builds cases for every oracle-backed routine across source offsets 0..=3
//! and short lengths, runs each through [`Implementation::Reference`], and
//! records the rendered result as the expected output. The word-parallel
//! routines are later verified against these files.

use pgmspace_core::{RegionLayout, SIZE_IRRELEVANT};
use serde::Serialize;

use crate::execute::{CaseInputs, ExecError, Implementation, Length, execute};
use crate::fixtures::{FixtureCase, FixtureSet};
use crate::structured_log::now_utc;

pub const FIXTURE_VERSION: &str = "v1";

fn sample(len: usize) -> Vec<u8> {
    (0..len).map(|i| b'a' + (i % 26) as u8).collect()
}

fn with_nul(mut bytes: Vec<u8>) -> Vec<u8> {
    bytes.push(0);
    bytes
}

fn inputs_for(function: &str, offset: usize, len: usize) -> Vec<(String, CaseInputs)> {
    let base = CaseInputs {
        offset,
        ..CaseInputs::default()
    };
    match function {
        "strnlen_P" => {
            let mut caps = vec![0, len / 2, len + 3];
            caps.dedup();
            caps.into_iter()
                .map(|cap| {
                    (
                        format!("len{len}_cap{cap}"),
                        CaseInputs {
                            region: with_nul(sample(len)),
                            n: Some(Length::Count(cap)),
                            ..base.clone()
                        },
                    )
                })
                .collect()
        }
        "memcpy_P" => vec![(
            format!("len{len}"),
            CaseInputs {
                region: sample(len),
                n: Some(Length::Count(len)),
                dest_len: Some(len + 2),
                ..base
            },
        )],
        "strncpy_P" => [len / 2, len + 1, len + 4, SIZE_IRRELEVANT]
            .into_iter()
            .map(|size| {
                let name = if size == SIZE_IRRELEVANT {
                    format!("len{len}_size_irrelevant")
                } else {
                    format!("len{len}_size{size}")
                };
                (
                    name,
                    CaseInputs {
                        region: with_nul(sample(len)),
                        n: Some(Length::from(size)),
                        dest_len: Some(len + 6),
                        ..base.clone()
                    },
                )
            })
            .collect(),
        "memmem_P" => {
            let haystack = sample(len + 4);
            let needle_len = len.min(3);
            [0, 2]
                .into_iter()
                .map(|at| {
                    (
                        format!("hay{}_needle{needle_len}_at{at}", haystack.len()),
                        CaseInputs {
                            region: haystack[at..at + needle_len].to_vec(),
                            ram: haystack.clone(),
                            n: Some(Length::Count(needle_len)),
                            ..base.clone()
                        },
                    )
                })
                .collect()
        }
        _ => Vec::new(),
    }
}

/// Captures a fixture set for `function` from the oracle.
pub fn capture_function(
    function: &'static str,
    layout: RegionLayout,
    max_len: usize,
) -> Result<FixtureSet, ExecError> {
    let mut cases = Vec::new();
    for offset in 0..4 {
        for len in 0..=max_len {
            for (suffix, inputs) in inputs_for(function, offset, len) {
                let expected_output = execute(function, &inputs, layout, Implementation::Reference)?;
                cases.push(FixtureCase {
                    name: format!("{function}_off{offset}_{suffix}"),
                    function: function.to_string(),
                    inputs: to_value(&inputs),
                    expected_output,
                });
            }
        }
    }
    Ok(FixtureSet {
        version: String::from(FIXTURE_VERSION),
        family: format!("oracle/{function}"),
        captured_at: now_utc(),
        cases,
    })
}

fn to_value<T: Serialize>(inputs: &T) -> serde_json::Value {
    serde_json::to_value(inputs).unwrap_or(serde_json::Value::Null)
}
