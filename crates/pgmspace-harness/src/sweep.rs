//! Exhaustive differential sweep: word-parallel routines vs the oracle.
//!
//! Every oracle-backed routine is run for each source offset 0..=3, each
//! length up to `max_len`, and (where it applies) each bound and destination
//! alignment. Outputs must agree byte for byte. Region loads are tallied per
//! implementation so the report also shows what the word paths save.

use serde::{Deserialize, Serialize};

use pgmspace_core::string;
use pgmspace_core::{RegionImage, RegionLayout, SIZE_IRRELEVANT, reference};

use crate::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome, StreamKind};

/// Longest haystack the `memmem_P` sweep enumerates (all `{a, b}` strings).
const MEMMEM_MAX_HAYSTACK: usize = 7;
const MEMMEM_MAX_NEEDLE: usize = 4;
const FILL: u8 = 0x5a;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepMismatch {
    pub function: String,
    pub offset: usize,
    pub len: usize,
    pub detail: String,
}

/// Per-routine tallies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionTally {
    pub function: String,
    pub cases: usize,
    pub mismatches: usize,
    pub word_loads: usize,
    pub reference_loads: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    pub max_len: usize,
    pub region_base: usize,
    pub cases: usize,
    pub functions: Vec<FunctionTally>,
    pub mismatches: Vec<SweepMismatch>,
}

impl SweepReport {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

struct Tally<'a> {
    function: &'static str,
    cases: usize,
    word_loads: usize,
    reference_loads: usize,
    mismatches: &'a mut Vec<SweepMismatch>,
    mismatches_before: usize,
}

impl<'a> Tally<'a> {
    fn new(function: &'static str, mismatches: &'a mut Vec<SweepMismatch>) -> Self {
        let mismatches_before = mismatches.len();
        Self {
            function,
            cases: 0,
            word_loads: 0,
            reference_loads: 0,
            mismatches,
            mismatches_before,
        }
    }

    fn check<T: PartialEq + std::fmt::Debug>(&mut self, offset: usize, len: usize, what: &str, word: T, oracle: T) {
        self.cases += 1;
        if word != oracle {
            self.mismatches.push(SweepMismatch {
                function: self.function.to_string(),
                offset,
                len,
                detail: format!("{what}: word {word:?} vs reference {oracle:?}"),
            });
        }
    }

    fn finish(self) -> FunctionTally {
        FunctionTally {
            function: self.function.to_string(),
            cases: self.cases,
            mismatches: self.mismatches.len() - self.mismatches_before,
            word_loads: self.word_loads,
            reference_loads: self.reference_loads,
        }
    }
}

/// A zeroed scratch buffer with a word-aligned window of `len` bytes.
struct Scratch {
    bytes: Vec<u8>,
    start: usize,
}

impl Scratch {
    fn new(len: usize) -> Self {
        let bytes = vec![FILL; len + 2 * 4];
        let start = bytes.as_ptr().align_offset(4).min(4);
        Self { bytes, start }
    }

    fn window(&mut self, offset: usize, len: usize) -> &mut [u8] {
        let at = self.start + offset;
        &mut self.bytes[at..at + len]
    }
}

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| b'A' + (i % 26) as u8).collect()
}

fn terminated(len: usize) -> Vec<u8> {
    let mut v = pattern(len);
    v.push(0);
    v
}

/// All strings over `{a, b}` of exactly `len` bytes.
fn binary_words(len: usize) -> impl Iterator<Item = Vec<u8>> {
    (0..1u32 << len).map(move |bits| {
        (0..len)
            .map(|i| if bits >> i & 1 == 1 { b'b' } else { b'a' })
            .collect()
    })
}

fn sweep_strnlen(base: usize, max_len: usize, mismatches: &mut Vec<SweepMismatch>) -> FunctionTally {
    let mut tally = Tally::new("strnlen_P", mismatches);
    for offset in 0..4 {
        for len in 0..=max_len {
            let image = RegionImage::from_bytes(base, offset, &terminated(len));
            let caps = (0..=max_len + 2).chain(std::iter::once(SIZE_IRRELEVANT));
            for cap in caps {
                image.reset_loads();
                let word = string::strnlen_p(&image, base + offset, cap);
                tally.word_loads += image.loads();
                image.reset_loads();
                let oracle = reference::strnlen(&image, base + offset, cap);
                tally.reference_loads += image.loads();
                tally.check(offset, len, &format!("cap {cap}"), word, oracle);
            }
        }
    }
    tally.finish()
}

fn sweep_memcpy(base: usize, max_len: usize, mismatches: &mut Vec<SweepMismatch>) -> FunctionTally {
    let mut tally = Tally::new("memcpy_P", mismatches);
    for offset in 0..4 {
        for len in 0..=max_len {
            let image = RegionImage::from_bytes(base, offset, &pattern(len));
            for dest_offset in 0..4 {
                let mut fast = Scratch::new(max_len + 4);
                let mut slow = Scratch::new(max_len + 4);
                image.reset_loads();
                let a = string::memcpy_p(&image, fast.window(dest_offset, len), base + offset, len);
                tally.word_loads += image.loads();
                image.reset_loads();
                let b = reference::memcpy(&image, slow.window(dest_offset, len), base + offset, len);
                tally.reference_loads += image.loads();
                let what = format!("dest offset {dest_offset}");
                tally.check(offset, len, &what, a, b);
                tally.check(
                    offset,
                    len,
                    &what,
                    fast.window(0, max_len + 4).to_vec(),
                    slow.window(0, max_len + 4).to_vec(),
                );
            }
        }
    }
    tally.finish()
}

fn sweep_strncpy(base: usize, max_len: usize, mismatches: &mut Vec<SweepMismatch>) -> FunctionTally {
    let mut tally = Tally::new("strncpy_P", mismatches);
    let window = max_len + 3;
    for offset in 0..4 {
        for len in 0..=max_len {
            let image = RegionImage::from_bytes(base, offset, &terminated(len));
            for dest_offset in [0usize, 1] {
                let sizes = (0..=window).chain(std::iter::once(SIZE_IRRELEVANT));
                for size in sizes {
                    let span = if size == SIZE_IRRELEVANT { window } else { size };
                    let mut fast = Scratch::new(window + 1);
                    let mut slow = Scratch::new(window + 1);
                    image.reset_loads();
                    let a = string::strncpy_p(&image, fast.window(dest_offset, span), base + offset, size);
                    tally.word_loads += image.loads();
                    image.reset_loads();
                    let b = reference::strncpy(&image, slow.window(dest_offset, span), base + offset, size);
                    tally.reference_loads += image.loads();
                    let what = format!("dest offset {dest_offset} size {size}");
                    tally.check(offset, len, &what, a, b);
                    tally.check(
                        offset,
                        len,
                        &what,
                        fast.window(0, window + 1).to_vec(),
                        slow.window(0, window + 1).to_vec(),
                    );
                }
            }
        }
    }
    tally.finish()
}

fn sweep_memmem(base: usize, max_len: usize, mismatches: &mut Vec<SweepMismatch>) -> FunctionTally {
    let mut tally = Tally::new("memmem_P", mismatches);
    for hay_len in 0..=max_len.min(MEMMEM_MAX_HAYSTACK) {
        for haystack in binary_words(hay_len) {
            for needle_len in 0..=MEMMEM_MAX_NEEDLE {
                for needle in binary_words(needle_len) {
                    for offset in 0..4 {
                        let image = RegionImage::from_bytes(base, offset, &needle);
                        image.reset_loads();
                        let a = string::memmem_p(&image, &haystack, base + offset, needle_len);
                        tally.word_loads += image.loads();
                        image.reset_loads();
                        let b = reference::memmem(&image, &haystack, base + offset, needle_len);
                        tally.reference_loads += image.loads();
                        let what = format!(
                            "haystack {:?} needle {:?}",
                            String::from_utf8_lossy(&haystack),
                            String::from_utf8_lossy(&needle)
                        );
                        tally.check(offset, hay_len, &what, a, b);
                    }
                }
            }
        }
    }
    tally.finish()
}

/// Runs the full sweep. One summary entry per routine goes to `log` if given.
pub fn run_sweep(
    layout: RegionLayout,
    max_len: usize,
    mut log: Option<&mut LogEmitter>,
) -> std::io::Result<SweepReport> {
    let base = layout.base();
    let mut mismatches = Vec::new();
    let sweeps: [fn(usize, usize, &mut Vec<SweepMismatch>) -> FunctionTally; 4] =
        [sweep_strnlen, sweep_memcpy, sweep_strncpy, sweep_memmem];

    let mut functions = Vec::with_capacity(sweeps.len());
    for sweep in sweeps {
        let tally = sweep(base, max_len, &mut mismatches);
        if let Some(log) = log.as_deref_mut() {
            let (level, outcome) = if tally.mismatches == 0 {
                (LogLevel::Info, Outcome::Pass)
            } else {
                (LogLevel::Error, Outcome::Fail)
            };
            log.emit_entry(
                LogEntry::new("", level, "sweep_function")
                    .with_stream(StreamKind::Sweep)
                    .with_symbol(&tally.function)
                    .with_outcome(outcome)
                    .with_details(serde_json::json!({
                        "cases": tally.cases,
                        "mismatches": tally.mismatches,
                        "word_loads": tally.word_loads,
                        "reference_loads": tally.reference_loads,
                    })),
            )?;
        }
        functions.push(tally);
    }

    Ok(SweepReport {
        max_len,
        region_base: base,
        cases: functions.iter().map(|f| f.cases).sum(),
        functions,
        mismatches,
    })
}
