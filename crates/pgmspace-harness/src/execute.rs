//! Executes one fixture case against an in-memory region image.
//!
//! The region operand is built with [`RegionImage::from_bytes`] at the
//! layout's base plus `offset`, so the same case exercises a different
//! alignment just by changing `offset`. A load the hardware would fault on
//! (misaligned, or outside the image) panics inside the image; that panic is
//! caught here and reported as [`ExecError::Fault`].
//!
//! Outputs are rendered as text: integers in decimal, absent results as
//! `null`, buffers as `Debug` byte arrays (`[97, 98, 0]`).

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use serde::{Deserialize, Serialize};

use pgmspace_core::string;
use pgmspace_core::{RegionImage, RegionLayout, RegionRead, SIZE_IRRELEVANT, reference};

/// Initial content of destination bytes the case does not supply.
pub const DEST_FILL: u8 = 0xee;

/// Every function name [`execute`] understands.
pub const SUPPORTED_FUNCTIONS: &[&str] = &[
    "strnlen_P",
    "strlen_P",
    "strstr_P",
    "memcpy_P",
    "memcmp_P",
    "memccpy_P",
    "memmem_P",
    "memchr_P",
    "strncpy_P",
    "strcpy_P",
    "strncat_P",
    "strcat_P",
    "strncmp_P",
    "strncasecmp_P",
    "strcmp_P",
    "strcasecmp_P",
    "pgm_read_byte",
    "pgm_read_word",
    "pgm_read_dword",
    "classify",
];

/// Functions that also have a byte-at-a-time reference form.
pub const ORACLE_FUNCTIONS: &[&str] = &["strnlen_P", "memcpy_P", "strncpy_P", "memmem_P"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecError {
    #[error("unsupported function `{0}`")]
    UnknownFunction(String),
    #[error("`{function}` needs input `{field}`")]
    MissingInput {
        function: String,
        field: &'static str,
    },
    #[error("malformed inputs: {0}")]
    BadInputs(String),
    #[error("`{0}` has no reference implementation")]
    NoReference(String),
    /// The routine performed a load the region does not permit, or hit one
    /// of its own precondition checks.
    #[error("fault: {0}")]
    Fault(String),
}

/// Which implementation of a routine to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Implementation {
    /// The routines in `pgmspace_core::string`.
    WordParallel,
    /// The byte-at-a-time oracle in `pgmspace_core::reference`.
    Reference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamedLength {
    #[serde(rename = "SIZE_IRRELEVANT")]
    SizeIrrelevant,
}

/// A length argument: a byte count or the `"SIZE_IRRELEVANT"` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Length {
    Count(usize),
    Named(NamedLength),
}

impl Length {
    #[must_use]
    pub fn get(self) -> usize {
        match self {
            Self::Count(n) => n,
            Self::Named(NamedLength::SizeIrrelevant) => SIZE_IRRELEVANT,
        }
    }
}

impl From<usize> for Length {
    fn from(n: usize) -> Self {
        if n == SIZE_IRRELEVANT {
            Self::Named(NamedLength::SizeIrrelevant)
        } else {
            Self::Count(n)
        }
    }
}

/// Inputs of a fixture case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaseInputs {
    /// Bytes placed in the region.
    pub region: Vec<u8>,
    /// Distance of the region data from the (word-aligned) base.
    pub offset: usize,
    /// RAM operand: haystack, comparison string, or existing `strncat` string.
    pub ram: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<Length>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dest_len: Option<usize>,
    /// Absolute address for `classify`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr: Option<usize>,
}

/// Parses `inputs` and runs `function` on them.
pub fn execute_case(
    function: &str,
    inputs: &serde_json::Value,
    layout: RegionLayout,
    implementation: Implementation,
) -> Result<String, ExecError> {
    let inputs: CaseInputs =
        serde_json::from_value(inputs.clone()).map_err(|e| ExecError::BadInputs(e.to_string()))?;
    execute(function, &inputs, layout, implementation)
}

/// Runs `function` on already-parsed inputs.
pub fn execute(
    function: &str,
    inputs: &CaseInputs,
    layout: RegionLayout,
    implementation: Implementation,
) -> Result<String, ExecError> {
    if !SUPPORTED_FUNCTIONS.contains(&function) {
        return Err(ExecError::UnknownFunction(function.to_string()));
    }
    if implementation == Implementation::Reference && !ORACLE_FUNCTIONS.contains(&function) {
        return Err(ExecError::NoReference(function.to_string()));
    }

    let image = RegionImage::from_bytes(layout.base(), inputs.offset, &inputs.region);
    let call = Call {
        function,
        inputs,
        image: &image,
        src: layout.base() + inputs.offset,
        reference: implementation == Implementation::Reference,
    };
    catch_unwind(AssertUnwindSafe(|| call.run(layout)))
        .unwrap_or_else(|payload| Err(ExecError::Fault(panic_message(payload.as_ref()))))
}

struct Call<'a> {
    function: &'a str,
    inputs: &'a CaseInputs,
    image: &'a RegionImage<Vec<u32>>,
    src: usize,
    reference: bool,
}

impl Call<'_> {
    fn missing(&self, field: &'static str) -> ExecError {
        ExecError::MissingInput {
            function: self.function.to_string(),
            field,
        }
    }

    fn n(&self) -> Result<usize, ExecError> {
        self.inputs.n.map(Length::get).ok_or_else(|| self.missing("n"))
    }

    fn c(&self) -> Result<u8, ExecError> {
        self.inputs.c.ok_or_else(|| self.missing("c"))
    }

    fn dest_len(&self) -> Result<usize, ExecError> {
        self.inputs.dest_len.ok_or_else(|| self.missing("dest_len"))
    }

    /// `ram` extended (or cut) to `len` bytes, extra bytes set to [`DEST_FILL`].
    fn dest(&self, len: usize) -> Vec<u8> {
        let mut dest = self.inputs.ram.clone();
        dest.resize(len, DEST_FILL);
        dest
    }

    fn run(&self, layout: RegionLayout) -> Result<String, ExecError> {
        let image = self.image;
        let src = self.src;
        let ram = self.inputs.ram.as_slice();

        let out = match self.function {
            "strnlen_P" => {
                let n = self.n()?;
                let len = if self.reference {
                    reference::strnlen(image, src, n)
                } else {
                    string::strnlen_p(image, src, n)
                };
                len.to_string()
            }
            "strlen_P" => string::strlen_p(image, src).to_string(),
            "strstr_P" => render_index(string::strstr_p(image, ram, src)),
            "memcpy_P" => {
                let n = self.n()?;
                let mut dest = self.dest(self.inputs.dest_len.unwrap_or(n));
                if self.reference {
                    reference::memcpy(image, &mut dest, src, n);
                } else {
                    string::memcpy_p(image, &mut dest, src, n);
                }
                format!("{dest:?}")
            }
            "memcmp_P" => string::memcmp_p(image, ram, src, self.n()?).to_string(),
            "memccpy_P" => {
                let n = self.n()?;
                let mut dest = self.dest(self.inputs.dest_len.unwrap_or(n));
                let at = string::memccpy_p(image, &mut dest, src, self.c()?, n);
                format!("{} {dest:?}", render_index(at))
            }
            "memmem_P" => {
                let needle_len = self.inputs.n.map_or(self.inputs.region.len(), Length::get);
                let at = if self.reference {
                    reference::memmem(image, ram, src, needle_len)
                } else {
                    string::memmem_p(image, ram, src, needle_len)
                };
                render_index(at)
            }
            "memchr_P" => {
                let at = string::memchr_p(image, src, self.c()?, self.n()?);
                render_index(at.map(|addr| addr - src))
            }
            "strncpy_P" => {
                let n = self.n()?;
                let len = match self.inputs.dest_len {
                    Some(len) => len,
                    None if n != SIZE_IRRELEVANT => n,
                    None => return Err(self.missing("dest_len")),
                };
                let mut dest = self.dest(len);
                if self.reference {
                    reference::strncpy(image, &mut dest, src, n);
                } else {
                    string::strncpy_p(image, &mut dest, src, n);
                }
                format!("{dest:?}")
            }
            "strcpy_P" => {
                let mut dest = self.dest(self.dest_len()?);
                string::strcpy_p(image, &mut dest, src);
                format!("{dest:?}")
            }
            "strncat_P" | "strcat_P" => {
                let n = if self.function == "strcat_P" {
                    SIZE_IRRELEVANT
                } else {
                    self.n()?
                };
                let mut dest = self.dest(self.dest_len()?);
                let len = string::strncat_p(image, &mut dest, src, n);
                format!("{len} {dest:?}")
            }
            "strncmp_P" => string::strncmp_p(image, ram, src, self.n()?).to_string(),
            "strncasecmp_P" => string::strncasecmp_p(image, ram, src, self.n()?).to_string(),
            "strcmp_P" => string::strcmp_p(image, ram, src).to_string(),
            "strcasecmp_P" => string::strcasecmp_p(image, ram, src).to_string(),
            "pgm_read_byte" => image.read_byte(src).to_string(),
            "pgm_read_word" => image.read_half(src).to_string(),
            "pgm_read_dword" => image.read_dword(src).to_string(),
            "classify" => {
                let addr = self.inputs.addr.ok_or_else(|| self.missing("addr"))?;
                format!("{:?}", layout.classify(addr))
            }
            other => return Err(ExecError::UnknownFunction(other.to_string())),
        };
        Ok(out)
    }
}

fn render_index(at: Option<usize>) -> String {
    at.map_or_else(|| String::from("null"), |i| i.to_string())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("panic")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LAYOUT: RegionLayout = RegionLayout::ESP8266;

    fn run(function: &str, inputs: serde_json::Value) -> Result<String, ExecError> {
        execute_case(function, &inputs, LAYOUT, Implementation::WordParallel)
    }

    #[test]
    fn renders_integers_indices_and_buffers() {
        assert_eq!(run("strnlen_P", json!({"region": b"abc\0", "offset": 1, "n": 8})).unwrap(), "3");
        assert_eq!(
            run("strstr_P", json!({"region": b"lo\0", "ram": b"hello\0", "offset": 2})).unwrap(),
            "3"
        );
        assert_eq!(
            run("memmem_P", json!({"region": b"zz", "ram": b"hello"})).unwrap(),
            "null"
        );
        assert_eq!(
            run("memcpy_P", json!({"region": b"Sun", "offset": 3, "n": 3})).unwrap(),
            "[83, 117, 110]"
        );
    }

    #[test]
    fn size_irrelevant_is_accepted_by_name() {
        let out = run(
            "strncpy_P",
            json!({"region": b"ab\0", "n": "SIZE_IRRELEVANT", "dest_len": 5}),
        )
        .unwrap();
        assert_eq!(out, "[97, 98, 0, 238, 238]");
        assert!(matches!(
            run("strncpy_P", json!({"region": b"ab\0", "n": "SIZE_IRRELEVANT"})),
            Err(ExecError::MissingInput { field: "dest_len", .. })
        ));
    }

    #[test]
    fn strncat_reports_length_and_buffer() {
        let out = run(
            "strncat_P",
            json!({"region": b"def\0", "ram": b"abc\0", "n": 2, "dest_len": 7}),
        )
        .unwrap();
        assert_eq!(out, "5 [97, 98, 99, 100, 101, 0, 238]");
    }

    #[test]
    fn unterminated_region_string_faults() {
        let err = run("strlen_P", json!({"region": b"abcd"})).unwrap_err();
        assert!(matches!(err, ExecError::Fault(msg) if msg.contains("outside region image")));
    }

    #[test]
    fn reference_only_where_an_oracle_exists() {
        let inputs = json!({"region": b"abc\0", "n": 8});
        assert_eq!(
            execute_case("strnlen_P", &inputs, LAYOUT, Implementation::Reference).unwrap(),
            "3"
        );
        assert_eq!(
            execute_case("strlen_P", &inputs, LAYOUT, Implementation::Reference),
            Err(ExecError::NoReference(String::from("strlen_P")))
        );
    }

    #[test]
    fn classify_uses_layout() {
        assert_eq!(run("classify", json!({"addr": 0x3fff_fffc_usize})).unwrap(), "Ram");
        assert_eq!(run("classify", json!({"addr": 0x4000_0000_usize})).unwrap(), "Region");
    }

    #[test]
    fn rejects_unknown_function_and_fields() {
        assert_eq!(run("strtok_P", json!({})), Err(ExecError::UnknownFunction(String::from("strtok_P"))));
        assert!(matches!(run("strlen_P", json!({"bogus": 1})), Err(ExecError::BadInputs(_))));
    }

    #[test]
    fn memchr_reports_offset_from_source() {
        assert_eq!(
            run("memchr_P", json!({"region": b"abcabc", "offset": 1, "c": 99, "n": 6})).unwrap(),
            "2"
        );
        assert_eq!(
            run("memccpy_P", json!({"region": b"k=v", "c": 61, "n": 3})).unwrap(),
            "2 [107, 61, 238]"
        );
    }
}
