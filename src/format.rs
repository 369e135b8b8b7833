use alloc::format;
use alloc::string::String;

use crate::bits::Bits;
use crate::descriptor::{Descriptor, Member};

/// Default delimiter for formatting; parsing trims it before splitting, so
/// the same default both renders `"Red, Blue"` and accepts `"Red,Blue"`.
pub const DEFAULT_DELIMITER: &str = ", ";

/// How a single flag is rendered, and which token shapes parsing accepts.
///
/// A slice of formats is a priority list: the first entry decides rendering,
/// and parsing tries each in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlagFormat {
    /// The declared member name.
    Name,
    /// Decimal rendering of the underlying value.
    Value,
    /// Lower-case hexadecimal rendering of the underlying value, without a
    /// `0x` prefix.
    HexValue,
}

pub(crate) const DEFAULT_FORMATS: &[FlagFormat] = &[FlagFormat::Name];

#[derive(Clone, Copy, Debug)]
pub struct FormatOptions<'a> {
    pub delimiter: &'a str,
    pub formats: &'a [FlagFormat],
}

impl<'a> FormatOptions<'a> {
    pub fn delimiter(self, delimiter: &'a str) -> Self {
        FormatOptions { delimiter, ..self }
    }

    pub fn formats(self, formats: &'a [FlagFormat]) -> Self {
        FormatOptions { formats, ..self }
    }
}

impl Default for FormatOptions<'_> {
    fn default() -> Self {
        FormatOptions {
            delimiter: DEFAULT_DELIMITER,
            formats: DEFAULT_FORMATS,
        }
    }
}

fn render<B: Bits>(member: &Member<B>, formats: &[FlagFormat], out: &mut String) {
    match formats.first() {
        Some(FlagFormat::Value) => out.push_str(&format!("{}", member.bits())),
        Some(FlagFormat::HexValue) => out.push_str(&format!("{:x}", member.bits())),
        _ => out.push_str(member.name()),
    }
}

impl<B: Bits> Descriptor<B> {
    /// Render `value` as its declared flags joined by the delimiter.
    ///
    /// The zero value renders as the declared zero member, or the literal
    /// `"0"` when none exists. Returns `None` when `value` carries bits not
    /// reconstructible from declared flags; that is unrepresentable input,
    /// not an error.
    pub fn format(&self, value: B, options: &FormatOptions<'_>) -> Option<String> {
        let formats = if options.formats.is_empty() {
            DEFAULT_FORMATS
        } else {
            options.formats
        };

        let mut out = String::new();
        if value == B::default() {
            match self.zero_member() {
                Some(member) => render(member, formats, &mut out),
                None => out.push('0'),
            }
            return Some(out);
        }

        let mut covered = B::default();
        let mut first = true;
        for member in self.decompose(value) {
            if !first {
                out.push_str(options.delimiter);
            }
            render(&member, formats, &mut out);
            covered = covered | member.bits();
            first = false;
        }
        (covered == value).then_some(out)
    }
}
