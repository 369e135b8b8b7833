use alloc::string::String;
use core::num::IntErrorKind;

use crate::bits::Bits;
use crate::descriptor::Descriptor;
use crate::error::{Error, Result};
use crate::format::{FlagFormat, DEFAULT_DELIMITER};

pub(crate) const DEFAULT_PARSE_FORMATS: &[FlagFormat] = &[FlagFormat::Name, FlagFormat::Value];

#[derive(Clone, Copy, Debug)]
pub struct ParseOptions<'a> {
    pub ignore_case: bool,
    pub delimiter: &'a str,
    pub formats: &'a [FlagFormat],
}

impl<'a> ParseOptions<'a> {
    pub fn ignore_case(self, ignore_case: bool) -> Self {
        ParseOptions { ignore_case, ..self }
    }

    pub fn delimiter(self, delimiter: &'a str) -> Self {
        ParseOptions { delimiter, ..self }
    }

    pub fn formats(self, formats: &'a [FlagFormat]) -> Self {
        ParseOptions { formats, ..self }
    }
}

impl Default for ParseOptions<'_> {
    fn default() -> Self {
        ParseOptions {
            ignore_case: false,
            delimiter: DEFAULT_DELIMITER,
            formats: DEFAULT_PARSE_FORMATS,
        }
    }
}

impl<B: Bits> Descriptor<B> {
    /// Parse a delimited list of flag tokens and OR them together.
    ///
    /// Tokens are trimmed; empty segments contribute nothing, and input with
    /// no tokens at all parses to the zero value. Numeric tokens may carry
    /// bits outside the declared mask; that is accepted, validity checking
    /// is the caller's separate concern.
    pub fn parse(&self, text: &str, options: &ParseOptions<'_>) -> Result<B> {
        let delimiter = options.delimiter.trim();
        if delimiter.is_empty() {
            return Err(Error::EmptyDelimiter);
        }
        let formats = if options.formats.is_empty() {
            DEFAULT_PARSE_FORMATS
        } else {
            options.formats
        };

        let mut value = B::default();
        for segment in text.split(delimiter) {
            let token = segment.trim();
            if token.is_empty() {
                continue;
            }
            value = value | self.resolve(token, options.ignore_case, formats)?;
        }
        Ok(value)
    }

    fn resolve(&self, token: &str, ignore_case: bool, formats: &[FlagFormat]) -> Result<B> {
        let mut overflowed = false;
        for format in formats {
            match format {
                FlagFormat::Name => {
                    if let Some(member) = self.member_by_name(token, ignore_case) {
                        return Ok(member.bits());
                    }
                }
                FlagFormat::Value | FlagFormat::HexValue => {
                    let radix = if matches!(format, FlagFormat::Value) { 10 } else { 16 };
                    match B::from_str_radix(token, radix) {
                        Ok(bits) => return Ok(bits),
                        Err(error) => {
                            if matches!(
                                error.kind(),
                                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow
                            ) {
                                overflowed = true;
                            }
                        }
                    }
                }
            }
        }
        Err(if overflowed {
            Error::ValueOutOfRange {
                token: String::from(token),
                kind: B::KIND,
            }
        } else {
            Error::UnknownToken {
                token: String::from(token),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::tests::{Alias, Perm};
    use crate::FlagEnum;

    #[test]
    fn parses_names_and_numeric_literals() {
        let descriptor = Perm::descriptor();
        let options = ParseOptions::default();
        assert_eq!(descriptor.parse("Read, Exec", &options), Ok(5));
        assert_eq!(descriptor.parse("Read,Exec", &options), Ok(5));
        assert_eq!(descriptor.parse("4", &options), Ok(4));
        assert_eq!(descriptor.parse("Read, 2", &options), Ok(3));
    }

    #[test]
    fn empty_segments_and_empty_input_are_not_errors() {
        let descriptor = Perm::descriptor();
        let options = ParseOptions::default();
        assert_eq!(descriptor.parse("Read,,Exec", &options), Ok(5));
        assert_eq!(descriptor.parse("", &options), Ok(0));
        assert_eq!(descriptor.parse("   ", &options), Ok(0));
        assert_eq!(descriptor.parse(" Read , Write ", &options), Ok(3));
    }

    #[test]
    fn unknown_tokens_fail() {
        let descriptor = Perm::descriptor();
        let error = descriptor.parse("Read, Purple", &ParseOptions::default()).unwrap_err();
        assert_eq!(
            error,
            Error::UnknownToken {
                token: String::from("Purple")
            }
        );
    }

    #[test]
    fn name_only_format_rejects_numerals() {
        let descriptor = Perm::descriptor();
        let options = ParseOptions::default().formats(&[FlagFormat::Name]);
        assert!(matches!(
            descriptor.parse("4", &options),
            Err(Error::UnknownToken { .. })
        ));
    }

    #[test]
    fn numeric_overflow_is_reported_as_out_of_range() {
        let descriptor = Perm::descriptor();
        let error = descriptor.parse("999", &ParseOptions::default()).unwrap_err();
        assert_eq!(
            error,
            Error::ValueOutOfRange {
                token: String::from("999"),
                kind: crate::RawKind::U8,
            }
        );
    }

    #[test]
    fn case_folding_is_opt_in() {
        let descriptor = Perm::descriptor();
        assert!(descriptor.parse("read", &ParseOptions::default()).is_err());
        let options = ParseOptions::default().ignore_case(true);
        assert_eq!(descriptor.parse("read, EXEC", &options), Ok(5));
    }

    #[test]
    fn delimiter_is_trimmed_and_must_not_be_blank() {
        let descriptor = Perm::descriptor();
        let options = ParseOptions::default().delimiter(" | ");
        assert_eq!(descriptor.parse("Read|Exec", &options), Ok(5));
        let options = ParseOptions::default().delimiter("   ");
        assert_eq!(descriptor.parse("Read", &options), Err(Error::EmptyDelimiter));
    }

    #[test]
    fn hex_format_parses_radix_sixteen() {
        let descriptor = Perm::descriptor();
        let options = ParseOptions::default().formats(&[FlagFormat::Name, FlagFormat::HexValue]);
        assert_eq!(descriptor.parse("ff", &options), Ok(0xff));
        // Radix 10 would have read this as ten.
        assert_eq!(descriptor.parse("10", &options), Ok(0x10));
    }

    #[test]
    fn undeclared_bits_are_accepted_from_numeric_tokens() {
        let descriptor = Perm::descriptor();
        assert_eq!(descriptor.parse("Read, 8", &ParseOptions::default()), Ok(9));
        assert!(!descriptor.is_valid(9));
    }

    #[test]
    fn every_alias_name_parses_to_the_shared_value() {
        let descriptor = Alias::descriptor();
        let options = ParseOptions::default();
        assert_eq!(descriptor.parse("Legacy", &options), Ok(1));
        assert_eq!(descriptor.parse("Primary", &options), Ok(1));
        assert_eq!(descriptor.parse("Legacy, Primary", &options), Ok(1));
    }
}
