use alloc::string::String;
use core::fmt;

use crate::bits::RawKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The type was never registered as a flag enum.
    UnregisteredType { type_name: &'static str },
    /// A token matched no declared member name and no requested numeric
    /// format.
    UnknownToken { token: String },
    /// A numeric token does not fit the underlying integer type.
    ValueOutOfRange { token: String, kind: RawKind },
    /// The parse delimiter was empty after trimming.
    EmptyDelimiter,
}

pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnregisteredType { type_name } => {
                write!(f, "`{}` is not a registered flag enum", type_name)
            }
            Error::UnknownToken { token } => {
                write!(f, "`{}` matches no declared flag name or numeric literal", token)
            }
            Error::ValueOutOfRange { token, kind } => {
                write!(f, "`{}` is out of range for {}", token, kind)
            }
            Error::EmptyDelimiter => f.write_str("flag delimiter is empty"),
        }
    }
}

impl core::error::Error for Error {}
