/*
 * value.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Conversion between stored text and typed values.
//!
//! The set of supported types is closed: strings, the primitive integer
//! types, `f32`/`f64` and `bool`. Formatting and parsing are symmetric, so
//! a value written with [`format`] reads back unchanged with [`parse`].
//!
//! | type     | written as                 | read from                                   |
//! |----------|----------------------------|---------------------------------------------|
//! | `String` | itself                     | itself, untrimmed                           |
//! | integers | decimal                    | decimal, surrounding whitespace ignored     |
//! | floats   | shortest exact form        | decimal/exponent, `inf`, `NaN`, trimmed     |
//! | `bool`   | `true` / `false`           | `true`/`false` (any case) or `1`/`0`, trimmed |

use crate::{Error, Result};

mod sealed {
    pub trait Sealed {}
}

/// Types that can be read from node or attribute text.
pub trait FromXmlText: sealed::Sealed + Sized {
    /// Name used in conversion error messages.
    const TYPE_NAME: &'static str;

    fn from_xml_text(text: &str) -> Result<Self>;
}

/// Types that can be written as node or attribute text.
pub trait ToXmlText: sealed::Sealed {
    fn to_xml_text(&self) -> String;
}

/// Reads `text` as a `T`.
///
/// ```rust
/// use xmlkit::value::parse;
///
/// assert_eq!(parse::<i32>("  42  ").unwrap(), 42);
/// assert!(parse::<i32>("12abc").is_err());
/// assert_eq!(parse::<bool>("TRUE").unwrap(), true);
/// ```
pub fn parse<T: FromXmlText>(text: &str) -> Result<T> {
    T::from_xml_text(text)
}

/// Writes `value` in its canonical text form.
pub fn format<T: ToXmlText + ?Sized>(value: &T) -> String {
    value.to_xml_text()
}

/// Rejects text that cannot be written as an element or attribute name.
pub(crate) fn check_name(name: &str) -> Result<()> {
    if xmlkit_tree::is_valid_name(name) {
        Ok(())
    } else {
        Err(Error::conversion(format!("'{}' is not a valid XML name", name)))
    }
}

/// Rejects comment text containing `--` or ending with `-`.
pub(crate) fn check_comment(content: &str) -> Result<()> {
    if xmlkit_tree::is_valid_comment(content) {
        Ok(())
    } else {
        Err(Error::conversion(format!(
            "'{}' cannot be written as a comment",
            content
        )))
    }
}

/// Rejects stylesheet pseudo-attribute values that no quoting can hold.
pub(crate) fn check_pseudo_attribute(value: &str) -> Result<()> {
    if (value.contains('"') && value.contains('\'')) || value.contains("?>") {
        return Err(Error::conversion(format!(
            "'{}' cannot be written in a stylesheet reference",
            value
        )));
    }
    Ok(())
}

fn invalid(text: &str, type_name: &str) -> Error {
    Error::conversion(format!("'{}' is not a valid {}", text, type_name))
}

/// Trims the text and rejects empty content for non-string types.
fn trimmed<'a>(text: &'a str, type_name: &str) -> Result<&'a str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::conversion(format!(
            "empty text cannot be read as {}",
            type_name
        )));
    }
    Ok(trimmed)
}

impl sealed::Sealed for String {}
impl sealed::Sealed for str {}
impl<T: sealed::Sealed + ?Sized> sealed::Sealed for &T {}

impl FromXmlText for String {
    const TYPE_NAME: &'static str = "string";

    fn from_xml_text(text: &str) -> Result<Self> {
        Ok(text.to_string())
    }
}

impl ToXmlText for String {
    fn to_xml_text(&self) -> String {
        self.clone()
    }
}

impl ToXmlText for str {
    fn to_xml_text(&self) -> String {
        self.to_string()
    }
}

impl<T: ToXmlText + ?Sized> ToXmlText for &T {
    fn to_xml_text(&self) -> String {
        (**self).to_xml_text()
    }
}

macro_rules! number_text {
    ($($ty:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl FromXmlText for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn from_xml_text(text: &str) -> Result<Self> {
                    let trimmed = trimmed(text, Self::TYPE_NAME)?;
                    trimmed
                        .parse::<$ty>()
                        .map_err(|_| invalid(text, Self::TYPE_NAME))
                }
            }

            impl ToXmlText for $ty {
                fn to_xml_text(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

number_text!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);

impl sealed::Sealed for bool {}

impl FromXmlText for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_xml_text(text: &str) -> Result<Self> {
        let trimmed = trimmed(text, Self::TYPE_NAME)?;
        if trimmed == "1" || trimmed.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if trimmed == "0" || trimmed.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(invalid(text, Self::TYPE_NAME))
        }
    }
}

impl ToXmlText for bool {
    fn to_xml_text(&self) -> String {
        let text = if *self { "true" } else { "false" };
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn roundtrip<T: FromXmlText + ToXmlText + PartialEq + std::fmt::Debug>(value: T) {
        let text = format(&value);
        assert_eq!(parse::<T>(&text).unwrap(), value, "via {:?}", text);
    }

    #[test]
    fn test_integers() {
        assert_eq!(parse::<i32>("42").unwrap(), 42);
        assert_eq!(parse::<i32>("  42  ").unwrap(), 42);
        assert_eq!(parse::<i64>("-7").unwrap(), -7);
        assert_eq!(parse::<u8>("+8").unwrap(), 8);
        assert_eq!(format(&-15i16), "-15");
    }

    #[test]
    fn test_integer_failures() {
        let err = parse::<i32>("12abc").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conversion);
        assert_eq!(err.message(), "'12abc' is not a valid i32");

        assert!(parse::<u8>("256").is_err());
        assert!(parse::<u32>("-1").is_err());
        assert!(parse::<i32>("4 2").is_err());
        assert!(parse::<i32>("1.5").is_err());
    }

    #[test]
    fn test_empty_text_is_a_conversion_error() {
        for text in ["", "   ", "\n\t"] {
            let err = parse::<i32>(text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Conversion);
            assert!(parse::<bool>(text).is_err());
            assert!(parse::<f64>(text).is_err());
        }
    }

    #[test]
    fn test_floats() {
        assert_eq!(parse::<f64>(" 2.5 ").unwrap(), 2.5);
        assert_eq!(parse::<f64>("1e3").unwrap(), 1000.0);
        assert!(parse::<f64>("inf").unwrap().is_infinite());
        assert!(parse::<f64>("NaN").unwrap().is_nan());
        assert!(parse::<f32>("2.5x").is_err());
        assert_eq!(format(&0.1f64), "0.1");
        assert_eq!(format(&1.0f64), "1");
    }

    #[test]
    fn test_bools() {
        for text in ["true", "TRUE", "True", "1", " true "] {
            assert!(parse::<bool>(text).unwrap(), "{text}");
        }
        for text in ["false", "FALSE", "0", "\tfalse"] {
            assert!(!parse::<bool>(text).unwrap(), "{text}");
        }
        for text in ["yes", "no", "2", "t"] {
            assert_eq!(
                parse::<bool>(text).unwrap_err().kind(),
                ErrorKind::Conversion
            );
        }
        assert_eq!(format(&true), "true");
        assert_eq!(format(&false), "false");
    }

    #[test]
    fn test_strings_are_identity() {
        assert_eq!(parse::<String>("  padded  ").unwrap(), "  padded  ");
        assert_eq!(parse::<String>("").unwrap(), "");
        assert_eq!(format("as is"), "as is");
        assert_eq!(format(&String::from("owned")), "owned");
    }

    #[test]
    fn test_roundtrips() {
        roundtrip(i8::MIN);
        roundtrip(i64::MAX);
        roundtrip(u128::MAX);
        roundtrip(usize::MAX);
        roundtrip(0.1f32);
        roundtrip(f64::MIN_POSITIVE);
        roundtrip(-1.0e300f64);
        roundtrip(1.0f64 / 3.0);
        roundtrip(f64::INFINITY);
        roundtrip(true);
        roundtrip(false);
        roundtrip(String::from(" spaced <&> text "));
    }
}
