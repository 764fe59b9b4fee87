use crate::error::OptionErr;

pub struct Util;

impl Util {
    /// Derive the command line flag for a symbolic name.
    ///
    /// Every `_` becomes `-` and the result is prefixed with `--`,
    /// so `arg_0` turns into `--arg-0`.
    pub fn flag_name(name: &str) -> String {
        format!("--{}", name.replace('_', "-"))
    }

    /// Wrap a pattern so it only matches a value end to end.
    pub fn anchor_pattern(pattern: &str) -> String {
        format!(r"\A(?:{})\z", pattern)
    }

    pub fn looks_like_flag(token: &str) -> bool {
        token.len() > 2 && token.starts_with("--")
    }
}

pub struct OptionValidator;

impl OptionValidator {
    fn is_valid_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_'
    }

    pub fn validate(name: &str) -> Result<(), OptionErr> {
        let first = match name.chars().next() {
            Some(c) => c,
            None => return Err(OptionErr::BlankName),
        };

        if !first.is_ascii_alphabetic() {
            return Err(OptionErr::IllegalName { name: name.to_owned(), ch: first });
        }

        if let Some(c) = name.chars().find(|c| !Self::is_valid_char(*c)) {
            return Err(OptionErr::IllegalName { name: name.to_owned(), ch: c });
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::error::OptionErr;
    use crate::util::{OptionValidator, Util};

    #[test]
    fn test_flag_name() {
        assert_eq!("--arg-0", Util::flag_name("arg_0"));
        assert_eq!("--arg0", Util::flag_name("arg0"));
        assert_eq!("--a-b-c", Util::flag_name("a_b_c"));
        assert_eq!("--trailing-", Util::flag_name("trailing_"));
    }

    #[test]
    fn test_anchor_pattern() {
        assert_eq!(r"\A(?:[abc]{3})\z", Util::anchor_pattern("[abc]{3}"));
        assert_eq!(r"\A(?:a|b)\z", Util::anchor_pattern("a|b"));
    }

    #[test]
    fn test_looks_like_flag() {
        assert!(Util::looks_like_flag("--foo"));
        assert!(!Util::looks_like_flag("--"));
        assert!(!Util::looks_like_flag("-f"));
        assert!(!Util::looks_like_flag("value"));
    }

    #[test]
    fn test_option_validator() {
        assert_eq!(Err(OptionErr::BlankName), OptionValidator::validate(""));
        assert!(OptionValidator::validate("arg_0").is_ok());
        assert!(OptionValidator::validate("arg0").is_ok());
        assert!(OptionValidator::validate("A").is_ok());
        assert!(OptionValidator::validate("warning_level").is_ok());
        assert_eq!(
            Err(OptionErr::IllegalName { name: "0arg".to_string(), ch: '0' }),
            OptionValidator::validate("0arg")
        );
        assert!(OptionValidator::validate("_arg").is_err());
        assert!(OptionValidator::validate("--arg").is_err());
        assert!(OptionValidator::validate("arg-0").is_err());
        assert!(OptionValidator::validate("arg 0").is_err());
    }
}
