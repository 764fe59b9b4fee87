use thiserror::Error;

/// Argument parsing error.
///
/// The [`Display`](std::fmt::Display) output of every variant is the exact
/// diagnostic written to the error sink, minus the `<program>: ` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetoptError {
    /// A required option had no occurrence.
    #[error("option '{flag}' is required")]
    RequiredOption { flag: String },

    /// A value taking flag was the last token.
    #[error("option `{flag}' requires an argument")]
    MissingArgument { flag: String },

    /// A supplied value failed pattern validation or conversion.
    #[error("option '{flag}' is invalid: {value}")]
    InvalidValue { flag: String, value: String },

    /// A `--` prefixed token matched no declared flag. Only raised when
    /// [`ParserBuilder::set_reject_unknown_flags`](crate::ParserBuilder::set_reject_unknown_flags)
    /// is enabled.
    #[error("unrecognized option '{flag}'")]
    UnrecognizedOption { flag: String },
}

impl GetoptError {
    /// The flag the diagnostic cites.
    pub fn flag(&self) -> &str {
        match self {
            GetoptError::RequiredOption { flag }
            | GetoptError::MissingArgument { flag }
            | GetoptError::InvalidValue { flag, .. }
            | GetoptError::UnrecognizedOption { flag } => flag,
        }
    }
}

/// Error raised while declaring an [`OptionSpec`](crate::OptionSpec).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptionErr {
    #[error("illegal blank option name")]
    BlankName,

    #[error("the option '{name}' contains an illegal character: '{ch}'")]
    IllegalName { name: String, ch: char },

    #[error("the option '{name}' has an invalid regex")]
    InvalidRegex {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("unknown conversion '{0}'")]
    UnknownConverter(String),

    #[error("the switch option '{0}' declares no options")]
    EmptySwitch(String),

    #[error("for option '{name}', {desc}")]
    IncompatibleSetting { name: String, desc: String },

    #[error("duplicate option name '{0}'")]
    DuplicateName(String),
}

impl OptionErr {
    pub fn incompatible(name: &str, desc: &str) -> OptionErr {
        OptionErr::IncompatibleSetting {
            name: name.to_string(),
            desc: desc.to_string(),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::error::{GetoptError, OptionErr};

    #[test]
    fn test_getopt_error_messages() {
        let err = GetoptError::RequiredOption { flag: "--arg-0".to_string() };
        assert_eq!("option '--arg-0' is required", err.to_string());

        let err = GetoptError::MissingArgument { flag: "--arg-0".to_string() };
        assert_eq!("option `--arg-0' requires an argument", err.to_string());

        let err = GetoptError::InvalidValue {
            flag: "--arg-0".to_string(),
            value: "abcd".to_string(),
        };
        assert_eq!("option '--arg-0' is invalid: abcd", err.to_string());

        let err = GetoptError::UnrecognizedOption { flag: "--nope".to_string() };
        assert_eq!("unrecognized option '--nope'", err.to_string());
    }

    #[test]
    fn test_getopt_error_flag() {
        let err = GetoptError::InvalidValue {
            flag: "--count".to_string(),
            value: "x".to_string(),
        };
        assert_eq!("--count", err.flag());
        assert_eq!("--arg0", GetoptError::RequiredOption { flag: "--arg0".to_string() }.flag());
    }

    #[test]
    fn test_option_err_messages() {
        assert_eq!("illegal blank option name", OptionErr::BlankName.to_string());
        assert_eq!(
            "for option 'verbose', regex is not allowed on a boolean option",
            OptionErr::incompatible("verbose", "regex is not allowed on a boolean option").to_string()
        );
        assert_eq!("unknown conversion 'to_f'", OptionErr::UnknownConverter("to_f".to_string()).to_string());
    }
}
