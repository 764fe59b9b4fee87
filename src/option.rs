use std::fmt::{Display, Formatter};
use std::str::FromStr;

use regex::Regex;

use crate::error::OptionErr;
use crate::util::{OptionValidator, Util};

/// A parsed (or defaulted) option value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Str(String),
    Int(i64),
    Bool(bool),
    /// One of the enumerated symbols of a switch option.
    Symbol(String),
    List(Vec<Value>),
    /// The option was not given and declares no default.
    Unset,
}

impl Value {
    /// Create a [`Value::Symbol`].
    pub fn symbol(symbol: &str) -> Value {
        Value::Symbol(symbol.to_owned())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Value::Unset)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Str(s) | Value::Symbol(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::List(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_str("]")
            }
            Value::Unset => f.write_str("unset"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

/// The closed set of transforms applied to validated raw values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Converter {
    /// Parse the value as a signed 64-bit integer.
    Integer,
}

impl Converter {
    /// Returns [`None`] when the raw value cannot be converted.
    pub fn convert(&self, raw: &str) -> Option<Value> {
        match self {
            Converter::Integer => raw.parse::<i64>().ok().map(Value::Int),
        }
    }
}

impl FromStr for Converter {
    type Err = OptionErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "to_i" | "int" | "integer" => Ok(Converter::Integer),
            _ => Err(OptionErr::UnknownConverter(s.to_owned())),
        }
    }
}

/// Validation and conversion applied to every raw value of a scalar or multi option.
#[derive(Clone, Debug, Default)]
pub struct ValueRule {
    regex: Option<Regex>,
    converter: Option<Converter>,
}

impl ValueRule {
    /// Validate and convert a raw value.
    ///
    /// Returns [`None`] if the value does not match the anchored pattern or
    /// cannot be converted.
    pub fn apply(&self, raw: &str) -> Option<Value> {
        if let Some(regex) = &self.regex {
            if !regex.is_match(raw) {
                return None;
            }
        }
        match self.converter {
            Some(converter) => converter.convert(raw),
            None => Some(Value::Str(raw.to_owned())),
        }
    }

    pub fn get_regex(&self) -> Option<&Regex> {
        self.regex.as_ref()
    }

    pub fn get_converter(&self) -> Option<Converter> {
        self.converter
    }
}

/// One enumerated member of a switch option.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Choice {
    symbol: String,
    flag: String,
}

impl Choice {
    fn new(symbol: &str) -> Choice {
        Choice {
            symbol: symbol.to_owned(),
            flag: Util::flag_name(symbol),
        }
    }

    pub fn get_symbol(&self) -> &str {
        &self.symbol
    }

    pub fn get_flag(&self) -> &str {
        &self.flag
    }
}

/// The kind of an option, carrying only the settings that apply to it.
#[derive(Clone, Debug)]
pub enum OptionKind {
    /// `--flag VALUE`, the last occurrence wins.
    Scalar { rule: ValueRule, default: Option<Value> },
    /// `--flag VALUE`, repeatable, all occurrences kept in order.
    Multi { rule: ValueRule, default: Option<Vec<Value>> },
    /// `--flag`, consumes no value.
    Boolean { default: Option<bool> },
    /// A group of standalone flags `--<symbol>`, the last one given wins.
    Switch { choices: Vec<Choice>, default: Option<String> },
}

impl OptionKind {
    pub fn takes_value(&self) -> bool {
        matches!(self, OptionKind::Scalar { .. } | OptionKind::Multi { .. })
    }
}

/// The `OptionSpec` declares a single option.
///
/// The command line flag is derived once from the name: `arg_0` is
/// matched as `--arg-0`.
///
/// # Examples
///
/// A required option whose value must be a number, converted to an integer:
/// ```
/// use declopt::{Converter, OptionSpec};
/// let spec = OptionSpec::builder("warning_level")
///     .required(true)
///     .regex("[0-9]+")
///     .convert(Converter::Integer)
///     .build()
///     .unwrap();
/// assert_eq!("--warning-level", spec.get_flag());
/// ```
///
/// A switch option matched by `--fast` or `--slow`:
/// ```
/// use declopt::{OptionSpec, Value};
/// let spec = OptionSpec::builder("mode")
///     .switch(["fast", "slow"])
///     .default(Value::symbol("fast"))
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct OptionSpec {
    name: String,
    flag: String,
    required: bool,
    description: Option<String>,
    kind: OptionKind,
}

#[derive(Clone, Debug)]
enum KindTag {
    Scalar,
    Multi,
    Boolean,
    Switch(Vec<String>),
}

/// A builder struct for [`OptionSpec`].
pub struct OptionBuilder {
    name: String,
    description: Option<String>,
    required: bool,
    kind: KindTag,
    regex: Option<String>,
    converter: Option<Converter>,
    converter_name: Option<String>,
    default: Option<Value>,
}

impl OptionBuilder {
    /// Build an [`OptionSpec`] with configured values.
    ///
    /// # Error
    ///
    /// Returns an error if:
    /// - `name` is blank, does not start with a letter or contains characters
    ///   other than ASCII alphanumerics and `_`.
    /// - the regex does not compile.
    /// - the conversion name is unknown.
    /// - a switch declares no options.
    /// - a setting or default does not fit the option kind.
    pub fn build(self) -> Result<OptionSpec, OptionErr> {
        OptionValidator::validate(&self.name)?;

        let converter = match (self.converter, &self.converter_name) {
            (Some(converter), _) => Some(converter),
            (None, Some(converter_name)) => Some(converter_name.parse::<Converter>()?),
            (None, None) => None,
        };

        let regex = match &self.regex {
            Some(pattern) => Some(Regex::new(&Util::anchor_pattern(pattern)).map_err(|e| {
                OptionErr::InvalidRegex { name: self.name.clone(), source: e }
            })?),
            None => None,
        };

        let kind = match self.kind {
            KindTag::Scalar => {
                if let Some(Value::List(_)) = self.default {
                    return Err(OptionErr::incompatible(&self.name, "list default on a single value option"));
                }
                let default = self.default.filter(|d| !d.is_unset());
                OptionKind::Scalar { rule: ValueRule { regex, converter }, default }
            }
            KindTag::Multi => {
                let default = match self.default {
                    None | Some(Value::Unset) => None,
                    Some(Value::List(values)) => Some(values),
                    Some(_) => {
                        return Err(OptionErr::incompatible(&self.name, "multi option default must be a list"));
                    }
                };
                OptionKind::Multi { rule: ValueRule { regex, converter }, default }
            }
            KindTag::Boolean => {
                Self::check_no_rule(&self.name, "boolean", &regex, converter)?;
                let default = match self.default {
                    None | Some(Value::Unset) => None,
                    Some(Value::Bool(b)) => Some(b),
                    Some(_) => {
                        return Err(OptionErr::incompatible(&self.name, "boolean option default must be a bool"));
                    }
                };
                OptionKind::Boolean { default }
            }
            KindTag::Switch(symbols) => {
                Self::check_no_rule(&self.name, "switch", &regex, converter)?;
                if symbols.is_empty() {
                    return Err(OptionErr::EmptySwitch(self.name));
                }
                for symbol in &symbols {
                    OptionValidator::validate(symbol)?;
                }
                let default = match self.default {
                    None | Some(Value::Unset) => None,
                    Some(Value::Symbol(s)) | Some(Value::Str(s)) => Some(s),
                    Some(_) => {
                        return Err(OptionErr::incompatible(&self.name, "switch option default must be a symbol"));
                    }
                };
                let choices = symbols.iter().map(|s| Choice::new(s)).collect();
                OptionKind::Switch { choices, default }
            }
        };

        Ok(OptionSpec {
            flag: Util::flag_name(&self.name),
            name: self.name,
            required: self.required,
            description: self.description,
            kind,
        })
    }

    fn check_no_rule(
        name: &str,
        kind: &str,
        regex: &Option<Regex>,
        converter: Option<Converter>,
    ) -> Result<(), OptionErr> {
        if regex.is_some() {
            return Err(OptionErr::incompatible(name, &format!("regex is not allowed on a {} option", kind)));
        }
        if converter.is_some() {
            return Err(OptionErr::incompatible(name, &format!("conversion is not allowed on a {} option", kind)));
        }
        Ok(())
    }

    /// Set the description of the option.
    pub fn desc(mut self, description: &str) -> Self {
        self.description = Some(description.trim().to_owned());
        self
    }

    /// Whether the option must occur at least once.
    ///
    /// A required option without occurrence is an error even if it declares a default.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the validation pattern. The pattern must match the whole value.
    pub fn regex(mut self, pattern: &str) -> Self {
        self.regex = Some(pattern.to_owned());
        self
    }

    /// Set the conversion applied to each validated value.
    pub fn convert(mut self, converter: Converter) -> Self {
        self.converter = Some(converter);
        self.converter_name = None;
        self
    }

    /// Set the conversion by name, e.g. `"to_i"`. Unknown names fail in [`Self::build`].
    pub fn convert_named(mut self, converter_name: &str) -> Self {
        self.converter = None;
        self.converter_name = Some(converter_name.to_owned());
        self
    }

    /// Set the value used when the option does not occur.
    ///
    /// Defaults bypass validation and conversion.
    pub fn default<V: Into<Value>>(mut self, default: V) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Make the option a standalone flag yielding a bool.
    pub fn boolean(mut self) -> Self {
        self.kind = KindTag::Boolean;
        self
    }

    /// Make the option repeatable, yielding all values in order.
    pub fn multi(mut self) -> Self {
        self.kind = KindTag::Multi;
        self
    }

    /// Make the option a group of standalone flags, one per symbol.
    pub fn switch<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.kind = KindTag::Switch(symbols.into_iter().map(|s| s.as_ref().trim().to_owned()).collect());
        self
    }
}

impl OptionSpec {
    /// Create an [`OptionBuilder`] to configure the option.
    pub fn builder(name: &str) -> OptionBuilder {
        OptionBuilder {
            name: name.trim().to_owned(),
            description: None,
            required: false,
            kind: KindTag::Scalar,
            regex: None,
            converter: None,
            converter_name: None,
            default: None,
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_flag(&self) -> &str {
        &self.flag
    }

    pub fn get_kind(&self) -> &OptionKind {
        &self.kind
    }

    pub fn get_description(&self) -> Option<&String> {
        self.description.as_ref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The placeholder shown for the value in help output, e.g. `ARG_0`.
    pub fn get_arg_name(&self) -> String {
        self.name.to_ascii_uppercase()
    }

    /// The value used when the option does not occur.
    pub fn absent_value(&self) -> Value {
        match &self.kind {
            OptionKind::Scalar { default, .. } => default.clone().unwrap_or(Value::Unset),
            OptionKind::Multi { default, .. } => Value::List(default.clone().unwrap_or_default()),
            OptionKind::Boolean { default } => Value::Bool(default.unwrap_or(false)),
            OptionKind::Switch { default, .. } => match default {
                Some(symbol) => Value::Symbol(symbol.clone()),
                None => Value::Unset,
            },
        }
    }
}

impl Display for OptionSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut buf = String::from("[ option: ");
        buf.push_str(&self.name);
        buf.push(' ');

        match &self.kind {
            OptionKind::Scalar { .. } => buf.push_str(&format!("{} [ARG]", self.flag)),
            OptionKind::Multi { .. } => buf.push_str(&format!("{} [ARG...]", self.flag)),
            OptionKind::Boolean { .. } => buf.push_str(&self.flag),
            OptionKind::Switch { choices, .. } => {
                let flags: Vec<&str> = choices.iter().map(|c| c.get_flag()).collect();
                buf.push_str(&flags.join(" | "));
            }
        }

        buf.push_str(" :: ");
        buf.push_str(match self.description {
            Some(ref desc) => desc,
            None => "None",
        });
        buf.push_str(" ]");

        write!(f, "{}", buf)
    }
}

/// The `Options` is the ordered table of [`OptionSpec`]s a parser runs against.
///
/// # Examples
///
/// ```
/// use declopt::{OptionSpec, Options};
///
/// let mut options = Options::new();
/// options.add_option(OptionSpec::builder("host").required(true).build().unwrap()).unwrap();
/// options.add_option(OptionSpec::builder("verbose").boolean().build().unwrap()).unwrap();
/// assert_eq!(2, options.len());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Options {
    specs: Vec<OptionSpec>,
}

impl Options {
    /// Create an empty `Options` table.
    pub fn new() -> Options {
        Options { specs: Vec::new() }
    }

    /// Build a table from a list of specs, rejecting duplicate names.
    pub fn from_specs<I: IntoIterator<Item = OptionSpec>>(specs: I) -> Result<Options, OptionErr> {
        let mut options = Options::new();
        for spec in specs {
            options.add_option(spec)?;
        }
        Ok(options)
    }

    /// Append an [`OptionSpec`] to the table.
    ///
    /// # Error
    ///
    /// Returns [`OptionErr::DuplicateName`] if an option with the same name exists.
    pub fn add_option(&mut self, spec: OptionSpec) -> Result<(), OptionErr> {
        if self.has_option(spec.get_name()) {
            return Err(OptionErr::DuplicateName(spec.name));
        }
        self.specs.push(spec);
        Ok(())
    }

    pub fn get_option(&self, name: &str) -> Option<&OptionSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    pub fn get_options(&self) -> &[OptionSpec] {
        &self.specs
    }

    pub fn get_required_options(&self) -> Vec<&OptionSpec> {
        self.specs.iter().filter(|s| s.required).collect()
    }

    pub fn has_option(&self, name: &str) -> bool {
        self.get_option(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

#[cfg(test)]
mod test {
    use crate::error::OptionErr;
    use crate::option::{Converter, OptionKind, OptionSpec, Options, Value};

    #[test]
    fn test_flag_is_derived_from_name() {
        let spec = OptionSpec::builder("arg_0").build().unwrap();
        assert_eq!("arg_0", spec.get_name());
        assert_eq!("--arg-0", spec.get_flag());

        let spec = OptionSpec::builder("arg0").build().unwrap();
        assert_eq!("--arg0", spec.get_flag());
    }

    #[test]
    fn test_invalid_names() {
        assert_eq!(Some(OptionErr::BlankName), OptionSpec::builder(" ").build().err());
        assert!(OptionSpec::builder("arg-0").build().is_err());
        assert!(OptionSpec::builder("mode").switch(["fast", "not ok"]).build().is_err());
    }

    #[test]
    fn test_regex_is_anchored() {
        let spec = OptionSpec::builder("arg_0").regex("[abc]{3}").build().unwrap();
        let rule = match spec.get_kind() {
            OptionKind::Scalar { rule, .. } => rule,
            kind => panic!("unexpected kind {:?}", kind),
        };
        assert_eq!(Some(Value::from("abc")), rule.apply("abc"));
        assert_eq!(None, rule.apply("abcd"));
        assert_eq!(None, rule.apply("xabc"));
        assert_eq!(None, rule.apply("ab"));
    }

    #[test]
    fn test_alternation_is_anchored_as_a_whole() {
        let spec = OptionSpec::builder("level").regex("low|high").build().unwrap();
        let rule = match spec.get_kind() {
            OptionKind::Scalar { rule, .. } => rule,
            kind => panic!("unexpected kind {:?}", kind),
        };
        assert!(rule.apply("low").is_some());
        assert!(rule.apply("high").is_some());
        assert!(rule.apply("lowhigh").is_none());
        assert!(rule.apply("low!").is_none());
    }

    #[test]
    fn test_invalid_regex() {
        let err = OptionSpec::builder("arg_0").regex("[abc").build().unwrap_err();
        assert!(matches!(err, OptionErr::InvalidRegex { ref name, .. } if name == "arg_0"));
    }

    #[test]
    fn test_converter_lookup() {
        assert_eq!(Ok(Converter::Integer), "to_i".parse::<Converter>());
        assert_eq!(Ok(Converter::Integer), "integer".parse::<Converter>());
        assert_eq!(
            Err(OptionErr::UnknownConverter("to_sym".to_string())),
            "to_sym".parse::<Converter>()
        );

        let err = OptionSpec::builder("arg_0").convert_named("to_f").build().unwrap_err();
        assert_eq!(OptionErr::UnknownConverter("to_f".to_string()), err);

        let spec = OptionSpec::builder("arg_0").convert_named("to_i").build().unwrap();
        match spec.get_kind() {
            OptionKind::Scalar { rule, .. } => assert_eq!(Some(Converter::Integer), rule.get_converter()),
            kind => panic!("unexpected kind {:?}", kind),
        }
    }

    #[test]
    fn test_integer_conversion_is_stable() {
        let spec = OptionSpec::builder("count")
            .regex("-?[0-9]+")
            .convert(Converter::Integer)
            .build()
            .unwrap();
        let rule = match spec.get_kind() {
            OptionKind::Scalar { rule, .. } => rule,
            kind => panic!("unexpected kind {:?}", kind),
        };
        let first = rule.apply("123");
        assert_eq!(Some(Value::Int(123)), first);
        assert_eq!(first, rule.apply("123"));
        assert_eq!(Some(Value::Int(-7)), rule.apply("-7"));
        assert_eq!(None, rule.apply("99999999999999999999"));
    }

    #[test]
    fn test_kind_incompatible_settings() {
        assert!(matches!(
            OptionSpec::builder("verbose").boolean().regex("x").build(),
            Err(OptionErr::IncompatibleSetting { .. })
        ));
        assert!(matches!(
            OptionSpec::builder("mode").switch(["a"]).convert(Converter::Integer).build(),
            Err(OptionErr::IncompatibleSetting { .. })
        ));
        assert!(matches!(
            OptionSpec::builder("verbose").boolean().default("yes").build(),
            Err(OptionErr::IncompatibleSetting { .. })
        ));
        assert!(matches!(
            OptionSpec::builder("tag").multi().default("a").build(),
            Err(OptionErr::IncompatibleSetting { .. })
        ));
        assert!(matches!(
            OptionSpec::builder("host").default(vec!["a"]).build(),
            Err(OptionErr::IncompatibleSetting { .. })
        ));
        assert_eq!(
            Some(OptionErr::EmptySwitch("mode".to_string())),
            OptionSpec::builder("mode").switch(Vec::<&str>::new()).build().err()
        );
    }

    #[test]
    fn test_switch_choices() {
        let spec = OptionSpec::builder("arg0").switch(["opt0", "opt_1"]).build().unwrap();
        match spec.get_kind() {
            OptionKind::Switch { choices, default } => {
                let flags: Vec<&str> = choices.iter().map(|c| c.get_flag()).collect();
                assert_eq!(vec!["--opt0", "--opt-1"], flags);
                assert_eq!("opt_1", choices[1].get_symbol());
                assert_eq!(&None, default);
            }
            kind => panic!("unexpected kind {:?}", kind),
        }
    }

    #[test]
    fn test_absent_values() {
        let scalar = OptionSpec::builder("a").build().unwrap();
        assert_eq!(Value::Unset, scalar.absent_value());

        let scalar = OptionSpec::builder("a").default(10).build().unwrap();
        assert_eq!(Value::Int(10), scalar.absent_value());

        let multi = OptionSpec::builder("a").multi().build().unwrap();
        assert_eq!(Value::List(vec![]), multi.absent_value());

        let multi = OptionSpec::builder("a").multi().default(vec!["x", "y"]).build().unwrap();
        assert_eq!(Value::from(vec!["x", "y"]), multi.absent_value());

        let boolean = OptionSpec::builder("a").boolean().build().unwrap();
        assert_eq!(Value::Bool(false), boolean.absent_value());

        let switch = OptionSpec::builder("a").switch(["x"]).build().unwrap();
        assert_eq!(Value::Unset, switch.absent_value());

        let switch = OptionSpec::builder("a").switch(["x"]).default(Value::symbol("y")).build().unwrap();
        assert_eq!(Value::symbol("y"), switch.absent_value());
    }

    #[test]
    fn test_options_rejects_duplicate_names() {
        let mut options = Options::new();
        options.add_option(OptionSpec::builder("arg_0").build().unwrap()).unwrap();
        let err = options.add_option(OptionSpec::builder("arg_0").boolean().build().unwrap());
        assert_eq!(Err(OptionErr::DuplicateName("arg_0".to_string())), err);
        assert_eq!(1, options.len());
        assert!(options.has_option("arg_0"));
        assert!(!options.has_option("arg-0"));
    }

    #[test]
    fn test_required_options() {
        let options = Options::from_specs(vec![
            OptionSpec::builder("host").required(true).build().unwrap(),
            OptionSpec::builder("port").build().unwrap(),
            OptionSpec::builder("tag").multi().required(true).build().unwrap(),
        ])
        .unwrap();
        let names: Vec<&str> = options.get_required_options().iter().map(|s| s.get_name()).collect();
        assert_eq!(vec!["host", "tag"], names);
    }

    #[test]
    fn test_display() {
        let spec = OptionSpec::builder("arg_0").desc("the first arg").build().unwrap();
        assert_eq!("[ option: arg_0 --arg-0 [ARG] :: the first arg ]", spec.to_string());

        let spec = OptionSpec::builder("mode").switch(["fast", "slow"]).build().unwrap();
        assert_eq!("[ option: mode --fast | --slow :: None ]", spec.to_string());

        assert_eq!("[a, 1]", Value::List(vec![Value::from("a"), Value::Int(1)]).to_string());
    }
}
