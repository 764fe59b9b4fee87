use std::collections::HashMap;
use std::env;
use std::io::{stderr, Write};
use std::process::exit;

use log::{debug, trace, warn};

use crate::cmd::ParseResult;
use crate::error::GetoptError;
use crate::option::{OptionKind, OptionSpec, Options, ValueRule, Value};
use crate::util::Util;

/// The parser trait to parse command line arguments.
pub trait Parser {
    /// Parse arguments from `env::args()`, skipping the program name, with provided `options`.
    ///
    /// # Error
    ///
    /// If the arguments don't meet the requirement of `options`, the diagnostic is
    /// written to the error sink and [`GetoptError`] is returned.
    ///
    /// Also see [`Self::parse_args`], [`Self::parse_or_exit`]
    fn parse(&mut self, options: &Options) -> Result<ParseResult, GetoptError>;

    /// Parse arguments from `env::args()` with provided `options`.
    ///
    /// # Error
    ///
    /// If the arguments don't meet the requirement of `options`, the diagnostic is
    /// written to the error sink and the process exits with status 1.
    ///
    /// Also see [`Self::parse_args`], [`Self::parse`]
    fn parse_or_exit(&mut self, options: &Options) -> ParseResult;

    /// Parse `arguments` with provided `options`.
    ///
    /// The `arguments` must not include the program name.
    ///
    /// # Error
    ///
    /// If the arguments don't meet the requirement of `options`, the diagnostic is
    /// written to the error sink and [`GetoptError`] is returned.
    ///
    /// Also see [`Self::parse_or_exit`], [`Self::parse`]
    fn parse_args<T: AsRef<str>>(&mut self, options: &Options, arguments: &[T]) -> Result<ParseResult, GetoptError>;
}

/// Parse `tokens` against `options` with a default configured [`DefaultParser`].
///
/// On failure the line `<program>: <message>` has been written to standard error
/// before the error is returned.
///
/// # Examples
///
/// ```
/// use declopt::{process, OptionSpec, Options};
///
/// let options = Options::from_specs(vec![
///     OptionSpec::builder("arg_0").required(true).build().unwrap(),
/// ]).unwrap();
///
/// let result = process(&["--arg-0", "arg_0_value"], &options).unwrap();
/// assert_eq!(Some("arg_0_value"), result.get_str("arg_0"));
/// assert!(result.get_arg_list().is_empty());
/// ```
pub fn process<T: AsRef<str>>(tokens: &[T], options: &Options) -> Result<ParseResult, GetoptError> {
    DefaultParser::builder().build().parse_args(options, tokens)
}

/// The default implementation of [`Parser`] trait.
pub struct DefaultParser {
    program_name: String,
    error_sink: Box<dyn Write + Send>,
    stop_at_double_dash: bool,
    reject_unknown_flags: bool,
}

/// A builder struct to create [`DefaultParser`].
pub struct ParserBuilder {
    program_name: Option<String>,
    error_sink: Option<Box<dyn Write + Send>>,
    stop_at_double_dash: bool,
    reject_unknown_flags: bool,
}

impl ParserBuilder {
    pub fn build(self) -> DefaultParser {
        DefaultParser {
            program_name: self.program_name.unwrap_or_else(default_program_name),
            error_sink: self.error_sink
                .unwrap_or_else(|| Box::new(stderr()) as Box<dyn Write + Send>),
            stop_at_double_dash: self.stop_at_double_dash,
            reject_unknown_flags: self.reject_unknown_flags,
        }
    }

    /// Set the program name prefixed to diagnostics. Defaults to `argv[0]`.
    pub fn set_program_name(mut self, program_name: &str) -> Self {
        self.program_name = Some(program_name.to_owned());
        self
    }

    /// Set where diagnostics are written. Defaults to standard error.
    pub fn set_error_sink<W: Write + Send + 'static>(mut self, sink: W) -> Self {
        self.error_sink = Some(Box::new(sink));
        self
    }

    /// Set whether a bare `--` ends option parsing.
    ///
    /// If set to `true`, `--` is dropped and every token after it is a leftover.
    /// Otherwise `--` is itself an ordinary leftover.
    pub fn set_stop_at_double_dash(mut self, stop: bool) -> Self {
        self.stop_at_double_dash = stop;
        self
    }

    /// Set whether a `--` prefixed token matching no declared flag is an error.
    ///
    /// If set to `false` (the default), such tokens are kept as leftovers.
    pub fn set_reject_unknown_flags(mut self, reject: bool) -> Self {
        self.reject_unknown_flags = reject;
        self
    }
}

fn default_program_name() -> String {
    env::args()
        .next()
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}

/// What a command line token resolves to.
#[derive(Clone, Copy)]
enum Target<'a> {
    /// The flag of the option at this index.
    Flag(usize),
    /// One enumerated flag of the switch option at this index.
    Choice(usize, &'a str),
}

/// Values collected for each option while scanning.
///
/// Value taking options record their validated and converted values, boolean
/// options `true` and switch options the matched symbol.
type Occurrences = Vec<Vec<Value>>;

impl DefaultParser {
    /// Get the builder to config parser.
    pub fn builder() -> ParserBuilder {
        ParserBuilder {
            program_name: None,
            error_sink: None,
            stop_at_double_dash: false,
            reject_unknown_flags: false,
        }
    }

    pub fn get_program_name(&self) -> &str {
        &self.program_name
    }

    fn flag_table(options: &Options) -> HashMap<&str, Target<'_>> {
        let mut table = HashMap::new();

        for (index, spec) in options.get_options().iter().enumerate() {
            match spec.get_kind() {
                OptionKind::Switch { choices, .. } => {
                    for choice in choices {
                        table
                            .entry(choice.get_flag())
                            .or_insert(Target::Choice(index, choice.get_symbol()));
                    }
                }
                _ => {
                    table.entry(spec.get_flag()).or_insert(Target::Flag(index));
                }
            }
        }
        table
    }

    fn scan(&self, options: &Options, tokens: &[&str]) -> Result<(Occurrences, ParseResult), GetoptError> {
        let table = Self::flag_table(options);
        let specs = options.get_options();

        let mut occurrences: Occurrences = vec![Vec::new(); specs.len()];
        let mut cmd = ParseResult::new();
        let mut tokens = tokens.iter().copied();

        while let Some(token) = tokens.next() {
            if self.stop_at_double_dash && token == "--" {
                debug!("stop parsing options at '--'");
                tokens.by_ref().for_each(|rest| cmd.add_arg(rest));
                break;
            }

            match table.get(token).copied() {
                Some(Target::Flag(index)) => {
                    let spec = &specs[index];
                    match spec.get_kind() {
                        OptionKind::Scalar { rule, .. } | OptionKind::Multi { rule, .. } => {
                            let raw = tokens.next().ok_or_else(|| GetoptError::MissingArgument {
                                flag: spec.get_flag().to_owned(),
                            })?;
                            debug!("option '{}' takes value '{}'", spec.get_name(), raw);
                            occurrences[index].push(Self::apply_rule(spec, rule, raw)?);
                        }
                        _ => {
                            debug!("option '{}' is present", spec.get_name());
                            occurrences[index].push(Value::Bool(true));
                        }
                    }
                }
                Some(Target::Choice(index, symbol)) => {
                    debug!("option '{}' selects '{}'", specs[index].get_name(), symbol);
                    occurrences[index].push(Value::Symbol(symbol.to_owned()));
                }
                None => self.handle_unknown_token(&mut cmd, token)?,
            }
        }

        Ok((occurrences, cmd))
    }

    fn handle_unknown_token(&self, cmd: &mut ParseResult, token: &str) -> Result<(), GetoptError> {
        if self.reject_unknown_flags && Util::looks_like_flag(token) {
            return Err(GetoptError::UnrecognizedOption { flag: token.to_owned() });
        }
        trace!("leftover token '{}'", token);
        cmd.add_arg(token);
        Ok(())
    }

    fn apply_rule(spec: &OptionSpec, rule: &ValueRule, raw: &str) -> Result<Value, GetoptError> {
        rule.apply(raw).ok_or_else(|| GetoptError::InvalidValue {
            flag: spec.get_flag().to_owned(),
            value: raw.to_owned(),
        })
    }

    fn resolve(options: &Options, occurrences: Occurrences, cmd: &mut ParseResult) -> Result<(), GetoptError> {
        for (spec, mut values) in options.get_options().iter().zip(occurrences) {
            let value = match spec.get_kind() {
                _ if values.is_empty() && spec.is_required() => {
                    return Err(GetoptError::RequiredOption { flag: spec.get_flag().to_owned() });
                }
                _ if values.is_empty() => spec.absent_value(),
                OptionKind::Multi { .. } => Value::List(values),
                // the last occurrence wins
                _ => values.pop().unwrap_or(Value::Unset),
            };

            debug!("option '{}' resolved to {:?}", spec.get_name(), value);
            cmd.set_value(spec.get_name(), value);
        }
        Ok(())
    }

    /// Write the single diagnostic line for `err` to the error sink.
    fn report(&mut self, err: &GetoptError) {
        let line = format!("{}: {}\n", self.program_name, err);
        let written = self
            .error_sink
            .write_all(line.as_bytes())
            .and_then(|_| self.error_sink.flush());

        if let Err(e) = written {
            warn!("failed to write diagnostic '{}': {}", err, e);
        }
    }
}

impl Parser for DefaultParser {
    fn parse(&mut self, options: &Options) -> Result<ParseResult, GetoptError> {
        self.parse_args(options, &env::args().skip(1).collect::<Vec<String>>())
    }

    fn parse_or_exit(&mut self, options: &Options) -> ParseResult {
        match self.parse(options) {
            Ok(cmd) => cmd,
            Err(_) => exit(1),
        }
    }

    fn parse_args<T>(&mut self, options: &Options, arguments: &[T]) -> Result<ParseResult, GetoptError>
    where
        T: AsRef<str>,
    {
        let tokens: Vec<&str> = arguments.iter().map(|a| a.as_ref()).collect();

        let result = self.scan(options, &tokens).and_then(|(occurrences, mut cmd)| {
            Self::resolve(options, occurrences, &mut cmd)?;
            Ok(cmd)
        });

        if let Err(err) = &result {
            self.report(err);
        }
        result
    }
}
