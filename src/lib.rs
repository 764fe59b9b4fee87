//! # The Declopt Library
//!
//! The Declopt library parses command line arguments against a table of declared
//! options and produces a typed value for every option plus the tokens no option
//! consumed.
//!
//! Every option has a symbolic name, and its flag is derived from it: `arg_0` is
//! matched as `--arg-0`. Options come in four kinds:
//!
//! - scalar options, `--host VALUE`, the last occurrence wins
//! - multi options, `--tag VALUE`, repeatable, all values kept in order
//! - boolean options, `--verbose`, `false` unless given
//! - switch options, a group of standalone flags such as `--fast` and `--slow`
//!   yielding the symbol of the last one given
//!
//! Values of scalar and multi options can be validated by a regex that must match
//! the whole value, and converted to integers. Options can be required or declare a
//! default used when they do not occur.
//!
//! When parsing fails a single getopt style diagnostic is written to the error
//! stream before the error is returned:
//!
//! ```txt
//! check_disk: option '--warning' is required
//! check_disk: option `--warning' requires an argument
//! check_disk: option '--warning' is invalid: ten
//! ```
//!
//! # Examples
//!
//! A simple example.
//!
//! ```
//! use declopt::{process, Converter, OptionSpec, Options, Value};
//!
//! let options = Options::from_specs(vec![
//!     OptionSpec::builder("warning")
//!         .required(true)
//!         .regex("[0-9]+")
//!         .convert(Converter::Integer)
//!         .build().unwrap(),
//!     OptionSpec::builder("path").multi().build().unwrap(),
//!     OptionSpec::builder("verbose").boolean().build().unwrap(),
//!     OptionSpec::builder("unit")
//!         .switch(["bytes", "percent"])
//!         .default(Value::symbol("percent"))
//!         .build().unwrap(),
//! ]).unwrap();
//!
//! let args = ["--warning", "80", "--path", "/", "--path", "/var", "--bytes", "extra"];
//! let cmd = process(&args, &options).unwrap();
//!
//! assert_eq!(Some(80), cmd.get_int("warning"));
//! assert_eq!(Some(&[Value::from("/"), Value::from("/var")][..]), cmd.get_list("path"));
//! assert_eq!(Some(false), cmd.get_bool("verbose"));
//! assert_eq!(Some("bytes"), cmd.get_symbol("unit"));
//! assert_eq!(vec!["extra"], cmd.get_arg_list());
//! ```
//!
//! A more complicated example, with the diagnostic captured instead of written to
//! standard error.
//!
//! ```
//! use std::io::{self, Write};
//! use std::sync::{Arc, Mutex};
//! use declopt::{DefaultParser, GetoptError, OptionSpec, Options, Parser};
//!
//! #[derive(Clone, Default)]
//! struct Captured(Arc<Mutex<Vec<u8>>>);
//!
//! impl Write for Captured {
//!     fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
//!         self.0.lock().unwrap().extend_from_slice(buf);
//!         Ok(buf.len())
//!     }
//!     fn flush(&mut self) -> io::Result<()> { Ok(()) }
//! }
//!
//! let mut options = Options::new();
//! options.add_option(OptionSpec::builder("arg_0").regex("[abc]{3}").build().unwrap()).unwrap();
//!
//! let captured = Captured::default();
//! let mut parser = DefaultParser::builder()
//!     .set_program_name("check_thing")
//!     .set_error_sink(captured.clone())
//!     .build();
//!
//! let err = parser.parse_args(&options, &["--arg-0", "abcd"]).unwrap_err();
//! assert_eq!(
//!     GetoptError::InvalidValue { flag: "--arg-0".to_string(), value: "abcd".to_string() },
//!     err
//! );
//! assert_eq!(
//!     b"check_thing: option '--arg-0' is invalid: abcd\n".to_vec(),
//!     *captured.0.lock().unwrap()
//! );
//! ```

pub use cmd::ParseResult;
pub use error::{GetoptError, OptionErr};
pub use format::HelpFormatter;
pub use option::{Choice, Converter, OptionBuilder, OptionKind, OptionSpec, Options, Value, ValueRule};
pub use parser::{process, DefaultParser, Parser, ParserBuilder};

mod cmd;
mod error;
mod format;
mod option;
mod parser;
mod util;
