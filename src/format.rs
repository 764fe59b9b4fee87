use std::io::{self, Write};

use crate::option::{OptionKind, OptionSpec, Options, Value};
use crate::util::Util;

pub const DEFAULT_LINE_SEPARATOR: &str = if cfg!(windows) { "\r\n" } else { "\n" };

const DEFAULT_WIDTH: usize = 74;
const DEFAULT_LEFT_PAD: usize = 4;
const DEFAULT_DESC_PAD: usize = 4;
const DEFAULT_SYNTAX_PREFIX: &str = "usage: ";

/// `HelpFormatter` renders usage information for the [`Options`].
///
/// The output format is like:
/// ```txt
/// usage: <cmd_syntax> --arg-0 <ARG_0> [--verbose] [--fast | --slow] [--tag <TAG> ...]
/// [header]
///     --arg-0 <ARG_0>      <description>
///     --verbose            <description>
///     --fast, --slow       <description>
///     --tag <TAG> ...      <description>
/// [footer]
/// ```
///
/// Declaration order is kept in both the usage line and the option list.
pub struct HelpFormatter {
    width: usize,
    left_pad: usize,
    desc_pad: usize,
    syntax_prefix: String,
    newline: String,
    cmd_syntax: String,
    show_defaults: bool,
    header: Option<String>,
    footer: Option<String>,
}

impl HelpFormatter {
    /// Create a `HelpFormatter` with default configuration.
    ///
    /// The `cmd_syntax` is typically the name of the executable, e.g. `"check_disk"`.
    pub fn new(cmd_syntax: &str) -> HelpFormatter {
        HelpFormatter {
            width: DEFAULT_WIDTH,
            left_pad: DEFAULT_LEFT_PAD,
            desc_pad: DEFAULT_DESC_PAD,
            syntax_prefix: DEFAULT_SYNTAX_PREFIX.to_string(),
            newline: DEFAULT_LINE_SEPARATOR.to_string(),
            cmd_syntax: cmd_syntax.to_string(),
            show_defaults: true,
            header: None,
            footer: None,
        }
    }

    fn append_option(&self, buff: &mut String, spec: &OptionSpec) {
        let required = spec.is_required();
        if !required {
            buff.push('[');
        }

        match spec.get_kind() {
            OptionKind::Switch { choices, .. } => {
                let flags: Vec<&str> = choices.iter().map(|c| c.get_flag()).collect();
                buff.push_str(&flags.join(" | "));
            }
            OptionKind::Boolean { .. } => buff.push_str(spec.get_flag()),
            OptionKind::Scalar { .. } => {
                buff.push_str(&format!("{} <{}>", spec.get_flag(), spec.get_arg_name()));
            }
            OptionKind::Multi { .. } => {
                buff.push_str(&format!("{} <{}> ...", spec.get_flag(), spec.get_arg_name()));
            }
        }

        if !required {
            buff.push(']');
        }
    }

    fn option_column(&self, spec: &OptionSpec) -> String {
        let mut opt_buff = self.create_padding(self.left_pad);

        match spec.get_kind() {
            OptionKind::Switch { choices, .. } => {
                let flags: Vec<&str> = choices.iter().map(|c| c.get_flag()).collect();
                opt_buff.push_str(&flags.join(", "));
            }
            OptionKind::Boolean { .. } => opt_buff.push_str(spec.get_flag()),
            OptionKind::Scalar { .. } => {
                opt_buff.push_str(&format!("{} <{}>", spec.get_flag(), spec.get_arg_name()));
            }
            OptionKind::Multi { .. } => {
                opt_buff.push_str(&format!("{} <{}> ...", spec.get_flag(), spec.get_arg_name()));
            }
        }
        opt_buff
    }

    fn description(&self, spec: &OptionSpec) -> String {
        let mut desc = spec.get_description().cloned().unwrap_or_default();

        if self.show_defaults && !spec.is_required() {
            let shown = match spec.get_kind() {
                OptionKind::Scalar { default: Some(_), .. }
                | OptionKind::Multi { default: Some(_), .. }
                | OptionKind::Boolean { default: Some(true) }
                | OptionKind::Switch { default: Some(_), .. } => Some(spec.absent_value()),
                _ => None,
            };
            if let Some(value) = shown {
                if !desc.is_empty() {
                    desc.push(' ');
                }
                let value = match value {
                    Value::Symbol(symbol) => Util::flag_name(&symbol),
                    value => value.to_string(),
                };
                desc.push_str(&format!("(default: {})", value));
            }
        }
        desc
    }

    fn create_padding(&self, len: usize) -> String {
        " ".repeat(len)
    }

    fn find_wrap_pos(&self, text: &str, width: usize, start_pos: usize) -> Option<usize> {
        let trunc_text = &text[start_pos..];

        if let Some(pos) = trunc_text.find('\n').filter(|p| *p <= width) {
            return Some(pos + start_pos + 1);
        }

        if let Some(pos) = trunc_text.find('\t').filter(|p| *p <= width) {
            return Some(pos + start_pos + 1);
        }

        if start_pos + width >= text.len() {
            return None;
        }

        let bytes = text.as_bytes();
        let pos = (start_pos..start_pos + width + 1)
            .rev()
            .find(|i| matches!(bytes[*i], b' ' | b'\r' | b'\n'));

        if let Some(pos) = pos.filter(|p| *p > start_pos) {
            return Some(pos);
        }

        // no blank to break at, cut at the widest char boundary
        Some(Self::char_boundary_before(text, start_pos + width, start_pos))
    }

    /// The largest char boundary of `text` in `(floor, pos]`, or the first one
    /// after `floor` when that range holds none.
    fn char_boundary_before(text: &str, pos: usize, floor: usize) -> usize {
        let mut end = pos.min(text.len());
        while end > floor && !text.is_char_boundary(end) {
            end -= 1;
        }
        if end > floor {
            return end;
        }
        (floor + 1..text.len())
            .find(|i| text.is_char_boundary(*i))
            .unwrap_or(text.len())
    }

    /// Get number of padding space for option description.
    pub fn get_desc_padding(&self) -> usize {
        self.desc_pad
    }

    /// Get number of padding space before option.
    pub fn get_left_padding(&self) -> usize {
        self.left_pad
    }

    /// Get the newline.
    /// For windows, it defaults to `\r\n`.
    /// For other operating system, it defaults to `\n`.
    pub fn get_newline(&self) -> &str {
        &self.newline
    }

    /// Get the syntax prefix.
    pub fn get_syntax_prefix(&self) -> &str {
        &self.syntax_prefix
    }

    /// Get the max width of the output message.
    pub fn get_width(&self) -> usize {
        self.width
    }

    /// Set number of padding space for option description.
    pub fn set_desc_padding(&mut self, padding: usize) {
        self.desc_pad = padding;
    }

    /// Set number of padding space before option.
    pub fn set_left_padding(&mut self, padding: usize) {
        self.left_pad = padding;
    }

    /// Set the newline characters.
    pub fn set_newline(&mut self, newline: &str) {
        self.newline = newline.to_string();
    }

    /// Set the syntax prefix, the default value is [`DEFAULT_SYNTAX_PREFIX`].
    pub fn set_syntax_prefix(&mut self, prefix: &str) {
        self.syntax_prefix = prefix.to_string();
    }

    /// Set the maximum width of the display message, which defaults to [`DEFAULT_WIDTH`].
    pub fn set_width(&mut self, width: usize) {
        self.width = width.max(2);
    }

    /// Set whether declared defaults are appended to descriptions.
    pub fn set_show_defaults(&mut self, show: bool) {
        self.show_defaults = show;
    }

    /// Set header message.
    pub fn set_header(&mut self, header: &str) {
        self.header = Some(header.to_string());
    }

    /// Set footer message.
    pub fn set_footer(&mut self, footer: &str) {
        self.footer = Some(footer.to_string());
    }

    /// Print help message of the [`Options`] to the `out` sink.
    ///
    /// # Example
    ///
    /// ```
    /// use std::io::stderr;
    /// use declopt::{HelpFormatter, Options};
    /// HelpFormatter::new("check_disk").print_help(&mut stderr(), &Options::new()).unwrap();
    /// ```
    pub fn print_help<T: Write>(&self, out: &mut T, options: &Options) -> io::Result<()> {
        let mut buff = self.render_usage(options);
        buff.push_str(self.get_newline());

        if let Some(header) = self.header.as_ref().filter(|h| !h.is_empty()) {
            self.render_wrapped_text_block(&mut buff, 0, header);
            buff.push_str(self.get_newline());
        }

        buff.push_str(&self.render_options(options));

        if let Some(footer) = self.footer.as_ref().filter(|f| !f.is_empty()) {
            buff.push_str(self.get_newline());
            self.render_wrapped_text_block(&mut buff, 0, footer);
        }

        buff.push_str(self.get_newline());
        out.write_all(buff.as_bytes())
    }

    /// Render the cmd syntax followed by the usage of every option.
    pub fn render_usage(&self, options: &Options) -> String {
        let mut line = format!("{}{}", self.get_syntax_prefix(), self.cmd_syntax);

        for spec in options.get_options() {
            line.push(' ');
            self.append_option(&mut line, spec);
        }

        let tab = line[self.get_syntax_prefix().len()..]
            .find(' ')
            .map(|x| x + self.get_syntax_prefix().len() + 1)
            .unwrap_or(0);

        let mut buff = String::new();
        self.render_wrapped_text(&mut buff, tab, &line);
        buff
    }

    /// Render the aligned option list with descriptions.
    pub fn render_options(&self, options: &Options) -> String {
        let desc_pad = self.create_padding(self.get_desc_padding());

        let prefix_list: Vec<String> = options.get_options().iter().map(|s| self.option_column(s)).collect();
        let max = prefix_list.iter().map(|p| p.len()).max().unwrap_or(0);
        let next_line_tab_stop = max + self.get_desc_padding();

        let mut buff = String::new();
        for (i, (spec, prefix)) in options.get_options().iter().zip(prefix_list).enumerate() {
            if i > 0 {
                buff.push_str(self.get_newline());
            }

            let mut opt_buff = prefix;
            let desc = self.description(spec);
            if !desc.is_empty() {
                opt_buff.push_str(&self.create_padding(max - opt_buff.len()));
                opt_buff.push_str(&desc_pad);
                opt_buff.push_str(&desc);
            }

            self.render_wrapped_text(&mut buff, next_line_tab_stop, &opt_buff);
        }
        buff
    }

    fn render_wrapped_text(&self, buff: &mut String, mut next_line_tab_stop: usize, text: &str) {
        let mut pos = match self.find_wrap_pos(text, self.get_width(), 0) {
            Some(pos) => pos,
            None => {
                buff.push_str(text.trim_end());
                return;
            }
        };
        buff.push_str(text[..pos].trim_end());
        buff.push_str(self.get_newline());

        if next_line_tab_stop >= self.get_width() || next_line_tab_stop == 0 {
            next_line_tab_stop = 1;
        }

        let padding = self.create_padding(next_line_tab_stop);
        let mut processing_text = text.to_string();
        loop {
            processing_text = format!("{}{}", &padding, processing_text[pos..].trim());
            pos = match self.find_wrap_pos(&processing_text, self.get_width(), 0) {
                Some(pos) => pos,
                None => {
                    buff.push_str(&processing_text);
                    return;
                }
            };

            // a break inside the padding would never make progress
            if processing_text.len() > self.get_width() && pos <= next_line_tab_stop {
                pos = Self::char_boundary_before(&processing_text, self.get_width(), next_line_tab_stop);
            }

            buff.push_str(processing_text[..pos].trim_end());
            buff.push_str(self.get_newline());
        }
    }

    /// Render a wrapped text block to the `buffer` with the max `width` configured.
    /// When text is wrapped, `next_line_tab_stop` number of space is appended.
    pub fn render_wrapped_text_block(&self, buffer: &mut String, next_line_tab_stop: usize, text: &str) {
        for (i, line) in text.lines().enumerate() {
            if i != 0 {
                buffer.push_str(self.get_newline());
            }
            self.render_wrapped_text(buffer, next_line_tab_stop, line);
        }
    }
}
