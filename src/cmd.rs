use std::collections::HashMap;

use crate::option::Value;

/// The `ParseResult` holds the value of every declared option and the
/// tokens no option consumed.
///
/// Every option declared in the [`Options`](crate::Options) table has an entry,
/// whether it occurred on the command line or was defaulted. Options that did
/// not occur and declare no default hold [`Value::Unset`] (scalar and switch),
/// `false` (boolean) or an empty list (multi).
///
/// The leftovers keep their original relative order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseResult {
    values: HashMap<String, Value>,
    args: Vec<String>,
}

impl ParseResult {
    pub(crate) fn new() -> ParseResult {
        ParseResult {
            values: HashMap::new(),
            args: Vec::new(),
        }
    }

    pub(crate) fn add_arg(&mut self, arg: &str) {
        self.args.push(arg.to_owned());
    }

    pub(crate) fn set_value(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_owned(), value);
    }

    /// Get the value of option `name`.
    ///
    /// [`None`] is returned only if no option `name` was declared.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Get the string value of a scalar option without conversion.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name)?.as_str()
    }

    /// Get the value of a scalar option converted to an integer.
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name)?.as_int()
    }

    /// Get the value of a boolean option.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name)?.as_bool()
    }

    /// Get the selected symbol of a switch option.
    pub fn get_symbol(&self, name: &str) -> Option<&str> {
        self.get(name)?.as_symbol()
    }

    /// Get all values of a multi option in command line order.
    pub fn get_list(&self, name: &str) -> Option<&[Value]> {
        self.get(name)?.as_list()
    }

    /// Check whether option `name` holds anything other than [`Value::Unset`].
    pub fn has_value(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_unset())
    }

    /// Get the tokens that were not consumed by any option.
    pub fn get_arg_list(&self) -> Vec<&str> {
        self.args.iter().map(|a| a.as_str()).collect()
    }

    pub fn values(&self) -> &HashMap<String, Value> {
        &self.values
    }

    /// Split into the value mapping and the leftover tokens.
    pub fn into_parts(self) -> (HashMap<String, Value>, Vec<String>) {
        (self.values, self.args)
    }
}

#[cfg(test)]
mod test {
    use crate::cmd::ParseResult;
    use crate::option::Value;

    fn sample() -> ParseResult {
        let mut result = ParseResult::new();
        result.set_value("host", Value::from("localhost"));
        result.set_value("port", Value::Int(5666));
        result.set_value("verbose", Value::Bool(true));
        result.set_value("mode", Value::symbol("fast"));
        result.set_value("tag", Value::from(vec!["a", "b"]));
        result.set_value("user", Value::Unset);
        result.add_arg("file0");
        result.add_arg("file1");
        result
    }

    #[test]
    fn test_typed_getters() {
        let result = sample();
        assert_eq!(Some("localhost"), result.get_str("host"));
        assert_eq!(Some(5666), result.get_int("port"));
        assert_eq!(Some(true), result.get_bool("verbose"));
        assert_eq!(Some("fast"), result.get_symbol("mode"));
        assert_eq!(Some(&[Value::from("a"), Value::from("b")][..]), result.get_list("tag"));

        assert_eq!(None, result.get_str("port"));
        assert_eq!(None, result.get_symbol("host"));
        assert_eq!(None, result.get_str("missing"));
    }

    #[test]
    fn test_has_value() {
        let result = sample();
        assert!(result.has_value("host"));
        assert!(!result.has_value("user"));
        assert!(!result.has_value("missing"));
        assert_eq!(Some(&Value::Unset), result.get("user"));
    }

    #[test]
    fn test_leftovers_keep_order() {
        let result = sample();
        assert_eq!(vec!["file0", "file1"], result.get_arg_list());

        let (values, args) = result.into_parts();
        assert_eq!(6, values.len());
        assert_eq!(vec!["file0".to_string(), "file1".to_string()], args);
    }
}
