//! Tokenising of chrony directive lines.

/// A value line split into its directive name and argument text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive<'a> {
    /// First whitespace-delimited token.
    pub key: &'a str,
    /// Remainder of the line with surrounding whitespace removed.
    pub args: &'a str,
}

impl<'a> Directive<'a> {
    /// Split `text` at the first run of whitespace.
    ///
    /// Returns `None` for blank input.
    ///
    /// # Examples
    ///
    /// ```
    /// use chronyconf::directive::Directive;
    ///
    /// let d = Directive::parse("logdir   /var/log/chrony").expect("directive");
    /// assert_eq!(d.key, "logdir");
    /// assert_eq!(d.args, "/var/log/chrony");
    /// ```
    pub fn parse(text: &'a str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let (key, args) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
        Some(Self {
            key,
            args: args.trim(),
        })
    }

    /// Number of whitespace-separated argument tokens.
    pub fn arg_count(&self) -> usize {
        self.args.split_whitespace().count()
    }
}
