//! Command-line parser.
//!
//! Splits tokenized argv into recognised switches and extra arguments.
//! Shell quoting is the caller's concern: every element of argv is one token.

use crate::config::OptionSpec;
use crate::result::{ParseError, ParsedCommandLine, Switch};

/// Parser configured with the switches it recognises.
#[derive(Debug, Clone, Default)]
pub struct CommandLineParser {
    options: Vec<OptionSpec>,
    exclusive_groups: Vec<Vec<String>>,
}

impl CommandLineParser {
    /// Create an empty parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a switch.
    pub fn option(&mut self, spec: OptionSpec) -> &mut Self {
        self.options.push(spec);
        self
    }

    /// Declare that at most one of these long names may appear.
    pub fn allow_one_of(&mut self, longs: &[&str]) -> &mut Self {
        self.exclusive_groups
            .push(longs.iter().map(|l| l.to_string()).collect());
        self
    }

    /// Registered switches, in registration order.
    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    fn find_long(&self, long: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.long == long)
    }

    fn find_short(&self, short: char) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.short == Some(short))
    }

    /// Parse argv (not including the program name).
    ///
    /// Accepted forms are `--long`, `--long=value`, `--long value`, `-s`,
    /// `-s value`, `-svalue`, `-s=value` and clustered short flags (`-am`).
    /// A lone `-` is a bare word and `--` ends option parsing.
    pub fn parse(&self, argv: &[String]) -> Result<ParsedCommandLine, ParseError> {
        let mut parsed = ParsedCommandLine::default();
        let mut i = 0;

        while i < argv.len() {
            let arg = &argv[i];

            if arg == "--" {
                parsed.extra_arguments.extend(argv[i + 1..].iter().cloned());
                break;
            }

            if let Some(rest) = arg.strip_prefix("--") {
                let (name, inline) = match rest.split_once('=') {
                    Some((name, value)) => (name, Some(value.to_string())),
                    None => (rest, None),
                };
                let token = format!("--{}", name);
                let spec = self
                    .find_long(name)
                    .ok_or_else(|| ParseError::UnknownOption(token.clone()))?;
                i = self.consume(spec, token, inline, argv, i, &mut parsed)?;
                continue;
            }

            if arg.len() > 1 && arg.starts_with('-') {
                i = self.consume_short_cluster(&arg[1..], argv, i, &mut parsed)?;
                continue;
            }

            parsed.extra_arguments.push(arg.clone());
            i += 1;
        }

        self.check_exclusive(&parsed)?;
        Ok(parsed)
    }

    /// Handle `-abc`, `-bvalue` and `-b=value`. Returns the next argv index.
    fn consume_short_cluster(
        &self,
        cluster: &str,
        argv: &[String],
        i: usize,
        parsed: &mut ParsedCommandLine,
    ) -> Result<usize, ParseError> {
        for (pos, c) in cluster.char_indices() {
            let token = format!("-{}", c);
            let spec = self
                .find_short(c)
                .ok_or_else(|| ParseError::UnknownOption(token.clone()))?;

            if spec.takes_argument {
                let remainder = &cluster[pos + c.len_utf8()..];
                let inline = if remainder.is_empty() {
                    None
                } else {
                    Some(remainder.strip_prefix('=').unwrap_or(remainder).to_string())
                };
                return self.consume(spec, token, inline, argv, i, parsed);
            }

            let remainder = &cluster[pos + c.len_utf8()..];
            if let Some(value) = remainder.strip_prefix('=') {
                return Err(ParseError::UnexpectedArgument {
                    option: token,
                    value: value.to_string(),
                });
            }
            parsed.switches.push(Switch::new(spec.long.clone(), token, None));
        }

        Ok(i + 1)
    }

    /// Record one switch occurrence. Returns the next argv index.
    fn consume(
        &self,
        spec: &OptionSpec,
        token: String,
        inline: Option<String>,
        argv: &[String],
        i: usize,
        parsed: &mut ParsedCommandLine,
    ) -> Result<usize, ParseError> {
        if !spec.takes_argument {
            if let Some(value) = inline {
                return Err(ParseError::UnexpectedArgument {
                    option: token,
                    value,
                });
            }
            parsed.switches.push(Switch::new(spec.long.clone(), token, None));
            return Ok(i + 1);
        }

        let (value, next) = match inline {
            Some(value) => (value, i + 1),
            None => {
                let value = argv
                    .get(i + 1)
                    .filter(|next| !looks_like_switch(next))
                    .ok_or_else(|| ParseError::MissingArgument(token.clone()))?;
                (value.clone(), i + 2)
            }
        };

        if !spec.repeatable && parsed.has_option(&spec.long) {
            return Err(ParseError::MultipleValues(token));
        }

        parsed
            .switches
            .push(Switch::new(spec.long.clone(), token, Some(value)));
        Ok(next)
    }

    fn check_exclusive(&self, parsed: &ParsedCommandLine) -> Result<(), ParseError> {
        for group in &self.exclusive_groups {
            let mut seen: Option<&Switch> = None;
            for switch in &parsed.switches {
                if !group.contains(&switch.option) {
                    continue;
                }
                match seen {
                    Some(first) if first.option != switch.option => {
                        return Err(ParseError::MutuallyExclusive {
                            first: first.token.clone(),
                            second: switch.token.clone(),
                        });
                    }
                    Some(_) => {}
                    None => seen = Some(switch),
                }
            }
        }
        Ok(())
    }
}

fn looks_like_switch(arg: &str) -> bool {
    arg.len() > 1 && arg.starts_with('-')
}
