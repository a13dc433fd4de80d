//! Helper library for parsing command line arguments
//!
//! [`parse_arg!`] wraps a [`lexopt`] `match` so that every option arm also
//! produces a [`RunOption`] entry, and [`write_help`] renders those entries.

#![deny(clippy::panic)]
#![warn(missing_docs)]

pub use lexopt;

/// Placeholder for the argument that follows an option, e.g. `<DIR>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Value<'a> {
    /// should be uppercase
    pub name: &'a str,
    /// `[NAME]` instead of `<NAME>`
    pub optional: bool,
}

impl std::fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.name;
        if self.optional {
            write!(f, "[{name}]")
        } else {
            write!(f, "<{name}>")
        }
    }
}

impl<'a> Value<'a> {
    /// A required value called `name`.
    ///
    /// # Convention
    ///
    /// `name` should be all uppercase and preferably one word.
    pub const fn new(name: &'a str) -> Self {
        Self {
            name,
            optional: false,
        }
    }

    /// Mark the value as optional (wrap with `[]` instead of `<>`).
    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// The length of the display string in bytes.
    #[allow(
        clippy::len_without_is_empty,
        reason = "`Value` is never empty, it always contains either `[]` or `<>`"
    )]
    pub const fn len(&self) -> usize {
        self.name.len() + 2
    }
}

/// One entry of the options table.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOption<'a> {
    /// `-x`
    pub short: Option<char>,

    /// `--xyz`
    pub long: Option<&'a str>,

    /// Value expected to follow [`long`](Self::long) or [`short`](Self::short)
    pub val: Option<Value<'a>>,

    /// The option's brief help description
    pub msg: &'a str,

    /// Shown after the description as `[default: ...]`
    pub default: Option<&'a str>,
}

impl<'a> RunOption<'a> {
    /// Construct a new [`RunOption`] from its help description.
    pub const fn new(msg: &'a str) -> Self {
        Self {
            short: None,
            long: None,
            val: None,
            msg,
            default: None,
        }
    }

    /// Add a short (`-x`) spelling.
    pub const fn with_short(mut self, ch: char) -> Self {
        self.short = Some(ch);
        self
    }

    /// Add a long (`--xyz`) spelling.
    pub const fn with_long(mut self, s: &'a str) -> Self {
        self.long = Some(s);
        self
    }

    /// Expect a [`Value`] after the option.
    pub const fn with_value(mut self, val: Value<'a>) -> Self {
        self.val = Some(val);
        self
    }

    /// Document the value used when the option is absent.
    pub const fn with_default(mut self, default: &'a str) -> Self {
        self.default = Some(default);
        self
    }
}

/// Whether [`write_help`] emits ANSI colour codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    /// Coloured headers, literals and placeholders.
    #[default]
    Ansi,
    /// No escape codes at all.
    Plain,
}

impl Style {
    /// [`Style::Plain`] when `NO_COLOR` is set to anything non-empty.
    pub fn from_env() -> Self {
        match std::env::var_os("NO_COLOR") {
            Some(v) if !v.is_empty() => Self::Plain,
            _ => Self::Ansi,
        }
    }

    const fn codes(self) -> [&'static str; 4] {
        match self {
            // reset, placeholder, literal, header
            Self::Ansi => ["\x1B[0m", "\x1B[36m", "\x1B[1;96m", "\x1B[1;92m"],
            Self::Plain => [""; 4],
        }
    }
}

/// Everything [`write_help`] prints.
#[derive(Debug, Clone, Copy)]
pub struct Help<'a> {
    /// Program name for the usage lines.
    pub bin_name: &'a str,

    /// One-line description printed first.
    pub about: &'a str,

    /// `usages[i][j].0`: If true, style as literal text. Otherwise, style as a placeholder.
    pub usages: &'a [&'a [(bool, &'a str)]],

    /// The options table, usually generated by [`parse_arg!`].
    pub options: &'a [RunOption<'a>],
}

/// Write the help message to a [`Write`](std::io::Write) implementor.
///
/// **See also:** [`print_help`]
pub fn write_help<W>(mut w: W, help: &Help<'_>, style: Style) -> std::io::Result<()>
where
    W: std::io::Write,
{
    let [reset, name_style, lit_style, header_style] = style.codes();
    let Help {
        bin_name,
        about,
        usages,
        options,
    } = *help;

    let longest_short = if options.iter().any(|opt| opt.short.is_some()) {
        "-*".len()
    } else {
        0
    };

    let longest_long = options
        .iter()
        .filter_map(|opt| opt.long)
        .map(|x| "--".len() + x.len())
        .max()
        .unwrap_or(0);

    let longest_val = options
        .iter()
        .filter_map(|opt| opt.val)
        .map(|x| x.len())
        .max()
        .unwrap_or(0);

    if !about.is_empty() {
        writeln!(w, "{about}")?;
        writeln!(w)?;
    }

    write!(w, "{header_style}Usage:{reset}")?;
    for (i, usage) in usages.iter().enumerate() {
        if i > 0 {
            write!(w, "{:indent$}", "", indent = "Usage:".len())?;
        }
        write!(w, " {lit_style}{bin_name}{reset}")?;
        for (bold, text) in *usage {
            write!(
                w,
                " {}{text}{reset}",
                if *bold { lit_style } else { name_style }
            )?;
        }
        writeln!(w)?;
    }
    writeln!(w)?;

    writeln!(w, "{header_style}Options:{reset}")?;
    for option in options {
        let comma = if option.short.is_some() && option.long.is_some() {
            ','
        } else {
            ' '
        };
        let short = option.short.map(|ch| format!("-{ch}")).unwrap_or_default();
        let long = option.long.map(|s| format!("--{s}")).unwrap_or_default();
        let val = option.val.map(|v| v.to_string()).unwrap_or_default();
        let msg = option.msg;
        let line = format!(
            "  {lit_style}{short:>short_width$}{reset}{comma} {lit_style}{long:<long_width$}{reset} {name_style}{val:<val_width$}{reset}  {msg}",
            short_width = longest_short,
            long_width = longest_long,
            val_width = longest_val,
        );
        match option.default {
            Some(default) => writeln!(w, "{} [default: {default}]", line.trim_end())?,
            None => writeln!(w, "{}", line.trim_end())?,
        }
    }

    Ok(())
}

/// [`print`] version of [`write_help`], honouring `NO_COLOR`.
pub fn print_help(help: &Help<'_>) -> std::io::Result<()> {
    write_help(std::io::stdout().lock(), help, Style::from_env())
}

/// Parse an argument with [`lexopt`], automatically generating help text for [`write_help`]/[`print_help`].
///
/// Every arm needs a `#[help = "..."]`; `#[default = "..."]` is optional.
/// Inside an arm taking `<NAME>` or `[NAME]`, `NAME` is bound to
/// [`Parser::value`](lexopt::Parser::value) or
/// [`Parser::optional_value`](lexopt::Parser::optional_value) respectively.
#[macro_export]
macro_rules! parse_arg {
    // yes, these do have to be repetitive.
    // making all the arguments optional would allow users of the macro to provide invalid combinations.
    // long-only arms come first: `-$short:literal` would otherwise swallow `-"long"` as a negative literal.
    (@[$msg:expr] --$long:literal) => {
        $crate::RunOption::new($msg)
            .with_long($long)
    };
    (@[$msg:expr] --$long:literal <$val:ident>) => {
        $crate::RunOption::new($msg)
            .with_long($long)
            .with_value($crate::Value::new(stringify!($val)))
    };
    (@[$msg:expr] --$long:literal [$opt_val:ident]) => {
        $crate::RunOption::new($msg)
            .with_long($long)
            .with_value($crate::Value::new(stringify!($opt_val)).optional())
    };
    (@[$msg:expr] -$short:literal) => {
        $crate::RunOption::new($msg)
            .with_short($short)
    };
    (@[$msg:expr] -$short:literal, --$long:literal) => {
        $crate::RunOption::new($msg)
            .with_short($short)
            .with_long($long)
    };
    (@[$msg:expr] -$short:literal <$val:ident>) => {
        $crate::RunOption::new($msg)
            .with_short($short)
            .with_value($crate::Value::new(stringify!($val)))
    };
    (@[$msg:expr] -$short:literal, --$long:literal <$val:ident>) => {
        $crate::RunOption::new($msg)
            .with_short($short)
            .with_long($long)
            .with_value($crate::Value::new(stringify!($val)))
    };
    (@[$msg:expr] -$short:literal [$opt_val:ident]) => {
        $crate::RunOption::new($msg)
            .with_short($short)
            .with_value($crate::Value::new(stringify!($opt_val)).optional())
    };
    (@[$msg:expr] -$short:literal, --$long:literal [$opt_val:ident]) => {
        $crate::RunOption::new($msg)
            .with_short($short)
            .with_long($long)
            .with_value($crate::Value::new(stringify!($opt_val)).optional())
    };

    (~[$opt:expr]) => {
        $opt
    };
    (~[$opt:expr] $default:expr) => {
        $opt.with_default($default)
    };

    (# --$long:literal $(<$val:ident>)? $([$opt_val:ident])?) => {
        $crate::lexopt::Arg::Long($long)
    };
    (# -$short:literal, --$long:literal $(<$val:ident>)? $([$opt_val:ident])?) => {
        $crate::lexopt::Arg::Short($short) | $crate::lexopt::Arg::Long($long)
    };
    (# -$short:literal $(<$val:ident>)? $([$opt_val:ident])?) => {
        $crate::lexopt::Arg::Short($short)
    };

    (%[$parser:ident, $expr:expr] <$val:ident>) => {
        {
            #[allow(non_snake_case)]
            let $val = $parser.value();
            $expr
        }
    };
    (%[$parser:ident, $expr:expr] [$opt_val:ident]) => {
        {
            #[allow(non_snake_case)]
            let $opt_val = $parser.optional_value();
            $expr
        }
    };
    (%[$parser:ident, $expr:expr]) => {
        $expr
    };
    (%[$parser:ident, $expr:expr] --$long:literal $($rest:tt)*) => {
        $crate::parse_arg!(%[$parser, $expr] $($rest)*)
    };
    (%[$parser:ident, $expr:expr] -$short:literal, --$long:literal $($rest:tt)*) => {
        $crate::parse_arg!(%[$parser, $expr] $($rest)*)
    };
    (%[$parser:ident, $expr:expr] -$short:literal $($rest:tt)*) => {
        $crate::parse_arg!(%[$parser, $expr] $($rest)*)
    };

    (
        options = $OPTIONS:ident;
        parser = $parser:ident;
        match $arg:ident {
            $(
                #[help = $msg:expr]
                $(#[default = $default:expr])?
                ($($pattern:tt)*) => $expr:expr,
            )*
            _ => $rest:expr $(,)?
        }
    ) => {
        static $OPTIONS: &[$crate::RunOption<'static>] = &[
            $($crate::parse_arg!(~[$crate::parse_arg!(@[$msg] $($pattern)*)] $($default)?)),*
        ];
        match $arg {
            $($crate::parse_arg!(# $($pattern)*) => $crate::parse_arg!(%[$parser, $expr] $($pattern)*),)*
            _ => $rest
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Opts {
        data: Option<String>,
        week: Option<String>,
        dry_run: bool,
        verbose: Option<Option<String>>,
        help: bool,
        rest: Vec<String>,
    }

    fn parse(args: &[&str]) -> (Opts, &'static [RunOption<'static>]) {
        let mut opts = Opts::default();
        let mut parser = lexopt::Parser::from_args(args.iter().copied());
        let mut table: &'static [RunOption<'static>] = &[];
        while let Some(arg) = parser.next().unwrap() {
            parse_arg! {
                options = OPTIONS;
                parser = parser;
                match arg {
                    #[help = "Directory holding roster data"]
                    #[default = "./data"]
                    ( -'d', --"data" <DIR> ) => opts.data = Some(DIR.unwrap().into_string().unwrap()),

                    #[help = "Week offset from the epoch"]
                    ( --"week" <OFFSET> ) => opts.week = Some(OFFSET.unwrap().into_string().unwrap()),

                    #[help = "Do not save"]
                    ( -'n', --"dry-run" ) => opts.dry_run = true,

                    #[help = "Log more"]
                    ( -'v', --"verbose" [FILTER] ) => {
                        opts.verbose = Some(FILTER.map(|f| f.into_string().unwrap()))
                    },

                    #[help = "Print help"]
                    ( -'h' ) => opts.help = true,

                    _ => opts.rest.push(format!("{:?}", arg)),
                }
            }
            table = OPTIONS;
        }
        (opts, table)
    }

    #[test]
    fn test_parse() {
        let (opts, _) = parse(&["-d", "here", "--week=3", "-n", "--verbose=debug", "-h", "-x"]);
        assert_eq!(
            opts,
            Opts {
                data: Some("here".to_string()),
                week: Some("3".to_string()),
                dry_run: true,
                verbose: Some(Some("debug".to_string())),
                help: true,
                rest: vec!["Short('x')".to_string()],
            }
        );

        let (opts, _) = parse(&["--data", "there", "-v"]);
        assert_eq!(opts.data.as_deref(), Some("there"));
        assert_eq!(opts.verbose, Some(None));
    }

    #[test]
    fn test_option_table() {
        let (_, table) = parse(&["-n"]);
        assert_eq!(table.len(), 5);
        assert_eq!(table[0].short, Some('d'));
        assert_eq!(table[0].long, Some("data"));
        assert_eq!(table[0].val, Some(Value::new("DIR")));
        assert_eq!(table[0].default, Some("./data"));
        assert_eq!(table[1].short, None);
        assert_eq!(table[1].long, Some("week"));
        assert_eq!(table[3].val, Some(Value::new("FILTER").optional()));
        assert_eq!(table[4].long, None);
    }

    #[test]
    fn test_write_help_plain() {
        let (_, options) = parse(&["-n"]);
        let mut out = Vec::new();
        write_help(
            &mut out,
            &Help {
                bin_name: "roster-flags",
                about: "Flag roster problems",
                usages: &[&[(false, "[OPTIONS]")]],
                options,
            },
            Style::Plain,
        )
        .unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.starts_with("Flag roster problems\n\nUsage: roster-flags [OPTIONS]\n"));
        assert!(!out.contains('\x1B'));
        assert!(out.contains("  -d, --data    <DIR>     Directory holding roster data [default: ./data]\n"));
        assert!(out.contains("      --week    <OFFSET>  Week offset from the epoch\n"));
        assert!(out.contains("  -h                      Print help\n"));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::new("DIR").to_string(), "<DIR>");
        assert_eq!(Value::new("DIR").optional().to_string(), "[DIR]");
        assert_eq!(Value::new("DIR").optional().len(), "[DIR]".len());
    }
}
