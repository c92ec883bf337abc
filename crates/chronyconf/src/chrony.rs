//! Reader for the chrony daemon's `chrony.conf`.
//!
//! Each value line of the file is a directive: a name followed by
//! whitespace-separated arguments. Directives bound to a field of
//! [`ChronyConf`] under the [`NAMESPACE`] annotation are parsed with that
//! field's kind and assigned; all other directives are kept only as lines of
//! the scanned file.

use std::io::BufRead;
use std::path::Path;
use std::sync::OnceLock;

use lineconf::fields::{Annotated, FieldError, FieldRegistry, find_field, get_field};
use lineconf::scan::{Flow, Line, ScanError, ScannedFile, scan, scan_reader};
use lineconf::value::{FieldKind, FieldValue, ParseValueError};
use thiserror::Error;
use tracing::{debug, info};

use crate::directive::Directive;

/// Annotation namespace used by `chrony.conf` bindings.
pub const NAMESPACE: &str = "conf";
/// Comment prefix used when none is configured.
pub const DEFAULT_COMMENT_PREFIX: &str = "#";

/// Errors raised while loading `chrony.conf`.
#[derive(Debug, Error)]
pub enum ConfError {
    /// A directive that needs a value had none.
    #[error("directive {key} requires an argument")]
    MissingArgument { key: String },
    /// A directive received more arguments than it accepts.
    #[error("directive {key} does not accept arguments {args:?}")]
    UnexpectedArgument { key: String, args: String },
    /// An argument could not be parsed with the field's kind.
    #[error("invalid argument {value:?} for directive {key}: {source}")]
    InvalidArgument {
        key: String,
        value: String,
        #[source]
        source: ParseValueError,
    },
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Options controlling how `chrony.conf` is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    comment_prefix: String,
    stop_after: Option<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            comment_prefix: DEFAULT_COMMENT_PREFIX.to_owned(),
            stop_after: None,
        }
    }
}

impl LoadOptions {
    /// Use `prefix` to recognise comment lines.
    #[must_use]
    pub fn comment_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.comment_prefix = prefix.into();
        self
    }

    /// Stop reading once the directive `key` has been processed.
    #[must_use]
    pub fn stop_after(mut self, key: impl Into<String>) -> Self {
        self.stop_after = Some(key.into());
        self
    }
}

/// Typed view of the directives this crate understands.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ChronyConf {
    /// Directory for log files.
    pub logdir: Option<String>,
    /// File holding the measured clock drift.
    pub driftfile: Option<String>,
    /// File holding authentication keys.
    pub keyfile: Option<String>,
    /// Directory for measurement history dumps.
    pub dumpdir: Option<String>,
    /// NTP server port.
    pub port: Option<u64>,
    /// Command port.
    pub cmdport: Option<u64>,
    /// Maximum frequency error in ppm.
    pub maxupdateskew: Option<f64>,
    /// Whether the kernel synchronises the RTC.
    pub rtcsync: bool,
    scanned: ScannedFile,
}

impl Annotated for ChronyConf {
    fn registry() -> &'static FieldRegistry<Self> {
        static REGISTRY: OnceLock<FieldRegistry<ChronyConf>> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let built = FieldRegistry::builder()
                .bind(NAMESPACE, "logdir", |c: &Self| &c.logdir, |c: &mut Self| &mut c.logdir)
                .bind(NAMESPACE, "driftfile", |c: &Self| &c.driftfile, |c: &mut Self| {
                    &mut c.driftfile
                })
                .bind(NAMESPACE, "keyfile", |c: &Self| &c.keyfile, |c: &mut Self| &mut c.keyfile)
                .bind(NAMESPACE, "dumpdir", |c: &Self| &c.dumpdir, |c: &mut Self| &mut c.dumpdir)
                .bind(NAMESPACE, "port", |c: &Self| &c.port, |c: &mut Self| &mut c.port)
                .bind(NAMESPACE, "cmdport", |c: &Self| &c.cmdport, |c: &mut Self| &mut c.cmdport)
                .bind(NAMESPACE, "maxupdateskew", |c: &Self| &c.maxupdateskew, |c: &mut Self| {
                    &mut c.maxupdateskew
                })
                .bind(NAMESPACE, "rtcsync", |c: &Self| &c.rtcsync, |c: &mut Self| &mut c.rtcsync)
                .build();
            match built {
                Ok(registry) => registry,
                Err(e) => panic!("invalid chrony.conf bindings: {e}"),
            }
        })
    }
}

impl ChronyConf {
    /// Default location of the chrony configuration file.
    pub const DEFAULT_PATH: &'static str = "/etc/chrony/chrony.conf";

    /// Read the file at `path` with default options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfError::Scan`] if the file cannot be read or a directive
    /// cannot be applied.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, ConfError> {
        Self::read_with(path, &LoadOptions::default())
    }

    /// Read the file at `path` using `options`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfError::Scan`] if the file cannot be read or a directive
    /// cannot be applied.
    pub fn read_with(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self, ConfError> {
        let path = path.as_ref();
        let mut conf = Self::default();
        let scanned = scan(path, &options.comment_prefix, |line| conf.apply(line, options))?;
        conf.scanned = scanned;
        info!(path = %path.display(), lines = conf.scanned.len(), "loaded chrony configuration");
        Ok(conf)
    }

    /// Read configuration text from `reader`, naming it `location` in errors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfError::Scan`] if reading fails or a directive cannot be
    /// applied.
    pub fn from_reader<R: BufRead>(
        location: &str,
        reader: R,
        options: &LoadOptions,
    ) -> Result<Self, ConfError> {
        let mut conf = Self::default();
        let scanned = scan_reader(location, reader, &options.comment_prefix, |line| {
            conf.apply(line, options)
        })?;
        conf.scanned = scanned;
        Ok(conf)
    }

    /// The lines this configuration was read from.
    pub fn scanned(&self) -> &ScannedFile {
        &self.scanned
    }

    /// Log directory, falling back to the raw `logdir` line when the field
    /// is unset.
    ///
    /// A successful load always assigns the field when the file has a
    /// `logdir` line, so the fallback only applies once a caller has cleared
    /// the public `logdir` field.
    pub fn logdir(&self) -> Option<&str> {
        self.logdir.as_deref().or_else(|| self.raw_args("logdir"))
    }

    /// Argument text of the first directive named `key`, whether or not it
    /// is bound to a field.
    pub fn raw_args(&self, key: &str) -> Option<&str> {
        self.scanned
            .value_lines()
            .filter_map(|l| Directive::parse(l.text()))
            .find(|d| d.key == key)
            .map(|d| d.args)
    }

    /// Current value of the field bound to `key`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NotFound`] if no field is bound to `key`.
    pub fn value(&self, key: &str) -> Result<Option<FieldValue>, FieldError> {
        get_field(self, NAMESPACE, key)
    }

    /// Every bound directive with its current value, in declaration order.
    pub fn values(&self) -> impl Iterator<Item = (&'static str, Option<FieldValue>)> + '_ {
        Self::registry()
            .fields(NAMESPACE)
            .map(move |b| (b.key(), b.get(self)))
    }

    fn apply(&mut self, line: &Line, options: &LoadOptions) -> Result<Flow, ConfError> {
        let Some(directive) = Directive::parse(line.text()) else {
            return Ok(Flow::Continue);
        };
        match find_field::<Self>(NAMESPACE, directive.key) {
            Ok(binding) => {
                let value = parse_args(binding.kind(), &directive)?;
                binding.set(self, value)?;
            }
            Err(FieldError::NotFound { .. }) => {
                debug!(
                    key = directive.key,
                    ordinal = line.ordinal(),
                    "skipping unrecognised directive"
                );
            }
            Err(e) => return Err(e.into()),
        }
        if options.stop_after.as_deref() == Some(directive.key) {
            return Ok(Flow::Stop);
        }
        Ok(Flow::Continue)
    }
}

/// Turn a directive's arguments into a value of `kind`.
fn parse_args(kind: FieldKind, directive: &Directive<'_>) -> Result<FieldValue, ConfError> {
    let key = directive.key;
    match kind {
        FieldKind::Flag if directive.args.is_empty() => Ok(FieldValue::Flag(true)),
        FieldKind::Flag => Err(ConfError::UnexpectedArgument {
            key: key.to_owned(),
            args: directive.args.to_owned(),
        }),
        _ if directive.args.is_empty() => Err(ConfError::MissingArgument {
            key: key.to_owned(),
        }),
        FieldKind::Text => Ok(FieldValue::Text(directive.args.to_owned())),
        _ if directive.arg_count() > 1 => Err(ConfError::UnexpectedArgument {
            key: key.to_owned(),
            args: directive.args.to_owned(),
        }),
        _ => kind
            .parse(directive.args)
            .map_err(|source| ConfError::InvalidArgument {
                key: key.to_owned(),
                value: directive.args.to_owned(),
                source,
            }),
    }
}
