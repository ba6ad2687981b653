//! Emit one entry through the full bootstrap → upgrade lifecycle.

use anyhow::{bail, Result};
use lazispace_log::{self as log, Field, FieldValue, Severity};

use crate::cli::EmitArgs;

pub fn execute(args: &EmitArgs) -> Result<()> {
    let severity = parse_severity(&args.severity)?;
    let fields = args
        .fields
        .iter()
        .map(|pair| parse_field(pair))
        .collect::<Result<Vec<_>>>()?;

    let buffer = log::init_bootstrap();
    log::debug(
        "resolving log configuration",
        &[Field::new(
            "config",
            args.overrides
                .config
                .as_ref()
                .map(|path| path.display().to_string()),
        )],
    );

    let config = super::resolve_config(&args.overrides)?;
    log::upgrade_from_bootstrap(&config, Some(&buffer))?;

    tracing::debug!(%severity, fields = fields.len(), "emitting entry");
    log::emitter::emit(log::global(), severity, &args.message, &fields);
    Ok(())
}

/// Like [`Severity::parse`], but also accepts `fatal`.
fn parse_severity(name: &str) -> Result<Severity> {
    if name.eq_ignore_ascii_case(Severity::Fatal.name()) {
        return Ok(Severity::Fatal);
    }
    Ok(Severity::parse(name)?)
}

/// `key=value`; integers, floats and booleans keep their type.
fn parse_field(pair: &str) -> Result<Field> {
    let Some((key, raw)) = pair.split_once('=') else {
        bail!("field must be key=value: {pair}");
    };
    if key.is_empty() {
        bail!("field key cannot be empty: {pair}");
    }

    let value = if let Ok(i) = raw.parse::<i64>() {
        FieldValue::Int(i)
    } else if let Ok(b) = raw.parse::<bool>() {
        FieldValue::Bool(b)
    } else if let Ok(x) = raw.parse::<f64>() {
        FieldValue::Float(x)
    } else {
        FieldValue::Str(raw.to_string())
    };
    Ok(Field::new(key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_severity_accepts_fatal() {
        assert_eq!(parse_severity("FATAL").unwrap(), Severity::Fatal);
        assert_eq!(parse_severity("warning").unwrap(), Severity::Warn);
        assert!(parse_severity("trace").is_err());
    }

    #[test]
    fn test_parse_field_types() {
        assert_eq!(parse_field("n=42").unwrap(), Field::new("n", 42));
        assert_eq!(parse_field("ok=true").unwrap(), Field::new("ok", true));
        assert_eq!(parse_field("ratio=0.5").unwrap(), Field::new("ratio", 0.5));
        assert_eq!(parse_field("user=alice").unwrap(), Field::new("user", "alice"));
        assert_eq!(parse_field("expr=a=b").unwrap(), Field::new("expr", "a=b"));
        assert_eq!(parse_field("empty=").unwrap(), Field::new("empty", ""));
    }

    #[test]
    fn test_parse_field_rejects_malformed() {
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=value").is_err());
    }
}
