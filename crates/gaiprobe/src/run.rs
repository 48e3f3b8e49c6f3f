//! The probe pipeline: tokens -> hints -> resolve -> print.

use std::ffi::{OsStr, OsString};
use std::io::Write;

use gaiprobe_abi::GaiError;
use gaiprobe_core::{AddressRecord, Hints, TokenOutcome, write_records};

use crate::cli::{Cli, parse_args};
use crate::config::ProbeConfig;
use crate::error::{EXIT_OK, ProbeError};
use crate::structured_log::{LogEmitter, LogEntry, LogLevel, default_run_id, events};

/// Anything that can turn host/service/hints into address records.
pub trait NameResolver {
    fn resolve(
        &self,
        host: &OsStr,
        service: &OsStr,
        hints: &Hints,
    ) -> Result<Vec<AddressRecord>, GaiError>;
}

/// The platform resolver (`getaddrinfo`).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

impl NameResolver for SystemResolver {
    fn resolve(
        &self,
        host: &OsStr,
        service: &OsStr,
        hints: &Hints,
    ) -> Result<Vec<AddressRecord>, GaiError> {
        let list = gaiprobe_abi::resolve(host, service, hints)?;
        Ok(list.records().collect())
    }
}

/// Optional structured log. Write failures on the trace never fail the run.
struct Trace<'a>(Option<&'a mut LogEmitter>);

impl Trace<'_> {
    fn record(&mut self, entry: LogEntry) {
        if let Some(emitter) = self.0.as_deref_mut()
            && let Err(err) = emitter.emit_entry(entry)
        {
            self.0 = None;
            eprintln!("structured log disabled: {err}");
        }
    }
}

/// Run one probe.
///
/// Trace lines go to `err`, result lines to `out`. Returns the number of records
/// printed. On resolution failure nothing is written to `out`.
pub fn run<R: NameResolver + ?Sized>(
    cli: &Cli,
    resolver: &R,
    out: &mut dyn Write,
    err: &mut dyn Write,
    log: Option<&mut LogEmitter>,
) -> Result<usize, ProbeError> {
    let mut trace = Trace(log);

    let mut hints = Hints::default();
    for token in &cli.tokens {
        let outcome = hints.apply(&token.to_string_lossy());
        write_token_line(err, token, &outcome).map_err(ProbeError::Output)?;
        trace.record(LogEntry::for_token(&outcome));
    }

    let host = cli.host.to_string_lossy();
    let service = cli.service.to_string_lossy();
    trace.record(
        LogEntry::new("", LogLevel::Info, events::RESOLVE_START)
            .with_target(&*host, &*service)
            .with_hints(&hints),
    );

    let records = match resolver.resolve(&cli.host, &cli.service, &hints) {
        Ok(records) => records,
        Err(gai) => {
            trace.record(
                LogEntry::new("", LogLevel::Error, events::RESOLVE_FAILED)
                    .with_target(&*host, &*service)
                    .with_gai_code(gai.code, gai.os_error)
                    .with_details(serde_json::json!({ "message": &gai.message })),
            );
            return Err(ProbeError::Resolve(gai));
        }
    };

    let printed = write_records(out, &records).map_err(ProbeError::Output)?;
    out.flush().map_err(ProbeError::Output)?;

    let lines: Vec<String> = records.iter().map(ToString::to_string).collect();
    trace.record(
        LogEntry::new("", LogLevel::Info, events::RESOLVE_OK)
            .with_target(&*host, &*service)
            .with_record_count(printed)
            .with_details(serde_json::json!({ "records": lines })),
    );
    Ok(printed)
}

/// One trace line per token. Unknown tokens are echoed byte for byte.
fn write_token_line(
    err: &mut dyn Write,
    token: &OsStr,
    outcome: &TokenOutcome,
) -> std::io::Result<()> {
    match outcome {
        TokenOutcome::Matched(_) => writeln!(err, "{outcome}"),
        TokenOutcome::Unknown(_) => {
            err.write_all(b"Unknown option: ")?;
            err.write_all(token.as_encoded_bytes())?;
            err.write_all(b"\n")
        }
    }
}

/// Full process behaviour: parse, configure, run, report. Returns the exit code.
pub fn execute<R: NameResolver + ?Sized>(
    args: &[OsString],
    resolver: &R,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> u8 {
    let cli = match parse_args(args) {
        Ok(cli) => cli,
        Err(e) => return report(err, &e),
    };

    let config = ProbeConfig::from_env();
    execute_with_config(&cli, &config, resolver, out, err)
}

/// Run with an already-resolved configuration.
pub fn execute_with_config<R: NameResolver + ?Sized>(
    cli: &Cli,
    config: &ProbeConfig,
    resolver: &R,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> u8 {
    let mut emitter = match &config.log_path {
        Some(path) => match LogEmitter::to_file(path, &default_run_id()) {
            Ok(emitter) => Some(emitter),
            Err(source) => {
                return report(
                    err,
                    &ProbeError::Log {
                        path: path.clone(),
                        source,
                    },
                );
            }
        },
        None => None,
    };

    let result = run(cli, resolver, out, err, emitter.as_mut());
    let code = match &result {
        Ok(_) => EXIT_OK,
        Err(e) => report(err, e),
    };

    if let Some(emitter) = emitter.as_mut() {
        let entry = LogEntry::new("", LogLevel::Info, events::RUN_COMPLETE)
            .with_exit_code(i32::from(code));
        if let Err(e) = emitter.emit_entry(entry).and_then(|()| emitter.flush()) {
            let _ = writeln!(err, "structured log write failed: {e}");
        }
    }
    code
}

fn report(err: &mut dyn Write, e: &ProbeError) -> u8 {
    let _ = writeln!(err, "{e}");
    let _ = err.flush();
    e.exit_code()
}
