/// Implementation of `recload decode`.
///
/// Reads the payload into memory, runs [`DecodeTask::dispatch`] on the
/// blocking pool, and prints the response message on stdout. With
/// `--data-only` just the decoded value is printed.
///
/// A failure response is still printed (unless `--data-only` is set) so
/// that scripts see the same message shape either way; the command then
/// exits with code 1.
use std::io::{self, Write as _};

use anyhow::{Context, Result, anyhow};
use recload_codec::DecodeConfig;
use recload_worker::{DecodeRequest, DecodeResponse, DecodeTask};

use crate::DecodeArgs;

/// Run the `recload decode` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read, stdout cannot be written,
/// or the decode task reports a failure.
pub async fn run(args: &DecodeArgs) -> Result<()> {
    let file = tokio::fs::File::open(&args.file)
        .await
        .with_context(|| format!("cannot open {}", args.file.display()))?;
    let request = DecodeRequest::from_reader(file)
        .await
        .with_context(|| format!("cannot read {}", args.file.display()))?;

    let mut config = DecodeConfig::default();
    if let Some(limit) = args.max_size {
        config = config.with_max_decompressed_size(limit);
    }

    let response = DecodeTask::new(config).dispatch(request).await;

    let rendered = match (&response, args.data_only) {
        (DecodeResponse::Success { data, .. }, true) => render(data, args.pretty)?,
        (DecodeResponse::Failure { .. }, true) => String::new(),
        (_, false) => render(&response, args.pretty)?,
    };

    if !rendered.is_empty() {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(rendered.as_bytes())
            .context("cannot write to stdout")?;
        handle.write_all(b"\n").context("cannot write to stdout")?;
    }

    match response {
        DecodeResponse::Success { .. } => Ok(()),
        DecodeResponse::Failure { error, kind } => Err(anyhow!(
            "failed to decode {} ({kind:?}): {error}",
            args.file.display()
        )),
    }
}

fn render<T: serde::Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    text.context("cannot serialize response")
}
