//! Line-oriented stand-in for the upload form.
//!
//! Each `name=value` line is an input event on that field. `:submit`
//! marks a successful submission and `:show` prints the current values.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use uploader_core::FormFields;
use uploader_engine::{
    ensure_storage_dir, restore_form, Autosave, FileStore, KeyValueStore, AUTOSAVE_QUIET_PERIOD,
};
use uploader_logging::{uploader_debug, uploader_warn, Subsystem};

use crate::config::AppConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
enum FormLine {
    Input { name: String, value: String },
    Submit,
    Show,
    Blank,
    Unknown(String),
}

fn parse_line(line: &str) -> FormLine {
    let trimmed = line.trim_end_matches(['\r', '\n']);
    match trimmed.trim() {
        "" => FormLine::Blank,
        ":submit" => FormLine::Submit,
        ":show" => FormLine::Show,
        _ => match trimmed.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => FormLine::Input {
                name: name.trim().to_string(),
                value: value.to_string(),
            },
            _ => FormLine::Unknown(trimmed.to_string()),
        },
    }
}

/// Refreshes the per-field counter, as the page does after each input event.
fn counter_line(name: &str, value: &str) -> String {
    format!("{name}: {} characters", value.chars().count())
}

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    ensure_storage_dir(&config.storage_dir)
        .with_context(|| format!("preparing storage dir {:?}", config.storage_dir))?;
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.storage_dir));

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    run_with(config, store, stdin).await
}

async fn run_with<R>(
    config: &AppConfig,
    store: Arc<dyn KeyValueStore>,
    input: R,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut fields = FormFields::with_fields(config.form_fields.iter().cloned());

    for name in restore_form(store.as_ref(), &mut fields) {
        let value = fields.value(&name).unwrap_or_default();
        println!("restored {}", counter_line(&name, value));
    }

    let autosave = Autosave::spawn(store, AUTOSAVE_QUIET_PERIOD);
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await.context("reading form input")? {
        match parse_line(&line) {
            FormLine::Input { name, value } => {
                if fields.set(&name, value) {
                    let current = fields.value(&name).unwrap_or_default();
                    println!("{}", counter_line(&name, current));
                    autosave.input(fields.snapshot());
                } else {
                    uploader_warn!(Subsystem::App, "form has no field named {:?}", name);
                }
            }
            FormLine::Submit => {
                autosave.submitted();
                println!("Form submitted.");
                break;
            }
            FormLine::Show => {
                for name in fields.names() {
                    println!("{name}={}", fields.value(name).unwrap_or_default());
                }
            }
            FormLine::Blank => {}
            FormLine::Unknown(other) => {
                uploader_debug!(Subsystem::App, "ignoring form line {:?}", other);
            }
        }
    }

    autosave.shutdown().await;
    Ok(())
}
